//! Session Manager
//!
//! Single owner of the client session and the only writer of its durable
//! entries. Constructed once at startup and shared by cloning; clones see the
//! same session.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use geosense_storage::TokenStore;

use crate::api::{AuthAction, AuthApi, AuthResponse, LoginRequest, SignupRequest};
use crate::error::AuthError;
use crate::session::{Session, User};
use crate::state::AuthState;
use crate::Result;

const AUTHORIZATION: &str = "Authorization";

pub struct SessionManager {
    /// In-memory session, `None` while anonymous
    session: Arc<RwLock<Option<Session>>>,
    /// Durable storage for token and user
    store: TokenStore,
    /// Auth backend
    api: Arc<dyn AuthApi>,
    /// State broadcast for views that redirect on sign-out
    state_tx: Arc<watch::Sender<AuthState>>,
    /// Set while a login or signup request is outstanding
    pending: Arc<AtomicBool>,
}

impl SessionManager {
    pub fn new(store: TokenStore, api: Arc<dyn AuthApi>) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Anonymous);

        Self {
            session: Arc::new(RwLock::new(None)),
            store,
            api,
            state_tx: Arc::new(state_tx),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Restore the session persisted by a previous run.
    ///
    /// Corrupt or half-written entries are discarded and the manager starts
    /// anonymous; only a failing storage backend is reported as an error.
    pub fn initialize(&self) -> Result<AuthState> {
        let stored = self.store.load()?;

        if stored.is_empty() {
            self.set_session(None);
            tracing::info!("No stored session, starting anonymous");
            return Ok(AuthState::Anonymous);
        }

        let restored = match (stored.token, stored.user_json) {
            (Some(token), Some(user_json)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&user_json) {
                    Ok(user) => Some(Session::new(token, user)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Stored user is not valid JSON, discarding session");
                        None
                    }
                }
            }
            _ => {
                tracing::warn!("Stored session is incomplete, discarding");
                None
            }
        };

        match restored {
            Some(session) => {
                tracing::info!(
                    user_id = %session.user.id,
                    email = %session.user.email,
                    "Restored session"
                );
                self.set_session(Some(session));
                Ok(AuthState::Authenticated)
            }
            None => {
                self.store.clear()?;
                self.set_session(None);
                Ok(AuthState::Anonymous)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let request = LoginRequest::new(email, password)?;
        let _guard = self.begin_request()?;

        let response = self.api.login(&request).await;
        self.complete(AuthAction::Login, response)
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<()> {
        let request = SignupRequest::new(email, password, name)?;
        let _guard = self.begin_request()?;

        let response = self.api.signup(&request).await;
        self.complete(AuthAction::Signup, response)
    }

    /// Voluntary sign-out. Idempotent.
    pub fn logout(&self) {
        let was = self.state();
        self.clear_all();

        if was.is_authenticated() {
            tracing::info!("Logged out");
        }
    }

    /// Forced sign-out after the backend rejected the token. Idempotent.
    pub fn expire(&self) {
        let was = self.state();
        self.clear_all();

        if was.is_authenticated() {
            tracing::warn!("Session rejected by backend, signed out");
        }
    }

    /// `{}` when anonymous, otherwise `{"Authorization": "Bearer <token>"}`.
    pub fn auth_header(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(session) = self.session.read().as_ref() {
            headers.insert(AUTHORIZATION.to_string(), session.bearer());
        }
        headers
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    pub fn state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    pub fn user(&self) -> Option<User> {
        self.session.read().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.token.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Whether a login or signup request is currently outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    fn begin_request(&self) -> Result<PendingGuard> {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Ignoring auth request while another is pending");
            return Err(AuthError::RequestInFlight);
        }

        Ok(PendingGuard {
            flag: Arc::clone(&self.pending),
        })
    }

    fn complete(&self, action: AuthAction, response: Result<AuthResponse>) -> Result<()> {
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(action = ?action, error = %e, "Authentication failed");
                return Err(e);
            }
        };

        if response.token.trim().is_empty() {
            tracing::warn!(action = ?action, "Backend returned an empty token");
            return Err(action.failure(None));
        }

        let user_json = serde_json::to_string(&response.user)?;
        self.store.save(&response.token, &user_json)?;

        let session = Session::new(response.token, response.user);
        tracing::info!(
            action = ?action,
            user_id = %session.user.id,
            email = %session.user.email,
            "Authenticated"
        );
        self.set_session(Some(session));

        Ok(())
    }

    fn clear_all(&self) {
        if let Err(e) = self.store.clear() {
            // Memory is still cleared so this process stays signed out
            tracing::error!(error = %e, "Failed to clear stored session");
        }
        self.set_session(None);
    }

    fn set_session(&self, session: Option<Session>) {
        let next = if session.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        };

        *self.session.write() = session;

        self.state_tx.send_if_modified(|current| {
            // Re-login and repeated logout keep the state
            if *current == next {
                return false;
            }
            debug_assert!(current.can_transition_to(next));
            *current = next;
            true
        });
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            store: self.store.clone(),
            api: Arc::clone(&self.api),
            state_tx: Arc::clone(&self.state_tx),
            pending: Arc::clone(&self.pending),
        }
    }
}

/// Releases the pending flag on every exit path, including cancellation.
struct PendingGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use geosense_storage::{Database, TOKEN_KEY, USER_KEY};
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeAuthApi {
        /// Error message to reject with; `None` accepts
        reject: Mutex<Option<String>>,
        network_down: AtomicBool,
        token: Mutex<String>,
        calls: AtomicUsize,
        /// When set, requests block until notified
        gate: Option<Arc<Notify>>,
    }

    impl FakeAuthApi {
        fn accepting(token: &str) -> Self {
            Self {
                token: Mutex::new(token.to_string()),
                ..Default::default()
            }
        }

        async fn respond(&self, action: AuthAction, email: &str, name: &str) -> Result<AuthResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.network_down.load(Ordering::SeqCst) {
                return Err(AuthError::NetworkUnavailable("connection refused".to_string()));
            }
            if let Some(msg) = self.reject.lock().clone() {
                return Err(action.failure(Some(msg)));
            }
            Ok(AuthResponse {
                token: self.token.lock().clone(),
                user: User {
                    id: "7".to_string(),
                    email: email.to_string(),
                    name: name.to_string(),
                },
            })
        }
    }

    #[async_trait]
    impl AuthApi for FakeAuthApi {
        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
            self.respond(AuthAction::Login, &request.email, "Ana").await
        }

        async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
            self.respond(AuthAction::Signup, &request.email, &request.name)
                .await
        }
    }

    fn manager_with(db: &Database, api: FakeAuthApi) -> (SessionManager, Arc<FakeAuthApi>) {
        let api = Arc::new(api);
        let manager = SessionManager::new(TokenStore::new(db.clone()), api.clone());
        (manager, api)
    }

    #[tokio::test]
    async fn test_login_then_logout_clears_everything() {
        let db = Database::open_in_memory().unwrap();
        let (manager, _) = manager_with(&db, FakeAuthApi::accepting("tok-1"));
        assert_eq!(manager.initialize().unwrap(), AuthState::Anonymous);

        manager.login("ana@example.com", "secret").await.unwrap();
        assert!(manager.is_authenticated());
        assert_eq!(manager.user().unwrap().email, "ana@example.com");

        manager.logout();
        assert!(!manager.is_authenticated());
        assert!(manager.user().is_none());

        let stored = TokenStore::new(db.clone()).load().unwrap();
        assert!(stored.is_empty());

        // Idempotent
        manager.logout();
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_auth_header_tracks_state() {
        let db = Database::open_in_memory().unwrap();
        let (manager, _) = manager_with(&db, FakeAuthApi::accepting("tok-xyz"));
        manager.initialize().unwrap();

        assert!(manager.auth_header().is_empty());

        manager.login("ana@example.com", "secret").await.unwrap();
        let headers = manager.auth_header();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer tok-xyz");

        manager.expire();
        assert!(manager.auth_header().is_empty());
    }

    #[tokio::test]
    async fn test_restart_restores_same_user() {
        let db = Database::open_in_memory().unwrap();
        let (manager, _) = manager_with(&db, FakeAuthApi::accepting("tok-1"));
        manager.initialize().unwrap();
        manager
            .signup("ana@example.com", "secret1", "Ana Lima")
            .await
            .unwrap();
        let before = manager.user().unwrap();

        let (restarted, _) = manager_with(&db, FakeAuthApi::default());
        assert_eq!(restarted.initialize().unwrap(), AuthState::Authenticated);
        assert!(restarted.is_authenticated());
        assert_eq!(restarted.user().unwrap(), before);
        assert_eq!(restarted.token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_corrupt_user_json_is_discarded() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(TOKEN_KEY, "tok-1").unwrap();
        db.set_value(USER_KEY, "{not json").unwrap();

        let (manager, _) = manager_with(&db, FakeAuthApi::default());
        assert_eq!(manager.initialize().unwrap(), AuthState::Anonymous);
        assert!(!manager.is_authenticated());
        assert_eq!(db.get_value(TOKEN_KEY).unwrap(), None);
        assert_eq!(db.get_value(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_half_written_storage_is_discarded() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(TOKEN_KEY, "tok-1").unwrap();

        let (manager, _) = manager_with(&db, FakeAuthApi::default());
        assert_eq!(manager.initialize().unwrap(), AuthState::Anonymous);
        assert_eq!(db.get_value(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_anonymous() {
        let db = Database::open_in_memory().unwrap();
        let api = FakeAuthApi::accepting("tok");
        *api.reject.lock() = Some("Invalid credentials".to_string());
        let (manager, _) = manager_with(&db, api);
        manager.initialize().unwrap();

        match manager.login("ana@example.com", "wrong").await {
            Err(AuthError::LoginFailed(msg)) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!manager.is_authenticated());
        assert!(TokenStore::new(db.clone()).load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_is_typed() {
        let db = Database::open_in_memory().unwrap();
        let api = FakeAuthApi::accepting("tok");
        api.network_down.store(true, Ordering::SeqCst);
        let (manager, _) = manager_with(&db, api);

        let err = manager.login("ana@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::NetworkUnavailable(_)));
        assert!(!manager.is_pending());
    }

    #[tokio::test]
    async fn test_empty_token_is_a_failed_login() {
        let db = Database::open_in_memory().unwrap();
        let (manager, _) = manager_with(&db, FakeAuthApi::accepting(""));

        match manager.login("ana@example.com", "secret").await {
            Err(AuthError::LoginFailed(msg)) => assert_eq!(msg, "Login failed"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_invalid_signup_makes_no_request() {
        let db = Database::open_in_memory().unwrap();
        let (manager, api) = manager_with(&db, FakeAuthApi::accepting("tok"));

        let err = manager.signup("ana@example.com", "123", "Ana").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_login_makes_no_request() {
        let db = Database::open_in_memory().unwrap();
        let (manager, api) = manager_with(&db, FakeAuthApi::accepting("tok"));

        for (email, password) in [("", "secret"), ("   ", "secret"), ("ana@example.com", "")] {
            let err = manager.login(email, password).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidInput(_)));
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(!manager.is_pending());
    }

    #[tokio::test]
    async fn test_second_login_while_pending_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let gate = Arc::new(Notify::new());
        let api = FakeAuthApi {
            token: Mutex::new("tok".to_string()),
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let (manager, api) = manager_with(&db, api);

        let first = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.login("ana@example.com", "secret").await })
        };

        while !manager.is_pending() {
            tokio::task::yield_now().await;
        }

        let second = manager.login("ana@example.com", "secret").await;
        assert!(matches!(second, Err(AuthError::RequestInFlight)));

        gate.notify_one();
        first.await.unwrap().unwrap();

        assert!(manager.is_authenticated());
        assert!(!manager.is_pending());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_state_changes_are_broadcast() {
        let db = Database::open_in_memory().unwrap();
        let (manager, _) = manager_with(&db, FakeAuthApi::accepting("tok"));
        let mut rx = manager.subscribe();
        assert_eq!(*rx.borrow(), AuthState::Anonymous);

        manager.login("ana@example.com", "secret").await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::Authenticated);

        manager.expire();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), AuthState::Anonymous);

        manager.logout();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_relogin_replaces_session_without_state_change() {
        let db = Database::open_in_memory().unwrap();
        let (manager, api) = manager_with(&db, FakeAuthApi::accepting("tok-1"));
        let mut rx = manager.subscribe();

        manager.login("ana@example.com", "secret").await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::Authenticated);

        *api.token.lock() = "tok-2".to_string();
        manager.login("ana@example.com", "secret").await.unwrap();

        assert_eq!(manager.token().as_deref(), Some("tok-2"));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(
            TokenStore::new(db.clone()).load().unwrap().token.as_deref(),
            Some("tok-2")
        );
    }
}
