//! Sign-in, sign-up and session commands
use serde::{Deserialize, Serialize};

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<geosense_core::User> for UserInfo {
    fn from(user: geosense_core::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

fn current_user(state: &AppState) -> CommandResult<UserInfo> {
    match state.geosense().current_user() {
        Some(user) => CommandResult::ok(user.into()),
        None => CommandResult::sign_in_required(),
    }
}

pub async fn login(state: &AppState, email: &str, password: &str) -> CommandResult<UserInfo> {
    match state.geosense().login(email, password).await {
        Ok(()) => current_user(state),
        Err(e) => CommandResult::from_error(&e),
    }
}

pub async fn signup(
    state: &AppState,
    email: &str,
    password: &str,
    name: &str,
) -> CommandResult<UserInfo> {
    match state.geosense().signup(email, password, name).await {
        Ok(()) => current_user(state),
        Err(e) => CommandResult::from_error(&e),
    }
}

pub fn logout(state: &AppState) -> CommandResult<bool> {
    state.geosense().logout();
    CommandResult::ok(true)
}

pub fn whoami(state: &AppState) -> CommandResult<UserInfo> {
    current_user(state)
}
