//! GeoSense Session Management
//!
//! - A Session is the authenticated identity (token + user) held by the client
//! - Token and user are persisted together and cleared together
//! - Two states: Anonymous and Authenticated
//! - A rejected token anywhere forces the session back to Anonymous

mod api;
mod error;
mod manager;
mod session;
mod state;

pub use api::{AuthAction, AuthApi, AuthResponse, LoginRequest, SignupRequest};
pub use error::AuthError;
pub use manager::SessionManager;
pub use session::{Session, User};
pub use state::AuthState;

pub type Result<T> = std::result::Result<T, AuthError>;
