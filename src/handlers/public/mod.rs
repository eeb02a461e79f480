// Endpoints that do not require a session token: token acquisition,
// registration and liveness.
pub mod auth;
pub mod health;

pub use auth::{authenticate, register, AuthParams, AuthResponse};
pub use health::health;
