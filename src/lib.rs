pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use server::app;
pub use state::AppState;
