//! Core - configuration, shared state and the HTTP server
//!
//! - [`Config`] - environment-driven settings
//! - [`ServerState`] - services shared by every handler
//! - [`Server`] - listener and graceful shutdown
//! - [`ServerError`] - startup failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
