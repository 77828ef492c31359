//! POS Server - restaurant point-of-sale backend
//!
//! # Architecture
//!
//! - **Orders** (`orders`): lifecycle state machine, table and courier
//!   allocation, daily order numbers
//! - **Store** (`store`): embedded redb document store
//! - **Auth** (`auth`): JWT + Argon2, admin and courier roles
//! - **Reporting** (`reporting`): PDF receipts and Excel exports
//! - **HTTP API** (`api`): REST endpoints
//!
//! # Layout
//!
//! ```text
//! pos-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, passwords, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order engine
//! ├── repository/    # typed collection access
//! ├── store/         # document store
//! ├── reporting/     # PDF / XLSX writers
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod core;
pub mod orders;
pub mod reporting;
pub mod repository;
pub mod store;
pub mod utils;

// Re-exports
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderEngine, OrderError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event on the `security` target, accepts tracing field syntax
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr $(, $($fields:tt)*)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event
            $(, $($fields)*)?
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
