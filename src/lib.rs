//! Shop Server - jewelry e-commerce backend
//!
//! # Architecture
//!
//! - **HTTP API** (`api`): RESTful routes for users, products,
//!   categories and orders
//! - **Order lifecycle** (`orders`): order state machine with ownership
//!   and terminal-state guards
//! - **Catalog analytics** (`catalog`): review aggregation and the
//!   featured view
//! - **Live updates** (`message`): broadcast bus bridged to WebSocket
//!   clients
//! - **Database** (`db`): embedded SurrealDB storage
//! - **Auth** (`auth`): JWT + Argon2
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Configuration, state, server
//! ├── auth/          # JWT service and extractor
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # Featured view computation
//! ├── orders/        # Order lifecycle engine
//! ├── message/       # Broadcast bus and WebSocket bridge
//! ├── db/            # Models and repositories
//! └── utils/         # Errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod message;
pub mod orders;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType};
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, work directory, logging
pub fn setup_environment() -> Result<(), AppError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)
        .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

    if config.is_production() {
        std::fs::create_dir_all(config.log_dir())
            .map_err(|e| AppError::internal(format!("Failed to create log dir: {e}")))?;
        let log_dir = config.log_dir().to_string_lossy().into_owned();
        init_logger_with_file(None, Some(&log_dir));
    } else {
        init_logger();
    }

    Ok(())
}
