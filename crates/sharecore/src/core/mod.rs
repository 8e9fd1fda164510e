pub mod codes;
pub mod config;
pub mod error;
pub mod expiry;
pub mod links;
pub mod logging;
pub mod status_server;

pub use error::{AppError, AppResult};
pub use expiry::ExpiryTimer;
pub use logging::{init_logger, log_startup_configuration};
