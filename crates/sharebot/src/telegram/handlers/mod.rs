//! Update handlers and the dispatcher schema that routes to them

pub mod admin;
pub mod callbacks;
pub mod channel;
pub mod schema;
pub mod start;
pub mod types;
pub mod uploads;

pub use admin::AdminAction;
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
