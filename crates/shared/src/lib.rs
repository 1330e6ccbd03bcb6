pub mod auth;
pub mod config;
pub mod password;
pub mod telemetry;

pub use auth::*;
pub use config::*;
pub use password::*;
pub use telemetry::*;
