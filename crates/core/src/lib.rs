// dbq Core - Domain Logic & Ports
// NO infrastructure dependencies (hexagonal layout)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{QueueHandle, QueueRegistry};
pub use error::{AppError, Result};
