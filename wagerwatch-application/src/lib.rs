// Wagerwatch Application Layer

pub mod commands;
pub mod dtos;
pub mod error;
pub mod metrics;
pub mod queries;
pub mod state;

pub use dtos::*;
pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
