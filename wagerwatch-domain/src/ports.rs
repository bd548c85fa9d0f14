// Port traits (interfaces)
// Define what the domain needs from infrastructure

pub mod diagnostics;
pub mod repositories;

pub use diagnostics::*;
pub use repositories::*;
