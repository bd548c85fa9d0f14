// Domain entities
pub mod diagnostic;
pub mod params;
pub mod raw;
pub mod records;
pub mod report;
pub mod runtime_config;
pub mod timeline;

pub use diagnostic::*;
pub use params::*;
pub use raw::*;
pub use records::*;
pub use report::*;
pub use runtime_config::*;
pub use timeline::*;
