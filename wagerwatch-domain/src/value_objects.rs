// Domain value objects
pub mod currency;
pub mod identifiers;
pub mod transaction_type;

pub use currency::*;
pub use identifiers::*;
pub use transaction_type::*;
