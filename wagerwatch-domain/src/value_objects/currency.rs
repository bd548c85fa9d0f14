// Currency code value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// ISO-style currency code, stored trimmed and upper-cased so that
/// `"usd"` and `" USD"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub const REFERENCE: &'static str = "USD";

    pub fn new(code: &str) -> Self {
        Currency(code.trim().to_uppercase())
    }

    pub fn reference() -> Self {
        Currency(Self::REFERENCE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Currency::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Currency::new(&s)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}
