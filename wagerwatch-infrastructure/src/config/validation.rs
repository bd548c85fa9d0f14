use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

/// Tolerance is a fraction of the stake and must leave a positive lower bound.
pub fn validate_tolerance(value: Decimal) -> Result<()> {
    if value.is_sign_negative() || value >= Decimal::ONE {
        return Err(anyhow!("amount_tolerance must be within [0, 1), got {}", value));
    }
    Ok(())
}

pub fn validate_currency_code(value: &str) -> Result<()> {
    let code = value.trim();
    if code.is_empty() {
        return Err(anyhow!("reference_currency must not be empty"));
    }
    if !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(anyhow!("reference_currency must be alphabetic, got {}", code));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tolerance_bounds() {
        assert!(validate_tolerance(dec!(0)).is_ok());
        assert!(validate_tolerance(dec!(0.99)).is_ok());
        assert!(validate_tolerance(dec!(1)).is_err());
        assert!(validate_tolerance(dec!(-0.01)).is_err());
    }

    #[test]
    fn currency_codes() {
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("US1").is_err());
    }
}
