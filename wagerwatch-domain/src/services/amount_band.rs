use rust_decimal::Decimal;

use crate::entities::{Bet, Deposit};
use crate::value_objects::Currency;

/// Inclusive window `[amount * (1 - tolerance), amount * (1 + tolerance)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountBand {
    pub lower: Decimal,
    pub upper: Decimal,
}

impl AmountBand {
    /// `None` when the bounds overflow the decimal range.
    pub fn around(amount: Decimal, tolerance: Decimal) -> Option<Self> {
        let lower = amount.checked_mul(Decimal::ONE.checked_sub(tolerance)?)?;
        let upper = amount.checked_mul(Decimal::ONE.checked_add(tolerance)?)?;
        Some(Self { lower, upper })
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.lower <= value && value <= self.upper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeMatch {
    Matched,
    Mismatched,
    Unsupported,
}

/// A reference-currency deposit is converted with the bet's settlement rate
/// first; the stake then has to fall in the band around the converted amount.
pub fn match_stake(
    deposit: &Deposit,
    bet: &Bet,
    tolerance: Decimal,
    reference_currency: &Currency,
) -> StakeMatch {
    let (band, value) = if bet.currency == deposit.currency {
        (AmountBand::around(bet.amount, tolerance), deposit.amount)
    } else {
        match bet.settlement_exchange_rate {
            Some(rate) if deposit.currency == *reference_currency && rate > Decimal::ZERO => {
                let band = deposit
                    .amount
                    .checked_mul(rate)
                    .and_then(|converted| AmountBand::around(converted, tolerance));
                (band, bet.amount)
            }
            _ => return StakeMatch::Unsupported,
        }
    };

    match band {
        Some(band) if band.contains(value) => StakeMatch::Matched,
        _ => StakeMatch::Mismatched,
    }
}
