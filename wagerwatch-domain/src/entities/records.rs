// Event records consumed by the detectors

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value_objects::Currency;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub timestamp: NaiveDateTime,
    pub amount: Decimal,
    pub currency: Currency,
}

/// Money leaving the account. The amount is carried for reporting only;
/// detection looks at the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub timestamp: NaiveDateTime,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub bet_id: String,
    pub accept_time: NaiveDateTime,
    pub amount: Decimal,
    pub currency: Currency,
    /// Units of the bet currency per one unit of the reference currency.
    pub settlement_exchange_rate: Option<Decimal>,
    pub payout: Decimal,
}

impl Bet {
    /// `payout / amount`, or `None` for a zero stake. A quotient outside the
    /// decimal range saturates.
    pub fn payout_ratio(&self) -> Option<Decimal> {
        if self.amount.is_zero() {
            return None;
        }
        let saturated = if self.payout.is_sign_negative() == self.amount.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        };
        Some(self.payout.checked_div(self.amount).unwrap_or(saturated))
    }
}
