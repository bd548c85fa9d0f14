// Detector tuning parameters

use chrono::Duration;
use rust_decimal::Decimal;

use crate::value_objects::Currency;

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    /// Relative band around the stake, `0.10` means +/-10%.
    pub amount_tolerance: Decimal,
    /// Exclusive upper bound on deposit to withdrawal distance.
    pub max_gap: Duration,
    pub reference_currency: Currency,
    pub streak_length: usize,
    /// Payout/stake ratio a bet has to exceed to extend a streak.
    pub odds_threshold: Decimal,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            amount_tolerance: Decimal::new(10, 2),
            max_gap: Duration::hours(1),
            reference_currency: Currency::reference(),
            streak_length: 5,
            odds_threshold: Decimal::new(15, 1),
        }
    }
}
