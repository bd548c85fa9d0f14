use rust_decimal::Decimal;

use crate::entities::{Bet, DetectionParams, Diagnostic};
use crate::ports::DiagnosticSink;

/// Counts consecutive bets whose payout/stake ratio is strictly above
/// `odds_threshold`; any other bet resets the run.
#[derive(Debug, Clone)]
pub struct StreakDetector {
    streak_length: usize,
    odds_threshold: Decimal,
}

impl Default for StreakDetector {
    fn default() -> Self {
        Self::from_params(&DetectionParams::default())
    }
}

impl StreakDetector {
    pub fn new(streak_length: usize, odds_threshold: Decimal) -> Self {
        Self {
            streak_length: streak_length.max(1),
            odds_threshold,
        }
    }

    pub fn from_params(params: &DetectionParams) -> Self {
        Self::new(params.streak_length, params.odds_threshold)
    }

    /// Zero-stake bets are reported and count as a loss.
    pub fn has_win_streak(&self, bets: &[Bet], sink: &mut dyn DiagnosticSink) -> bool {
        let mut streak = 0;
        for bet in bets {
            if bet.amount.is_zero() {
                sink.record(Diagnostic::ZeroStakeBet {
                    player_id: None,
                    bet_id: bet.bet_id.clone(),
                });
                streak = 0;
                continue;
            }
            match bet.payout_ratio() {
                Some(ratio) if ratio > self.odds_threshold => {
                    streak += 1;
                    if streak == self.streak_length {
                        return true;
                    }
                }
                _ => streak = 0,
            }
        }
        false
    }
}
