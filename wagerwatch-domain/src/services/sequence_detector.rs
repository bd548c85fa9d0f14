use chrono::Duration;
use rust_decimal::Decimal;

use crate::entities::{Bet, Deposit, DetectionParams, Diagnostic, PlayerTimeline};
use crate::ports::DiagnosticSink;
use crate::services::amount_band::{match_stake, StakeMatch};
use crate::value_objects::Currency;

/// Deposit, then a bet of roughly that amount, then a withdrawal within `max_gap`.
#[derive(Debug, Clone)]
pub struct SequenceDetector {
    amount_tolerance: Decimal,
    max_gap: Duration,
    reference_currency: Currency,
}

impl Default for SequenceDetector {
    fn default() -> Self {
        Self::from_params(&DetectionParams::default())
    }
}

impl SequenceDetector {
    pub fn new(amount_tolerance: Decimal, max_gap: Duration, reference_currency: Currency) -> Self {
        Self {
            amount_tolerance,
            max_gap,
            reference_currency,
        }
    }

    pub fn from_params(params: &DetectionParams) -> Self {
        Self::new(
            params.amount_tolerance,
            params.max_gap,
            params.reference_currency.clone(),
        )
    }

    /// Needs `D < W`, `W - D < max_gap` and `D <= B <= W`. Both cursors only
    /// move forward; the bet window `[D, W]` only grows as `W` advances.
    pub fn has_deposit_bet_withdrawal_sequence(
        &self,
        timeline: &PlayerTimeline,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let deposits = timeline.deposits();
        let withdrawals = timeline.withdrawals();
        let bets = timeline.bets();
        if deposits.is_empty() || withdrawals.is_empty() || bets.is_empty() {
            return false;
        }

        let mut withdrawal_cursor = 0;
        let mut bet_cursor = 0;
        for deposit in deposits {
            withdrawal_cursor = advance(withdrawals, withdrawal_cursor, |withdrawal| {
                withdrawal.timestamp <= deposit.timestamp
            });
            if withdrawal_cursor == withdrawals.len() {
                // later deposits are no earlier, so none has a withdrawal after it
                return false;
            }
            bet_cursor = advance(bets, bet_cursor, |bet| bet.accept_time < deposit.timestamp);
            if bet_cursor == bets.len() {
                return false;
            }

            let mut scan = bet_cursor;
            for withdrawal in &withdrawals[withdrawal_cursor..] {
                if withdrawal.timestamp - deposit.timestamp >= self.max_gap {
                    break;
                }
                while let Some(bet) = bets.get(scan) {
                    if bet.accept_time > withdrawal.timestamp {
                        break;
                    }
                    if self.stake_matches(deposit, bet, sink) {
                        return true;
                    }
                    scan += 1;
                }
            }
        }
        false
    }

    pub(crate) fn stake_matches(
        &self,
        deposit: &Deposit,
        bet: &Bet,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        match match_stake(deposit, bet, self.amount_tolerance, &self.reference_currency) {
            StakeMatch::Matched => true,
            StakeMatch::Mismatched => false,
            StakeMatch::Unsupported => {
                sink.record(Diagnostic::UnsupportedCurrencyPair {
                    player_id: None,
                    bet_id: bet.bet_id.clone(),
                    deposit_currency: deposit.currency.clone(),
                    bet_currency: bet.currency.clone(),
                });
                false
            }
        }
    }
}

fn advance<T>(items: &[T], from: usize, passed: impl Fn(&T) -> bool) -> usize {
    from + items[from..].iter().take_while(|&item| passed(item)).count()
}
