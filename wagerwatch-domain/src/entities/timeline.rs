// Per-player timeline: the unit both detectors operate on

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entities::{Bet, Deposit, Withdrawal};
use crate::error::TimelineError;
use crate::value_objects::PlayerId;

/// Deposits, withdrawals and bets of a single player, each sequence
/// non-decreasing in its own time field. [`PlayerTimeline::new`] rejects
/// out-of-order input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerTimeline {
    deposits: Vec<Deposit>,
    withdrawals: Vec<Withdrawal>,
    bets: Vec<Bet>,
}

impl PlayerTimeline {
    pub fn new(
        deposits: Vec<Deposit>,
        withdrawals: Vec<Withdrawal>,
        bets: Vec<Bet>,
    ) -> Result<Self, TimelineError> {
        ensure_sorted("deposits", &deposits, |deposit| deposit.timestamp)?;
        ensure_sorted("withdrawals", &withdrawals, |withdrawal| withdrawal.timestamp)?;
        ensure_sorted("bets", &bets, |bet| bet.accept_time)?;
        Ok(Self {
            deposits,
            withdrawals,
            bets,
        })
    }

    pub fn deposits(&self) -> &[Deposit] {
        &self.deposits
    }

    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }
}

fn ensure_sorted<T>(
    sequence: &'static str,
    items: &[T],
    time_of: impl Fn(&T) -> NaiveDateTime,
) -> Result<(), TimelineError> {
    match items
        .windows(2)
        .position(|pair| time_of(&pair[1]) < time_of(&pair[0]))
    {
        Some(index) => Err(TimelineError::Unsorted {
            sequence,
            position: index + 1,
        }),
        None => Ok(()),
    }
}

/// Raw, not yet validated records of one player as handed over by the
/// grouping step or by an external caller.
#[derive(Debug, Clone)]
pub struct PlayerBatch {
    pub player_id: PlayerId,
    pub deposits: Vec<Deposit>,
    pub withdrawals: Vec<Withdrawal>,
    pub bets: Vec<Bet>,
}

impl PlayerBatch {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            deposits: Vec::new(),
            withdrawals: Vec::new(),
            bets: Vec::new(),
        }
    }

    pub fn sort_by_time(&mut self) {
        self.deposits.sort_by_key(|deposit| deposit.timestamp);
        self.withdrawals.sort_by_key(|withdrawal| withdrawal.timestamp);
        self.bets.sort_by_key(|bet| bet.accept_time);
    }

    pub fn into_timeline(self) -> Result<PlayerTimeline, TimelineError> {
        PlayerTimeline::new(self.deposits, self.withdrawals, self.bets)
    }
}
