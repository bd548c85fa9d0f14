// Result of analyzing a population of players

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entities::Diagnostic;
use crate::value_objects::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFailure {
    pub player_id: PlayerId,
    pub reason: String,
}

/// The two flagged sets are independent: a player may appear in both,
/// either or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub players_analyzed: usize,
    pub sequence_flagged: BTreeSet<PlayerId>,
    pub streak_flagged: BTreeSet<PlayerId>,
    pub failures: Vec<PlayerFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DetectionReport {
    pub fn unsupported_currency_pairs(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| matches!(diagnostic, Diagnostic::UnsupportedCurrencyPair { .. }))
            .count()
    }
}

/// Where a report ended up once persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedReport {
    pub sequence_path: String,
    pub streak_path: String,
    pub errors_path: Option<String>,
}
