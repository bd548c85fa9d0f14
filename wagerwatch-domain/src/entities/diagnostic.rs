// Structured diagnostics produced while loading and analyzing

use serde::{Deserialize, Serialize};

use crate::value_objects::{Currency, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Payments,
    Bets,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::Payments => "payments",
            RecordSource::Bets => "bets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A row was discarded because a required column was missing or did
    /// not convert.
    DroppedRecord {
        source: RecordSource,
        file: String,
        line: u64,
        column: String,
        value: String,
    },
    /// An optional column held something unconvertible. The row is kept
    /// with the value treated as absent.
    InvalidValue {
        source: RecordSource,
        file: String,
        line: u64,
        column: String,
        value: String,
    },
    UnsupportedCurrencyPair {
        player_id: Option<PlayerId>,
        bet_id: String,
        deposit_currency: Currency,
        bet_currency: Currency,
    },
    ZeroStakeBet {
        player_id: Option<PlayerId>,
        bet_id: String,
    },
}

impl Diagnostic {
    /// Detectors only see a bare timeline; the caller stamps the player.
    pub fn for_player(self, player: PlayerId) -> Self {
        match self {
            Diagnostic::UnsupportedCurrencyPair {
                bet_id,
                deposit_currency,
                bet_currency,
                ..
            } => Diagnostic::UnsupportedCurrencyPair {
                player_id: Some(player),
                bet_id,
                deposit_currency,
                bet_currency,
            },
            Diagnostic::ZeroStakeBet { bet_id, .. } => Diagnostic::ZeroStakeBet {
                player_id: Some(player),
                bet_id,
            },
            other => other,
        }
    }
}
