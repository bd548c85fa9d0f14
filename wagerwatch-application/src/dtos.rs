use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use wagerwatch_domain::{Diagnostic, DetectionReport, PlayerFailure, PlayerId, SavedReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTrigger {
    Startup,
    FileChange,
    Manual,
}

impl RunTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunTrigger::Startup => "startup",
            RunTrigger::FileChange => "file_change",
            RunTrigger::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub trigger: RunTrigger,
    pub generated_at: NaiveDateTime,
    pub duration_ms: u64,
    pub players_analyzed: usize,
    pub dropped_records: usize,
    pub invalid_values: usize,
    pub unsupported_currency_pairs: usize,
    pub sequence_flagged: Vec<PlayerId>,
    pub streak_flagged: Vec<PlayerId>,
    pub failures: Vec<PlayerFailure>,
    pub saved: SavedReport,
}

impl RunSummary {
    pub fn from_report(
        run_id: Uuid,
        trigger: RunTrigger,
        generated_at: NaiveDateTime,
        report: &DetectionReport,
        load_diagnostics: &[Diagnostic],
        saved: SavedReport,
    ) -> Self {
        let count = |wanted: fn(&Diagnostic) -> bool| {
            load_diagnostics.iter().filter(|diagnostic| wanted(diagnostic)).count()
        };
        Self {
            run_id,
            trigger,
            generated_at,
            duration_ms: 0,
            players_analyzed: report.players_analyzed,
            dropped_records: count(|d| matches!(d, Diagnostic::DroppedRecord { .. })),
            invalid_values: count(|d| matches!(d, Diagnostic::InvalidValue { .. })),
            unsupported_currency_pairs: report.unsupported_currency_pairs(),
            sequence_flagged: report.sequence_flagged.iter().copied().collect(),
            streak_flagged: report.streak_flagged.iter().copied().collect(),
            failures: report.failures.clone(),
            saved,
        }
    }
}
