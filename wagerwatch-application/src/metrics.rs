use std::sync::atomic::{AtomicU64, Ordering};

use crate::RunSummary;

#[derive(Debug, Default)]
pub struct Metrics {
    runs: AtomicU64,
    run_failures: AtomicU64,
    players_analyzed: AtomicU64,
    sequence_flags: AtomicU64,
    streak_flags: AtomicU64,
    dropped_records: AtomicU64,
    invalid_values: AtomicU64,
    unsupported_currency_pairs: AtomicU64,
    player_failures: AtomicU64,
}

impl Metrics {
    pub fn record_run(&self, summary: &RunSummary) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.players_analyzed
            .fetch_add(summary.players_analyzed as u64, Ordering::Relaxed);
        self.sequence_flags
            .fetch_add(summary.sequence_flagged.len() as u64, Ordering::Relaxed);
        self.streak_flags
            .fetch_add(summary.streak_flagged.len() as u64, Ordering::Relaxed);
        self.dropped_records
            .fetch_add(summary.dropped_records as u64, Ordering::Relaxed);
        self.invalid_values
            .fetch_add(summary.invalid_values as u64, Ordering::Relaxed);
        self.unsupported_currency_pairs
            .fetch_add(summary.unsupported_currency_pairs as u64, Ordering::Relaxed);
        self.player_failures
            .fetch_add(summary.failures.len() as u64, Ordering::Relaxed);
    }

    pub fn record_run_failure(&self) {
        self.run_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("wagerwatch_runs_total", &self.runs),
            ("wagerwatch_run_failures_total", &self.run_failures),
            ("wagerwatch_players_analyzed_total", &self.players_analyzed),
            ("wagerwatch_sequence_flags_total", &self.sequence_flags),
            ("wagerwatch_streak_flags_total", &self.streak_flags),
            ("wagerwatch_dropped_records_total", &self.dropped_records),
            ("wagerwatch_invalid_values_total", &self.invalid_values),
            (
                "wagerwatch_unsupported_currency_pairs_total",
                &self.unsupported_currency_pairs,
            ),
            ("wagerwatch_player_failures_total", &self.player_failures),
        ];

        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {name} counter\n{name} {}\n",
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}
