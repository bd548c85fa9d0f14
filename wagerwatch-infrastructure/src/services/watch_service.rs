use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use wagerwatch_application::commands::analysis_commands::run_analysis;
use wagerwatch_application::{AppState, RunTrigger};
use wagerwatch_domain::RuntimeConfig;

use crate::utils::{display_name, list_csv_files};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputChange {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl InputChange {
    pub fn between(previous: &BTreeSet<PathBuf>, current: &BTreeSet<PathBuf>) -> Option<Self> {
        let added: Vec<PathBuf> = current.difference(previous).cloned().collect();
        let removed: Vec<PathBuf> = previous.difference(current).cloned().collect();
        if added.is_empty() && removed.is_empty() {
            None
        } else {
            Some(Self { added, removed })
        }
    }
}

/// Csv files currently present in the given directories. A directory that
/// cannot be listed contributes nothing.
pub fn snapshot_inputs(dirs: &[&Path]) -> BTreeSet<PathBuf> {
    let mut files = BTreeSet::new();
    for dir in dirs {
        match list_csv_files(dir) {
            Ok(listed) => files.extend(listed),
            Err(err) => debug!(dir = %dir.display(), "input directory not readable: {}", err),
        }
    }
    files
}

pub fn snapshot_configured_inputs(config: &RuntimeConfig) -> BTreeSet<PathBuf> {
    snapshot_inputs(&[Path::new(&config.payments_dir), Path::new(&config.bets_dir)])
}

/// Reruns the analysis whenever a csv file appears or disappears relative to
/// `known`, which must be taken before the startup run. Edits are ignored.
pub async fn watch_inputs(state: AppState, mut known: BTreeSet<PathBuf>) {
    let payments_dir = PathBuf::from(&state.config.payments_dir);
    let bets_dir = PathBuf::from(&state.config.bets_dir);
    let period = Duration::from_secs(state.config.watch_interval_seconds.max(1));

    info!(
        files = known.len(),
        interval_seconds = period.as_secs(),
        "watching input directories"
    );

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let current = snapshot_inputs(&[payments_dir.as_path(), bets_dir.as_path()]);
        let Some(change) = InputChange::between(&known, &current) else {
            continue;
        };
        known = current;
        info!(
            added = ?change.added.iter().map(|path| display_name(path)).collect::<Vec<_>>(),
            removed = ?change.removed.iter().map(|path| display_name(path)).collect::<Vec<_>>(),
            "input files changed"
        );
        if let Err(err) = run_analysis(&state, RunTrigger::FileChange).await {
            error!("analysis after file change failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wagerwatch_domain::DetectionParams;

    use super::*;
    use crate::repositories::{CsvDataProvider, CsvReportRepository};

    fn set(names: &[&str]) -> BTreeSet<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn identical_snapshots_are_no_change() {
        assert_eq!(InputChange::between(&set(&["a.csv"]), &set(&["a.csv"])), None);
    }

    #[test]
    fn additions_and_removals_are_listed() {
        let change = InputChange::between(&set(&["a.csv", "b.csv"]), &set(&["b.csv", "c.csv"]))
            .expect("changed");
        assert_eq!(change.added, vec![PathBuf::from("c.csv")]);
        assert_eq!(change.removed, vec![PathBuf::from("a.csv")]);
    }

    #[test]
    fn snapshot_spans_directories_and_skips_missing_ones() {
        let root = tempfile::tempdir().expect("tempdir");
        let payments = root.path().join("payments");
        std::fs::create_dir(&payments).expect("mkdir");
        std::fs::write(payments.join("p.csv"), "Date").expect("write");

        let snapshot = snapshot_inputs(&[payments.as_path(), root.path().join("bets").as_path()]);

        assert_eq!(snapshot, [payments.join("p.csv")].into_iter().collect());
    }

    #[tokio::test]
    async fn files_arriving_after_the_snapshot_trigger_a_run() {
        let root = tempfile::tempdir().expect("tempdir");
        let payments = root.path().join("payments");
        let bets = root.path().join("bets");
        std::fs::create_dir_all(&payments).expect("payments dir");
        std::fs::create_dir_all(&bets).expect("bets dir");
        std::fs::write(
            payments.join("payments.csv"),
            "Date,player_id,paid_amount,transaction_type,status,paid_currency\n",
        )
        .expect("write payments");

        let config = RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: None,
            http_enabled: false,
            request_timeout_seconds: 5,
            payments_dir: payments.display().to_string(),
            bets_dir: bets.display().to_string(),
            results_dir: root.path().join("results").display().to_string(),
            watch_enabled: true,
            watch_interval_seconds: 1,
            detection: DetectionParams::default(),
        };
        let state = AppState::new(
            config,
            Arc::new(CsvDataProvider::new(&payments, &bets)),
            Arc::new(CsvReportRepository::new(root.path().join("results"))),
        );

        let known = snapshot_configured_inputs(&state.config);
        // lands while the startup run would be executing
        std::fs::write(
            bets.join("late.csv"),
            "bet_id,accept_time,result,price_change_policy,settlement_exchange_rate,currency,player_id,amount,profit,payout\n",
        )
        .expect("write bets");
        let watcher = tokio::spawn(watch_inputs(state.clone(), known));

        let mut trigger = None;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if let Some(summary) = state.last_run.read().await.as_ref() {
                trigger = Some(summary.trigger);
                break;
            }
        }
        watcher.abort();

        assert_eq!(trigger, Some(RunTrigger::FileChange));
    }
}
