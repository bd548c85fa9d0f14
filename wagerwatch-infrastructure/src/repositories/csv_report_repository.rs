use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use csv::Writer;
use tokio::fs;

use wagerwatch_domain::{DetectionReport, PlayerFailure, PlayerId, ReportRepository, SavedReport};

pub const SEQUENCE_REPORT_PREFIX: &str = "deposit_bet_withdrawal";
pub const STREAK_REPORT_PREFIX: &str = "win_streak";
pub const ERRORS_REPORT_PREFIX: &str = "analysis_errors";

/// Writes one timestamped csv per flag kind into `results_dir`.
pub struct CsvReportRepository {
    results_dir: PathBuf,
}

impl CsvReportRepository {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    fn report_path(&self, prefix: &str, generated_at: NaiveDateTime) -> PathBuf {
        self.results_dir
            .join(format!("{}_{}.csv", prefix, generated_at.format("%Y%m%d_%H%M%S")))
    }
}

#[async_trait]
impl ReportRepository for CsvReportRepository {
    async fn save_report(
        &self,
        report: &DetectionReport,
        generated_at: NaiveDateTime,
    ) -> Result<SavedReport> {
        fs::create_dir_all(&self.results_dir)
            .await
            .with_context(|| format!("creating {}", self.results_dir.display()))?;

        let sequence_path = self.report_path(SEQUENCE_REPORT_PREFIX, generated_at);
        write_file(&sequence_path, render_player_ids(&report.sequence_flagged)?).await?;

        let streak_path = self.report_path(STREAK_REPORT_PREFIX, generated_at);
        write_file(&streak_path, render_player_ids(&report.streak_flagged)?).await?;

        let errors_path = if report.failures.is_empty() {
            None
        } else {
            let path = self.report_path(ERRORS_REPORT_PREFIX, generated_at);
            write_file(&path, render_failures(&report.failures)?).await?;
            Some(path.display().to_string())
        };

        Ok(SavedReport {
            sequence_path: sequence_path.display().to_string(),
            streak_path: streak_path.display().to_string(),
            errors_path,
        })
    }
}

async fn write_file(path: &Path, content: Vec<u8>) -> Result<()> {
    fs::write(path, content)
        .await
        .with_context(|| format!("writing {}", path.display()))
}

pub fn render_player_ids(ids: &BTreeSet<PlayerId>) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(["player_id"])?;
    for id in ids {
        wtr.write_record([id.to_string()])?;
    }
    Ok(wtr.into_inner()?)
}

pub fn render_failures(failures: &[PlayerFailure]) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(["player_id", "reason"])?;
    for failure in failures {
        wtr.write_record([failure.player_id.to_string(), failure.reason.clone()])?;
    }
    Ok(wtr.into_inner()?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 5, 17)
            .and_then(|date| date.and_hms_opt(9, 3, 7))
            .expect("valid time")
    }

    #[tokio::test]
    async fn writes_both_reports_sorted_by_player() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = CsvReportRepository::new(dir.path().join("results"));
        let report = DetectionReport {
            sequence_flagged: [PlayerId(12), PlayerId(3)].into_iter().collect(),
            ..DetectionReport::default()
        };

        let saved = repo.save_report(&report, generated_at()).await.expect("save");

        assert!(saved.sequence_path.ends_with("deposit_bet_withdrawal_20220517_090307.csv"));
        assert!(saved.streak_path.ends_with("win_streak_20220517_090307.csv"));
        assert!(saved.errors_path.is_none());
        let sequence = std::fs::read_to_string(&saved.sequence_path).expect("read");
        assert_eq!(sequence, "player_id\n3\n12\n");
        let streak = std::fs::read_to_string(&saved.streak_path).expect("read");
        assert_eq!(streak, "player_id\n");
    }

    #[tokio::test]
    async fn failures_get_their_own_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = CsvReportRepository::new(dir.path());
        let report = DetectionReport {
            failures: vec![PlayerFailure {
                player_id: PlayerId(4),
                reason: "bets are out of time order at position 1".to_string(),
            }],
            ..DetectionReport::default()
        };

        let saved = repo.save_report(&report, generated_at()).await.expect("save");

        let path = saved.errors_path.expect("errors file");
        let content = std::fs::read_to_string(path).expect("read");
        assert_eq!(
            content,
            "player_id,reason\n4,bets are out of time order at position 1\n"
        );
    }
}
