use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::entities::{BetRecord, DetectionReport, LoadedRecords, PaymentRecord, SavedReport};

/// Source of raw payment and bet rows. Rows that fail conversion are left
/// out of `records` and reported in `diagnostics`.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn load_payments(&self) -> anyhow::Result<LoadedRecords<PaymentRecord>>;
    async fn load_bets(&self) -> anyhow::Result<LoadedRecords<BetRecord>>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn save_report(
        &self,
        report: &DetectionReport,
        generated_at: NaiveDateTime,
    ) -> anyhow::Result<SavedReport>;
}
