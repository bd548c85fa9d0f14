use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use wagerwatch_domain::ports::{DataProvider, ReportRepository};
use wagerwatch_domain::services::PlayerAnalyzer;
use wagerwatch_domain::RuntimeConfig;

use crate::{Metrics, RunSummary};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub data_provider: Arc<dyn DataProvider>,
    pub report_repo: Arc<dyn ReportRepository>,
    pub analyzer: Arc<PlayerAnalyzer>,
    pub metrics: Arc<Metrics>,
    pub last_run: Arc<RwLock<Option<RunSummary>>>,
    /// Held for the whole duration of a run so that runs never overlap.
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: RuntimeConfig,
        data_provider: Arc<dyn DataProvider>,
        report_repo: Arc<dyn ReportRepository>,
    ) -> Self {
        let analyzer = PlayerAnalyzer::new(&config.detection);
        Self {
            config,
            data_provider,
            report_repo,
            analyzer: Arc::new(analyzer),
            metrics: Arc::new(Metrics::default()),
            last_run: Arc::new(RwLock::new(None)),
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}
