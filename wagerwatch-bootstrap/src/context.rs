use std::sync::Arc;

use wagerwatch_application::AppState;
use wagerwatch_infrastructure::{AppConfig, CsvDataProvider, CsvReportRepository};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Self {
        let runtime_config = config.to_runtime_config();
        let data_provider = Arc::new(CsvDataProvider::new(
            &runtime_config.payments_dir,
            &runtime_config.bets_dir,
        ));
        let report_repo = Arc::new(CsvReportRepository::new(&runtime_config.results_dir));

        Self {
            state: AppState::new(runtime_config, data_provider, report_repo),
        }
    }
}
