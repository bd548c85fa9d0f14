// Runtime configuration shared by every layer

use crate::entities::DetectionParams;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub http_enabled: bool,
    pub request_timeout_seconds: u64,
    pub payments_dir: String,
    pub bets_dir: String,
    pub results_dir: String,
    pub watch_enabled: bool,
    pub watch_interval_seconds: u64,
    pub detection: DetectionParams,
}
