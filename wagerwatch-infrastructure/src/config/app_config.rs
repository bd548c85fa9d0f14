use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use wagerwatch_domain::{Currency, DetectionParams, RuntimeConfig};

use crate::config::{validate_currency_code, validate_tolerance};
use crate::utils::resolve_path;

pub const CONFIG_ENV: &str = "WAGERWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub http_enabled: bool,
    pub request_timeout_seconds: u64,
    pub payments_dir: String,
    pub bets_dir: String,
    pub results_dir: String,
    pub watch_enabled: bool,
    pub watch_interval_seconds: u64,
    pub amount_tolerance: Decimal,
    pub max_gap_minutes: i64,
    pub reference_currency: String,
    pub streak_length: usize,
    pub odds_threshold: Decimal,
    pub log_dir: Option<String>,
    pub log_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let detection = DetectionParams::default();
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            http_enabled: true,
            request_timeout_seconds: 60,
            payments_dir: "./data/payments".to_string(),
            bets_dir: "./data/bets".to_string(),
            results_dir: "./results".to_string(),
            watch_enabled: true,
            watch_interval_seconds: 5,
            amount_tolerance: detection.amount_tolerance,
            max_gap_minutes: detection.max_gap.num_minutes(),
            reference_currency: detection.reference_currency.to_string(),
            streak_length: detection.streak_length,
            odds_threshold: detection.odds_threshold,
            log_dir: None,
            log_format: "plain".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the file named by `WAGERWATCH_CONFIG` (default `./config.toml`).
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path)).await
    }

    pub async fn load_from(file_path: &Path) -> Result<Self> {
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("reading {}", file_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("parsing {}", file_path.display()))?
        } else {
            warn!(path = %file_path.display(), "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(log_dir) = &self.log_dir {
            if log_dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
        self.reference_currency = Currency::new(&self.reference_currency).to_string();
        self.log_format = self.log_format.trim().to_lowercase();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.payments_dir = resolve_path(base, &self.payments_dir);
        self.bets_dir = resolve_path(base, &self.bets_dir);
        self.results_dir = resolve_path(base, &self.results_dir);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        validate_tolerance(self.amount_tolerance)?;
        validate_currency_code(&self.reference_currency)?;
        if self.max_gap_minutes <= 0 {
            return Err(anyhow!("max_gap_minutes must be greater than 0"));
        }
        if self.streak_length == 0 {
            return Err(anyhow!("streak_length must be greater than 0"));
        }
        if self.odds_threshold.is_sign_negative() {
            return Err(anyhow!("odds_threshold must not be negative"));
        }
        if self.watch_interval_seconds == 0 {
            return Err(anyhow!("watch_interval_seconds must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        for (name, dir) in [
            ("payments_dir", &self.payments_dir),
            ("bets_dir", &self.bets_dir),
            ("results_dir", &self.results_dir),
        ] {
            if dir.trim().is_empty() {
                return Err(anyhow!("{} must not be empty", name));
            }
        }
        if !matches!(self.log_format.as_str(), "plain" | "json") {
            return Err(anyhow!("log_format must be plain or json"));
        }
        Ok(())
    }

    pub fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            amount_tolerance: self.amount_tolerance,
            max_gap: Duration::minutes(self.max_gap_minutes),
            reference_currency: Currency::new(&self.reference_currency),
            streak_length: self.streak_length,
            odds_threshold: self.odds_threshold,
        }
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            http_enabled: self.http_enabled,
            request_timeout_seconds: self.request_timeout_seconds,
            payments_dir: self.payments_dir.clone(),
            bets_dir: self.bets_dir.clone(),
            results_dir: self.results_dir.clone(),
            watch_enabled: self.watch_enabled,
            watch_interval_seconds: self.watch_interval_seconds,
            detection: self.detection_params(),
        }
    }

    /// Unparseable numeric or boolean values keep the current setting.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("WAGERWATCH_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("WAGERWATCH_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("WAGERWATCH_HTTP_ENABLED") {
            self.http_enabled = value.parse().unwrap_or(self.http_enabled);
        }
        if let Some(value) = lookup("WAGERWATCH_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("WAGERWATCH_PAYMENTS_DIR") {
            self.payments_dir = value;
        }
        if let Some(value) = lookup("WAGERWATCH_BETS_DIR") {
            self.bets_dir = value;
        }
        if let Some(value) = lookup("WAGERWATCH_RESULTS_DIR") {
            self.results_dir = value;
        }
        if let Some(value) = lookup("WAGERWATCH_WATCH_ENABLED") {
            self.watch_enabled = value.parse().unwrap_or(self.watch_enabled);
        }
        if let Some(value) = lookup("WAGERWATCH_WATCH_INTERVAL_SECONDS") {
            self.watch_interval_seconds = value.parse().unwrap_or(self.watch_interval_seconds);
        }
        if let Some(value) = lookup("WAGERWATCH_AMOUNT_TOLERANCE") {
            self.amount_tolerance = value.trim().parse().unwrap_or(self.amount_tolerance);
        }
        if let Some(value) = lookup("WAGERWATCH_MAX_GAP_MINUTES") {
            self.max_gap_minutes = value.parse().unwrap_or(self.max_gap_minutes);
        }
        if let Some(value) = lookup("WAGERWATCH_REFERENCE_CURRENCY") {
            self.reference_currency = value;
        }
        if let Some(value) = lookup("WAGERWATCH_STREAK_LENGTH") {
            self.streak_length = value.parse().unwrap_or(self.streak_length);
        }
        if let Some(value) = lookup("WAGERWATCH_ODDS_THRESHOLD") {
            self.odds_threshold = value.trim().parse().unwrap_or(self.odds_threshold);
        }
        if let Some(value) = lookup("WAGERWATCH_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Some(value) = lookup("WAGERWATCH_LOG_FORMAT") {
            self.log_format = value;
        }
    }
}
