use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use wagerwatch_application::commands::analysis_commands::run_analysis;
use wagerwatch_application::{AppState, RunTrigger};
use wagerwatch_infrastructure::{snapshot_configured_inputs, watch_inputs, AppConfig};
use wagerwatch_interfaces_http::build_router;

use crate::context::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Analyze once and exit with the run's outcome.
    Once,
    /// Analyze at startup, then follow the input directories and serve HTTP.
    Service,
}

fn build_router_with_layers(state: AppState) -> Router {
    build_router(state.clone())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_standalone(config: AppConfig, mode: RunMode) -> Result<()> {
    let context = AppContext::new(&config);
    let state = context.state;
    info!(
        payments_dir = %state.config.payments_dir,
        bets_dir = %state.config.bets_dir,
        results_dir = %state.config.results_dir,
        "wagerwatch starting"
    );

    let known_inputs = (mode == RunMode::Service && state.config.watch_enabled)
        .then(|| snapshot_configured_inputs(&state.config));
    let startup = run_analysis(&state, RunTrigger::Startup).await;
    if mode == RunMode::Once {
        return startup.map(|_| ()).map_err(anyhow::Error::from);
    }
    if let Err(err) = startup {
        error!("startup analysis failed: {}", err);
    }

    let watcher = match known_inputs {
        Some(known) => Some(tokio::spawn(watch_inputs(state.clone(), known))),
        None => {
            info!("input watching disabled");
            None
        }
    };

    if state.config.http_enabled {
        let app = build_router_with_layers(state.clone());
        let addr: std::net::SocketAddr = state.config.bind_addr.parse()?;
        let listener = TcpListener::bind(addr).await?;
        info!("listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        info!("http server disabled");
        shutdown_signal().await;
    }

    if let Some(watcher) = watcher {
        watcher.abort();
    }
    info!("wagerwatch stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("ctrl-c handler unavailable: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("sigterm handler unavailable: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn once_mode_writes_reports_and_exits() {
        let root = tempfile::tempdir().expect("tempdir");
        let payments = root.path().join("payments");
        let bets = root.path().join("bets");
        std::fs::create_dir_all(&payments).expect("payments dir");
        std::fs::create_dir_all(&bets).expect("bets dir");
        std::fs::write(
            payments.join("payments.csv"),
            "Date,player_id,paid_amount,transaction_type,status,paid_currency\n\
             01/01/2022 20:00,1,100,deposit,Approved,USD\n\
             01/01/2022 20:30,1,100,withdrawal,Approved,USD\n",
        )
        .expect("write payments");
        std::fs::write(
            bets.join("bets.csv"),
            "bet_id,accept_time,result,price_change_policy,settlement_exchange_rate,currency,player_id,amount,profit,payout\n\
             b1,01/01/2022 20:10,lost,none,,USD,1,95,-95,0\n",
        )
        .expect("write bets");

        let config = AppConfig {
            payments_dir: payments.display().to_string(),
            bets_dir: bets.display().to_string(),
            results_dir: root.path().join("results").display().to_string(),
            ..AppConfig::default()
        };

        run_standalone(config, RunMode::Once).await.expect("run");

        let written: Vec<String> = std::fs::read_dir(root.path().join("results"))
            .expect("results dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        let sequence = written
            .iter()
            .find(|name| name.starts_with("deposit_bet_withdrawal_"))
            .expect("sequence report");
        let content = std::fs::read_to_string(root.path().join("results").join(sequence))
            .expect("read report");
        assert_eq!(content, "player_id\n1\n");
        assert!(written.iter().any(|name| name.starts_with("win_streak_")));
    }

    #[tokio::test]
    async fn once_mode_fails_when_inputs_are_missing() {
        let root = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            payments_dir: root.path().join("missing").display().to_string(),
            bets_dir: root.path().join("missing").display().to_string(),
            results_dir: root.path().join("results").display().to_string(),
            ..AppConfig::default()
        };

        assert!(run_standalone(config, RunMode::Once).await.is_err());
    }
}
