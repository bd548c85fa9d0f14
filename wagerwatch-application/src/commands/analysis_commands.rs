use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::anyhow;
use chrono::Local;
use tracing::{error, info, warn};
use uuid::Uuid;

use wagerwatch_domain::services::build_player_batches;
use wagerwatch_domain::{Currency, Diagnostic, PlayerId};

use crate::{AppError, AppState, RunSummary, RunTrigger};

/// Runs are serialized on `state.run_lock`.
pub async fn run_analysis(state: &AppState, trigger: RunTrigger) -> Result<RunSummary, AppError> {
    let _guard = state.run_lock.lock().await;
    let run_id = Uuid::new_v4();
    let started = Instant::now();
    info!(%run_id, trigger = trigger.as_str(), "analysis started");

    match execute(state, run_id, trigger).await {
        Ok(mut summary) => {
            summary.duration_ms = started.elapsed().as_millis() as u64;
            info!(
                %run_id,
                players = summary.players_analyzed,
                sequence_flagged = summary.sequence_flagged.len(),
                streak_flagged = summary.streak_flagged.len(),
                failures = summary.failures.len(),
                dropped_records = summary.dropped_records,
                invalid_values = summary.invalid_values,
                duration_ms = summary.duration_ms,
                "analysis finished"
            );
            state.metrics.record_run(&summary);
            *state.last_run.write().await = Some(summary.clone());
            Ok(summary)
        }
        Err(err) => {
            state.metrics.record_run_failure();
            error!(%run_id, "analysis failed: {}", err);
            Err(err)
        }
    }
}

async fn execute(state: &AppState, run_id: Uuid, trigger: RunTrigger) -> Result<RunSummary, AppError> {
    let payments = state.data_provider.load_payments().await?;
    let bets = state.data_provider.load_bets().await?;
    let mut load_diagnostics = payments.diagnostics;
    load_diagnostics.extend(bets.diagnostics);
    log_diagnostics(&load_diagnostics);

    let analyzer = state.analyzer.clone();
    let (payment_rows, bet_rows) = (payments.records, bets.records);
    let report = tokio::task::spawn_blocking(move || {
        analyzer.analyze(build_player_batches(payment_rows, bet_rows))
    })
    .await
    .map_err(|err| AppError::Internal(anyhow!("analysis worker failed: {}", err)))?;

    log_diagnostics(&report.diagnostics);
    for failure in &report.failures {
        warn!(player_id = %failure.player_id, "player skipped: {}", failure.reason);
    }

    let generated_at = Local::now().naive_local();
    let saved = state.report_repo.save_report(&report, generated_at).await?;

    Ok(RunSummary::from_report(
        run_id,
        trigger,
        generated_at,
        &report,
        &load_diagnostics,
        saved,
    ))
}

/// Unsupported currency pairs repeat for every deposit/bet combination, so
/// they are folded to one line per player and pair.
fn log_diagnostics(diagnostics: &[Diagnostic]) {
    let mut unsupported: BTreeMap<(Option<PlayerId>, &Currency, &Currency), usize> = BTreeMap::new();
    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::DroppedRecord {
                source,
                file,
                line,
                column,
                value,
            } => {
                warn!(
                    source = source.as_str(),
                    file = %file,
                    line,
                    column = %column,
                    "failed to convert {:?}, record dropped",
                    value
                );
            }
            Diagnostic::InvalidValue {
                source,
                file,
                line,
                column,
                value,
            } => {
                warn!(
                    source = source.as_str(),
                    file = %file,
                    line,
                    column = %column,
                    "failed to convert {:?}, value ignored",
                    value
                );
            }
            Diagnostic::UnsupportedCurrencyPair {
                player_id,
                deposit_currency,
                bet_currency,
                ..
            } => {
                *unsupported
                    .entry((*player_id, deposit_currency, bet_currency))
                    .or_default() += 1;
            }
            Diagnostic::ZeroStakeBet { player_id, bet_id } => {
                warn!(player_id = ?player_id, bet_id = %bet_id, "zero stake bet counted as a loss");
            }
        }
    }
    for ((player_id, deposit_currency, bet_currency), occurrences) in unsupported {
        warn!(
            player_id = ?player_id,
            occurrences,
            "unsupported currency pair {} -> {}",
            bet_currency,
            deposit_currency
        );
    }
}
