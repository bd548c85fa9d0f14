use crate::{AppState, RunSummary};

pub async fn latest_report(state: &AppState) -> Option<RunSummary> {
    state.last_run.read().await.clone()
}
