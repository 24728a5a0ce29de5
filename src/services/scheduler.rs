use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::services::reminders;
use crate::state::AppState;

/// Runs a reminder sweep on every tick, forever.
///
/// Eligibility only looks at the local hour, so the period must be an hour or
/// shorter or some users will never be due. Missed ticks are skipped, not replayed.
pub async fn run(state: Arc<AppState>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(period_secs = period.as_secs(), "reminder scheduler started");

    loop {
        ticker.tick().await;
        tracing::debug!("running scheduled reminder sweep");
        if let Err(e) = reminders::sweep_now(&state).await {
            tracing::error!(error = %e, "scheduled reminder sweep failed");
        }
    }
}
