use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::services::eligibility::{self, Eligibility};
use crate::services::messaging::MessagingProvider;
use crate::state::AppState;
use crate::store::UserRepository;

#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    /// Phones that received a reminder.
    pub sent: Vec<String>,
    /// Sends that failed; those users stay eligible for the next tick.
    pub failed: Vec<FailedSend>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FailedSend {
    pub phone: String,
    pub error: String,
}

/// Sends a reminder to every due user and records each successful send.
///
/// The caller must hold the repository lock for the whole call. Users are saved right
/// after each delivered reminder, so a crash mid-sweep can't cause a repeat send once
/// the process restarts. A failed save stops the sweep.
pub async fn run_sweep(
    repo: &dyn UserRepository,
    messaging: &dyn MessagingProvider,
    now: DateTime<Utc>,
) -> Result<SweepReport, AppError> {
    let mut users = repo.load_all()?;
    let mut report = SweepReport {
        checked: users.len(),
        ..Default::default()
    };

    if users.is_empty() {
        tracing::warn!("no users registered, skipping reminder sweep");
        return Ok(report);
    }

    for i in 0..users.len() {
        let user = &mut users[i];
        match eligibility::check(user, now) {
            Eligibility::Due => {}
            Eligibility::UnknownTimezone => {
                tracing::error!(name = %user.name, timezone = %user.timezone, "unknown timezone");
                continue;
            }
            reason => {
                tracing::debug!(name = %user.name, ?reason, "not due");
                continue;
            }
        }

        let body = eligibility::build_message(user);
        tracing::info!(name = %user.name, phone = %user.phone, "sending reminder");

        match messaging.send_message(&user.phone, &body).await {
            Ok(()) => {
                user.mark_sent(now);
                report.sent.push(user.phone.clone());
            }
            Err(e) => {
                let err = AppError::Transport(e.to_string());
                tracing::error!(error = %err, phone = %user.phone, "failed to send reminder");
                report.failed.push(FailedSend {
                    phone: user.phone.clone(),
                    error: err.to_string(),
                });
                continue;
            }
        }

        repo.save_all(&users)?;
    }

    tracing::info!(
        checked = report.checked,
        sent = report.sent.len(),
        failed = report.failed.len(),
        "reminder sweep complete"
    );
    Ok(report)
}

/// Runs a sweep at the current instant under the state's repository lock.
pub async fn sweep_now(state: &AppState) -> Result<SweepReport, AppError> {
    let repo = state.users.lock().await;
    run_sweep(&**repo, state.messaging.as_ref(), Utc::now()).await
}
