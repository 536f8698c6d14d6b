//! Background fetch-and-deliver jobs started by confirmed prompts.

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use super::*;

#[derive(Debug, Error)]
pub enum HistoryJobError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error("history job did not complete: {0}")]
    Join(String),
}

/// Outcome of a delivered history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryJobReport {
    pub key: SessionKey,
    pub account: String,
    pub period: HistoryPeriod,
    pub report: String,
}

/// Awaitable handle on a running history job.
#[derive(Debug)]
pub struct HistoryJobHandle {
    key: SessionKey,
    task: JoinHandle<Result<HistoryJobReport, HistoryJobError>>,
}

impl HistoryJobHandle {
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    pub async fn wait(self) -> Result<HistoryJobReport, HistoryJobError> {
        self.task
            .await
            .map_err(|error| HistoryJobError::Join(error.to_string()))?
    }
}

pub(super) fn spawn_history_job(
    source: Arc<dyn ActivitySource>,
    poster: CallbackPoster,
    confirmed: ConfirmedFetch,
    response_url: String,
) -> HistoryJobHandle {
    let key = confirmed.key.clone();
    let task = tokio::spawn(run_history_job(source, poster, confirmed, response_url));
    HistoryJobHandle { key, task }
}

async fn run_history_job(
    source: Arc<dyn ActivitySource>,
    poster: CallbackPoster,
    confirmed: ConfirmedFetch,
    response_url: String,
) -> Result<HistoryJobReport, HistoryJobError> {
    let ConfirmedFetch {
        key,
        target_account,
        period,
        ..
    } = confirmed;
    let report =
        fetch_history_report(source.as_ref(), &target_account, &period, Utc::now()).await?;
    poster.deliver(&response_url, &report).await?;
    Ok(HistoryJobReport {
        key,
        account: target_account,
        period,
        report,
    })
}

/// Collects job handles from the gateway and logs each outcome.
#[derive(Debug, Clone)]
pub struct HistoryJobSupervisor {
    sender: mpsc::UnboundedSender<HistoryJobHandle>,
}

impl HistoryJobSupervisor {
    /// Starts the reaper task. It runs until every supervisor clone is dropped
    /// and the jobs it already holds have finished.
    pub fn start() -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let reaper = tokio::spawn(reap_history_jobs(receiver));
        (Self { sender }, reaper)
    }

    pub fn adopt(&self, handle: HistoryJobHandle) {
        if let Err(error) = self.sender.send(handle) {
            tracing::warn!(
                prompt = %error.0.key(),
                "history job supervisor stopped; job left unsupervised"
            );
        }
    }
}

async fn reap_history_jobs(mut receiver: mpsc::UnboundedReceiver<HistoryJobHandle>) {
    let mut jobs = JoinSet::new();
    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Some(handle) => {
                    jobs.spawn(async move {
                        let key = handle.key().clone();
                        (key, handle.wait().await)
                    });
                }
                None => break,
            },
            Some(joined) = jobs.join_next(), if !jobs.is_empty() => log_job_outcome(joined),
        }
    }
    while let Some(joined) = jobs.join_next().await {
        log_job_outcome(joined);
    }
}

fn log_job_outcome(
    joined: Result<(SessionKey, Result<HistoryJobReport, HistoryJobError>), tokio::task::JoinError>,
) {
    match joined {
        Ok((_, Ok(report))) => tracing::info!(
            prompt = %report.key,
            account = %report.account,
            period = report.period.keyword(),
            "history report delivered"
        ),
        Ok((key, Err(error))) => tracing::error!(
            prompt = %key,
            error = %error,
            "history job failed"
        ),
        Err(error) => tracing::error!(error = %error, "history job supervisor task failed"),
    }
}
