use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::leetcode::client::FetchError;
use crate::leetcode::fetch::{SubmissionFetcher, dedup_by_slug};
use crate::models::shared::SyncStats;
use crate::models::sync::SyncJob;
use crate::store::{StoreError, SyncStore};

use super::reconcile::reconcile;

/// Terminal error of one pipeline run. Observable to the original caller
/// only through the persisted sync status.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch submissions: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to read the problem catalog: {0}")]
    Reconciliation(StoreError),
    #[error("failed to persist sync results: {0}")]
    Persistence(StoreError),
}

/// Summary of a completed run.
#[derive(Clone, Copy, Debug)]
pub struct SyncOutcome {
    pub total_fetched: u64,
    pub matched: usize,
    pub unmatched: usize,
    pub stats: SyncStats,
}

/// Advances the per-user status state machine to its terminal state.
struct StatusTracker<'a> {
    store: &'a dyn SyncStore,
}

impl StatusTracker<'_> {
    /// COMPLETED transition. Stats ride in the same write, so partial stats
    /// are never committed.
    async fn complete(&self, user_id: i32, stats: SyncStats) -> Result<(), SyncError> {
        self.store
            .mark_completed(user_id, stats)
            .await
            .map_err(SyncError::Persistence)
    }

    /// FAILED transition. Best-effort: a secondary failure here is logged
    /// and swallowed so the original error stays the one that propagates.
    async fn fail(&self, user_id: i32) {
        if let Err(status_err) = self.store.mark_failed(user_id).await {
            warn!(
                user_id,
                error = %status_err,
                "Failed to record FAILED sync status"
            );
        }
    }
}

/// Run the whole sync pipeline for one accepted request.
///
/// The HTTP boundary spawns this and discards the result; tests await it to
/// observe the terminal state deterministically.
#[instrument(
    skip(store, fetcher, job),
    fields(user_id = job.user_id, username = %job.username)
)]
pub async fn run(
    store: Arc<dyn SyncStore>,
    fetcher: SubmissionFetcher,
    job: SyncJob,
) -> Result<SyncOutcome, SyncError> {
    info!("Starting sync run");
    let tracker = StatusTracker { store: &*store };

    match execute(&*store, &fetcher, &job, &tracker).await {
        Ok(outcome) => {
            info!(
                total_fetched = outcome.total_fetched,
                matched = outcome.matched,
                unmatched = outcome.unmatched,
                "Sync run completed"
            );
            Ok(outcome)
        }
        Err(err) => {
            error!(error = %err, "Sync run failed");
            tracker.fail(job.user_id).await;
            Err(err)
        }
    }
}

async fn execute(
    store: &dyn SyncStore,
    fetcher: &SubmissionFetcher,
    job: &SyncJob,
    tracker: &StatusTracker<'_>,
) -> Result<SyncOutcome, SyncError> {
    let fetched = fetcher
        .fetch_all_accepted(&job.username, &job.credential)
        .await?;
    let total_fetched = fetched.total_fetched;

    let unique = dedup_by_slug(fetched.records);

    let catalog = store
        .load_catalog()
        .await
        .map_err(SyncError::Reconciliation)?;
    let reconciled = reconcile(unique, &catalog);

    if !reconciled.unmatched.is_empty() {
        let titles: Vec<&str> = reconciled
            .unmatched
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        warn!(
            count = titles.len(),
            ?titles,
            "Fetched problems have no catalog entry and were skipped"
        );
    }

    store
        .upsert_solved(job.user_id, &reconciled.matched)
        .await
        .map_err(SyncError::Persistence)?;

    tracker.complete(job.user_id, reconciled.stats).await?;

    Ok(SyncOutcome {
        total_fetched,
        matched: reconciled.matched.len(),
        unmatched: reconciled.unmatched.len(),
        stats: reconciled.stats,
    })
}
