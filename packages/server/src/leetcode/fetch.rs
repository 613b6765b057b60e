use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::client::{FetchError, RawSubmission, SubmissionSource};

/// An accepted submission surviving the status filter, in page order
/// (most recent first).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptedSubmission {
    pub slug: String,
    pub name: String,
    pub solved_at: DateTime<Utc>,
    pub language: String,
}

impl From<RawSubmission> for AcceptedSubmission {
    fn from(raw: RawSubmission) -> Self {
        let solved_at = raw.solved_at();
        Self {
            slug: raw.title_slug,
            name: raw.title,
            solved_at,
            language: raw.lang,
        }
    }
}

/// Result of walking a user's full submission history.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Accepted records in the order the service returned them.
    pub records: Vec<AcceptedSubmission>,
    /// Total submissions seen, accepted or not.
    pub total_fetched: u64,
}

/// Walks the external service's paginated submission history.
pub struct SubmissionFetcher {
    source: Arc<dyn SubmissionSource>,
    page_size: u64,
    page_delay: Duration,
}

impl SubmissionFetcher {
    pub fn new(source: Arc<dyn SubmissionSource>, page_size: u64, page_delay: Duration) -> Self {
        Self {
            source,
            page_size,
            page_delay,
        }
    }

    /// Authenticate once, then request fixed-size pages at increasing
    /// offsets until the first empty page — the only end-of-data signal.
    /// Non-accepted records are discarded here, before dedup.
    pub async fn fetch_all_accepted(
        &self,
        username: &str,
        credential: &str,
    ) -> Result<FetchOutcome, FetchError> {
        info!(username, "Fetching submission history");

        let session = self.source.authenticate(credential).await?;

        let mut records = Vec::new();
        let mut total_fetched = 0u64;
        let mut offset = 0u64;

        loop {
            let page = self
                .source
                .fetch_page(&session, offset, self.page_size)
                .await?;
            if page.is_empty() {
                break;
            }

            total_fetched += page.len() as u64;
            records.extend(
                page.into_iter()
                    .filter(RawSubmission::is_accepted)
                    .map(AcceptedSubmission::from),
            );

            debug!(offset, total_fetched, "Fetched submission page");
            offset += self.page_size;

            // The remote rate-limits aggressive pagination.
            tokio::time::sleep(self.page_delay).await;
        }

        info!(
            username,
            total_fetched,
            accepted = records.len(),
            "Finished fetching submission history"
        );

        Ok(FetchOutcome {
            records,
            total_fetched,
        })
    }
}

/// Collapse repeated acceptances of the same problem to one record per slug.
///
/// Pages arrive most-recent-first, so keeping the first record seen keeps
/// the latest acceptance.
pub fn dedup_by_slug(records: Vec<AcceptedSubmission>) -> Vec<AcceptedSubmission> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.slug.clone()))
        .collect()
}
