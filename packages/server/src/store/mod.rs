pub mod pg;

pub use pg::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::leetcode::fetch::AcceptedSubmission;
use crate::models::shared::{Difficulty, SyncStats, SyncStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// One catalog row, as much of it as reconciliation needs.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub title: String,
    pub difficulty: Difficulty,
}

/// Snapshot of a user's persisted sync state.
#[derive(Clone, Debug)]
pub struct UserSyncState {
    pub user_id: i32,
    pub sync_status: SyncStatus,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub stats: SyncStats,
    pub updated_at: DateTime<Utc>,
}

/// Persistent-store handle the pipeline runs against: catalog reads, the
/// solved-problem bulk upsert, and the terminal status writes. Production
/// uses [`PgStore`]; tests substitute an in-memory fake.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Read the full problem catalog. Called once per pipeline run.
    async fn load_catalog(&self) -> Result<Vec<CatalogEntry>, StoreError>;

    /// Batched upsert keyed by `(user_id, problem_name)`: slug, solved_at,
    /// language and updated_at are always overwritten; created_at only on
    /// first insert. Must issue no write for an empty batch.
    async fn upsert_solved(
        &self,
        user_id: i32,
        records: &[AcceptedSubmission],
    ) -> Result<(), StoreError>;

    /// All-or-nothing COMPLETED transition carrying the new stats and
    /// last_synced_at.
    async fn mark_completed(&self, user_id: i32, stats: SyncStats) -> Result<(), StoreError>;

    /// FAILED transition. Stats and last_synced_at are left unchanged.
    async fn mark_failed(&self, user_id: i32) -> Result<(), StoreError>;

    /// Current sync state, the caller's only channel to observe a finished
    /// run.
    async fn find_sync_state(&self, user_id: i32) -> Result<Option<UserSyncState>, StoreError>;
}
