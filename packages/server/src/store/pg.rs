use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::{debug, warn};

use crate::entity::{problem, user, user_problem};
use crate::leetcode::fetch::AcceptedSubmission;
use crate::models::shared::{SyncStats, SyncStatus};

use super::{CatalogEntry, StoreError, SyncStore, UserSyncState};

/// sea-orm implementation of [`SyncStore`] over the shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SyncStore for PgStore {
    async fn load_catalog(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        let problems = problem::Entity::find().all(&self.db).await?;
        Ok(problems
            .into_iter()
            .map(|p| CatalogEntry {
                title: p.title,
                difficulty: p.category,
            })
            .collect())
    }

    async fn upsert_solved(
        &self,
        user_id: i32,
        records: &[AcceptedSubmission],
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            // Deliberate no-op: prior rows stay untouched.
            debug!(user_id, "No matched problems to store");
            return Ok(());
        }

        let now = Utc::now();
        let rows = records.iter().map(|record| user_problem::ActiveModel {
            user_id: Set(user_id),
            problem_slug: Set(record.slug.clone()),
            problem_name: Set(record.name.clone()),
            solved_at: Set(record.solved_at),
            language: Set(record.language.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });

        // One batched statement; created_at survives conflicts because it is
        // absent from the update column list.
        user_problem::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    user_problem::Column::UserId,
                    user_problem::Column::ProblemName,
                ])
                .update_columns([
                    user_problem::Column::ProblemSlug,
                    user_problem::Column::SolvedAt,
                    user_problem::Column::Language,
                    user_problem::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        debug!(user_id, count = records.len(), "Upserted solved problems");
        Ok(())
    }

    async fn mark_completed(&self, user_id: i32, stats: SyncStats) -> Result<(), StoreError> {
        let now = Utc::now();
        let update = user::ActiveModel {
            sync_status: Set(SyncStatus::Completed),
            last_synced_at: Set(Some(now)),
            total_solved: Set(stats.total_solved),
            easy_solved: Set(stats.easy_solved),
            medium_solved: Set(stats.medium_solved),
            hard_solved: Set(stats.hard_solved),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = user::Entity::update_many()
            .set(update)
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            warn!(user_id, "Completed a sync for a user with no user row");
        }
        Ok(())
    }

    async fn mark_failed(&self, user_id: i32) -> Result<(), StoreError> {
        let update = user::ActiveModel {
            sync_status: Set(SyncStatus::Failed),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        user::Entity::update_many()
            .set(update)
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn find_sync_state(&self, user_id: i32) -> Result<Option<UserSyncState>, StoreError> {
        let user = user::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(user.map(|u| UserSyncState {
            user_id: u.id,
            sync_status: u.sync_status,
            last_synced_at: u.last_synced_at,
            stats: SyncStats {
                total_solved: u.total_solved,
                easy_solved: u.easy_solved,
                medium_solved: u.medium_solved,
                hard_solved: u.hard_solved,
            },
            updated_at: u.updated_at,
        }))
    }
}
