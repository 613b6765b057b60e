use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::shared::SyncStatus;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Terminal state of the most recent sync run, or `PENDING` before the
    /// first run finishes.
    pub sync_status: SyncStatus,
    /// Set on every COMPLETED run; untouched by FAILED runs.
    pub last_synced_at: Option<DateTimeUtc>,

    // Aggregate counts from the most recently completed reconciliation.
    pub total_solved: i32,
    pub easy_solved: i32,
    pub medium_solved: i32,
    pub hard_solved: i32,

    #[sea_orm(has_many)]
    pub solved_problems: HasMany<super::user_problem::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
