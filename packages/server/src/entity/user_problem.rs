use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One solved problem per user, unique on `(user_id, problem_name)`.
///
/// The composite unique index backing the upsert is created at startup by
/// `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_problem")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    /// Stable external identifier, distinct from the display name.
    pub problem_slug: String,
    /// Display title, the key used to match against the catalog.
    pub problem_name: String,

    /// Timestamp of the most recent accepted submission.
    pub solved_at: DateTimeUtc,
    pub language: String,

    /// Set once on first insert, never overwritten by upserts.
    pub created_at: DateTimeUtc,
    /// Refreshed on every write.
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
