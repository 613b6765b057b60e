use sea_orm::prelude::StringLen;
use serde::{Deserialize, Serialize};

/// Difficulty category of a catalog problem.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    sea_orm::DeriveActiveEnum,
    sea_orm::EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    #[sea_orm(string_value = "EASY")]
    Easy,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HARD")]
    Hard,
}

/// Terminal-state marker of a user's most recent sync run.
///
/// `Pending` is the implicit starting condition; a run only ever writes
/// `Completed` or `Failed`, and nothing leaves a terminal state without a
/// brand-new sync request.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    sea_orm::DeriveActiveEnum,
    sea_orm::EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

/// Per-difficulty tallies produced by one completed reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    #[schema(example = 42)]
    pub total_solved: i32,
    #[schema(example = 20)]
    pub easy_solved: i32,
    #[schema(example = 15)]
    pub medium_solved: i32,
    #[schema(example = 7)]
    pub hard_solved: i32,
}
