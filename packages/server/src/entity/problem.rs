use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::shared::Difficulty;

/// Read-only problem catalog. Rows are owned by the main platform; the sync
/// pipeline only ever reads them to match fetched submissions by title.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "problem")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub title: String,
    pub category: Difficulty,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
