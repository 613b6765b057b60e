use sea_orm::*;
use sea_query::{Index, PostgresQueryBuilder};
use tracing::info;

use crate::entity::user_problem;

/// Create the indexes the pipeline relies on.
///
/// The composite unique index on `(user_id, problem_name)` backs the
/// solved-problem upsert's ON CONFLICT target, so it must exist before the
/// first sync runs.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_user_problem_user_name")
        .table(user_problem::Entity)
        .col(user_problem::Column::UserId)
        .col(user_problem::Column::ProblemName)
        .unique()
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_user_problem_user_name exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_user_problem_user_name: {}", e);
        }
    }

    Ok(())
}
