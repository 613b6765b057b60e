use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{error, info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::leetcode::fetch::SubmissionFetcher;
use crate::models::sync::{
    SyncAccepted, SyncRequest, SyncStateResponse, validate_sync_request,
};
use crate::state::AppState;
use crate::sync::pipeline;

/// Trigger a sync run for a user.
///
/// Acknowledges immediately; the pipeline runs as a detached task and the
/// caller learns its outcome only by re-querying the sync state.
#[utoipa::path(
    post,
    path = "/sync",
    tag = "Sync",
    operation_id = "triggerSync",
    summary = "Trigger a submission-history sync",
    description = "Validates the request, schedules the sync pipeline asynchronously, and responds immediately. The caller never observes pipeline errors directly; failures surface only through the persisted sync status.",
    request_body = SyncRequest,
    responses(
        (status = 202, description = "Sync scheduled", body = SyncAccepted),
        (status = 400, description = "Validation error naming every missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "A sync for this user is already running (SYNC_IN_PROGRESS)", body = ErrorBody),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn trigger_sync(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SyncRequest>,
) -> Result<impl IntoResponse, AppError> {
    let job = validate_sync_request(payload)?;

    let permit = state
        .syncs
        .try_begin(job.user_id)
        .ok_or(AppError::SyncInProgress(job.user_id))?;

    info!(user_id = job.user_id, username = %job.username, "Accepted sync request");

    let fetcher = SubmissionFetcher::new(
        Arc::clone(&state.source),
        state.config.leetcode.page_size,
        Duration::from_millis(state.config.leetcode.page_delay_ms),
    );
    let store = Arc::clone(&state.store);
    let ack = SyncAccepted {
        message: "Sync request accepted".into(),
        user_id: job.user_id,
        username: job.username.clone(),
    };

    // Exactly one pipeline execution per accepted request. The permit rides
    // in the task so the user's slot frees when the run reaches a terminal
    // state.
    tokio::spawn(async move {
        let _permit = permit;
        let user_id = job.user_id;
        if let Err(err) = pipeline::run(store, fetcher, job).await {
            error!(user_id, error = %err, "Background sync failed");
        }
    });

    Ok((StatusCode::ACCEPTED, Json(ack)))
}

/// Query a user's persisted sync state: the caller's only channel to learn
/// how a scheduled run ended.
#[utoipa::path(
    get,
    path = "/sync/{user_id}",
    tag = "Sync",
    operation_id = "getSyncState",
    summary = "Get a user's sync state",
    params(
        ("user_id" = i32, Path, description = "Platform user ID")
    ),
    responses(
        (status = 200, description = "Current sync state", body = SyncStateResponse),
        (status = 404, description = "Unknown user (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_sync_state(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<SyncStateResponse>, AppError> {
    let snapshot = state
        .store
        .find_sync_state(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No sync state for user {user_id}")))?;

    Ok(Json(SyncStateResponse {
        user_id: snapshot.user_id,
        sync_status: snapshot.sync_status,
        last_synced_at: snapshot.last_synced_at,
        stats: snapshot.stats,
        updated_at: snapshot.updated_at,
    }))
}
