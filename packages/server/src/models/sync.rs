use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::{SyncStats, SyncStatus};

/// Request body for triggering a sync.
///
/// Every field is optional at the serde level so that validation can report
/// all missing fields at once instead of failing on the first.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Platform user ID the synced data belongs to.
    #[schema(example = 1)]
    pub user_id: Option<i32>,
    /// Username on the external coding-practice site.
    #[schema(example = "alice")]
    pub username: Option<String>,
    /// Session credential for the external site.
    pub credential: Option<String>,
}

/// A validated sync trigger. Transient; lives for one pipeline run.
#[derive(Clone, Debug)]
pub struct SyncJob {
    pub user_id: i32,
    pub username: String,
    pub credential: String,
}

/// 202 acknowledgment echoed back to the caller. The pipeline has been
/// scheduled but not yet run.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncAccepted {
    #[schema(example = "Sync request accepted")]
    pub message: String,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "alice")]
    pub username: String,
}

/// Snapshot of a user's persisted sync state.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncStateResponse {
    #[schema(example = 1)]
    pub user_id: i32,
    pub sync_status: SyncStatus,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub last_synced_at: Option<DateTime<Utc>>,
    pub stats: SyncStats,
    #[schema(example = "2025-10-01T14:30:00Z")]
    pub updated_at: DateTime<Utc>,
}

/// Validate a sync trigger, naming every missing field in the error.
pub fn validate_sync_request(payload: SyncRequest) -> Result<SyncJob, AppError> {
    let mut missing = Vec::new();
    if payload.user_id.is_none() {
        missing.push("userId");
    }
    if payload.username.as_deref().is_none_or(|u| u.trim().is_empty()) {
        missing.push("username");
    }
    if payload.credential.as_deref().is_none_or(str::is_empty) {
        missing.push("credential");
    }
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required parameters: {}",
            missing.join(", ")
        )));
    }

    // The is_none checks above guarantee these unwraps.
    Ok(SyncJob {
        user_id: payload.user_id.unwrap(),
        username: payload.username.unwrap().trim().to_string(),
        credential: payload.credential.unwrap(),
    })
}
