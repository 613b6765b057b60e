#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde_json::Value;
use tokio::sync::Semaphore;

use server::config::{AppConfig, DatabaseConfig, LeetCodeConfig, ServerConfig};
use server::leetcode::client::{FetchError, RawSubmission, Session, SubmissionSource};
use server::leetcode::fetch::AcceptedSubmission;
use server::models::shared::{Difficulty, SyncStats, SyncStatus};
use server::state::AppState;
use server::store::{CatalogEntry, StoreError, SyncStore, UserSyncState};
use server::sync::guard::ActiveSyncs;

/// One persisted solved-problem row in the fake store.
#[derive(Clone, Debug)]
pub struct SolvedRow {
    pub problem_slug: String,
    pub solved_at: DateTime<Utc>,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct FakeStoreState {
    pub catalog: Vec<CatalogEntry>,
    pub users: HashMap<i32, UserSyncState>,
    /// Keyed by (user_id, problem_name), mirroring the unique index.
    pub rows: HashMap<(i32, String), SolvedRow>,
    /// Number of non-empty upsert batches issued.
    pub upsert_batches: u32,
    pub fail_catalog: bool,
    pub fail_upsert: bool,
    pub fail_status_writes: bool,
}

/// In-memory [`SyncStore`] with the same contract as the SQL-backed one:
/// upserts keyed by (user_id, problem_name), created_at set once, status
/// writes that no-op for unknown users.
#[derive(Default)]
pub struct FakeStore {
    pub state: Mutex<FakeStoreState>,
}

fn store_err(msg: &str) -> StoreError {
    StoreError::Database(DbErr::Custom(msg.to_string()))
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(self, entries: Vec<(&str, Difficulty)>) -> Self {
        self.state.lock().unwrap().catalog = entries
            .into_iter()
            .map(|(title, difficulty)| CatalogEntry {
                title: title.to_string(),
                difficulty,
            })
            .collect();
        self
    }

    /// Seed a user in the implicit pre-run state.
    pub fn with_user(self, user_id: i32) -> Self {
        self.state.lock().unwrap().users.insert(
            user_id,
            UserSyncState {
                user_id,
                sync_status: SyncStatus::Pending,
                last_synced_at: None,
                stats: SyncStats::default(),
                updated_at: Utc::now(),
            },
        );
        self
    }

    pub fn user(&self, user_id: i32) -> UserSyncState {
        self.state.lock().unwrap().users[&user_id].clone()
    }

    pub fn rows_for(&self, user_id: i32) -> Vec<(String, SolvedRow)> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<_> = state
            .rows
            .iter()
            .filter(|((uid, _), _)| *uid == user_id)
            .map(|((_, name), row)| (name.clone(), row.clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }
}

#[async_trait]
impl SyncStore for FakeStore {
    async fn load_catalog(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_catalog {
            return Err(store_err("catalog unreadable"));
        }
        Ok(state.catalog.clone())
    }

    async fn upsert_solved(
        &self,
        user_id: i32,
        records: &[AcceptedSubmission],
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().unwrap();
        if state.fail_upsert {
            return Err(store_err("upsert rejected"));
        }
        state.upsert_batches += 1;
        let now = Utc::now();
        for record in records {
            state
                .rows
                .entry((user_id, record.name.clone()))
                .and_modify(|row| {
                    row.problem_slug = record.slug.clone();
                    row.solved_at = record.solved_at;
                    row.language = record.language.clone();
                    row.updated_at = now;
                })
                .or_insert_with(|| SolvedRow {
                    problem_slug: record.slug.clone(),
                    solved_at: record.solved_at,
                    language: record.language.clone(),
                    created_at: now,
                    updated_at: now,
                });
        }
        Ok(())
    }

    async fn mark_completed(&self, user_id: i32, stats: SyncStats) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_status_writes {
            return Err(store_err("status write rejected"));
        }
        if let Some(user) = state.users.get_mut(&user_id) {
            let now = Utc::now();
            user.sync_status = SyncStatus::Completed;
            user.last_synced_at = Some(now);
            user.stats = stats;
            user.updated_at = now;
        }
        Ok(())
    }

    async fn mark_failed(&self, user_id: i32) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_status_writes {
            return Err(store_err("status write rejected"));
        }
        if let Some(user) = state.users.get_mut(&user_id) {
            user.sync_status = SyncStatus::Failed;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_sync_state(&self, user_id: i32) -> Result<Option<UserSyncState>, StoreError> {
        Ok(self.state.lock().unwrap().users.get(&user_id).cloned())
    }
}

pub fn raw_submission(title: &str, slug: &str, status: &str, timestamp: i64) -> RawSubmission {
    RawSubmission {
        title: title.to_string(),
        title_slug: slug.to_string(),
        status_display: status.to_string(),
        lang: "rust".to_string(),
        timestamp,
    }
}

pub fn accepted(title: &str, slug: &str, timestamp: i64) -> RawSubmission {
    raw_submission(title, slug, "Accepted", timestamp)
}

/// Submission source serving pre-scripted pages.
pub struct ScriptedSource {
    pub pages: Vec<Vec<RawSubmission>>,
    pub reject_credential: bool,
    /// When set, `authenticate` waits for a permit before proceeding.
    pub gate: Option<Arc<Semaphore>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Vec<RawSubmission>>) -> Self {
        Self {
            pages,
            reject_credential: false,
            gate: None,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            pages: Vec::new(),
            reject_credential: true,
            gate: None,
        }
    }
}

#[async_trait]
impl SubmissionSource for ScriptedSource {
    async fn authenticate(&self, credential: &str) -> Result<Session, FetchError> {
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| FetchError::Authentication(e.to_string()))?;
            permit.forget();
        }
        if self.reject_credential {
            return Err(FetchError::Authentication("credential rejected".into()));
        }
        Ok(Session::new(credential))
    }

    async fn fetch_page(
        &self,
        _session: &Session,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RawSubmission>, FetchError> {
        let index = (offset / limit) as usize;
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".into(),
        },
        leetcode: LeetCodeConfig {
            base_url: "http://leetcode.invalid".into(),
            page_size: 2,
            page_delay_ms: 0,
            request_timeout_ms: 1000,
        },
    }
}

/// The real router served on an ephemeral port, with fakes behind the
/// store and submission-source seams.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Arc<FakeStore>,
}

impl TestApp {
    pub async fn spawn(store: Arc<FakeStore>, source: Arc<dyn SubmissionSource>) -> Self {
        let state = AppState {
            config: Arc::new(test_config()),
            store: store.clone(),
            source,
            syncs: ActiveSyncs::new(),
        };
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            store,
        }
    }

    pub async fn post_sync(&self, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}/api/v1/sync", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Failed to send sync request");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get_sync_state(&self, user_id: i32) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}/api/v1/sync/{user_id}", self.base_url))
            .send()
            .await
            .expect("Failed to query sync state");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// Poll the fake store until the user's status leaves PENDING.
    pub async fn wait_for_terminal(&self, user_id: i32) -> UserSyncState {
        for _ in 0..500 {
            let snapshot = self.store.user(user_id);
            if snapshot.sync_status != SyncStatus::Pending {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("sync for user {user_id} never reached a terminal state");
    }
}
