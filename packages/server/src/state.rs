use std::sync::Arc;

use crate::config::AppConfig;
use crate::leetcode::client::SubmissionSource;
use crate::store::SyncStore;
use crate::sync::guard::ActiveSyncs;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SyncStore>,
    pub source: Arc<dyn SubmissionSource>,
    pub syncs: ActiveSyncs,
}
