use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Level, info};

use server::config::AppConfig;
use server::leetcode::client::HttpSubmissionSource;
use server::state::AppState;
use server::store::PgStore;
use server::sync::guard::ActiveSyncs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::ensure_indexes(&db).await?;

    let source = HttpSubmissionSource::new(
        config.leetcode.base_url.clone(),
        Duration::from_millis(config.leetcode.request_timeout_ms),
    )?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        config: Arc::new(config),
        store: Arc::new(PgStore::new(db)),
        source: Arc::new(source),
        syncs: ActiveSyncs::new(),
    };

    let app = server::build_router(state);

    info!("Sync service listening at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
