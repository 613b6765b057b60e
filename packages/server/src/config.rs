use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Settings for the external coding-practice site.
#[derive(Debug, Deserialize, Clone)]
pub struct LeetCodeConfig {
    pub base_url: String,
    /// Fixed page size for the submission history walk.
    pub page_size: u64,
    /// Fixed delay between consecutive page requests, in milliseconds.
    pub page_delay_ms: u64,
    /// Per-request timeout, in milliseconds.
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub leetcode: LeetCodeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("leetcode.base_url", "https://leetcode.com")?
            .set_default("leetcode.page_size", 100_i64)?
            .set_default("leetcode.page_delay_ms", 1000_i64)?
            .set_default("leetcode.request_timeout_ms", 30_000_i64)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ALGOVERSE__DATABASE__URL)
            .add_source(Environment::with_prefix("ALGOVERSE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
