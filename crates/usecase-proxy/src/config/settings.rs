use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub proxy: ProxyConfig,
    pub access_control: AccessControlConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccessControlConfig {
    pub allowed_use_cases: Vec<String>,
    #[serde(default)]
    pub use_case_descriptions: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    pub require_use_case_header: bool,
    pub case_sensitive_matching: bool,
    pub log_rejected_requests: bool,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::load_from("config/gateway")
    }

    /// Load from an explicit config file base name (no extension).
    /// Reload re-reads the same file the process started with.
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(true))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}
