use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::{env, fs};

#[derive(Deserialize, Debug, PartialEq)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

/// OTLP trace export target. `headers` are sent as gRPC metadata, e.g. an API key.
#[derive(Deserialize, Debug, PartialEq)]
pub struct TelemetryConfig {
    pub endpoint: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    pub database_url: String,
    #[serde(default)]
    pub signups_enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    /// Origins allowed to call the API from a browser. Empty allows none.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    pub telemetry: Option<TelemetryConfig>,
    pub ssl: Option<SSLConfig>,
}

const OTLP_API_KEY_HEADER: &str = "x-api-key";

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_owned()
}

fn default_max_pool_size() -> u32 {
    10
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        Self::from_toml(&config)
    }

    pub fn from_toml(config: &str) -> Result<Config, anyhow::Error> {
        let config: Config = toml::from_str(config).with_context(|| "Unable to parse config")?;
        Ok(config)
    }

    pub fn from_env() -> Result<Config, anyhow::Error> {
        let signups_enabled = read_env("SIGNUPS_ENABLED")?;
        let signups_enabled = signups_enabled
            .parse()
            .context("Unable to parse SIGNUPS_ENABLED value")?;
        let database_url = read_env("DATABASE_URL")?;
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| default_bind_address());
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let telemetry = env::var("OTLP_ENDPOINT").ok().map(|endpoint| {
            let headers = env::var("OTLP_API_KEY")
                .ok()
                .map(|key| HashMap::from([(OTLP_API_KEY_HEADER.to_owned(), key)]))
                .unwrap_or_default();
            TelemetryConfig { endpoint, headers }
        });

        let config = Config {
            database_url,
            signups_enabled,
            bind_address,
            max_pool_size: default_max_pool_size(),
            cors_allowed_origins,
            telemetry,
            ssl: None,
        };
        Ok(config)
    }
}

fn read_env(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("Unable to read env var: {}", key))
}
