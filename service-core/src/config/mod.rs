use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Read an environment variable with a development default.
///
/// In production (`ENVIRONMENT=prod`) every variable must be set explicitly;
/// missing values are a startup error rather than a silent default.
pub fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Standard database settings shared by all services. Each service fills
/// this from its own environment variables and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Read `DATABASE_URL` plus pool sizing, defaulting the URL to the
    /// given development database.
    pub fn from_env(default_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            url: get_env("DATABASE_URL", Some(default_url))?,
            max_connections: get_env("DATABASE_MAX_CONNECTIONS", Some("10"))?
                .parse()
                .unwrap_or(10),
            min_connections: get_env("DATABASE_MIN_CONNECTIONS", Some("1"))?
                .parse()
                .unwrap_or(1),
        })
    }
}
