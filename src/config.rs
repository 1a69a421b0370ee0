use std::path::PathBuf;

use chrono::FixedOffset;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_DATA_FILE: &str = "data/store.json";
const DEFAULT_KEEP_ALIVE_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// Where persisted records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// SQL-backed key-value table reached through `DATABASE_URL`.
    Database(String),
    /// Single local JSON file.
    File(PathBuf),
}

pub struct Config {
    pub discord_bot_token: String,

    pub store: StoreConfig,

    pub keep_alive_addr: String,

    /// Timezone users type and read poll close dates in.
    pub utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let store = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => StoreConfig::Database(url),
            _ => StoreConfig::File(PathBuf::from(
                std::env::var("DATA_FILE").unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string()),
            )),
        };

        Ok(Self {
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            store,
            keep_alive_addr: std::env::var("KEEP_ALIVE_ADDR")
                .unwrap_or_else(|_| DEFAULT_KEEP_ALIVE_ADDR.to_string()),
            utc_offset: parse_utc_offset(std::env::var("UTC_OFFSET_HOURS").ok())?,
        })
    }
}

/// Parses the `UTC_OFFSET_HOURS` value, falling back to UTC+8 when unset.
fn parse_utc_offset(value: Option<String>) -> Result<FixedOffset, AppError> {
    let invalid = |value: &str| ConfigError::InvalidEnvVar {
        name: "UTC_OFFSET_HOURS".to_string(),
        value: value.to_string(),
    };

    let hours = match value {
        None => DEFAULT_UTC_OFFSET_HOURS,
        Some(value) => value.trim().parse::<i32>().map_err(|_| invalid(&value))?,
    };

    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| invalid(&hours.to_string()).into())
}
