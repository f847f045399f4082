use chrono::FixedOffset;
use std::sync::Arc;
use thiserror::Error;

use crate::task::{
    due_time::{default_offset, parse_utc_offset},
    TaskService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub task_service: TaskService,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// When unset the service keeps tasks in process memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub expo_push_url: String,
    pub expo_access_token: Option<String>,
    pub push_timeout_secs: u64,
    /// Reference timezone for wall-clock due times and list rendering.
    pub utc_offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database_url: None,
            database_max_connections: 5,
            expo_push_url: "https://exp.host".to_string(),
            expo_access_token: None,
            push_timeout_secs: 10,
            utc_offset: default_offset(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: env_or("HOST", defaults.host),
            port: parse_env("PORT", defaults.port)?,
            database_url: optional_env("DATABASE_URL"),
            database_max_connections: parse_env(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            expo_push_url: env_or("EXPO_PUSH_URL", defaults.expo_push_url),
            expo_access_token: optional_env("EXPO_ACCESS_TOKEN"),
            push_timeout_secs: parse_env("PUSH_TIMEOUT_SECS", defaults.push_timeout_secs)?,
            utc_offset: match optional_env("REMINDER_UTC_OFFSET") {
                Some(raw) => parse_utc_offset(&raw).ok_or(ConfigError::Invalid {
                    name: "REMINDER_UTC_OFFSET",
                    value: raw,
                })?,
                None => defaults.utc_offset,
            },
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: String) -> String {
    optional_env(name).unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_env(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}
