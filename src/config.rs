use crate::errors::AppError;
use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub root_url: String,
    pub page_path: PathBuf,
    pub rollback_on_app_error: bool,
    pub notice_ttl: chrono::Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_url: "http://127.0.0.1:5000".to_string(),
            page_path: PathBuf::from("data/page.json"),
            rollback_on_app_error: false,
            notice_ttl: chrono::Duration::seconds(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(root) = lookup("ROOT_URL") {
            config.root_url = root;
        }
        if let Some(path) = lookup("APP_PAGE_PATH") {
            config.page_path = PathBuf::from(path);
        }
        if let Some(flag) = lookup("FAV_ROLLBACK_ON_ERROR") {
            config.rollback_on_app_error = parse_flag("FAV_ROLLBACK_ON_ERROR", &flag)?;
        }
        if let Some(secs) = lookup("NOTICE_TTL_SECS") {
            let secs = parse_secs("NOTICE_TTL_SECS", &secs)?;
            config.notice_ttl = chrono::Duration::seconds(secs as i64);
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            let secs = parse_secs("REQUEST_TIMEOUT_SECS", &secs)?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, AppError> {
    value
        .trim()
        .parse::<u32>()
        .map(u64::from)
        .map_err(|_| AppError::config(format!("{key}: expected whole seconds, got '{value}'")))
}
