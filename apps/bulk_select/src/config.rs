use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use shared::protocol::PageSeed;

pub const SETTINGS_FILE: &str = "bulk_select.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub resource_link_id: Option<String>,
    pub csrf_token: Option<String>,
    pub request_timeout_secs: u64,
    pub seed_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/bulk_site_creation/".into(),
            resource_link_id: None,
            csrf_token: None,
            request_timeout_secs: 30,
            seed_path: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

pub fn load_settings() -> Settings {
    let file_cfg = fs::read_to_string(SETTINGS_FILE)
        .ok()
        .and_then(|raw| toml::from_str::<HashMap<String, String>>(&raw).ok())
        .unwrap_or_default();
    let env: HashMap<String, String> = std::env::vars().collect();
    resolve_settings(&file_cfg, &env)
}

/// Defaults, then the settings file, then the environment.
fn resolve_settings(file_cfg: &HashMap<String, String>, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(v) = file_cfg.get("base_url") {
        settings.base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("resource_link_id") {
        settings.resource_link_id = non_empty(v);
    }
    if let Some(v) = file_cfg.get("csrf_token") {
        settings.csrf_token = non_empty(v);
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = file_cfg.get("seed_path") {
        settings.seed_path = non_empty(v).map(PathBuf::from);
    }

    if let Some(v) = env.get("BULK_SELECT_BASE_URL") {
        settings.base_url = v.clone();
    }
    if let Some(v) = env.get("APP__BASE_URL") {
        settings.base_url = v.clone();
    }
    if let Some(v) = env.get("APP__RESOURCE_LINK_ID") {
        settings.resource_link_id = non_empty(v);
    }
    if let Some(v) = env.get("APP__CSRF_TOKEN") {
        settings.csrf_token = non_empty(v);
    }
    if let Some(v) = env.get("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = env.get("APP__SEED_PATH") {
        settings.seed_path = non_empty(v).map(PathBuf::from);
    }

    settings
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reads the page seed; without a path the session starts empty.
pub fn load_seed(path: Option<&Path>) -> anyhow::Result<PageSeed> {
    let Some(path) = path else {
        return Ok(PageSeed::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read page seed '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse page seed '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
