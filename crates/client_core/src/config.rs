use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::http::CallPolicy;

pub const DEFAULT_SETTINGS_FILE: &str = "detector.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub request_timeout_ms: Option<u64>,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8500".into(),
            request_timeout_ms: None,
            max_attempts: 1,
            retry_backoff_ms: 250,
        }
    }
}

impl Settings {
    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy {
            timeout: self.request_timeout_ms.map(Duration::from_millis),
            max_attempts: self.max_attempts.max(1),
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    request_timeout_ms: Option<u64>,
    max_attempts: Option<u32>,
    retry_backoff_ms: Option<u64>,
}

/// Defaults, then `path` (or `detector.toml` in the working directory), then
/// environment overrides.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => apply_file_settings(&mut settings, &raw, path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!("failed to read settings file '{}': {err}", path.display()),
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str, path: &Path) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!("ignoring malformed settings file '{}': {err}", path.display());
            return;
        }
    };

    if let Some(v) = file_cfg.backend_url {
        settings.backend_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_ms {
        settings.request_timeout_ms = Some(v);
    }
    if let Some(v) = file_cfg.max_attempts {
        settings.max_attempts = v;
    }
    if let Some(v) = file_cfg.retry_backoff_ms {
        settings.retry_backoff_ms = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DETECTOR_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = lookup("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_MS") {
        match v.trim() {
            "" | "0" | "none" => settings.request_timeout_ms = None,
            raw => match raw.parse::<u64>() {
                Ok(parsed) => settings.request_timeout_ms = Some(parsed),
                Err(_) => warn!("ignoring non-numeric APP__REQUEST_TIMEOUT_MS={raw}"),
            },
        }
    }

    if let Some(v) = lookup("APP__MAX_ATTEMPTS") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.max_attempts = parsed;
        }
    }

    if let Some(v) = lookup("APP__RETRY_BACKOFF_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.retry_backoff_ms = parsed;
        }
    }
}
