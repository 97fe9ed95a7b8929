use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "rattle.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub template_path: PathBuf,
    pub title: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:5000".into(),
            template_path: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/my_app.html")),
            title: "my_app: Advanced Maths".into(),
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    template_path: Option<PathBuf>,
    title: Option<String>,
    max_body_bytes: Option<usize>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if it exists, then the environment.
pub fn load_settings_from(file: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.template_path {
                    settings.template_path = v;
                }
                if let Some(v) = file_cfg.title {
                    settings.title = v;
                }
                if let Some(v) = file_cfg.max_body_bytes {
                    settings.max_body_bytes = v;
                }
            }
            Err(error) => {
                warn!(file = %file.display(), %error, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("RATTLE_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("RATTLE_TEMPLATE") {
        settings.template_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__TEMPLATE_PATH") {
        settings.template_path = PathBuf::from(v);
    }

    if let Some(v) = env("RATTLE_TITLE") {
        settings.title = v;
    }
    if let Some(v) = env("APP__TITLE") {
        settings.title = v;
    }

    if let Some(v) = env("APP__MAX_BODY_BYTES") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.max_body_bytes = parsed,
            Err(_) => warn!(value = %v, "APP__MAX_BODY_BYTES is not a byte count"),
        }
    }

    settings
}

pub fn load_template(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read template '{}'", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
