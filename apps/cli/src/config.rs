use std::{fs, time::Duration};

use client_core::ClientConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    timeout_seconds: Option<u64>,
}

/// Defaults, overridden by `adopet.toml`, overridden by `APP__*` env vars.
pub fn load_config() -> ClientConfig {
    let mut config = ClientConfig::default();

    if let Ok(raw) = fs::read_to_string("adopet.toml") {
        if let Ok(file_cfg) = toml::from_str::<FileConfig>(&raw) {
            if let Some(v) = file_cfg.api_url {
                config.api_url = v;
            }
            if let Some(v) = file_cfg.timeout_seconds {
                config.timeout = Duration::from_secs(v);
            }
        }
    }

    if let Ok(v) = std::env::var("APP__API_URL") {
        config.api_url = v;
    }
    if let Ok(v) = std::env::var("APP__TIMEOUT_SECONDS") {
        if let Ok(secs) = v.parse() {
            config.timeout = Duration::from_secs(secs);
        }
    }

    config
}
