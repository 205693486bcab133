// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the persisted settings and hands out
// converters configured from them.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use wandler_core::AppConfig;
use wandler_core::error::Result;
use wandler_document::DocumentConverter;

use super::data_dir;

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise services from the platform data directory. Call once at
    /// app startup. A missing or unreadable config falls back to defaults.
    pub fn init() -> Self {
        Self::with_data_dir(data_dir::data_dir())
    }

    /// Initialise services rooted at `dir`.
    pub fn with_data_dir(dir: PathBuf) -> Self {
        let config = match load_config(&dir) {
            Some(config) => {
                info!(path = %dir.display(), "settings loaded");
                config
            }
            None => AppConfig::default(),
        };

        Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().expect("config lock poisoned") = config.clone();
        persist_config(&self.data_dir, config)
    }

    // -- Conversion ------------------------------------------------------------

    /// A converter using the current settings.
    pub fn converter(&self) -> DocumentConverter {
        DocumentConverter::new(self.config())
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
