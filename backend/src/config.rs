//! Application configuration.
//!
//! Read from `config.yaml` (path from `EXPENSE_DASHBOARD_CONFIG`, else
//! `~/Documents/Expense Dashboard/config.yaml`). A missing file gives the
//! defaults. Individual fields can then be overridden from the environment.
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_VAR: &str = "EXPENSE_DASHBOARD_CONFIG";
pub const DATA_DIR_VAR: &str = "EXPENSE_DASHBOARD_DATA_DIR";
pub const BIND_VAR: &str = "EXPENSE_DASHBOARD_BIND";
pub const USER_VAR: &str = "EXPENSE_DASHBOARD_USER";

const APP_DIRECTORY: &str = "Expense Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the CSV tables
    pub data_directory: PathBuf,
    pub bind_address: String,
    /// User the dashboard runs as; `None` means signed out
    pub user_id: Option<String>,
    /// Currency registered for the user when the row is first created
    pub currency: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: app_directory().join("data"),
            bind_address: "127.0.0.1:3000".to_string(),
            user_id: Some("local-user".to_string()),
            currency: None,
        }
    }
}

impl AppConfig {
    /// Load from the configured path and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_directory().join("config.yaml"));

        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Override fields from `lookup` (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_VAR) {
            self.data_directory = PathBuf::from(dir);
        }
        if let Some(bind) = lookup(BIND_VAR) {
            self.bind_address = bind;
        }
        if let Some(user) = lookup(USER_VAR) {
            self.user_id = Some(user).filter(|u| !u.trim().is_empty());
        }
    }
}

fn app_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIRECTORY)
}
