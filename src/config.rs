use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::disk::{RetryPolicy, YANDEX_DISK_BASE};
use crate::dog_ceo::DOG_CEO_BASE;
use crate::error::{ApiError, Result};
use crate::operation::PollPolicy;

pub const TOKEN_ENV: &str = "OAUTH_TOKEN";

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dog_ceo_base: String,
    pub disk_base: String,

    #[serde(skip_serializing)]
    pub oauth_token: Option<String>,

    pub folder_name: String,
    pub breeds: Vec<String>,

    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
    pub upload_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dog_ceo_base: DOG_CEO_BASE.to_string(),
            disk_base: YANDEX_DISK_BASE.to_string(),
            oauth_token: None,
            folder_name: "test_folder".to_string(),
            breeds: ["doberman", "bulldog", "collie", "spaniel"]
                .iter()
                .map(|b| b.to_string())
                .collect(),
            poll_attempts: 60,
            poll_interval_ms: 1000,
            upload_retries: 1,
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "breed-uploader", "breed-uploader")
            .map(|proj| proj.config_dir().join("config.json"))
    }

    /// Defaults, then the user config file if there is one, then the environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        if config.oauth_token.is_none() {
            log::warn!("{} is missing from the environment", TOKEN_ENV);
        }
        Ok(config)
    }

    /// Reads `path`; a missing file yields the defaults, a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => return Ok(Self::default()),
        };
        serde_json::from_str(&data)
            .map_err(|e| ApiError::Config(format!("{}: {}", path.display(), e)))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var(TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.oauth_token = Some(token);
        }
        if let Some(base) = var("DOG_CEO_BASE_URL") {
            self.dog_ceo_base = base;
        }
        if let Some(base) = var("YANDEX_DISK_BASE_URL") {
            self.disk_base = base;
        }
        if let Some(folder) = var("DATA_FOLDER") {
            self.folder_name = folder;
        }
    }

    /// Disk path of the data folder, e.g. `/test_folder`.
    pub fn folder_path(&self) -> String {
        format!("/{}", self.folder_name.trim_matches('/'))
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            attempts: self.poll_attempts.max(1),
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.upload_retries.max(1),
            ..RetryPolicy::default()
        }
    }
}
