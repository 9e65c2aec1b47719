//! Configuration handling for the TUI

use crate::document::Section;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the document location
pub const DOCUMENT_ENV: &str = "RESUME_TUI_DOCUMENT";

const DOCUMENT_FILE: &str = "resume.json";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TuiConfig {
    /// Where the resume document is stored
    pub document_path: Option<PathBuf>,
    /// Length of item animations in milliseconds, 0 disables them
    pub animation_ms: Option<u64>,
    /// Section tab shown on start-up
    pub last_section: Option<String>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "resume", "resume-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Resolve the document location: environment, then config, then the
    /// platform data directory, then the working directory
    pub fn document_path(&self) -> PathBuf {
        self.document_path_with(std::env::var(DOCUMENT_ENV).ok())
    }

    fn document_path_with(&self, env_override: Option<String>) -> PathBuf {
        if let Some(path) = env_override.filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        if let Some(path) = &self.document_path {
            return path.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DOCUMENT_FILE))
            .unwrap_or_else(|| PathBuf::from(DOCUMENT_FILE))
    }

    pub fn animation_duration(&self) -> Duration {
        self.animation_ms
            .map(Duration::from_millis)
            .unwrap_or(crate::state::TransitionTracker::DEFAULT_DURATION)
    }

    /// Tab to open on start-up, unknown names fall back to the first one
    pub fn start_section(&self) -> Section {
        self.last_section
            .as_deref()
            .and_then(Section::from_key)
            .unwrap_or_default()
    }
}
