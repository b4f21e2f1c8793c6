//! Configuration Management
//!
//! Handles persistent configuration storage for gcpinv.

use crate::parallel::DEFAULT_PARALLELISM;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Project to scan
    #[serde(default)]
    pub project_id: Option<String>,
    /// Maximum concurrent resource reads
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Resource types never scanned
    #[serde(default)]
    pub exclude: BTreeSet<String>,
    /// Base URL replacing every Google API host
    #[serde(default)]
    pub api_root: Option<String>,
}

fn default_parallelism() -> usize {
    DEFAULT_PARALLELISM
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            parallelism: DEFAULT_PARALLELISM,
            exclude: BTreeSet::new(),
            api_root: None,
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcpinv").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective project (config > gcloud default)
    pub fn effective_project(&self) -> Option<String> {
        self.project_id
            .clone()
            .or_else(crate::gcp::auth::get_default_project)
    }

    /// Check values that would only fail later, mid-scan
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.api_root {
            let parsed = url::Url::parse(root).with_context(|| format!("Invalid API root '{}'", root))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("API root '{}' must be an http(s) URL", root);
            }
        }
        if self.parallelism == 0 {
            anyhow::bail!("Parallelism must be at least 1");
        }
        Ok(())
    }

    /// Whether a resource type takes part in the scan
    ///
    /// `only`, when non-empty, restricts the scan to those types; exclusions
    /// always win.
    pub fn is_selected(&self, resource_type: &str, only: &[String]) -> bool {
        if self.exclude.contains(resource_type) {
            return false;
        }
        only.is_empty() || only.iter().any(|t| t == resource_type)
    }
}
