//! Access tokens and default project discovery
//!
//! Tokens come from Application Default Credentials through `gcp_auth`.
//! A scan only ever reads, so the read-only cloud-platform scope is requested.

use crate::error::{Error, Result};
use gcp_auth::TokenProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform.read-only"];

/// How long a fetched token is reused; `gcp_auth` does not report an expiry
const TOKEN_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// Refresh margin taken off `TOKEN_LIFETIME`
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Environment variables consulted for the project, in order
const PROJECT_ENV_VARS: [&str; 3] = ["CLOUDSDK_CORE_PROJECT", "GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];

#[derive(Clone)]
enum TokenSource {
    Provider(Arc<dyn TokenProvider>),
    /// Fixed token, for emulators and tests
    Static(String),
}

struct Lease {
    token: String,
    valid_until: Instant,
}

/// Bearer token source shared by every request of a scan
#[derive(Clone)]
pub struct GcpCredentials {
    source: TokenSource,
    lease: Arc<RwLock<Option<Lease>>>,
}

impl GcpCredentials {
    /// Resolve Application Default Credentials
    pub async fn new() -> Result<Self> {
        let provider = gcp_auth::provider().await.map_err(|e| {
            Error::Auth(format!("{}. Run 'gcloud auth application-default login'", e))
        })?;
        Ok(Self::with_source(TokenSource::Provider(provider)))
    }

    /// Credentials that always present the same bearer token
    pub fn from_static_token(token: impl Into<String>) -> Self {
        Self::with_source(TokenSource::Static(token.into()))
    }

    fn with_source(source: TokenSource) -> Self {
        Self {
            source,
            lease: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get_token(&self) -> Result<String> {
        let provider = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Provider(provider) => provider,
        };

        if let Some(lease) = self.lease.read().await.as_ref() {
            if Instant::now() < lease.valid_until {
                return Ok(lease.token.clone());
            }
            tracing::debug!("Access token lease ran out, refreshing");
        }

        let fresh = provider
            .token(DEFAULT_SCOPES)
            .await
            .map_err(|e| Error::Auth(format!("failed to get access token: {}", e)))?
            .as_str()
            .to_string();

        *self.lease.write().await = Some(Lease {
            token: fresh.clone(),
            valid_until: Instant::now() + TOKEN_LIFETIME - REFRESH_MARGIN,
        });
        tracing::debug!("Access token refreshed");

        Ok(fresh)
    }
}

/// gcloud's configuration directory, honouring `CLOUDSDK_CONFIG`
pub fn get_gcloud_config_dir() -> Option<PathBuf> {
    match std::env::var_os("CLOUDSDK_CONFIG") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => dirs::config_dir().map(|dir| dir.join("gcloud")),
    }
}

/// Project IDs are 6 to 30 lowercase letters, digits or hyphens,
/// starting with a letter and not ending with a hyphen
pub fn validate_project_id(project: &str) -> bool {
    let well_formed = project
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let starts_with_letter = project.starts_with(|c: char| c.is_ascii_lowercase());

    (6..=30).contains(&project.len()) && well_formed && starts_with_letter && !project.ends_with('-')
}

/// Project to scan when none is given: environment first, then gcloud
pub fn get_default_project() -> Option<String> {
    for var in PROJECT_ENV_VARS {
        let Ok(project) = std::env::var(var) else {
            continue;
        };
        if validate_project_id(&project) {
            return Some(project);
        }
        tracing::warn!("Ignoring malformed project ID in {}", var);
    }

    let config_dir = get_gcloud_config_dir()?;
    read_project(&config_dir.join("properties"), false)
        .or_else(|| read_project(&active_configuration(&config_dir)?, true))
}

/// Path of the named gcloud configuration marked active
fn active_configuration(config_dir: &Path) -> Option<PathBuf> {
    let name = std::fs::read_to_string(config_dir.join("active_config")).ok()?;
    let name = name.trim();

    // Refuse anything that could escape the configurations directory
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        tracing::warn!("Ignoring malformed active_config name");
        return None;
    }

    Some(config_dir.join("configurations").join(format!("config_{}", name)))
}

fn read_project(path: &Path, core_section_only: bool) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    find_core_project(&content, core_section_only)
}

/// `project = ...` from a gcloud ini file, optionally only under `[core]`
fn find_core_project(content: &str, core_section_only: bool) -> Option<String> {
    let mut section_matches = !core_section_only;

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(['#', ';']))
        .find_map(|line| {
            if line.starts_with('[') {
                section_matches = !core_section_only || line == "[core]";
                return None;
            }
            let (key, value) = line.split_once('=')?;
            let value = value.trim();
            (section_matches && key.trim() == "project" && validate_project_id(value))
                .then(|| value.to_string())
        })
}
