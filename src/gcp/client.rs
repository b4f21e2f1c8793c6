//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Google API a resource type is served by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Compute,
    Storage,
    Dns,
    Iam,
}

impl Service {
    fn host(self) -> &'static str {
        match self {
            Self::Compute => "https://compute.googleapis.com",
            Self::Storage => "https://storage.googleapis.com",
            Self::Dns => "https://dns.googleapis.com",
            Self::Iam => "https://iam.googleapis.com",
        }
    }

    fn base_path(self) -> &'static str {
        match self {
            Self::Compute => "compute/v1",
            Self::Storage => "storage/v1",
            Self::Dns => "dns/v1",
            Self::Iam => "v1",
        }
    }
}

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub project_id: String,
    /// Replaces every service host, e.g. an emulator or a mock server
    pub api_root: Option<String>,
}

impl GcpClient {
    /// Create a new GCP client using Application Default Credentials
    pub async fn new(project_id: &str, api_root: Option<String>) -> Result<Self> {
        let credentials = GcpCredentials::new().await?;
        Self::with_credentials(credentials, project_id, api_root)
    }

    /// Create a client with explicit credentials
    pub fn with_credentials(
        credentials: GcpCredentials,
        project_id: &str,
        api_root: Option<String>,
    ) -> Result<Self> {
        if let Some(root) = &api_root {
            let parsed = url::Url::parse(root)
                .map_err(|e| Error::Config(format!("invalid API root '{}': {}", root, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config(format!("API root '{}' is not an http(s) URL", root)));
            }
        }

        let http = GcpHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            project_id: project_id.to_string(),
            api_root,
        })
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Build the URL of `path` relative to a service's versioned base
    pub fn service_url(&self, service: Service, path: &str) -> String {
        let root = self.api_root.as_deref().unwrap_or(service.host());
        format!(
            "{}/{}/{}",
            root.trim_end_matches('/'),
            service.base_path(),
            path.trim_start_matches('/')
        )
    }
}
