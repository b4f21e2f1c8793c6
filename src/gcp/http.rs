//! HTTP utilities for GCP REST API calls

use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull `error.message` out of a Google API error body
fn api_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

/// HTTP client wrapper for GCP API calls
#[derive(Clone)]
pub struct GcpHttpClient {
    client: Client,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gcpinv/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request to a GCP API
    ///
    /// Non-success statuses come back as [`Error::Api`] carrying the status
    /// code, so callers can classify them without looking at the text.
    pub async fn get(&self, url: &str, token: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::warn!("API error: {} - {}", status, sanitize_for_log(&body));
            let message = api_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(Error::api(status.as_u16(), url, sanitize_for_log(&message)));
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Format an error for display
/// Security: API failures are reduced to generic messages keyed on status
pub fn describe_error(error: &Error) -> String {
    match error.status() {
        Some(403) => return "Permission denied. Check your GCP IAM permissions.".to_string(),
        Some(401) => {
            return "Authentication failed. Run 'gcloud auth application-default login'."
                .to_string()
        },
        Some(404) => return "Resource not found.".to_string(),
        Some(429) => return "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => return "Invalid request. Check your parameters.".to_string(),
        Some(500) | Some(502) | Some(503) => {
            return "GCP service temporarily unavailable. Please try again.".to_string()
        },
        Some(_) => {
            return "Request failed. Check your network connection and try again.".to_string()
        },
        None => {},
    }

    if matches!(error, Error::Transport(_)) {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(120)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
