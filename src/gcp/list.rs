//! List calls against the Google REST APIs

use super::client::GcpClient;
use crate::error::Result;
use crate::remote::api::{ListApi, ListRequest};
use crate::remote::pagination::Page;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
impl ListApi for GcpClient {
    async fn list_page(&self, request: &ListRequest, cursor: Option<&str>) -> Result<Page<Value>> {
        let mut params: Vec<(&str, &str)> = request
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(token) = cursor {
            params.push(("pageToken", token));
        }

        let url = add_query_params(&self.service_url(request.service, &request.path), &params);
        let response = self.get(&url).await?;

        let next_token = response
            .get("nextPageToken")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let items = if request.aggregated {
            flatten_aggregated_items(&response)
        } else {
            extract_items(&response, &request.response_path)
        };

        Ok(Page::from_token(items, next_token))
    }
}

/// Extract items from response using a dotted path
pub(crate) fn extract_items(response: &Value, path: &str) -> Vec<Value> {
    if path.is_empty() {
        return response.as_array().cloned().unwrap_or_default();
    }

    let mut current = response;
    for part in path.split('.') {
        current = match current.get(part) {
            Some(v) => v,
            None => return vec![],
        };
    }

    current.as_array().cloned().unwrap_or_default()
}

/// Collect the items of an aggregated response.
/// Aggregated responses have format: { "items": { "zones/us-central1-a": { "instances": [...] }, ... } }
pub(crate) fn flatten_aggregated_items(response: &Value) -> Vec<Value> {
    let Some(items) = response.get("items").and_then(|v| v.as_object()) else {
        return vec![];
    };

    let mut all_items: Vec<Value> = Vec::new();

    for scope_data in items.values() {
        if let Some(obj) = scope_data.as_object() {
            for (key, value) in obj {
                // Scopes without resources only carry a warning
                if key == "warning" {
                    continue;
                }
                if let Some(arr) = value.as_array() {
                    all_items.extend(arr.iter().cloned());
                }
            }
        }
    }

    all_items
}

pub(crate) fn add_query_params(url: &str, params: &[(&str, &str)]) -> String {
    let query_parts: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    if query_parts.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query_parts.join("&"))
    } else {
        format!("{}?{}", url, query_parts.join("&"))
    }
}
