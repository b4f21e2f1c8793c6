//! Remote listing API

use super::pagination::{walk_pages, Page};
use crate::error::{Error, Result};
use crate::gcp::client::Service;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// One list call, independent of paging
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub service: Service,
    /// Path below the service's versioned base
    pub path: String,
    pub params: BTreeMap<String, String>,
    /// Response is keyed by zone/region and must be flattened
    pub aggregated: bool,
    /// Dotted path of the item array in the response
    pub response_path: String,
}

/// Source of raw listing items
#[async_trait]
pub trait ListApi: Send + Sync {
    /// Fetch one page; `cursor` is `None` for the first page
    async fn list_page(&self, request: &ListRequest, cursor: Option<&str>) -> Result<Page<Value>>;

    /// Single unpaged call
    async fn list(&self, request: &ListRequest) -> Result<Vec<Value>> {
        let page = self.list_page(request, None).await?;
        if !page.last {
            tracing::debug!(
                "Unpaged listing of {} returned a continuation token, ignoring it",
                request.path
            );
        }
        Ok(page.items)
    }
}

/// Walk every page of a listing
pub async fn fetch_all(api: &dyn ListApi, request: &ListRequest) -> Result<Vec<Value>> {
    walk_pages(|cursor| async move { api.list_page(request, cursor.as_deref()).await }).await
}

/// Fetch a listing, paged or in a single call
pub async fn fetch_items(api: &dyn ListApi, request: &ListRequest, paged: bool) -> Result<Vec<Value>> {
    if paged {
        fetch_all(api, request).await
    } else {
        api.list(request).await
    }
}

/// Read a string field of a listed item
pub fn item_field<'a>(item: &'a Value, field: &str, resource_type: &str) -> Result<&'a str> {
    item.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Listing {
            resource_type: resource_type.to_string(),
            reason: format!("listed item has no string field '{}'", field),
        })
}

/// Extract short name from GCP resource URL
/// e.g., "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a" -> "us-central1-a"
pub fn extract_short_name(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}
