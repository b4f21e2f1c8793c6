//! IAM resources

use super::{GoogleResource, Resource, GOOGLE_SERVICE_ACCOUNT, GOOGLE_SERVICE_ACCOUNT_KEY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    /// Account email
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub unique_id: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl Resource for ServiceAccount {
    const TYPE: &'static str = GOOGLE_SERVICE_ACCOUNT;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<ServiceAccount> for GoogleResource {
    fn from(r: ServiceAccount) -> Self {
        Self::ServiceAccount(r)
    }
}

/// User-managed key of a service account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountKey {
    /// Key id, the last segment of `name`
    pub id: String,
    pub name: String,
    pub service_account: String,
    pub key_type: Option<String>,
    pub key_algorithm: Option<String>,
    pub key_origin: Option<String>,
    pub valid_after_time: Option<String>,
    pub valid_before_time: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl Resource for ServiceAccountKey {
    const TYPE: &'static str = GOOGLE_SERVICE_ACCOUNT_KEY;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<ServiceAccountKey> for GoogleResource {
    fn from(r: ServiceAccountKey) -> Self {
        Self::ServiceAccountKey(r)
    }
}
