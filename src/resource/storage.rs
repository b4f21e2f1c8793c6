//! Cloud Storage resources

use super::{GoogleResource, Resource, GOOGLE_STORAGE_BUCKET, GOOGLE_STORAGE_BUCKET_NOTIFICATION};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBucket {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub storage_class: Option<String>,
    pub versioning: Option<Versioning>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Versioning {
    #[serde(default)]
    pub enabled: bool,
}

impl Resource for StorageBucket {
    const TYPE: &'static str = GOOGLE_STORAGE_BUCKET;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<StorageBucket> for GoogleResource {
    fn from(r: StorageBucket) -> Self {
        Self::StorageBucket(r)
    }
}

/// Pub/Sub notification configuration of one bucket
///
/// Read as a whole per bucket. A bucket with no notification configured is
/// the same as no configuration and never reaches the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageBucketNotification {
    /// Bucket name
    pub id: String,
    #[serde(default, rename(deserialize = "items", serialize = "notifications"))]
    pub notifications: Vec<NotificationConfig>,
}

/// Notification fields are snake_case in the Storage JSON API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub id: String,
    pub topic: String,
    pub payload_format: Option<String>,
    #[serde(default)]
    pub event_types: Vec<String>,
    pub object_name_prefix: Option<String>,
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, String>,
}

impl Resource for StorageBucketNotification {
    const TYPE: &'static str = GOOGLE_STORAGE_BUCKET_NOTIFICATION;

    fn id(&self) -> &str {
        &self.id
    }

    fn has_configuration(&self) -> bool {
        !self.notifications.is_empty()
    }
}

impl From<StorageBucketNotification> for GoogleResource {
    fn from(r: StorageBucketNotification) -> Self {
        Self::StorageBucketNotification(r)
    }
}
