//! Typed resources
//!
//! Each supported resource type has a serde struct implementing [`Resource`].
//! Suppliers deserialize into those structs, then hand them out as
//! [`GoogleResource`] so inventories of many types can be collected together.
//!
//! # Module Structure
//!
//! - [`value`] - Normalized values produced by the state reader
//! - [`deserializer`] - Conversion from normalized values to typed resources
//! - [`compute`], [`storage`], [`dns`], [`iam`] - Resource structs per service

pub mod compute;
pub mod deserializer;
pub mod dns;
pub mod iam;
pub mod storage;
pub mod value;

pub use deserializer::{Deserializer, ValueDeserializer};
pub use value::NormalizedValue;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub const GOOGLE_COMPUTE_INSTANCE: &str = "google_compute_instance";
pub const GOOGLE_COMPUTE_DISK: &str = "google_compute_disk";
pub const GOOGLE_COMPUTE_NETWORK: &str = "google_compute_network";
pub const GOOGLE_COMPUTE_FIREWALL: &str = "google_compute_firewall";
pub const GOOGLE_STORAGE_BUCKET: &str = "google_storage_bucket";
pub const GOOGLE_STORAGE_BUCKET_NOTIFICATION: &str = "google_storage_bucket_notification";
pub const GOOGLE_DNS_MANAGED_ZONE: &str = "google_dns_managed_zone";
pub const GOOGLE_DNS_RECORD_SET: &str = "google_dns_record_set";
pub const GOOGLE_SERVICE_ACCOUNT: &str = "google_service_account";
pub const GOOGLE_SERVICE_ACCOUNT_KEY: &str = "google_service_account_key";

/// A strongly-typed resource of one resource type
pub trait Resource: DeserializeOwned + Into<GoogleResource> + Send + 'static {
    /// Resource type tag
    const TYPE: &'static str;

    /// Identifier of this resource within its type
    fn id(&self) -> &str;

    /// False when the entry carries no configuration at all and must not
    /// appear in the inventory
    fn has_configuration(&self) -> bool {
        true
    }
}

/// Any resource the scanner knows about
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "resourceType")]
pub enum GoogleResource {
    #[serde(rename = "google_compute_instance")]
    ComputeInstance(compute::ComputeInstance),
    #[serde(rename = "google_compute_disk")]
    ComputeDisk(compute::ComputeDisk),
    #[serde(rename = "google_compute_network")]
    ComputeNetwork(compute::ComputeNetwork),
    #[serde(rename = "google_compute_firewall")]
    ComputeFirewall(compute::ComputeFirewall),
    #[serde(rename = "google_storage_bucket")]
    StorageBucket(storage::StorageBucket),
    #[serde(rename = "google_storage_bucket_notification")]
    StorageBucketNotification(storage::StorageBucketNotification),
    #[serde(rename = "google_dns_managed_zone")]
    DnsManagedZone(dns::DnsManagedZone),
    #[serde(rename = "google_dns_record_set")]
    DnsRecordSet(dns::DnsRecordSet),
    #[serde(rename = "google_service_account")]
    ServiceAccount(iam::ServiceAccount),
    #[serde(rename = "google_service_account_key")]
    ServiceAccountKey(iam::ServiceAccountKey),
}

impl GoogleResource {
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::ComputeInstance(_) => GOOGLE_COMPUTE_INSTANCE,
            Self::ComputeDisk(_) => GOOGLE_COMPUTE_DISK,
            Self::ComputeNetwork(_) => GOOGLE_COMPUTE_NETWORK,
            Self::ComputeFirewall(_) => GOOGLE_COMPUTE_FIREWALL,
            Self::StorageBucket(_) => GOOGLE_STORAGE_BUCKET,
            Self::StorageBucketNotification(_) => GOOGLE_STORAGE_BUCKET_NOTIFICATION,
            Self::DnsManagedZone(_) => GOOGLE_DNS_MANAGED_ZONE,
            Self::DnsRecordSet(_) => GOOGLE_DNS_RECORD_SET,
            Self::ServiceAccount(_) => GOOGLE_SERVICE_ACCOUNT,
            Self::ServiceAccountKey(_) => GOOGLE_SERVICE_ACCOUNT_KEY,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::ComputeInstance(r) => r.id(),
            Self::ComputeDisk(r) => r.id(),
            Self::ComputeNetwork(r) => r.id(),
            Self::ComputeFirewall(r) => r.id(),
            Self::StorageBucket(r) => r.id(),
            Self::StorageBucketNotification(r) => r.id(),
            Self::DnsManagedZone(r) => r.id(),
            Self::DnsRecordSet(r) => r.id(),
            Self::ServiceAccount(r) => r.id(),
            Self::ServiceAccountKey(r) => r.id(),
        }
    }
}
