//! Cloud DNS resources

use super::{GoogleResource, Resource, GOOGLE_DNS_MANAGED_ZONE, GOOGLE_DNS_RECORD_SET};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsManagedZone {
    pub id: String,
    pub name: String,
    pub dns_name: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<String>,
    #[serde(default)]
    pub name_servers: Vec<String>,
}

impl Resource for DnsManagedZone {
    const TYPE: &'static str = GOOGLE_DNS_MANAGED_ZONE;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<DnsManagedZone> for GoogleResource {
    fn from(r: DnsManagedZone) -> Self {
        Self::DnsManagedZone(r)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordSet {
    /// `{managedZone}_{name}_{type}`
    pub id: String,
    pub managed_zone: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: Option<u32>,
    #[serde(default)]
    pub rrdatas: Vec<String>,
}

impl Resource for DnsRecordSet {
    const TYPE: &'static str = GOOGLE_DNS_RECORD_SET;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<DnsRecordSet> for GoogleResource {
    fn from(r: DnsRecordSet) -> Self {
        Self::DnsRecordSet(r)
    }
}
