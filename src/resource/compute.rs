//! Compute Engine resources

use super::{
    GoogleResource, Resource, GOOGLE_COMPUTE_DISK, GOOGLE_COMPUTE_FIREWALL,
    GOOGLE_COMPUTE_INSTANCE, GOOGLE_COMPUTE_NETWORK,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// VM instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeInstance {
    pub id: String,
    pub name: String,
    pub zone: Option<String>,
    pub machine_type: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(default)]
    pub deletion_protection: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub network: Option<String>,
    pub subnetwork: Option<String>,
    #[serde(rename = "networkIP")]
    pub network_ip: Option<String>,
}

impl Resource for ComputeInstance {
    const TYPE: &'static str = GOOGLE_COMPUTE_INSTANCE;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<ComputeInstance> for GoogleResource {
    fn from(r: ComputeInstance) -> Self {
        Self::ComputeInstance(r)
    }
}

/// Persistent disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeDisk {
    pub id: String,
    pub name: String,
    pub zone: Option<String>,
    /// int64 encoded as a string by the API
    pub size_gb: Option<String>,
    #[serde(rename = "type")]
    pub disk_type: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Resource for ComputeDisk {
    const TYPE: &'static str = GOOGLE_COMPUTE_DISK;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<ComputeDisk> for GoogleResource {
    fn from(r: ComputeDisk) -> Self {
        Self::ComputeDisk(r)
    }
}

/// VPC network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeNetwork {
    pub id: String,
    pub name: String,
    pub auto_create_subnetworks: Option<bool>,
    pub routing_config: Option<RoutingConfig>,
    #[serde(default)]
    pub subnetworks: Vec<String>,
    pub mtu: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingConfig {
    pub routing_mode: Option<String>,
}

impl Resource for ComputeNetwork {
    const TYPE: &'static str = GOOGLE_COMPUTE_NETWORK;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<ComputeNetwork> for GoogleResource {
    fn from(r: ComputeNetwork) -> Self {
        Self::ComputeNetwork(r)
    }
}

/// VPC firewall rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeFirewall {
    pub id: String,
    pub name: String,
    pub network: Option<String>,
    pub direction: Option<String>,
    pub priority: Option<u32>,
    #[serde(default)]
    pub source_ranges: Vec<String>,
    #[serde(default)]
    pub target_tags: Vec<String>,
    #[serde(default)]
    pub allowed: Vec<FirewallRule>,
    #[serde(default)]
    pub denied: Vec<FirewallRule>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    #[serde(default)]
    pub ports: Vec<String>,
}

impl Resource for ComputeFirewall {
    const TYPE: &'static str = GOOGLE_COMPUTE_FIREWALL;

    fn id(&self) -> &str {
        &self.id
    }
}

impl From<ComputeFirewall> for GoogleResource {
    fn from(r: ComputeFirewall) -> Self {
        Self::ComputeFirewall(r)
    }
}
