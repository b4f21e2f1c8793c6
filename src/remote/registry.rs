//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads how each resource type is listed and read from embedded
//! JSON files and provides lookup functions for the suppliers and the state
//! reader.

use super::api::{extract_short_name, item_field, ListRequest};
use super::reader::ReadResourceArgs;
use crate::error::{Error, Result};
use crate::gcp::client::Service;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/compute.json"),
    include_str!("../resources/storage.json"),
    include_str!("../resources/dns.json"),
    include_str!("../resources/iam.json"),
];

/// What a 403 on a single resource read means for its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForbiddenRead {
    /// Permissions are project-wide: the type is left out of the scan
    #[default]
    IgnoreType,
    /// Permissions are per resource: a denied read fails the scan
    Fail,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    pub service: Service,
    /// List call path; `{project}` and parent placeholders are expanded
    pub list_path: String,
    #[serde(default)]
    pub list_params: BTreeMap<String, String>,
    #[serde(default)]
    pub aggregated: bool,
    #[serde(default = "default_paged")]
    pub paged: bool,
    pub response_path: String,
    /// Item field whose last path segment identifies the resource
    pub id_field: String,
    /// Read attribute name -> item field
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Self path; `{id}` and attribute placeholders are expanded
    pub read_path: String,
    #[serde(default)]
    pub forbidden_read: ForbiddenRead,
    /// Type whose listing this type is enumerated through
    #[serde(default)]
    pub requires: Option<String>,
}

fn default_paged() -> bool {
    true
}

impl ResourceDef {
    /// Build the list call, expanding `{project}` and the given parent values
    pub fn list_request(&self, project: &str, vars: &[(&str, &str)]) -> ListRequest {
        let mut all_vars = vec![("project", project)];
        all_vars.extend_from_slice(vars);

        ListRequest {
            service: self.service,
            path: expand(&self.list_path, &all_vars, true),
            params: self
                .list_params
                .iter()
                .map(|(k, v)| (k.clone(), expand(v, &all_vars, false)))
                .collect(),
            aggregated: self.aggregated,
            response_path: self.response_path.clone(),
        }
    }

    /// Identify a listed item and capture the attributes needed to read it
    pub fn read_args(&self, resource_type: &str, item: &Value) -> Result<ReadResourceArgs> {
        let id = extract_short_name(item_field(item, &self.id_field, resource_type)?);

        let mut attributes = BTreeMap::new();
        for (attribute, field) in &self.attributes {
            let value = item_field(item, field, resource_type)?;
            attributes.insert(attribute.clone(), extract_short_name(value));
        }

        Ok(ReadResourceArgs {
            resource_type: resource_type.to_string(),
            id,
            attributes,
        })
    }

    /// Path of the resource's state below the service base
    pub fn read_path(&self, project: &str, args: &ReadResourceArgs) -> String {
        let mut vars = vec![("project", project), ("id", args.id.as_str())];
        vars.extend(args.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        expand(&self.read_path, &vars, true)
    }
}

/// Replace `{name}` placeholders; path values are percent-encoded
fn expand(template: &str, vars: &[(&str, &str)], encode: bool) -> String {
    let mut expanded = template.to_string();
    for (name, value) in vars {
        let placeholder = format!("{{{}}}", name);
        if expanded.contains(&placeholder) {
            let value = if encode {
                urlencoding::encode(value).into_owned()
            } else {
                value.to_string()
            };
            expanded = expanded.replace(&placeholder, &value);
        }
    }
    expanded
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by type
pub fn get_resource(resource_type: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(resource_type)
}

/// Like [`get_resource`], for callers that cannot continue without it
pub fn definition(resource_type: &str) -> Result<&'static ResourceDef> {
    get_resource(resource_type).ok_or_else(|| Error::UnknownResourceType(resource_type.to_string()))
}

/// All resource types, sorted
pub fn get_all_resource_types() -> Vec<&'static str> {
    let mut types: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    types.sort_unstable();
    types
}
