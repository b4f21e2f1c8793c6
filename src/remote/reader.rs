//! Full-state reads of single resources

use super::registry;
use crate::error::Result;
use crate::gcp::client::GcpClient;
use crate::resource::NormalizedValue;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything needed to read one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResourceArgs {
    pub resource_type: String,
    pub id: String,
    pub attributes: BTreeMap<String, String>,
}

/// Reads the current state of one resource
#[async_trait]
pub trait StateReader: Send + Sync {
    async fn read_resource(&self, args: &ReadResourceArgs) -> Result<NormalizedValue>;
}

/// One fan-out unit: a read owning its own copy of the arguments
pub struct ReadTask {
    reader: Arc<dyn StateReader>,
    args: ReadResourceArgs,
}

impl ReadTask {
    pub fn new(reader: Arc<dyn StateReader>, args: ReadResourceArgs) -> Self {
        Self { reader, args }
    }

    pub fn args(&self) -> &ReadResourceArgs {
        &self.args
    }

    pub async fn run(self) -> Result<NormalizedValue> {
        match self.reader.read_resource(&self.args).await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(
                    resource_type = %self.args.resource_type,
                    id = %self.args.id,
                    "Failed to read resource: {}",
                    err
                );
                Err(err)
            },
        }
    }
}

/// Reads resources with a GET on their self path
#[derive(Clone)]
pub struct GcpStateReader {
    client: GcpClient,
}

impl GcpStateReader {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StateReader for GcpStateReader {
    async fn read_resource(&self, args: &ReadResourceArgs) -> Result<NormalizedValue> {
        let def = registry::definition(&args.resource_type)?;
        let path = def.read_path(&self.client.project_id, args);
        let url = self.client.service_url(def.service, &path);

        tracing::debug!("Reading {} {}", args.resource_type, args.id);
        let response = self.client.get(&url).await?;

        let mut value = NormalizedValue::from(response);
        // The API's own id (often numeric) gives way to the listing identifier
        value.set("id", args.id.as_str().into());
        for (name, attribute) in &args.attributes {
            value.set_default(name, attribute.as_str().into());
        }

        Ok(value)
    }
}
