//! Cloud DNS record sets
//!
//! Record sets are listed zone by zone. Their identifier is composite since
//! names repeat across zones and types.

use super::api::{fetch_items, item_field};
use super::error_handler::handle_list_error;
use super::registry::{self, ResourceDef};
use super::supplier::{read_all, Supplier, SupplierContext};
use crate::error::Result;
use crate::resource::dns::DnsRecordSet;
use crate::resource::{GoogleResource, Resource, GOOGLE_DNS_MANAGED_ZONE};
use async_trait::async_trait;

/// `{managedZone}_{name}_{type}`, name lowercased without its trailing dot
pub fn record_set_id(managed_zone: &str, name: &str, record_type: &str) -> String {
    format!(
        "{}_{}_{}",
        managed_zone,
        name.trim_end_matches('.').to_lowercase(),
        record_type
    )
}

pub struct DnsRecordSetSupplier {
    ctx: SupplierContext,
    zones: &'static ResourceDef,
    def: &'static ResourceDef,
}

impl DnsRecordSetSupplier {
    pub fn new(ctx: SupplierContext) -> Result<Self> {
        Ok(Self {
            ctx,
            zones: registry::definition(GOOGLE_DNS_MANAGED_ZONE)?,
            def: registry::definition(DnsRecordSet::TYPE)?,
        })
    }
}

#[async_trait]
impl Supplier for DnsRecordSetSupplier {
    fn resource_type(&self) -> &'static str {
        DnsRecordSet::TYPE
    }

    async fn resources(&self) -> Result<Vec<GoogleResource>> {
        let api = self.ctx.api.as_ref();

        let request = self.zones.list_request(&self.ctx.project, &[]);
        let zones = match fetch_items(api, &request, self.zones.paged).await {
            Ok(zones) => zones,
            Err(err) => {
                return handle_list_error(
                    err,
                    DnsRecordSet::TYPE,
                    Some(GOOGLE_DNS_MANAGED_ZONE),
                    &self.ctx.alerter,
                )
            },
        };

        let mut args = Vec::new();
        for zone in &zones {
            let zone_name = item_field(zone, "name", GOOGLE_DNS_MANAGED_ZONE)?;
            let request = self
                .def
                .list_request(&self.ctx.project, &[("managedZone", zone_name)]);

            // A refused zone hides the whole type, never part of it
            let records = match fetch_items(api, &request, self.def.paged).await {
                Ok(records) => records,
                Err(err) => {
                    return handle_list_error(err, DnsRecordSet::TYPE, None, &self.ctx.alerter)
                },
            };
            tracing::debug!("Listed {} record sets in zone {}", records.len(), zone_name);

            for record in &records {
                let mut record_args = self.def.read_args(DnsRecordSet::TYPE, record)?;
                let name = item_field(record, "name", DnsRecordSet::TYPE)?;
                let record_type = item_field(record, "type", DnsRecordSet::TYPE)?;
                record_args.id = record_set_id(zone_name, name, record_type);
                record_args
                    .attributes
                    .insert("managedZone".to_string(), zone_name.to_string());
                args.push(record_args);
            }
        }

        read_all::<DnsRecordSet>(&self.ctx, self.def, args).await
    }
}
