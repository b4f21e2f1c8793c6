//! Remote enumeration pipeline
//!
//! # Module Structure
//!
//! - [`pagination`] - Cursor walker over paged listings
//! - [`api`] - Listing API abstraction
//! - [`reader`] - State reader and per-resource read tasks
//! - [`registry`] - Data-driven listing and read definitions
//! - [`error_handler`] - Forbidden errors to alerts
//! - [`supplier`] - Supplier contract and the flat-listing supplier
//! - [`dns`], [`iam`] - Suppliers with nested listings

pub mod api;
pub mod dns;
pub mod error_handler;
pub mod iam;
pub mod pagination;
pub mod reader;
pub mod registry;
pub mod supplier;

pub use api::{ListApi, ListRequest};
pub use pagination::{walk_pages, Page};
pub use reader::{GcpStateReader, ReadResourceArgs, ReadTask, StateReader};
pub use supplier::{ListingSupplier, Supplier, SupplierContext};

use crate::error::Result;
use crate::resource::compute::{ComputeDisk, ComputeFirewall, ComputeInstance, ComputeNetwork};
use crate::resource::dns::DnsManagedZone;
use crate::resource::iam::ServiceAccount;
use crate::resource::storage::{StorageBucket, StorageBucketNotification};

/// One supplier per registered resource type
pub fn build_suppliers(ctx: &SupplierContext) -> Result<Vec<Box<dyn Supplier>>> {
    let suppliers: Vec<Box<dyn Supplier>> = vec![
        Box::new(ListingSupplier::<ComputeInstance>::new(ctx.clone())?),
        Box::new(ListingSupplier::<ComputeDisk>::new(ctx.clone())?),
        Box::new(ListingSupplier::<ComputeNetwork>::new(ctx.clone())?),
        Box::new(ListingSupplier::<ComputeFirewall>::new(ctx.clone())?),
        Box::new(ListingSupplier::<StorageBucket>::new(ctx.clone())?),
        Box::new(ListingSupplier::<StorageBucketNotification>::new(ctx.clone())?),
        Box::new(ListingSupplier::<DnsManagedZone>::new(ctx.clone())?),
        Box::new(dns::DnsRecordSetSupplier::new(ctx.clone())?),
        Box::new(ListingSupplier::<ServiceAccount>::new(ctx.clone())?),
        Box::new(iam::ServiceAccountKeySupplier::new(ctx.clone())?),
    ];
    Ok(suppliers)
}
