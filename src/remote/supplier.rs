//! Resource suppliers
//!
//! A supplier enumerates every resource of one type: list identifiers, fan
//! out one read per identifier over the shared pool, collect, deserialize.

use super::api::{fetch_items, ListApi};
use super::error_handler::{handle_list_error, handle_read_error};
use super::reader::{ReadResourceArgs, ReadTask, StateReader};
use super::registry::{self, ResourceDef};
use crate::alerter::Alerter;
use crate::error::Result;
use crate::parallel::RunnerPool;
use crate::resource::{Deserializer, GoogleResource, NormalizedValue, Resource, ValueDeserializer};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

/// Produces the full inventory of one resource type
#[async_trait]
pub trait Supplier: Send + Sync {
    fn resource_type(&self) -> &'static str;

    async fn resources(&self) -> Result<Vec<GoogleResource>>;
}

/// Collaborators shared by every supplier of a scan
#[derive(Clone)]
pub struct SupplierContext {
    pub project: String,
    pub api: Arc<dyn ListApi>,
    pub reader: Arc<dyn StateReader>,
    pub pool: RunnerPool,
    pub alerter: Arc<Alerter>,
}

/// Read every identifier concurrently and build typed resources
pub(crate) async fn read_all<T: Resource>(
    ctx: &SupplierContext,
    def: &ResourceDef,
    args: Vec<ReadResourceArgs>,
) -> Result<Vec<GoogleResource>> {
    let mut runner = ctx.pool.runner::<NormalizedValue>();
    for args in args {
        let task = ReadTask::new(Arc::clone(&ctx.reader), args);
        runner.submit(task.run()).await?;
    }

    let values = match runner.wait().await {
        Ok(values) => values,
        Err(err) => return handle_read_error(err, T::TYPE, def.forbidden_read, &ctx.alerter),
    };

    let resources = ValueDeserializer::<T>::new().deserialize(values)?;
    let total = resources.len();
    let resources: Vec<GoogleResource> = resources
        .into_iter()
        .filter(|r| r.has_configuration())
        .map(Into::into)
        .collect();

    if resources.len() < total {
        tracing::debug!(
            "Dropped {} {} without configuration",
            total - resources.len(),
            T::TYPE
        );
    }

    Ok(resources)
}

/// Supplier for types enumerated by one flat listing
///
/// The listing may belong to a prerequisite type (bucket notifications are
/// found by listing buckets); a refused listing is then reported against
/// that type.
pub struct ListingSupplier<T> {
    ctx: SupplierContext,
    def: &'static ResourceDef,
    _resource: PhantomData<fn() -> T>,
}

impl<T: Resource> ListingSupplier<T> {
    pub fn new(ctx: SupplierContext) -> Result<Self> {
        Ok(Self {
            ctx,
            def: registry::definition(T::TYPE)?,
            _resource: PhantomData,
        })
    }
}

#[async_trait]
impl<T: Resource> Supplier for ListingSupplier<T> {
    fn resource_type(&self) -> &'static str {
        T::TYPE
    }

    async fn resources(&self) -> Result<Vec<GoogleResource>> {
        let request = self.def.list_request(&self.ctx.project, &[]);
        let items = match fetch_items(self.ctx.api.as_ref(), &request, self.def.paged).await {
            Ok(items) => items,
            Err(err) => {
                return handle_list_error(
                    err,
                    T::TYPE,
                    self.def.requires.as_deref(),
                    &self.ctx.alerter,
                )
            },
        };
        tracing::debug!("Listed {} {}", items.len(), T::TYPE);

        let args = items
            .iter()
            .map(|item| self.def.read_args(T::TYPE, item))
            .collect::<Result<Vec<_>>>()?;

        read_all::<T>(&self.ctx, self.def, args).await
    }
}
