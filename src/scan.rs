//! Scan orchestration
//!
//! A [`Scanner`] runs every supplier of a scan concurrently over one shared
//! [`RunnerPool`] and gathers what they return, with the alerts raised along
//! the way, into an [`Inventory`].

use crate::alerter::{Alerter, Alerts};
use crate::error::{Error, Result};
use crate::parallel::RunnerPool;
use crate::remote::Supplier;
use crate::resource::GoogleResource;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Result of one scan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub scan_id: Uuid,
    pub project_id: String,
    pub scanned_at: DateTime<Utc>,
    /// Sorted by type, then id
    pub resources: Vec<GoogleResource>,
    pub alerts: Alerts,
}

impl Inventory {
    /// Number of resources per type
    pub fn count_by_type(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for resource in &self.resources {
            *counts.entry(resource.resource_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Resources of one type
    pub fn of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a GoogleResource> {
        self.resources
            .iter()
            .filter(move |r| r.resource_type() == resource_type)
    }
}

pub struct Scanner {
    pool: RunnerPool,
    alerter: Arc<Alerter>,
    suppliers: Vec<Box<dyn Supplier>>,
}

impl Scanner {
    /// `suppliers` must have been built over `pool` and `alerter`
    pub fn new(pool: RunnerPool, alerter: Arc<Alerter>, suppliers: Vec<Box<dyn Supplier>>) -> Self {
        Self {
            pool,
            alerter,
            suppliers,
        }
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        self.suppliers.iter().map(|s| s.resource_type()).collect()
    }

    /// Run every supplier and collect the inventory
    ///
    /// The first hard error cancels the pool scope, so the scanner cannot be
    /// reused after a failed scan.
    pub async fn scan(&self, project_id: &str) -> Result<Inventory> {
        let scan_id = Uuid::new_v4();
        let scanned_at = Utc::now();
        tracing::info!(
            "Starting scan {} of project {} ({} resource types, parallelism {})",
            scan_id,
            project_id,
            self.suppliers.len(),
            self.pool.limit()
        );

        let supplied = try_join_all(self.suppliers.iter().map(|supplier| async move {
            let resources = supplier.resources().await?;
            tracing::debug!("{}: {} resources", supplier.resource_type(), resources.len());
            Ok::<_, Error>(resources)
        }));

        let result = tokio::select! {
            biased;
            _ = self.pool.scope().cancelled() => Err(Error::Cancelled),
            result = supplied => result,
        };

        let supplied = match result {
            Ok(supplied) => supplied,
            Err(err) => {
                tracing::error!("Scan {} failed: {}", scan_id, err);
                self.pool.cancel();
                return Err(err);
            },
        };

        let mut resources: Vec<GoogleResource> = supplied.into_iter().flatten().collect();
        resources.sort_by(|a, b| {
            a.resource_type()
                .cmp(b.resource_type())
                .then_with(|| a.id().cmp(b.id()))
        });

        let alerts = self.alerter.retrieve();
        tracing::info!(
            "Scan {} finished: {} resources, {} alerted types",
            scan_id,
            resources.len(),
            alerts.len()
        );

        Ok(Inventory {
            scan_id,
            project_id: project_id.to_string(),
            scanned_at,
            resources,
            alerts,
        })
    }
}
