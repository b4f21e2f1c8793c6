//! Alert Sink
//!
//! Collects per-resource-type degradation notices raised while a scan runs.
//! One [`Alerter`] is created per scan and shared by reference with every
//! supplier; there is no global instance.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// A notice attached to one resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub message: String,
    /// The type contributed nothing to the inventory and must be left out of
    /// drift calculation
    pub should_ignore_resource: bool,
}

impl Alert {
    pub fn new(message: impl Into<String>, should_ignore_resource: bool) -> Self {
        Self {
            message: message.into(),
            should_ignore_resource,
        }
    }
}

/// Alerts keyed by resource type, in send order within each type
pub type Alerts = BTreeMap<String, Vec<Alert>>;

/// Append-only, thread-safe alert collector
#[derive(Debug, Default)]
pub struct Alerter {
    alerts: Mutex<Alerts>,
}

impl Alerter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an alert for a resource type
    pub fn send_alert(&self, resource_type: &str, alert: Alert) {
        let mut alerts = self.alerts.lock().unwrap_or_else(PoisonError::into_inner);
        alerts
            .entry(resource_type.to_string())
            .or_default()
            .push(alert);
    }

    /// Snapshot of everything sent so far
    pub fn retrieve(&self) -> Alerts {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether any type is flagged to be ignored
    pub fn has_ignored_resources(&self) -> bool {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flatten()
            .any(|a| a.should_ignore_resource)
    }
}
