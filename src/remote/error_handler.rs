//! Turns authorization failures into alerts
//!
//! A 403 while enumerating a type means the scan cannot see that type at
//! all. Rather than failing, the type is reported to the alerter and
//! contributes nothing. Every other error is passed through untouched.

use super::registry::ForbiddenRead;
use crate::alerter::{Alert, Alerter};
use crate::error::{Error, Result};

/// Handle a failed listing of `resource_type`
///
/// `forbidden_type` names the prerequisite type whose listing was refused,
/// when that is not `resource_type` itself.
pub fn handle_list_error<R>(
    err: Error,
    resource_type: &str,
    forbidden_type: Option<&str>,
    alerter: &Alerter,
) -> Result<Vec<R>> {
    if !err.is_forbidden() {
        return Err(err);
    }

    let message = match forbidden_type.filter(|f| *f != resource_type) {
        Some(forbidden) => format!(
            "Ignoring {} from drift calculation. Listing {} is forbidden.",
            resource_type, forbidden
        ),
        None => format!(
            "Ignoring {} from drift calculation: Listing {} is forbidden.",
            resource_type, resource_type
        ),
    };

    tracing::warn!("{}", message);
    alerter.send_alert(resource_type, Alert::new(message, true));
    Ok(Vec::new())
}

/// Handle the error `wait` reported for the reads of `resource_type`
pub fn handle_read_error<R>(
    err: Error,
    resource_type: &str,
    policy: ForbiddenRead,
    alerter: &Alerter,
) -> Result<Vec<R>> {
    if policy != ForbiddenRead::IgnoreType || !err.is_forbidden() {
        return Err(err);
    }

    let message = format!(
        "Ignoring {} from drift calculation: Reading {} is forbidden.",
        resource_type, resource_type
    );

    tracing::warn!("{}", message);
    alerter.send_alert(resource_type, Alert::new(message, true));
    Ok(Vec::new())
}
