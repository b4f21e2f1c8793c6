//! Inventory rendering

use crate::scan::Inventory;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    /// Resource counts per type and alerts
    Summary,
}

pub fn render(inventory: &Inventory, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(inventory).context("Failed to serialize inventory as JSON")
        },
        OutputFormat::Yaml => {
            serde_yaml::to_string(inventory).context("Failed to serialize inventory as YAML")
        },
        OutputFormat::Summary => Ok(render_summary(inventory)),
    }
}

fn render_summary(inventory: &Inventory) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Project {} scanned at {} (scan {})",
        inventory.project_id,
        inventory.scanned_at.format("%Y-%m-%d %H:%M:%S UTC"),
        inventory.scan_id
    );

    let counts = inventory.count_by_type();
    let width = counts.keys().map(|t| t.len()).max().unwrap_or(0);
    for (resource_type, count) in &counts {
        let _ = writeln!(out, "  {:<width$}  {}", resource_type, count, width = width);
    }
    let _ = writeln!(out, "Total: {} resources", inventory.resources.len());

    if !inventory.alerts.is_empty() {
        let _ = writeln!(out, "Alerts:");
        for (resource_type, alerts) in &inventory.alerts {
            for alert in alerts {
                let _ = writeln!(out, "  [{}] {}", resource_type, alert.message);
            }
        }
    }

    out
}
