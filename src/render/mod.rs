//! Presentation of step and cycle reports.

pub mod text;

pub use text::{render_cycle_table, render_step_tables};

use serde::Serialize;

/// Pretty JSON for any report; "no data" becomes `null`.
pub fn render_json<T: Serialize>(report: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
