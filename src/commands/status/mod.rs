//! `obsmon status`: the per-night dashboard table.

mod display;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::common::{open_monitor, UnitSelector};
use crate::models::Row;
use display::{
    display_empty, display_masterframe_header, display_masterframe_row, display_science_header,
    display_science_row,
};

pub fn execute(
    config_path: Option<&Path>,
    selector: &UnitSelector,
    json: bool,
    no_cache: bool,
) -> Result<()> {
    let monitor = open_monitor(config_path)?;
    let identity = selector.identity()?;
    let layout = selector.layout();

    let report = if no_cache {
        monitor.refresh_status(selector.date, layout, identity.as_ref())
    } else {
        monitor.aggregate_status(selector.date, layout, identity.as_ref())
    }
    .with_context(|| format!("Failed to aggregate {layout} status for {}", selector.date))?;

    if json {
        let output =
            serde_json::to_string_pretty(&report.rows).context("Failed to serialize rows")?;
        println!("{output}");
        return Ok(());
    }

    println!(
        "{} {} ({}){}",
        "Night".bold(),
        selector.date.to_string().cyan(),
        layout,
        if report.from_cache {
            " [cached]".dimmed().to_string()
        } else {
            String::new()
        }
    );

    if report.rows.is_empty() {
        display_empty(report.empty_reason);
        return Ok(());
    }

    if layout.is_masterframe() {
        display_masterframe_header();
    } else {
        display_science_header();
    }
    for row in &report.rows {
        match row {
            Row::Science(row) => display_science_row(row),
            Row::Masterframe(row) => display_masterframe_row(row),
        }
    }

    let warnings: usize = report.rows.iter().map(Row::warnings).sum();
    let errors: usize = report.rows.iter().map(Row::errors).sum();
    println!(
        "\n{} units, {} warnings, {} errors",
        report.rows.len(),
        warnings.to_string().yellow(),
        errors.to_string().red()
    );

    Ok(())
}
