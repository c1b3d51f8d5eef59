//! `obsmon comment add|list`

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use super::common::{open_monitor, truncate_for_display, UnitSelector};
use crate::fs::validate_comment;
use crate::models::CommentEntry;

const AUTHOR_WIDTH: usize = 16;

pub fn add(config_path: Option<&Path>, selector: &UnitSelector, author: &str, text: &str) -> Result<()> {
    validate_comment(author, text)?;
    let monitor = open_monitor(config_path)?;
    let identity = selector.require_identity()?;

    let entry = monitor
        .record_comment(&identity, author, Utc::now(), text)
        .with_context(|| format!("Failed to record comment for {identity}"))?;

    println!(
        "{} comment on {} at {}",
        "Recorded".green().bold(),
        identity.to_string().cyan(),
        entry.datetime.dimmed()
    );
    Ok(())
}

pub fn list(config_path: Option<&Path>, selector: &UnitSelector, json: bool) -> Result<()> {
    let monitor = open_monitor(config_path)?;
    let identity = selector.require_identity()?;
    let entries = monitor
        .comments(&identity)
        .with_context(|| format!("Failed to read comments for {identity}"))?;

    if json {
        let output = serde_json::to_string_pretty(&entries).context("Failed to serialize comments")?;
        println!("{output}");
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "No comments.".dimmed());
        return Ok(());
    }
    for entry in &entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

fn format_entry(entry: &CommentEntry) -> String {
    let time = entry
        .timestamp()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| entry.datetime.clone());
    format!(
        "{} {} {}",
        time.dimmed(),
        truncate_for_display(&entry.author, AUTHOR_WIDTH).cyan(),
        entry.text
    )
}
