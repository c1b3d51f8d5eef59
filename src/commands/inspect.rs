//! Single-unit inspection: resolved paths, artifacts and images.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::common::{open_monitor, UnitSelector};
use crate::monitor::{Artifact, ArtifactKind};

/// `obsmon paths`
pub fn paths(config_path: Option<&Path>, selector: &UnitSelector) -> Result<()> {
    let monitor = open_monitor(config_path)?;
    let identity = selector.require_identity()?;
    let paths = monitor
        .resolve_paths(&identity)
        .with_context(|| format!("Failed to resolve {identity}"))?;

    println!("{} {}", "Unit".bold(), identity.to_string().cyan());
    for (label, path) in [
        ("directory", &paths.unit_dir),
        ("config", &paths.config),
        ("log", &paths.log),
        ("debug log", &paths.debug_log),
        ("comments", &paths.comments),
        ("images", &paths.images_dir),
    ] {
        let marker = if path.exists() {
            "✓".green()
        } else {
            "✗".dimmed()
        };
        println!("  {marker} {:<10} {}", label, path.display());
    }

    Ok(())
}

/// `obsmon show --kind config|log|debug`
pub fn show(config_path: Option<&Path>, selector: &UnitSelector, kind: ArtifactKind) -> Result<()> {
    let monitor = open_monitor(config_path)?;
    let identity = selector.require_identity()?;
    let artifact = monitor
        .read_artifact(&identity, kind)
        .with_context(|| format!("Failed to read {kind} for {identity}"))?;

    match artifact {
        Artifact::Config(value) => {
            let output =
                serde_json::to_string_pretty(&value).context("Failed to render configuration")?;
            println!("{output}");
        }
        Artifact::Text(text) => print!("{text}"),
    }

    Ok(())
}

/// `obsmon images`
pub fn images(config_path: Option<&Path>, selector: &UnitSelector) -> Result<()> {
    let monitor = open_monitor(config_path)?;
    let identity = selector.require_identity()?;
    let images = monitor
        .images(&identity)
        .with_context(|| format!("Failed to list images for {identity}"))?;

    if images.is_empty() {
        println!("{}", "No images yet.".dimmed());
        return Ok(());
    }
    for image in images {
        println!("{}", image.display());
    }

    Ok(())
}
