//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../autoblog.yml.example");
const CONFIG_FILE: &str = "autoblog.yml";

/// Write a starter autoblog.yml into `path` (defaults to the current directory)
pub fn init_project(path: Option<&Path>, force: bool) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "{:?} already exists; pass --force to overwrite it",
            config_path
        );
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!("✓ Created {:?}", config_path);
    println!("  - Edit {} to customize site metadata and CTA links", CONFIG_FILE);
    println!("  - Set GEMINI_API_KEY to enable rewriting and image generation");
    Ok(())
}
