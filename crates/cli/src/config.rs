//! CLI configuration utilities

use anyhow::{Context, Result};
use banquet_core::Settings;
use std::path::Path;

/// Render settings as TOML
pub fn render_settings(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings")
}

/// Write a default configuration file, refusing to overwrite an existing one
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_settings(&Settings::default())?)
        .with_context(|| format!("Failed to write {}", path.display()))
}
