//! `parlance config`: print the effective configuration.

use std::path::Path;

use anyhow::Result;
use console::style;

use parlance_infra::config::render_config;
use parlance_types::config::AppConfig;

/// Print the configuration that `serve` would use.
///
/// Only the name of the API key variable is shown, never its value.
pub fn show_config(config: &AppConfig, path: &Path, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let origin = if path.exists() {
        style("file").green()
    } else {
        style("defaults, file not found").yellow()
    };

    println!();
    println!(
        "  {} {} ({})",
        style("Config:").bold(),
        style(path.display()).cyan(),
        origin
    );
    println!();
    for line in render_config(config)?.lines() {
        println!("  {line}");
    }
    println!();

    Ok(())
}
