//! Initialize .triage.toml configuration

use anyhow::Result;
use std::path::Path;
use triage_core::TriageConfig;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(".triage.toml");

    if config_path.exists() {
        println!("⚠️  .triage.toml already exists at {:?}", config_path);
        return Ok(());
    }

    let config = TriageConfig::default();
    config.save(&config_path)?;

    println!("✅ Created .triage.toml at {:?}", config_path);
    println!("\nYou can now customize the configuration and run:");
    println!("  triage report <results-dir>");

    Ok(())
}
