//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up itemscan defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::Path;

/// Settings passed to `configure`
#[derive(Debug, Default)]
pub struct ConfigureArgs {
    pub process: Option<String>,
    pub gobjects: Option<usize>,
    pub gnames: Option<usize>,
    pub show: bool,
}

/// Handle the configure command
pub fn handle(path: Option<&Path>, args: ConfigureArgs) -> Result<()> {
    let mut config = Config::load(path)?;

    if args.show {
        show_config(&config, path);
        return Ok(());
    }

    if !apply(&mut config, &args) {
        show_usage();
        return Ok(());
    }

    let saved_to = config.save(path)?;
    show_config(&config, None);
    println!("Config saved to: {}", saved_to.display());

    Ok(())
}

/// Copy the given settings into `config`, returning whether anything changed
fn apply(config: &mut Config, args: &ConfigureArgs) -> bool {
    let mut changed = false;

    if let Some(name) = &args.process {
        config.process_name = Some(name.clone());
        changed = true;
    }
    if let Some(offset) = args.gobjects {
        config.gobjects_offset = Some(offset);
        changed = true;
    }
    if let Some(offset) = args.gnames {
        config.gnames_offset = Some(offset);
        changed = true;
    }

    changed
}

/// Display current configuration
fn show_config(config: &Config, path: Option<&Path>) {
    match &config.process_name {
        Some(name) => println!("Process:     {}", name),
        None => println!("Process:     (not set)"),
    }
    match config.gobjects_offset {
        Some(offset) => println!("GUObjectArray offset: {:#x}", offset),
        None => println!("GUObjectArray offset: (not set)"),
    }
    match config.gnames_offset {
        Some(offset) => println!("FNamePool offset:     {:#x}", offset),
        None => println!("FNamePool offset:     (discover)"),
    }
    if let Some(secs) = config.timeout_secs {
        println!("Timeout:     {}s", secs);
    }
    if config.layout.is_some() {
        println!("Layout:      custom");
    }
    if let Some(entries) = &config.catalog {
        println!("Catalog:     {} custom categories", entries.len());
    }

    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Config::config_path().ok(),
    };
    if let Some(file) = file {
        println!("Config file: {}", file.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: itemscan configure --process NAME --gobjects HEX [--gnames HEX]");
    println!("   or: itemscan configure --show");
    println!();
    println!("Offsets are relative to the main module base address.");
}
