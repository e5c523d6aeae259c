//! Attached target: process, name pool, layout and catalog
//!
//! Built once per invocation from config values overridden by CLI flags.

use anyhow::{Context, Result};
use itemscan::{
    ClassMatcher, EngineLayout, FNamePool, FNameReader, ItemCatalog, ItemResolver, ObjectScanner,
    ScanOptions,
};
use tracing::info;

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::process::LiveProcess;

/// Values from config and flags, flags winning
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pid: Option<u32>,
    pub process_name: Option<String>,
    pub gobjects_offset: Option<usize>,
    pub gnames_offset: Option<usize>,
    pub layout: EngineLayout,
    pub options: ScanOptions,
}

impl Settings {
    pub fn merge(config: &Config, args: &GlobalArgs) -> Self {
        Self {
            pid: args.pid,
            process_name: args.process.clone().or_else(|| config.process_name.clone()),
            gobjects_offset: args.gobjects.or(config.gobjects_offset),
            gnames_offset: args.gnames.or(config.gnames_offset),
            layout: config.layout(),
            options: ScanOptions {
                parallel: args.parallel,
            },
        }
    }
}

pub struct Target {
    pub process: LiveProcess,
    pub names: FNameReader,
    pub layout: EngineLayout,
    pub catalog: ItemCatalog,
    pub options: ScanOptions,
}

impl Target {
    /// Attach and locate GUObjectArray and the FNamePool
    pub fn open(settings: Settings, catalog: ItemCatalog) -> Result<Self> {
        let gobjects_offset = settings.gobjects_offset.context(
            "GUObjectArray offset not set. Pass --gobjects or run: itemscan configure --gobjects HEX",
        )?;

        let process = LiveProcess::attach(settings.pid, settings.process_name.as_deref())?;
        info!(
            "Attached to PID {} ({}, {} memory regions)",
            process.pid,
            process.exe_path.display(),
            process.maps.len()
        );
        let base = process
            .module_base(settings.process_name.as_deref())
            .context("Could not find the main module in the process memory map")?;

        let layout = settings.layout.with_gobjects(base + gobjects_offset);
        info!("Module base {:#x}, GUObjectArray at {:#x}", base, layout.gobjects);

        let hint = settings.gnames_offset.map(|offset| base + offset);
        let pool = FNamePool::discover(&process, hint)
            .context("Could not locate FNamePool. Pass --gnames with its offset")?;
        info!(
            "FNamePool at {:#x} ({} blocks)",
            pool.header_addr,
            pool.blocks.len()
        );

        Ok(Self {
            process,
            names: FNameReader::new(pool),
            layout,
            catalog,
            options: settings.options,
        })
    }

    pub fn scanner(&self) -> ObjectScanner<'_> {
        ObjectScanner::new(&self.process, &self.names, &self.layout).with_options(self.options)
    }

    pub fn matcher(&self) -> ClassMatcher<'_> {
        ClassMatcher::new(&self.process, &self.names, &self.layout)
    }

    pub fn resolver(&self) -> ItemResolver<'_> {
        ItemResolver::new(&self.process, &self.names, &self.layout, &self.catalog)
            .with_options(self.options)
    }
}
