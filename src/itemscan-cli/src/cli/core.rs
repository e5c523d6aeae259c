//! Core CLI definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "itemscan")]
#[command(about = "Resolve item definition objects in a running UE5 game", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Attach to this process ID
    #[arg(long, global = true)]
    pub pid: Option<u32>,

    /// Attach to the process with this name (e.g. "Game-Win64-Shipping.exe")
    #[arg(long, global = true)]
    pub process: Option<String>,

    /// GUObjectArray offset from the main module base (hex)
    #[arg(long, global = true, value_parser = parse_hex)]
    pub gobjects: Option<usize>,

    /// FNamePool offset from the main module base (hex, discovered if omitted)
    #[arg(long, global = true, value_parser = parse_hex)]
    pub gnames: Option<usize>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scan object array chunks in parallel
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Give up after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an item category (e.g. "knife", "gaz bottle") to its definition object
    #[command(visible_alias = "r")]
    Resolve {
        /// Category name (case-insensitive)
        category: String,
    },

    /// List objects whose name contains a fragment
    #[command(visible_alias = "f")]
    Find {
        /// Name fragment (case-sensitive)
        fragment: String,

        /// Maximum number of objects to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List every live object in GUObjectArray
    #[command(visible_alias = "l")]
    List {
        /// Maximum number of objects to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Show the most common classes instead of objects
        #[arg(long)]
        stats: bool,
    },

    /// Check whether an object derives from a class
    IsA {
        /// Object address (hex)
        #[arg(value_parser = parse_hex)]
        address: usize,

        /// Class name (e.g. "Data_Melee_C")
        class: String,

        /// Require an exact class name instead of a substring
        #[arg(short, long)]
        exact: bool,
    },

    /// List the item categories in the active catalog
    Categories,

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default process name
        #[arg(long)]
        process: Option<String>,

        /// Set GUObjectArray offset (hex)
        #[arg(long, value_parser = parse_hex)]
        gobjects: Option<usize>,

        /// Set FNamePool offset (hex)
        #[arg(long, value_parser = parse_hex)]
        gnames: Option<usize>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Parse a hex number with or without a `0x` prefix
pub fn parse_hex(s: &str) -> Result<usize, String> {
    let digits = s
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .replace('_', "");
    usize::from_str_radix(&digits, 16).map_err(|e| format!("invalid hex value '{}': {}", s, e))
}
