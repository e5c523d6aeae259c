//! CLI argument definitions for itemscan
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;

pub use core::{parse_hex, Cli, Commands, GlobalArgs};
