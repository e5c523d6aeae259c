//! Command handlers for itemscan CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod catalog;
pub mod configure;
pub mod objects;
pub mod resolve;
