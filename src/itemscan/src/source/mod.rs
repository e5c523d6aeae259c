//! Memory Source Abstraction
//!
//! Core abstractions for reading memory out of the observed process:
//! - The `MemorySource` trait every collaborator reads through
//! - `MemoryRegion` describing mapped ranges
//! - Mock sources for testing

mod region;
mod traits;

#[cfg(test)]
mod mock;

pub use region::MemoryRegion;
pub use traits::MemorySource;
