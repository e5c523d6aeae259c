//! FName decoding
//!
//! Provides FName reading from the chunked FNamePool structure used in UE5.5+,
//! behind the `NameResolver` trait the scanner and matcher consume.

mod pool;
mod reader;

pub use pool::FNamePool;
pub use reader::FNameReader;

use crate::error::NameError;
use crate::source::MemorySource;

/// Maps an FName comparison index to its string form
pub trait NameResolver: Send + Sync {
    fn resolve_name(&self, source: &dyn MemorySource, index: u32) -> Result<String, NameError>;
}
