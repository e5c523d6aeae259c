//! # itemscan
//!
//! Locate item definition objects inside a running UE5 process.
//!
//! This library provides functionality to:
//! - Read remote memory through the [`MemorySource`] abstraction
//! - Decode FNames from the block-based FNamePool
//! - Walk the chunked GUObjectArray looking for objects by name
//! - Test an object's class lineage against a class name
//! - Resolve a human-readable item category ("knife", "pistol") to the one
//!   object that defines that item
//!
//! ## Example
//!
//! ```no_run
//! use itemscan::{EngineLayout, FNameReader, ItemCatalog, ItemResolver, MemorySource};
//!
//! # fn run(source: &dyn MemorySource, names: &FNameReader) -> Result<(), Box<dyn std::error::Error>> {
//! let layout = EngineLayout::default().with_gobjects(0x1513878f0);
//! let catalog = ItemCatalog::default();
//!
//! let resolver = ItemResolver::new(source, names, &layout, &catalog);
//! let knife = resolver.resolve_item("knife")?;
//! println!("Knife definition at {}", knife);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod fname;
pub mod handle;
pub mod hierarchy;
pub mod layout;
pub mod resolver;
pub mod scanner;
pub mod source;

#[cfg(test)]
mod testing;

#[doc(inline)]
pub use catalog::{BaseClass, CatalogEntry, ItemCatalog};
#[doc(inline)]
pub use error::{CatalogError, NameError, ReadError, ResolveError, ScanError};
#[doc(inline)]
pub use fname::{FNamePool, FNameReader, NameResolver};
#[doc(inline)]
pub use handle::RemoteHandle;
#[doc(inline)]
pub use hierarchy::{ClassMatcher, ClassRecord, MAX_CLASS_DEPTH};
#[doc(inline)]
pub use layout::EngineLayout;
#[doc(inline)]
pub use resolver::ItemResolver;
#[doc(inline)]
pub use scanner::{ObjectArray, ObjectRecord, ObjectScanner, ScanOptions};
#[doc(inline)]
pub use source::{MemoryRegion, MemorySource};
