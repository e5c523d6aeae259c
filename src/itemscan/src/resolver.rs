//! Item category resolution
//!
//! Normalize → catalog lookup → scan (with one fallback rescan) → select the
//! first candidate, in scan order, whose name contains the category's
//! fragment and whose class chain includes its base class.

use tracing::debug;

use crate::catalog::{normalize_key, CatalogEntry, ItemCatalog};
use crate::error::ResolveError;
use crate::fname::NameResolver;
use crate::handle::RemoteHandle;
use crate::hierarchy::ClassMatcher;
use crate::layout::EngineLayout;
use crate::scanner::{ObjectRecord, ObjectScanner, ScanOptions};
use crate::source::MemorySource;

/// Resolves item categories to their definition objects
///
/// Holds no state between calls; against an unchanged remote snapshot every
/// call returns the same handle or the same failure kind.
pub struct ItemResolver<'a> {
    source: &'a dyn MemorySource,
    names: &'a dyn NameResolver,
    layout: &'a EngineLayout,
    catalog: &'a ItemCatalog,
    options: ScanOptions,
}

impl<'a> ItemResolver<'a> {
    pub fn new(
        source: &'a dyn MemorySource,
        names: &'a dyn NameResolver,
        layout: &'a EngineLayout,
        catalog: &'a ItemCatalog,
    ) -> Self {
        Self {
            source,
            names,
            layout,
            catalog,
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Handle of the object that defines `category`
    pub fn resolve_item(&self, category: &str) -> Result<RemoteHandle, ResolveError> {
        self.resolve_record(category).map(|record| record.handle)
    }

    /// Like [`resolve_item`](Self::resolve_item) but returns the whole record
    pub fn resolve_record(&self, category: &str) -> Result<ObjectRecord, ResolveError> {
        let key = normalize_key(category);
        let entry = self
            .catalog
            .get(&key)
            .ok_or_else(|| ResolveError::UnknownCategory(key.clone()))?;

        let candidates = self.candidates(entry)?;
        if candidates.is_empty() {
            return Err(ResolveError::NoObjectsFound {
                category: entry.key.clone(),
                fragment: entry.fragment.clone(),
            });
        }

        let matcher = ClassMatcher::new(self.source, self.names, self.layout);
        let base = entry.base.class_name();
        let total = candidates.len();

        let selected = candidates.into_iter().find(|candidate| {
            candidate.name.contains(&entry.fragment) && matcher.is_a(candidate.handle, base, false)
        });

        match selected {
            Some(record) => {
                debug!(
                    "{} -> {} '{}' (class {}, slot {})",
                    entry.key, record.handle, record.name, record.class_name, record.index
                );
                Ok(record)
            }
            None => Err(ResolveError::NoMatchingClass {
                category: entry.key.clone(),
                base: entry.base,
                candidates: total,
            }),
        }
    }

    /// Scan for the primary fragment; if that finds nothing, the first
    /// fallback fragment that finds anything replaces the empty result
    fn candidates(&self, entry: &CatalogEntry) -> Result<Vec<ObjectRecord>, ResolveError> {
        let scanner =
            ObjectScanner::new(self.source, self.names, self.layout).with_options(self.options);

        let found = scanner.find_objects(&entry.fragment)?;
        if !found.is_empty() {
            return Ok(found);
        }

        for fallback in &entry.fallbacks {
            debug!(
                "no objects for '{}', retrying {} with '{}'",
                entry.fragment, entry.key, fallback
            );
            let found = scanner.find_objects(fallback)?;
            if !found.is_empty() {
                return Ok(found);
            }
        }

        Ok(Vec::new())
    }
}
