//! GUObjectArray scanning
//!
//! Walks the chunked global object table and yields live objects whose
//! name contains a fragment. Results come back in scan order (chunk index
//! ascending, then slot index ascending); callers break ties by first match,
//! so every scan mode preserves that order.

use std::collections::HashSet;

use byteorder::{ByteOrder, LE};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{ReadError, ScanError};
use crate::fname::NameResolver;
use crate::handle::RemoteHandle;
use crate::layout::{is_valid_pointer, EngineLayout};
use crate::source::MemorySource;

/// GUObjectArray descriptor, read once per scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectArray {
    /// Address of the array header
    pub address: usize,
    /// Pointer to the chunk pointer table
    pub chunk_table: usize,
    pub num_chunks: usize,
}

impl ObjectArray {
    /// Read the descriptor at `layout.gobjects`
    ///
    /// A failure here fails the whole scan: there is nothing to iterate.
    pub fn read(source: &dyn MemorySource, layout: &EngineLayout) -> Result<Self, ScanError> {
        let address = layout.gobjects;
        let header = source
            .read_bytes(address, layout.header_size())
            .map_err(ScanError::Descriptor)?;

        let table_at = layout.chunk_table_offset;
        let chunks_at = layout.num_chunks_offset;
        let chunk_table = LE::read_u64(&header[table_at..table_at + 8]) as usize;
        let num_chunks = LE::read_i32(&header[chunks_at..chunks_at + 4]);

        if num_chunks < 0 || num_chunks as usize > layout.max_chunks {
            return Err(ScanError::InvalidDescriptor {
                address,
                reason: format!("NumChunks {} is unreasonable", num_chunks),
            });
        }

        if num_chunks > 0 && !is_valid_pointer(chunk_table) {
            return Err(ScanError::InvalidDescriptor {
                address,
                reason: format!("chunk table pointer {:#x} is invalid", chunk_table),
            });
        }

        Ok(ObjectArray {
            address,
            chunk_table,
            num_chunks: num_chunks as usize,
        })
    }
}

/// A live object seen during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRecord {
    /// Global slot index (chunk * capacity + slot)
    pub index: usize,
    pub handle: RemoteHandle,
    pub name: String,
    pub class_handle: RemoteHandle,
    /// Display name of the immediate class, empty if it could not be resolved
    pub class_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Scan chunks on the rayon pool
    pub parallel: bool,
}

/// Enumerates objects in GUObjectArray
pub struct ObjectScanner<'a> {
    source: &'a dyn MemorySource,
    names: &'a dyn NameResolver,
    layout: &'a EngineLayout,
    options: ScanOptions,
}

impl<'a> ObjectScanner<'a> {
    pub fn new(
        source: &'a dyn MemorySource,
        names: &'a dyn NameResolver,
        layout: &'a EngineLayout,
    ) -> Self {
        Self {
            source,
            names,
            layout,
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// All live objects whose name contains `fragment` (case-sensitive)
    pub fn find_objects(&self, fragment: &str) -> Result<Vec<ObjectRecord>, ScanError> {
        if self.options.parallel {
            return self.find_objects_parallel(fragment);
        }

        let array = ObjectArray::read(self.source, self.layout)?;
        let per_chunk = (0..array.num_chunks)
            .map(|chunk| self.scan_chunk(&array, chunk, fragment))
            .collect();

        Ok(self.merge(per_chunk, fragment))
    }

    /// Same result as [`find_objects`](Self::find_objects), one rayon task per chunk
    pub fn find_objects_parallel(&self, fragment: &str) -> Result<Vec<ObjectRecord>, ScanError> {
        let array = ObjectArray::read(self.source, self.layout)?;
        let per_chunk: Vec<Vec<ObjectRecord>> = (0..array.num_chunks)
            .into_par_iter()
            .map(|chunk| self.scan_chunk(&array, chunk, fragment))
            .collect();

        Ok(self.merge(per_chunk, fragment))
    }

    /// Visit every live object in scan order, returning how many were visited
    ///
    /// Objects whose name cannot be resolved are still visited with an empty name.
    pub fn for_each_object<F>(&self, mut visit: F) -> Result<usize, ScanError>
    where
        F: FnMut(ObjectRecord),
    {
        let array = ObjectArray::read(self.source, self.layout)?;
        let mut visited = 0;

        for chunk in 0..array.num_chunks {
            for (index, handle) in self.chunk_slots(&array, chunk) {
                let Some((name_index, class_handle)) = self.read_header(handle) else {
                    continue;
                };
                let name = self
                    .names
                    .resolve_name(self.source, name_index)
                    .unwrap_or_default();
                visit(self.record(index, handle, name, class_handle));
                visited += 1;
            }
        }

        Ok(visited)
    }

    /// Flatten per-chunk results in chunk order, keeping the first record per handle
    fn merge(&self, per_chunk: Vec<Vec<ObjectRecord>>, fragment: &str) -> Vec<ObjectRecord> {
        let mut seen = HashSet::new();
        let results: Vec<ObjectRecord> = per_chunk
            .into_iter()
            .flatten()
            .filter(|record| seen.insert(record.handle))
            .collect();

        debug!(
            "GUObjectArray scan for '{}': {} match(es)",
            fragment,
            results.len()
        );
        results
    }

    fn scan_chunk(&self, array: &ObjectArray, chunk: usize, fragment: &str) -> Vec<ObjectRecord> {
        let mut matches = Vec::new();

        for (index, handle) in self.chunk_slots(array, chunk) {
            let Some((name_index, class_handle)) = self.read_header(handle) else {
                continue;
            };

            // An unresolvable name never matches
            let name = match self.names.resolve_name(self.source, name_index) {
                Ok(name) => name,
                Err(e) => {
                    trace!("object {} name {} unresolved: {}", handle, name_index, e);
                    continue;
                }
            };

            if name.contains(fragment) {
                matches.push(self.record(index, handle, name, class_handle));
            }
        }

        matches
    }

    /// Non-null slots of one chunk as (global index, handle)
    ///
    /// The chunk is fetched with a single bulk read; if that fails the slots
    /// are read one by one so an unreadable page only costs its own slots.
    fn chunk_slots(&self, array: &ObjectArray, chunk: usize) -> Vec<(usize, RemoteHandle)> {
        let layout = self.layout;
        let capacity = layout.chunk_capacity;

        let Some(pointer_at) = layout.chunk_pointer_address(array.chunk_table, chunk) else {
            return Vec::new();
        };
        let chunk_base = match self.source.read_ptr(pointer_at) {
            Ok(0) => return Vec::new(),
            Ok(ptr) if !is_valid_pointer(ptr) => {
                trace!("chunk {} pointer {:#x} is invalid", chunk, ptr);
                return Vec::new();
            }
            Ok(ptr) => ptr,
            Err(e) => {
                trace!("chunk {} pointer unreadable: {}", chunk, e);
                return Vec::new();
            }
        };

        let bulk = capacity
            .checked_mul(layout.item_size)
            .ok_or_else(|| ReadError::OutOfRange {
                address: chunk_base,
                size: usize::MAX,
            })
            .and_then(|size| self.source.read_bytes(chunk_base, size));

        let raw: Vec<usize> = match bulk {
            Ok(data) => (0..capacity)
                .map(|slot| {
                    layout
                        .slot_address(0, slot)
                        .and_then(|at| data.get(at..at.checked_add(8)?))
                        .map(|bytes| LE::read_u64(bytes) as usize)
                        .unwrap_or(0)
                })
                .collect(),
            Err(e) => {
                trace!("chunk {} bulk read failed ({}), reading per slot", chunk, e);
                (0..capacity)
                    .map(|slot| {
                        layout
                            .slot_address(chunk_base, slot)
                            .and_then(|address| self.source.read_ptr(address).ok())
                            .unwrap_or(0)
                    })
                    .collect()
            }
        };

        raw.into_iter()
            .enumerate()
            .filter(|&(_, ptr)| ptr != 0)
            .filter(|&(slot, ptr)| {
                let valid = is_valid_pointer(ptr);
                if !valid {
                    trace!("chunk {} slot {} holds stale pointer {:#x}", chunk, slot, ptr);
                }
                valid
            })
            .map(|(slot, ptr)| (chunk * capacity + slot, RemoteHandle(ptr)))
            .collect()
    }

    /// (name index, class handle) of a UObject
    fn read_header(&self, handle: RemoteHandle) -> Option<(u32, RemoteHandle)> {
        let layout = self.layout;
        let class_at = layout.object_class_offset;
        let name_at = layout.object_name_offset;
        let size = (class_at + 8).max(name_at + 4);

        let header = self.source.read_bytes(handle.address(), size).ok()?;
        let class_handle = RemoteHandle(LE::read_u64(&header[class_at..class_at + 8]) as usize);
        let name_index = LE::read_u32(&header[name_at..name_at + 4]);
        Some((name_index, class_handle))
    }

    fn record(
        &self,
        index: usize,
        handle: RemoteHandle,
        name: String,
        class_handle: RemoteHandle,
    ) -> ObjectRecord {
        let class_name = if class_handle.is_null() {
            String::new()
        } else {
            self.read_header(class_handle)
                .and_then(|(name_index, _)| {
                    self.names.resolve_name(self.source, name_index).ok()
                })
                .unwrap_or_default()
        };

        ObjectRecord {
            index,
            handle,
            name,
            class_handle,
            class_name,
        }
    }
}
