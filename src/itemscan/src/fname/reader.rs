//! FNameReader for reading FName strings from the pool
//!
//! Provides cached reading of FName entries.

use super::pool::FNamePool;
use super::NameResolver;
use crate::error::{NameError, ReadError};
use crate::source::MemorySource;

use byteorder::{ByteOrder, LE};
use std::collections::HashMap;
use std::sync::RwLock;

/// Longest entry accepted before the header is considered garbage
const MAX_NAME_LEN: usize = 1024;

/// FNamePool reader for UE5
///
/// Entries are cached by index. The cache only saves reads; names are
/// immutable once allocated in the pool, so a cached value never goes stale
/// while the process lives.
pub struct FNameReader {
    /// The FNamePool structure
    pub pool: FNamePool,
    cache: RwLock<HashMap<u32, String>>,
}

impl FNameReader {
    pub fn new(pool: FNamePool) -> Self {
        Self {
            pool,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Read an FName entry from the pool
    ///
    /// FName index encoding in UE5:
    /// - ComparisonIndex = (BlockIndex << 16) | (BlockOffset >> 1)
    pub fn read_name(
        &self,
        source: &dyn MemorySource,
        fname_index: u32,
    ) -> Result<String, NameError> {
        if fname_index == 0 {
            return Ok("None".to_string());
        }

        if let Some(name) = self.cached(fname_index) {
            return Ok(name);
        }

        let comparison_index = fname_index & 0x3FFFFFFF;
        let block_index = (comparison_index >> 16) as usize;
        let block_offset = ((comparison_index & 0xFFFF) * 2) as usize;

        let block_addr = *self
            .pool
            .blocks
            .get(block_index)
            .ok_or(NameError::BlockOutOfRange {
                block: block_index,
                available: self.pool.blocks.len(),
            })?;

        if block_addr == 0 {
            return Err(NameError::NullBlock(block_index));
        }

        // A corrupt block pointer may sit at the top of the address space
        let (entry_addr, text_addr) = block_addr
            .checked_add(block_offset)
            .and_then(|entry| Some((entry, entry.checked_add(2)?)))
            .ok_or(ReadError::OutOfRange {
                address: block_addr,
                size: block_offset + 2,
            })?;
        let header = source.read_bytes(entry_addr, 2)?;
        let header_val = LE::read_u16(&header);

        let is_wide = (header_val & 1) != 0;
        let len = (header_val >> 6) as usize;

        if len == 0 || len > MAX_NAME_LEN {
            return Err(NameError::InvalidLength {
                index: fname_index,
                len,
            });
        }

        let name = if is_wide {
            let bytes = source.read_bytes(text_addr, len * 2)?;
            let chars: Vec<u16> = bytes.chunks_exact(2).map(LE::read_u16).collect();
            String::from_utf16_lossy(&chars)
        } else {
            let bytes = source.read_bytes(text_addr, len)?;
            String::from_utf8_lossy(&bytes).to_string()
        };

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(fname_index, name.clone());
        }
        Ok(name)
    }

    /// Number of cached entries
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    fn cached(&self, fname_index: u32) -> Option<String> {
        self.cache.read().ok()?.get(&fname_index).cloned()
    }
}

impl NameResolver for FNameReader {
    fn resolve_name(&self, source: &dyn MemorySource, index: u32) -> Result<String, NameError> {
        self.read_name(source, index)
    }
}
