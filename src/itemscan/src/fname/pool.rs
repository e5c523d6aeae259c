//! FNamePool structure and discovery
//!
//! The FNamePool is UE5's block-based storage for FName strings.
//! Each block is typically 64KB.

use crate::error::{NameError, ReadError};
use crate::layout::is_valid_pointer;
use crate::source::MemorySource;

use byteorder::{ByteOrder, LE};
use tracing::debug;

/// Upper bound on CurrentBlock accepted as a sane header
const MAX_BLOCKS: u32 = 8192;

/// Largest region prefix scanned per region during discovery
const DISCOVERY_WINDOW: usize = 16 * 1024 * 1024;

/// FNamePool header and its block table
///
/// Header layout (UE5.5):
/// +0x00: Lock (8 bytes)
/// +0x08: CurrentBlock (4 bytes)
/// +0x0C: CurrentByteCursor (4 bytes)
/// +0x10: Blocks[] - array of block pointers (8 bytes each)
#[derive(Debug, Clone)]
pub struct FNamePool {
    /// Address of the FNamePool header
    pub header_addr: usize,
    /// Index of the block currently being filled
    pub current_block: u32,
    /// Byte cursor in the current block
    pub current_cursor: u32,
    /// Block addresses, `current_block + 1` entries
    pub blocks: Vec<usize>,
}

impl FNamePool {
    /// Read and validate the pool header at `addr`
    pub fn read_at(source: &dyn MemorySource, addr: usize) -> Result<Self, NameError> {
        let header = source.read_bytes(addr, 24)?;
        let current_block = LE::read_u32(&header[8..12]);
        let current_cursor = LE::read_u32(&header[12..16]);
        let block0 = LE::read_u64(&header[16..24]) as usize;

        if current_block > MAX_BLOCKS {
            return Err(NameError::BlockOutOfRange {
                block: current_block as usize,
                available: MAX_BLOCKS as usize,
            });
        }
        if !is_valid_pointer(block0) {
            return Err(NameError::NullBlock(0));
        }
        if !block_starts_with_none(source, block0) {
            return Err(NameError::Read(ReadError::failed(
                block0,
                8,
                "block 0 does not start with the 'None' entry",
            )));
        }

        let num_blocks = current_block as usize + 1;
        let blocks_data = source.read_bytes(addr + 16, num_blocks * 8)?;
        let blocks: Vec<usize> = blocks_data
            .chunks_exact(8)
            .map(|c| LE::read_u64(c) as usize)
            .collect();

        debug!(
            "found FNamePool at {:#x}: {} blocks, cursor {:#x}",
            addr,
            blocks.len(),
            current_cursor
        );

        Ok(FNamePool {
            header_addr: addr,
            current_block,
            current_cursor,
            blocks,
        })
    }

    /// Search readable regions for an FNamePool header
    ///
    /// Tries `hint` first, then every readable region, module image first.
    pub fn discover(source: &dyn MemorySource, hint: Option<usize>) -> Option<Self> {
        if let Some(addr) = hint {
            if let Ok(pool) = Self::read_at(source, addr) {
                return Some(pool);
            }
            debug!("FNamePool hint {:#x} invalid, searching regions", addr);
        }

        let mut regions: Vec<_> = source
            .regions()
            .iter()
            .filter(|r| r.is_readable())
            .collect();
        regions.sort_by_key(|r| if r.path.is_some() { 0 } else { 1 });

        for region in regions {
            let size = region.size().min(DISCOVERY_WINDOW);
            let data = match source.read_bytes(region.start, size) {
                Ok(d) => d,
                Err(_) => continue,
            };

            for i in (0..data.len().saturating_sub(24)).step_by(8) {
                let lock = LE::read_u64(&data[i..i + 8]);
                let current_block = LE::read_u32(&data[i + 8..i + 12]);
                let current_cursor = LE::read_u32(&data[i + 12..i + 16]);
                let block0 = LE::read_u64(&data[i + 16..i + 24]) as usize;

                if lock > 100 || current_block > MAX_BLOCKS {
                    continue;
                }
                if current_cursor == 0 || current_cursor > 0x20000 {
                    continue;
                }
                if !is_valid_pointer(block0) || block0 % 8 != 0 {
                    continue;
                }

                if let Ok(pool) = Self::read_at(source, region.start + i) {
                    return Some(pool);
                }
            }
        }

        None
    }
}

/// Block 0 of every pool begins with the 4-byte ANSI entry "None"
fn block_starts_with_none(source: &dyn MemorySource, block0: usize) -> bool {
    match source.read_bytes(block0, 6) {
        Ok(entry) => {
            let header = LE::read_u16(&entry[0..2]);
            (header >> 6) == 4 && &entry[2..6] == b"None"
        }
        Err(_) => false,
    }
}
