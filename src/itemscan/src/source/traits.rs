//! Memory Source Trait
//!
//! Core abstraction for reading memory from the observed process.

use super::MemoryRegion;
use crate::error::ReadError;
use byteorder::{ByteOrder, LE};

/// Trait for reading memory from a remote process (or a stand-in for one)
///
/// Implementations must be read-only. Every read may fail independently;
/// the remote process owns the memory and may change it between reads.
pub trait MemorySource: Send + Sync {
    /// Read bytes from a virtual address
    fn read_bytes(&self, address: usize, size: usize) -> Result<Vec<u8>, ReadError>;

    /// Get the list of memory regions
    fn regions(&self) -> &[MemoryRegion];

    /// Read a u64 from memory
    fn read_u64(&self, address: usize) -> Result<u64, ReadError> {
        let bytes = self.read_bytes(address, 8)?;
        Ok(LE::read_u64(&bytes))
    }

    /// Read a u32 from memory
    fn read_u32(&self, address: usize) -> Result<u32, ReadError> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(LE::read_u32(&bytes))
    }

    /// Read a pointer (usize) from memory
    fn read_ptr(&self, address: usize) -> Result<usize, ReadError> {
        let bytes = self.read_bytes(address, 8)?;
        Ok(LE::read_u64(&bytes) as usize)
    }
}
