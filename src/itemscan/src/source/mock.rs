//! Mock Memory Source
//!
//! A sparse mock memory source for building synthetic object arrays,
//! class chains and FName blocks in tests.

use super::{MemoryRegion, MemorySource};
use crate::error::ReadError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A mock memory source made of independent zero-filled segments
pub struct MockMemorySource {
    /// (base address, bytes) per segment
    segments: Vec<(usize, Vec<u8>)>,
    /// Ranges whose reads always fail, as [start, end)
    poisoned: Vec<(usize, usize)>,
    regions: Vec<MemoryRegion>,
    reads: AtomicUsize,
}

impl MockMemorySource {
    /// Create a new mock with data at given base address
    pub fn new(data: Vec<u8>, base_address: usize) -> Self {
        let mut source = Self::empty();
        source.add_data(base_address, data);
        source
    }

    /// Create a mock with no mapped memory
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
            poisoned: Vec::new(),
            regions: Vec::new(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Map a zero-filled segment of `size` bytes at `base_address`
    pub fn add_segment(&mut self, base_address: usize, size: usize) -> &mut Self {
        self.add_data(base_address, vec![0u8; size])
    }

    /// Map a segment holding `data` at `base_address`
    pub fn add_data(&mut self, base_address: usize, data: Vec<u8>) -> &mut Self {
        self.regions.push(MemoryRegion {
            start: base_address,
            end: base_address + data.len(),
            perms: "rw-p".to_string(),
            offset: 0,
            path: None,
        });
        self.segments.push((base_address, data));
        self
    }

    /// Make every read overlapping [start, start + size) fail
    pub fn poison(&mut self, start: usize, size: usize) -> &mut Self {
        self.poisoned.push((start, start + size));
        self
    }

    /// Write bytes into an already mapped segment
    pub fn put_bytes(&mut self, address: usize, bytes: &[u8]) -> &mut Self {
        let (base, data) = self
            .segments
            .iter_mut()
            .find(|(base, data)| address >= *base && address + bytes.len() <= *base + data.len())
            .unwrap_or_else(|| panic!("no mock segment covers {:#x}", address));
        let offset = address - *base;
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    pub fn put_u64(&mut self, address: usize, value: u64) -> &mut Self {
        self.put_bytes(address, &value.to_le_bytes())
    }

    pub fn put_u32(&mut self, address: usize, value: u32) -> &mut Self {
        self.put_bytes(address, &value.to_le_bytes())
    }

    pub fn put_i32(&mut self, address: usize, value: i32) -> &mut Self {
        self.put_bytes(address, &value.to_le_bytes())
    }

    /// Number of read_bytes calls made so far (successful or not)
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl MemorySource for MockMemorySource {
    fn read_bytes(&self, address: usize, size: usize) -> Result<Vec<u8>, ReadError> {
        self.reads.fetch_add(1, Ordering::Relaxed);

        let end = address
            .checked_add(size)
            .ok_or(ReadError::OutOfRange { address, size })?;

        if self
            .poisoned
            .iter()
            .any(|&(p_start, p_end)| address < p_end && end > p_start)
        {
            return Err(ReadError::failed(address, size, "poisoned range"));
        }

        for (base, data) in &self.segments {
            if address >= *base && end <= *base + data.len() {
                let offset = address - *base;
                return Ok(data[offset..offset + size].to_vec());
            }
        }

        Err(ReadError::OutOfRange { address, size })
    }

    fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_read_bytes() {
        let data = vec![0x41, 0x42, 0x43, 0x44]; // "ABCD"
        let source = MockMemorySource::new(data, 0x1000);

        let result = source.read_bytes(0x1000, 4).unwrap();
        assert_eq!(result, vec![0x41, 0x42, 0x43, 0x44]);

        let partial = source.read_bytes(0x1001, 2).unwrap();
        assert_eq!(partial, vec![0x42, 0x43]);
    }

    #[test]
    fn test_mock_source_typed_reads() {
        let data = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let source = MockMemorySource::new(data, 0x1000);

        assert_eq!(source.read_u64(0x1000).unwrap(), 0x0807060504030201);
        assert_eq!(source.read_u32(0x1000).unwrap(), 0x04030201);
        assert_eq!(source.read_ptr(0x1000).unwrap(), 0x0807060504030201);
    }

    #[test]
    fn test_mock_source_sparse_segments() {
        let mut source = MockMemorySource::empty();
        source.add_segment(0x1000, 0x100).add_segment(0x9000, 0x100);
        source.put_u64(0x9008, 0xdead_beef);

        assert_eq!(source.read_u64(0x9008).unwrap(), 0xdead_beef);
        assert_eq!(source.read_u64(0x1000).unwrap(), 0);

        // Gap between the segments is unmapped
        assert!(source.read_bytes(0x2000, 8).is_err());
        // Reads may not straddle a segment boundary
        assert!(source.read_bytes(0x10fc, 8).is_err());
    }

    #[test]
    fn test_mock_source_poisoned_range() {
        let mut source = MockMemorySource::empty();
        source.add_segment(0x1000, 0x100).poison(0x1040, 0x10);

        assert!(source.read_bytes(0x1000, 0x40).is_ok());
        assert!(source.read_bytes(0x1038, 0x10).is_err());
        assert!(source.read_bytes(0x1050, 0x10).is_ok());
    }

    #[test]
    fn test_mock_source_counts_reads() {
        let source = MockMemorySource::new(vec![0; 16], 0x1000);
        assert_eq!(source.read_count(), 0);
        let _ = source.read_u64(0x1000);
        let _ = source.read_u64(0x5000);
        assert_eq!(source.read_count(), 2);
    }
}
