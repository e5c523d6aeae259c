//! UE5 Memory Layout
//!
//! Offsets and sizes of the engine structures the scanner decodes. The
//! defaults match a stock UE5.5 Win64 shipping build.
//
// class UObject {
//   uint64_t vTable;        // +0x00
//   int32_t Flags;          // +0x08
//   int32_t InternalIndex;  // +0x0C
//   class UClass *Class;    // +0x10 - ClassPrivate
//   class FName Name;       // +0x18 - NamePrivate (ComparisonIndex + Number)
//   class UObject *Outer;   // +0x20
// }; // Size: 0x28
//
// class UStruct : public UField {
//   char pad_0030[16];      // +0x30
//   class UStruct *Super;   // +0x40
//   ...
// };
//
// FChunkedFixedUObjectArray {
//   FUObjectItem** Objects; // +0x00 - chunk pointer table
//   FUObjectItem* PreAlloc; // +0x08
//   int32 MaxElements;      // +0x10
//   int32 NumElements;      // +0x14
//   int32 MaxChunks;        // +0x18
//   int32 NumChunks;        // +0x1C
// };

use serde::{Deserialize, Serialize};

/// Lowest address treated as a real heap pointer
pub const MIN_VALID_POINTER: usize = 0x10000;

/// Highest user-space address on x86_64
pub const MAX_VALID_POINTER: usize = 0x800000000000;

/// Objects per GUObjectArray chunk
pub const GUOBJECTARRAY_CHUNK_SIZE: usize = 64 * 1024;

/// Check that a value read from a slot or field looks like a user-space pointer
pub fn is_valid_pointer(ptr: usize) -> bool {
    (MIN_VALID_POINTER..MAX_VALID_POINTER).contains(&ptr)
}

/// Engine-version-specific structure layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLayout {
    /// Absolute virtual address of GUObjectArray
    ///
    /// Not an offset: the CLI computes it as module base + `gobjects_offset`.
    pub gobjects: usize,
    /// Offset of the chunk pointer table (`Objects**`) in the array header
    pub chunk_table_offset: usize,
    /// Offset of `NumChunks` (i32) in the array header
    pub num_chunks_offset: usize,
    /// Slots per chunk
    pub chunk_capacity: usize,
    /// Stride of the chunk pointer table
    pub chunk_pointer_size: usize,
    /// Size of one FUObjectItem (16 for UE5.3+ without stats, 24 otherwise)
    pub item_size: usize,
    /// Offset of the UObject pointer inside an FUObjectItem
    pub item_object_offset: usize,
    /// UObjectBase::ClassPrivate
    pub object_class_offset: usize,
    /// UObjectBase::NamePrivate (ComparisonIndex)
    pub object_name_offset: usize,
    /// UStruct::SuperStruct
    pub struct_super_offset: usize,
    /// Sanity bound on NumChunks
    pub max_chunks: usize,
}

impl Default for EngineLayout {
    fn default() -> Self {
        Self {
            gobjects: 0,
            chunk_table_offset: 0x00,
            num_chunks_offset: 0x1C,
            chunk_capacity: GUOBJECTARRAY_CHUNK_SIZE,
            chunk_pointer_size: 8,
            item_size: 24,
            item_object_offset: 0x00,
            object_class_offset: 0x10,
            object_name_offset: 0x18,
            struct_super_offset: 0x40,
            max_chunks: 1024,
        }
    }
}

impl EngineLayout {
    /// Same layout with GUObjectArray at `address`
    pub fn with_gobjects(mut self, address: usize) -> Self {
        self.gobjects = address;
        self
    }

    /// Size of the array header that has to be read to get the descriptor
    pub fn header_size(&self) -> usize {
        (self.chunk_table_offset + 8).max(self.num_chunks_offset + 4)
    }

    /// Address of the pointer to chunk `chunk_index` in the chunk table,
    /// `None` on overflow
    pub fn chunk_pointer_address(
        &self,
        chunk_table: usize,
        chunk_index: usize,
    ) -> Option<usize> {
        chunk_index
            .checked_mul(self.chunk_pointer_size)
            .and_then(|offset| chunk_table.checked_add(offset))
    }

    /// Address of slot `slot_index` inside the chunk starting at `chunk_base`,
    /// `None` on overflow
    pub fn slot_address(&self, chunk_base: usize, slot_index: usize) -> Option<usize> {
        slot_index
            .checked_mul(self.item_size)
            .and_then(|offset| offset.checked_add(self.item_object_offset))
            .and_then(|offset| chunk_base.checked_add(offset))
    }
}
