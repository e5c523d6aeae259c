//! Synthetic UE5 object graphs for unit tests
//!
//! `WorldBuilder` lays out a GUObjectArray header, its chunk table, the
//! chunks, UObject/UClass headers and a single FName block inside a
//! `MockMemorySource`.

use crate::fname::{FNamePool, FNameReader};
use crate::handle::RemoteHandle;
use crate::layout::EngineLayout;
use crate::source::tests::MockMemorySource;

pub const GOBJECTS: usize = 0x140000000;
pub const CHUNK_TABLE: usize = 0x150000000;
pub const CHUNK_BASE: usize = 0x160000000;
pub const OBJECT_BASE: usize = 0x200000000;
pub const NAME_BLOCK: usize = 0x300000000;

const CHUNK_STRIDE: usize = 0x10000;
const OBJECT_SIZE: usize = 0x100;
const NAME_BLOCK_SIZE: usize = 0x10000;
const MAX_TEST_CHUNKS: usize = 64;

pub struct World {
    pub source: MockMemorySource,
    pub names: FNameReader,
    pub layout: EngineLayout,
}

pub struct WorldBuilder {
    source: MockMemorySource,
    layout: EngineLayout,
    name_cursor: usize,
    next_object: usize,
    /// Slot contents per chunk; `None` marks a null chunk pointer
    chunks: Vec<Option<Vec<usize>>>,
}

impl WorldBuilder {
    /// A world whose chunks hold `capacity` slots each
    pub fn new(capacity: usize) -> Self {
        let layout = EngineLayout {
            chunk_capacity: capacity,
            ..EngineLayout::default()
        }
        .with_gobjects(GOBJECTS);

        let mut source = MockMemorySource::empty();
        source
            .add_segment(GOBJECTS, 0x40)
            .add_segment(CHUNK_TABLE, MAX_TEST_CHUNKS * 8)
            .add_segment(NAME_BLOCK, NAME_BLOCK_SIZE);

        let mut builder = Self {
            source,
            layout,
            name_cursor: 0,
            next_object: OBJECT_BASE,
            chunks: Vec::new(),
        };
        builder.name("None");
        builder
    }

    /// Append an ANSI entry to the name block and return its FName index
    pub fn name(&mut self, name: &str) -> u32 {
        let offset = self.name_cursor;
        let header = ((name.len() as u16) << 6).to_le_bytes();
        self.source
            .put_bytes(NAME_BLOCK + offset, &header)
            .put_bytes(NAME_BLOCK + offset + 2, name.as_bytes());
        self.name_cursor += (2 + name.len() + 1) & !1;
        (offset / 2) as u32
    }

    /// Allocate a UObject header with the given name and class
    pub fn object(&mut self, name: &str, class: RemoteHandle) -> RemoteHandle {
        let index = self.name(name);
        let addr = self.next_object;
        self.next_object += OBJECT_SIZE;

        self.source
            .add_segment(addr, OBJECT_SIZE)
            .put_u64(addr + self.layout.object_class_offset, class.address() as u64)
            .put_u32(addr + self.layout.object_name_offset, index);
        RemoteHandle(addr)
    }

    /// Allocate a UClass whose SuperStruct is `parent`
    pub fn class(&mut self, name: &str, parent: Option<RemoteHandle>) -> RemoteHandle {
        let handle = self.object(name, RemoteHandle::NULL);
        let super_ptr = parent.unwrap_or(RemoteHandle::NULL).address() as u64;
        self.source
            .put_u64(handle.address() + self.layout.struct_super_offset, super_ptr);
        handle
    }

    /// Allocate a chain of classes, root first, returning the most derived
    pub fn class_chain(&mut self, names: &[&str]) -> RemoteHandle {
        let mut parent = None;
        for name in names {
            parent = Some(self.class(name, parent));
        }
        parent.unwrap_or(RemoteHandle::NULL)
    }

    /// Store `handle` in the next free slot of the last chunk, opening a new
    /// chunk when it is full
    pub fn push(&mut self, handle: RemoteHandle) -> &mut Self {
        let capacity = self.layout.chunk_capacity;
        let needs_chunk = match self.chunks.last() {
            Some(Some(slots)) => slots.len() >= capacity,
            _ => true,
        };
        if needs_chunk {
            self.chunks.push(Some(Vec::new()));
        }
        if let Some(Some(slots)) = self.chunks.last_mut() {
            slots.push(handle.address());
        }
        self
    }

    /// Store a null slot
    pub fn push_empty(&mut self) -> &mut Self {
        self.push(RemoteHandle::NULL)
    }

    /// Append a chunk whose pointer in the chunk table is null
    pub fn null_chunk(&mut self) -> &mut Self {
        self.chunks.push(None);
        self
    }

    /// Mutable access to the underlying memory (for poisoning ranges)
    pub fn source_mut(&mut self) -> &mut MockMemorySource {
        &mut self.source
    }

    pub fn layout(&self) -> &EngineLayout {
        &self.layout
    }

    pub fn build(mut self) -> World {
        let layout = self.layout.clone();
        let chunk_bytes = layout.chunk_capacity * layout.item_size;

        self.source
            .put_u64(GOBJECTS + layout.chunk_table_offset, CHUNK_TABLE as u64)
            .put_i32(
                GOBJECTS + layout.num_chunks_offset,
                self.chunks.len() as i32,
            );

        for (i, chunk) in self.chunks.iter().enumerate() {
            let Some(slots) = chunk else {
                continue;
            };
            let base = chunk_address(i);
            self.source.add_segment(base, chunk_bytes.max(8));
            self.source
                .put_u64(CHUNK_TABLE + i * layout.chunk_pointer_size, base as u64);
            for (slot, &handle) in slots.iter().enumerate() {
                let at = base + slot * layout.item_size + layout.item_object_offset;
                self.source.put_u64(at, handle as u64);
            }
        }

        let names = FNameReader::new(FNamePool {
            header_addr: 0,
            current_block: 0,
            current_cursor: self.name_cursor as u32,
            blocks: vec![NAME_BLOCK],
        });

        World {
            source: self.source,
            names,
            layout,
        }
    }
}

/// Base address of test chunk `index`
pub fn chunk_address(index: usize) -> usize {
    CHUNK_BASE + index * CHUNK_STRIDE
}
