//! Class lineage checks
//!
//! Walks `ClassPrivate` then `SuperStruct` links and compares class names.

use serde::Serialize;
use tracing::trace;

use crate::fname::NameResolver;
use crate::handle::RemoteHandle;
use crate::layout::EngineLayout;
use crate::source::MemorySource;

/// Deepest class chain walked before giving up
///
/// Real UE5 hierarchies are well under 20 deep; anything past this is a cycle
/// or garbage.
pub const MAX_CLASS_DEPTH: usize = 64;

/// One link of a class chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRecord {
    pub handle: RemoteHandle,
    pub name: String,
    /// Null at the root of the hierarchy
    pub super_handle: RemoteHandle,
}

pub struct ClassMatcher<'a> {
    source: &'a dyn MemorySource,
    names: &'a dyn NameResolver,
    layout: &'a EngineLayout,
}

impl<'a> ClassMatcher<'a> {
    pub fn new(
        source: &'a dyn MemorySource,
        names: &'a dyn NameResolver,
        layout: &'a EngineLayout,
    ) -> Self {
        Self {
            source,
            names,
            layout,
        }
    }

    /// Whether any class in the object's chain is named `class_name`
    /// (`exact`) or contains it
    ///
    /// Fails closed: a null handle, an unreadable link, an unresolvable name
    /// or a chain deeper than [`MAX_CLASS_DEPTH`] all yield `false`.
    pub fn is_a(&self, handle: RemoteHandle, class_name: &str, exact: bool) -> bool {
        if handle.is_null() {
            return false;
        }

        let mut current = match self.read_handle(handle, self.layout.object_class_offset) {
            Some(class) => class,
            None => return false,
        };

        for _ in 0..MAX_CLASS_DEPTH {
            if current.is_null() {
                return false;
            }

            let Some(name) = self.class_name(current) else {
                return false;
            };

            let matched = if exact {
                name == class_name
            } else {
                name.contains(class_name)
            };
            if matched {
                return true;
            }

            current = match self.read_handle(current, self.layout.struct_super_offset) {
                Some(parent) => parent,
                None => return false,
            };
        }

        trace!(
            "class chain of {} exceeded {} links, treating as no match",
            handle,
            MAX_CLASS_DEPTH
        );
        false
    }

    /// The object's class chain, immediate class first
    ///
    /// Stops early at the first unreadable link and never returns more than
    /// [`MAX_CLASS_DEPTH`] entries. Unresolvable names are left empty.
    pub fn class_chain(&self, handle: RemoteHandle) -> Vec<ClassRecord> {
        let mut chain = Vec::new();
        if handle.is_null() {
            return chain;
        }

        let Some(mut current) = self.read_handle(handle, self.layout.object_class_offset) else {
            return chain;
        };

        while !current.is_null() && chain.len() < MAX_CLASS_DEPTH {
            let name = self.class_name(current).unwrap_or_default();
            let super_handle = self
                .read_handle(current, self.layout.struct_super_offset)
                .unwrap_or(RemoteHandle::NULL);

            chain.push(ClassRecord {
                handle: current,
                name,
                super_handle,
            });
            current = super_handle;
        }

        chain
    }

    fn class_name(&self, class: RemoteHandle) -> Option<String> {
        let address = class.field(self.layout.object_name_offset)?;
        let index = self.source.read_u32(address).ok()?;
        self.names.resolve_name(self.source, index).ok()
    }

    fn read_handle(&self, handle: RemoteHandle, offset: usize) -> Option<RemoteHandle> {
        let address = handle.field(offset)?;
        self.source.read_ptr(address).ok().map(RemoteHandle)
    }
}
