//! Remote object handles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of an object or class inside the observed process
///
/// Only meaningful as an argument to a [`MemorySource`](crate::MemorySource).
/// The remote process owns the object, so a handle may dangle at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteHandle(pub usize);

impl RemoteHandle {
    pub const NULL: RemoteHandle = RemoteHandle(0);

    pub fn address(self) -> usize {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Address of a field `offset` bytes into the object
    ///
    /// `None` when the handle is garbage close enough to the top of the
    /// address space that the field address would overflow.
    pub fn field(self, offset: usize) -> Option<usize> {
        self.0.checked_add(offset)
    }
}

impl From<usize> for RemoteHandle {
    fn from(address: usize) -> Self {
        RemoteHandle(address)
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle() {
        assert!(RemoteHandle::NULL.is_null());
        assert!(RemoteHandle::default().is_null());
        assert!(!RemoteHandle(0x1000).is_null());
    }

    #[test]
    fn test_handle_display_and_field() {
        let h = RemoteHandle::from(0x2a0001000usize);
        assert_eq!(h.to_string(), "0x2a0001000");
        assert_eq!(h.field(0x18), Some(0x2a0001018));
    }

    #[test]
    fn test_field_of_garbage_handle_overflows_to_none() {
        assert_eq!(RemoteHandle(usize::MAX - 0x8).field(0x10), None);
        assert_eq!(RemoteHandle(usize::MAX).field(0), Some(usize::MAX));
    }
}
