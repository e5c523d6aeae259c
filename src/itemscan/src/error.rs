//! Error types for remote reads, name decoding, scanning and resolution.

use thiserror::Error;

use crate::catalog::BaseClass;

/// A single remote read failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("Read of {size} bytes at {address:#x} failed: {reason}")]
    Failed {
        address: usize,
        size: usize,
        reason: String,
    },

    #[error("Address {address:#x} (+{size} bytes) is outside any readable memory")]
    OutOfRange { address: usize, size: usize },
}

impl ReadError {
    pub fn failed(address: usize, size: usize, reason: impl Into<String>) -> Self {
        ReadError::Failed {
            address,
            size,
            reason: reason.into(),
        }
    }
}

/// An FName index could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("FName block {block} out of range (have {available} blocks)")]
    BlockOutOfRange { block: usize, available: usize },

    #[error("FName block {0} is null")]
    NullBlock(usize),

    #[error("Invalid FName length {len} at index {index}")]
    InvalidLength { index: u32, len: usize },

    #[error("FName index {0} not present in name table")]
    Unknown(u32),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// The object array could not be scanned at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Failed to read GUObjectArray header: {0}")]
    Descriptor(#[source] ReadError),

    #[error("GUObjectArray at {address:#x} is invalid: {reason}")]
    InvalidDescriptor { address: usize, reason: String },
}

/// A catalog could not be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog entry has an empty key")]
    EmptyKey,

    #[error("Catalog entry {0} has an empty name fragment")]
    EmptyFragment(String),

    #[error("Duplicate catalog key: {0}")]
    DuplicateKey(String),
}

/// Why an item category could not be resolved to an object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown item category: {0}")]
    UnknownCategory(String),

    #[error("No objects found for {category} (searched for '{fragment}')")]
    NoObjectsFound { category: String, fragment: String },

    #[error("{candidates} candidate(s) for {category}, none derive from {}", .base.class_name())]
    NoMatchingClass {
        category: String,
        base: BaseClass,
        candidates: usize,
    },

    #[error("Remote read failure: {0}")]
    RemoteReadFailure(#[from] ScanError),
}

impl ResolveError {
    /// Short stable identifier for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::UnknownCategory(_) => "UnknownCategory",
            ResolveError::NoObjectsFound { .. } => "NoObjectsFound",
            ResolveError::NoMatchingClass { .. } => "NoMatchingClass",
            ResolveError::RemoteReadFailure(_) => "RemoteReadFailure",
        }
    }
}
