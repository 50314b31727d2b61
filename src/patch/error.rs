// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Patch is empty")]
    Empty,
    #[error("Patch of {len} bytes at {address} lies outside the module image")]
    OutOfImage { address: Address, len: usize },
    #[error("Failed to make {address} (+{len}) writable: {source}")]
    ProtectionChange {
        address: Address,
        len: usize,
        #[source]
        source: MemoryError,
    },
    #[error("Failed to write {len} bytes at {address}: {source}")]
    Write {
        address: Address,
        len: usize,
        #[source]
        source: MemoryError,
    },
    #[error("Bytes at {address} were written but the old protection could not be restored: {source}")]
    ProtectionRestore {
        address: Address,
        #[source]
        source: MemoryError,
    },
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}

impl PatchError {
    /// Whether the target bytes may have changed despite the error.
    pub fn bytes_written(&self) -> bool {
        matches!(self, Self::ProtectionRestore { .. })
    }
}
