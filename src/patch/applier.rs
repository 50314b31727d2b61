// Fri Oct 16 2026 - Alex

use crate::memory::{Address, PatchMemory, Protection};
use crate::patch::{PatchError, PatchOperation};
use crate::utils::bytes_to_string;
use log::{debug, warn};

/// The bytes a patch replaced, so it can be undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    pub address: Address,
    pub original: Vec<u8>,
    pub patched: Vec<u8>,
}

/// Writes patches into executable memory.
///
/// Each write relaxes the protection of the pages it touches to `rwx`, copies
/// the bytes, then puts the old protection back. The sequence is not atomic
/// with respect to other threads: callers must only patch code that no thread
/// is executing at the time, such as cold paths right after the module loads.
pub struct PatchApplier<'m, M: PatchMemory + ?Sized> {
    memory: &'m mut M,
}

impl<'m, M: PatchMemory + ?Sized> PatchApplier<'m, M> {
    pub fn new(memory: &'m mut M) -> Self {
        Self { memory }
    }

    pub fn memory(&self) -> &M {
        self.memory
    }

    /// Applying the same operation twice leaves memory as applying it once.
    pub fn apply(&mut self, op: &PatchOperation) -> Result<(), PatchError> {
        let range = op.range();
        if !self.memory.image().range().contains_range(&range) {
            return Err(PatchError::OutOfImage {
                address: op.address(),
                len: op.len(),
            });
        }

        let snapshot = self
            .memory
            .protect(range, Protection::READ_WRITE_EXECUTE)
            .map_err(|source| PatchError::ProtectionChange {
                address: op.address(),
                len: op.len(),
                source,
            })?;

        if let Err(source) = self.memory.write_bytes(op.address(), op.bytes()) {
            if let Err(e) = self.memory.restore(&snapshot) {
                warn!("Failed to restore protection at {} after a failed write: {}", op.address(), e);
            }
            return Err(PatchError::Write {
                address: op.address(),
                len: op.len(),
                source,
            });
        }

        self.memory
            .restore(&snapshot)
            .map_err(|source| PatchError::ProtectionRestore {
                address: op.address(),
                source,
            })?;

        debug!("Wrote '{}' at {}", bytes_to_string(op.bytes()), op.address());
        Ok(())
    }

    pub fn apply_with_backup(&mut self, op: &PatchOperation) -> Result<PatchRecord, PatchError> {
        let original = self.memory.read_bytes(op.address(), op.len()).map_err(|_| {
            PatchError::OutOfImage {
                address: op.address(),
                len: op.len(),
            }
        })?;
        self.apply(op)?;
        Ok(PatchRecord {
            address: op.address(),
            original,
            patched: op.bytes().to_vec(),
        })
    }

    pub fn revert(&mut self, record: &PatchRecord) -> Result<(), PatchError> {
        let op = PatchOperation::new(record.address, record.original.clone())?;
        self.apply(&op)
    }
}
