// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRange, ModuleImage, Protection};
use std::path::Path;

/// Protection state of one piece of a range, as it was before a change.
/// `native` is the OS value so restores are exact even where [`Protection`]
/// cannot express it (copy-on-write pages, guard flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedProtection {
    pub range: MemoryRange,
    pub protection: Protection,
    pub native: u32,
}

pub type ProtectionSnapshot = Vec<SavedProtection>;

pub trait MemoryReader {
    fn image(&self) -> ModuleImage<'_>;

    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        self.image().read(addr, len).map(|bytes| bytes.to_vec())
    }

    /// Where the module was loaded from, when the backend knows.
    fn module_path(&self) -> Option<&Path> {
        None
    }
}

pub trait MemoryWriter {
    fn write_bytes(&mut self, addr: Address, data: &[u8]) -> Result<(), MemoryError>;
}

pub trait MemoryProtector {
    /// Sets `protection` on the pages covering `range` and returns what was
    /// there before. On failure nothing is left changed.
    fn protect(&mut self, range: MemoryRange, protection: Protection) -> Result<ProtectionSnapshot, MemoryError>;

    fn restore(&mut self, snapshot: &[SavedProtection]) -> Result<(), MemoryError>;
}

/// Everything the patch applier needs from a memory backend.
pub trait PatchMemory: MemoryReader + MemoryWriter + MemoryProtector {}

impl<T: MemoryReader + MemoryWriter + MemoryProtector> PatchMemory for T {}
