// Fri Oct 16 2026 - Alex

//! Read-only view over a mapped executable image.
//!
//! A [`ModuleImage`] pairs the address the image lives at with the bytes
//! found there. Every bounds decision the engine makes is taken against this
//! view, so the only place an arbitrary `(address, length)` is trusted is
//! [`ModuleImage::from_raw`].

use crate::memory::{Address, MemoryError, MemoryRange};

#[derive(Debug, Clone, Copy)]
pub struct ModuleImage<'a> {
    range: MemoryRange,
    bytes: &'a [u8],
}

impl<'a> ModuleImage<'a> {
    /// Wraps `bytes` as if they were mapped at `base`. The base is logical:
    /// it need not match where `bytes` lives, which lets synthetic buffers and
    /// file contents stand in for a loaded module.
    pub fn new(base: Address, bytes: &'a [u8]) -> Result<Self, MemoryError> {
        let range = MemoryRange::new(base, bytes.len())?;
        Ok(Self { range, bytes })
    }

    pub(crate) fn from_validated(range: MemoryRange, bytes: &'a [u8]) -> Self {
        debug_assert_eq!(range.len(), bytes.len());
        Self { range, bytes }
    }

    /// Views `size` bytes of live process memory starting at `base`.
    ///
    /// # Safety
    ///
    /// `[base, base + size)` must be mapped and readable for all of `'a`, and
    /// must not be unmapped or remapped while the view (or any hit derived
    /// from it) is in use.
    pub unsafe fn from_raw(base: Address, size: usize) -> Result<Self, MemoryError> {
        if base.is_null() {
            return Err(MemoryError::InvalidRange("null image base".to_string()));
        }
        let range = MemoryRange::new(base, size)?;
        let bytes = std::slice::from_raw_parts(base.as_ptr(), size);
        Ok(Self { range, bytes })
    }

    pub fn base(&self) -> Address {
        self.range.start()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn range(&self) -> MemoryRange {
        self.range
    }

    pub fn offset_of(&self, addr: Address) -> Option<usize> {
        addr.offset_from(self.range.start()).filter(|&off| off < self.bytes.len())
    }

    pub fn read(&self, addr: Address, len: usize) -> Result<&'a [u8], MemoryError> {
        let start = self
            .offset_of(addr)
            .ok_or(MemoryError::OutOfBounds(addr.as_usize()))?;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(MemoryError::OutOfBounds(addr.as_usize().saturating_add(len)))?;
        Ok(&self.bytes[start..end])
    }
}
