// Fri Oct 16 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryProtector, MemoryRange, MemoryReader, MemoryWriter, ModuleImage,
    Protection, ProtectionSnapshot, SavedProtection,
};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const BUFFER_PAGE_SIZE: usize = 0x1000;

struct Page {
    range: MemoryRange,
    protection: Protection,
    locked: bool,
}

/// A byte buffer posing as a mapped module, with page protections enforced on
/// writes. Stands in for host memory when patching files or testing.
///
/// Pages start out `r-x`, like a loaded code section.
pub struct BufferMemory {
    data: Vec<u8>,
    range: MemoryRange,
    pages: Vec<Page>,
    fail_restore: bool,
    path: Option<PathBuf>,
}

impl BufferMemory {
    pub fn new(base: Address, data: Vec<u8>) -> Result<Self, MemoryError> {
        if !base.is_aligned(BUFFER_PAGE_SIZE) {
            return Err(MemoryError::InvalidRange(format!("base {} is not page aligned", base)));
        }
        let range = MemoryRange::new(base, data.len())?;

        let mut pages = Vec::with_capacity(data.len().div_ceil(BUFFER_PAGE_SIZE));
        let mut offset = 0;
        while offset < data.len() {
            let len = BUFFER_PAGE_SIZE.min(data.len() - offset);
            pages.push(Page {
                range: MemoryRange::new(base + offset, len)?,
                protection: Protection::READ_EXECUTE,
                locked: false,
            });
            offset += BUFFER_PAGE_SIZE;
        }

        Ok(Self {
            data,
            range,
            pages,
            fail_restore: false,
            path: None,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P, base: Address) -> Result<Self, MemoryError> {
        let data = fs::read(path.as_ref())?;
        let mut memory = Self::new(base, data)?;
        memory.path = Some(path.as_ref().to_path_buf());
        Ok(memory)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn page_protection(&self, addr: Address) -> Option<Protection> {
        self.page_index(addr).map(|i| self.pages[i].protection)
    }

    /// Makes every protection change touching `range` fail, the way pages the
    /// OS refuses to alter would.
    pub fn lock_pages(&mut self, range: MemoryRange) -> Result<(), MemoryError> {
        for page in self.pages_in(&range)? {
            self.pages[page].locked = true;
        }
        Ok(())
    }

    pub fn set_fail_restore(&mut self, fail: bool) {
        self.fail_restore = fail;
    }

    fn page_index(&self, addr: Address) -> Option<usize> {
        if !self.range.contains(addr) {
            return None;
        }
        addr.offset_from(self.range.start()).map(|off| off / BUFFER_PAGE_SIZE)
    }

    fn pages_in(&self, range: &MemoryRange) -> Result<Range<usize>, MemoryError> {
        if !self.range.contains_range(range) {
            let outside = if self.range.contains(range.start()) {
                self.range.end()
            } else {
                range.start()
            };
            return Err(MemoryError::Unmapped(outside.as_usize()));
        }
        let first = (range.start().as_usize() - self.range.start().as_usize()) / BUFFER_PAGE_SIZE;
        let last = (range.end().as_usize() - 1 - self.range.start().as_usize()) / BUFFER_PAGE_SIZE;
        Ok(first..last + 1)
    }
}

impl MemoryReader for BufferMemory {
    fn image(&self) -> ModuleImage<'_> {
        ModuleImage::from_validated(self.range, &self.data)
    }

    fn module_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl MemoryWriter for BufferMemory {
    fn write_bytes(&mut self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let range = MemoryRange::new(addr, data.len())?;
        let pages = self.pages_in(&range)?;
        if let Some(page) = pages.into_iter().find(|&p| !self.pages[p].protection.can_write()) {
            let denied = range.start().max(self.pages[page].range.start());
            return Err(MemoryError::AccessViolation(denied.as_usize()));
        }
        let offset = addr.as_usize() - self.range.start().as_usize();
        self.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl MemoryProtector for BufferMemory {
    fn protect(&mut self, range: MemoryRange, protection: Protection) -> Result<ProtectionSnapshot, MemoryError> {
        let pages = self.pages_in(&range)?;
        if pages.clone().any(|p| self.pages[p].locked) {
            return Err(MemoryError::ProtectFailed {
                address: range.start().as_usize(),
                len: range.len(),
                reason: "page is locked".to_string(),
            });
        }
        let snapshot = pages
            .clone()
            .map(|p| SavedProtection {
                range: self.pages[p].range,
                protection: self.pages[p].protection,
                native: self.pages[p].protection.bits(),
            })
            .collect();
        for p in pages {
            self.pages[p].protection = protection;
        }
        Ok(snapshot)
    }

    fn restore(&mut self, snapshot: &[SavedProtection]) -> Result<(), MemoryError> {
        if self.fail_restore {
            let (address, len) = snapshot
                .first()
                .map(|s| (s.range.start().as_usize(), s.range.len()))
                .unwrap_or((self.range.start().as_usize(), 0));
            return Err(MemoryError::ProtectFailed {
                address,
                len,
                reason: "restore refused".to_string(),
            });
        }
        for saved in snapshot {
            for p in self.pages_in(&saved.range)? {
                self.pages[p].protection = saved.protection;
            }
        }
        Ok(())
    }
}
