// Fri Oct 16 2026 - Alex

//! The current process's own memory, as seen by code injected into it.

use crate::memory::{
    pe, Address, MemoryError, MemoryProtector, MemoryRange, MemoryReader, MemoryWriter, ModuleImage,
    Protection, ProtectionSnapshot, SavedProtection,
};
use std::path::{Path, PathBuf};

/// Bytes read from the module base when looking for the PE headers.
const HEADER_PROBE_SIZE: usize = 0x1000;

pub struct ProcessMemory {
    range: MemoryRange,
    path: Option<PathBuf>,
}

impl ProcessMemory {
    /// # Safety
    ///
    /// `[base, base + size)` must stay mapped and readable for the lifetime of
    /// the returned value.
    pub unsafe fn new(base: Address, size: usize) -> Result<Self, MemoryError> {
        ModuleImage::from_raw(base, size)?;
        Ok(Self {
            range: MemoryRange::new(base, size)?,
            path: None,
        })
    }

    /// Sizes the module at `base` from its own `SizeOfImage` header field.
    ///
    /// # Safety
    ///
    /// `base` must be the load address of a PE image mapped in this process,
    /// and the image must stay mapped for the lifetime of the returned value.
    pub unsafe fn from_module_base(base: Address) -> Result<Self, MemoryError> {
        let header = ModuleImage::from_raw(base, HEADER_PROBE_SIZE)?;
        let size = pe::image_size(header.bytes())?;
        log::debug!("module at {} reports SizeOfImage 0x{:x}", base, size);
        Self::new(base, size)
    }

    /// The main executable of the current process.
    #[cfg(windows)]
    pub fn main_module() -> Result<Self, MemoryError> {
        use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
        let handle = unsafe { GetModuleHandleW(std::ptr::null()) };
        if handle.is_null() {
            return Err(MemoryError::Io(std::io::Error::last_os_error()));
        }
        // the loader keeps the main module mapped for the life of the process
        let mut memory = unsafe { Self::from_module_base(Address::from_ptr(handle as *const u8))? };
        memory.path = module_file_name(handle);
        Ok(memory)
    }

    pub fn base(&self) -> Address {
        self.range.start()
    }

    pub fn size(&self) -> usize {
        self.range.len()
    }
}

impl MemoryReader for ProcessMemory {
    fn image(&self) -> ModuleImage<'_> {
        // SAFETY: the range was asserted readable for our lifetime in `new`
        let bytes = unsafe { std::slice::from_raw_parts(self.range.start().as_ptr(), self.range.len()) };
        ModuleImage::from_validated(self.range, bytes)
    }
    fn module_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(windows)]
fn module_file_name(handle: windows_sys::Win32::Foundation::HMODULE) -> Option<PathBuf> {
    use std::os::windows::ffi::OsStringExt;
    use windows_sys::Win32::System::LibraryLoader::GetModuleFileNameW;

    let mut buf = vec![0u16; 1024];
    let len = unsafe { GetModuleFileNameW(handle, buf.as_mut_ptr(), buf.len() as u32) } as usize;
    // zero is failure, a full buffer is truncation
    if len == 0 || len >= buf.len() {
        return None;
    }
    Some(PathBuf::from(std::ffi::OsString::from_wide(&buf[..len])))
}

impl MemoryWriter for ProcessMemory {
    /// Writes straight into the module. The caller must have made the pages
    /// writable and must ensure no thread is executing the bytes being
    /// replaced; nothing here can synchronize with host threads.
    fn write_bytes(&mut self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let target = MemoryRange::new(addr, data.len())?;
        if !self.range.contains_range(&target) {
            return Err(MemoryError::OutOfBounds(addr.as_usize()));
        }
        // SAFETY: inside the module range, which is mapped; writability is
        // the caller's protection change
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), addr.as_mut_ptr(), data.len());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        0x1000
    }
}

#[cfg(unix)]
fn mprotect(range: &MemoryRange, native: u32) -> Result<(), MemoryError> {
    let result = unsafe {
        libc::mprotect(
            range.start().as_mut_ptr() as *mut libc::c_void,
            range.len(),
            native as libc::c_int,
        )
    };
    if result != 0 {
        return Err(MemoryError::ProtectFailed {
            address: range.start().as_usize(),
            len: range.len(),
            reason: std::io::Error::last_os_error().to_string(),
        });
    }
    Ok(())
}

#[cfg(unix)]
impl MemoryProtector for ProcessMemory {
    fn protect(&mut self, range: MemoryRange, protection: Protection) -> Result<ProtectionSnapshot, MemoryError> {
        use crate::memory::region::{covering_protections, MemoryRegion};

        let cover = range.page_cover(page_size());
        let maps = std::fs::read_to_string("/proc/self/maps")?;
        let regions = MemoryRegion::parse_maps(&maps);
        let pieces = covering_protections(&regions, &cover)
            .map_err(|hole| MemoryError::Unmapped(hole.as_usize()))?;

        let snapshot: ProtectionSnapshot = pieces
            .into_iter()
            .map(|(range, protection)| SavedProtection {
                range,
                protection,
                native: protection.to_native(),
            })
            .collect();

        if let Err(e) = mprotect(&cover, protection.to_native()) {
            // a failed mprotect may still have changed a prefix of the range
            if let Err(restore_err) = self.restore(&snapshot) {
                log::warn!("could not undo partial protection change on {}: {}", cover, restore_err);
            }
            return Err(e);
        }
        Ok(snapshot)
    }

    fn restore(&mut self, snapshot: &[SavedProtection]) -> Result<(), MemoryError> {
        let mut first_error = None;
        for saved in snapshot {
            if let Err(e) = mprotect(&saved.range, saved.native) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(windows)]
const WINDOWS_PAGE_SIZE: usize = 0x1000;

/// The committed region holding `addr`, with its current protection.
#[cfg(windows)]
fn query_region(addr: Address) -> Option<SavedProtection> {
    use windows_sys::Win32::System::Memory::{VirtualQuery, MEMORY_BASIC_INFORMATION, MEM_COMMIT};

    // SAFETY: MEMORY_BASIC_INFORMATION is plain data; VirtualQuery fills it
    let mut info: MEMORY_BASIC_INFORMATION = unsafe { std::mem::zeroed() };
    let written = unsafe {
        VirtualQuery(
            addr.as_ptr() as *const core::ffi::c_void,
            &mut info,
            std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
        )
    };
    if written == 0 || info.State != MEM_COMMIT {
        return None;
    }
    let range = MemoryRange::new(Address::from_ptr(info.BaseAddress as *const u8), info.RegionSize).ok()?;
    Some(SavedProtection {
        range,
        protection: Protection::from_native(info.Protect),
        native: info.Protect,
    })
}

#[cfg(windows)]
fn virtual_protect(range: &MemoryRange, native: u32) -> Result<(), MemoryError> {
    use windows_sys::Win32::System::Memory::VirtualProtect;

    let mut old = 0u32;
    let ok = unsafe {
        VirtualProtect(
            range.start().as_ptr() as *const core::ffi::c_void,
            range.len(),
            native,
            &mut old,
        )
    };
    if ok == 0 {
        return Err(MemoryError::ProtectFailed {
            address: range.start().as_usize(),
            len: range.len(),
            reason: std::io::Error::last_os_error().to_string(),
        });
    }
    Ok(())
}

#[cfg(windows)]
impl MemoryProtector for ProcessMemory {
    fn protect(&mut self, range: MemoryRange, protection: Protection) -> Result<ProtectionSnapshot, MemoryError> {
        use crate::memory::region::walk_protections;

        // VirtualProtect reports only the first page's old value, so every
        // region is read before anything changes.
        let cover = range.page_cover(WINDOWS_PAGE_SIZE);
        let snapshot =
            walk_protections(&cover, query_region).map_err(|hole| MemoryError::Unmapped(hole.as_usize()))?;

        if let Err(e) = virtual_protect(&cover, protection.to_native()) {
            if let Err(restore_err) = self.restore(&snapshot) {
                log::warn!("could not undo partial protection change on {}: {}", cover, restore_err);
            }
            return Err(e);
        }
        Ok(snapshot)
    }

    fn restore(&mut self, snapshot: &[SavedProtection]) -> Result<(), MemoryError> {
        let mut first_error = None;
        for saved in snapshot {
            if let Err(e) = virtual_protect(&saved.range, saved.native) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use crate::memory::region::MemoryRegion;

    /// One anonymous read-execute page owned by the test.
    struct ExecPage {
        ptr: *mut libc::c_void,
        len: usize,
    }

    impl ExecPage {
        fn new(fill: &[u8]) -> Self {
            let len = page_size();
            let ptr = unsafe {
                libc::mmap(
                    std::ptr::null_mut(),
                    len,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };
            assert_ne!(ptr, libc::MAP_FAILED);
            unsafe {
                std::ptr::copy_nonoverlapping(fill.as_ptr(), ptr as *mut u8, fill.len());
                assert_eq!(libc::mprotect(ptr, len, libc::PROT_READ | libc::PROT_EXEC), 0);
            }
            Self { ptr, len }
        }

        fn base(&self) -> Address {
            Address::from_ptr(self.ptr as *const u8)
        }
    }

    impl Drop for ExecPage {
        fn drop(&mut self) {
            unsafe {
                libc::munmap(self.ptr, self.len);
            }
        }
    }

    fn current_protection(addr: Address) -> Option<Protection> {
        let maps = std::fs::read_to_string("/proc/self/maps").unwrap();
        MemoryRegion::parse_maps(&maps)
            .into_iter()
            .find(|r| r.contains(addr))
            .map(|r| r.protection())
    }

    #[test]
    fn test_protect_write_restore_on_live_page() {
        let page = ExecPage::new(&[0x11, 0x22, 0x39, 0x8E, 0xE3, 0x3F, 0x00, 0x01]);
        let mut mem = unsafe { ProcessMemory::new(page.base(), page.len) }.unwrap();

        let target = MemoryRange::new(page.base() + 2, 4).unwrap();
        let snapshot = mem.protect(target, Protection::READ_WRITE_EXECUTE).unwrap();
        assert_eq!(snapshot[0].protection, Protection::READ_EXECUTE);

        mem.write_bytes(page.base() + 2, &[0x39, 0x8E, 0x63, 0x40]).unwrap();
        mem.restore(&snapshot).unwrap();

        assert_eq!(&mem.image().bytes()[..8], &[0x11, 0x22, 0x39, 0x8E, 0x63, 0x40, 0x00, 0x01]);
        assert_eq!(current_protection(page.base()), Some(Protection::READ_EXECUTE));
    }

    #[test]
    fn test_fixes_on_live_page() {
        use crate::config::{FixConfig, Resolution};
        use crate::display::FixedDisplay;
        use crate::fixes::{run_fixes, FixOutcome, RecordingObserver};
        use crate::hook::{InterceptionAdapter, RecordingFacility};

        let page = ExecPage::new(&[0x11, 0x22, 0x39, 0x8E, 0xE3, 0x3F, 0x00, 0x01]);
        let mut mem = unsafe { ProcessMemory::new(page.base(), page.len) }.unwrap();
        let hooks = InterceptionAdapter::new(RecordingFacility::new());
        let report = run_fixes(
            &FixConfig::default(),
            &FixedDisplay(Resolution::new(5120, 1440)),
            &mut mem,
            &hooks,
            &RecordingObserver::new(),
        );

        assert!(matches!(report.outcome("resolution"), Some(FixOutcome::Patched { sites: 1 })));
        assert!(matches!(report.outcome("pillarbox"), Some(FixOutcome::NotFound)));
        assert_eq!(&mem.image().bytes()[..8], &[0x11, 0x22, 0x39, 0x8E, 0x63, 0x40, 0x00, 0x01]);
        assert_eq!(current_protection(page.base()), Some(Protection::READ_EXECUTE));
    }

    #[test]
    fn test_write_outside_module_is_rejected() {
        let page = ExecPage::new(&[0u8; 4]);
        let mut mem = unsafe { ProcessMemory::new(page.base(), 4) }.unwrap();
        assert!(mem.write_bytes(page.base() + 2, &[0u8; 4]).is_err());
    }
}
