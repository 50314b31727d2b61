// Fri Oct 16 2026 - Alex

use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: u32 {
        const READ = 1;
        const WRITE = 2;
        const EXECUTE = 4;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        const READ_EXECUTE = Self::READ.bits() | Self::EXECUTE.bits();
        const READ_WRITE_EXECUTE = Self::READ.bits() | Self::WRITE.bits() | Self::EXECUTE.bits();
    }
}

impl Protection {
    /// Parses the permission column of `/proc/<pid>/maps` (`r-xp`, `rw-s`, ...).
    pub fn from_maps_perms(perms: &str) -> Option<Self> {
        let bytes = perms.as_bytes();
        if bytes.len() < 3 {
            return None;
        }
        let mut prot = Self::empty();
        match bytes[0] {
            b'r' => prot |= Self::READ,
            b'-' => {}
            _ => return None,
        }
        match bytes[1] {
            b'w' => prot |= Self::WRITE,
            b'-' => {}
            _ => return None,
        }
        match bytes[2] {
            b'x' => prot |= Self::EXECUTE,
            b'-' => {}
            _ => return None,
        }
        Some(prot)
    }

    pub fn can_read(self) -> bool {
        self.contains(Self::READ)
    }

    pub fn can_write(self) -> bool {
        self.contains(Self::WRITE)
    }

    pub fn can_execute(self) -> bool {
        self.contains(Self::EXECUTE)
    }

    #[cfg(unix)]
    pub fn to_native(self) -> u32 {
        let mut flags = libc::PROT_NONE;
        if self.can_read() {
            flags |= libc::PROT_READ;
        }
        if self.can_write() {
            flags |= libc::PROT_WRITE;
        }
        if self.can_execute() {
            flags |= libc::PROT_EXEC;
        }
        flags as u32
    }

    #[cfg(windows)]
    pub fn to_native(self) -> u32 {
        use windows_sys::Win32::System::Memory::*;
        let r = self.can_read();
        let w = self.can_write();
        let x = self.can_execute();
        match (r, w, x) {
            (_, true, true) => PAGE_EXECUTE_READWRITE,
            (true, false, true) => PAGE_EXECUTE_READ,
            (false, false, true) => PAGE_EXECUTE,
            (_, true, false) => PAGE_READWRITE,
            (true, false, false) => PAGE_READONLY,
            (false, false, false) => PAGE_NOACCESS,
        }
    }

    #[cfg(windows)]
    pub fn from_native(flags: u32) -> Self {
        use windows_sys::Win32::System::Memory::*;
        match flags & 0xFF {
            PAGE_READONLY => Self::READ,
            PAGE_READWRITE | PAGE_WRITECOPY => Self::READ_WRITE,
            PAGE_EXECUTE => Self::EXECUTE,
            PAGE_EXECUTE_READ => Self::READ_EXECUTE,
            PAGE_EXECUTE_READWRITE | PAGE_EXECUTE_WRITECOPY => Self::READ_WRITE_EXECUTE,
            _ => Self::empty(),
        }
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.can_read() { 'r' } else { '-' },
            if self.can_write() { 'w' } else { '-' },
            if self.can_execute() { 'x' } else { '-' },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_maps_perms() {
        assert_eq!(Protection::from_maps_perms("r-xp"), Some(Protection::READ_EXECUTE));
        assert_eq!(Protection::from_maps_perms("rw-p"), Some(Protection::READ_WRITE));
        assert_eq!(Protection::from_maps_perms("---p"), Some(Protection::empty()));
        assert_eq!(Protection::from_maps_perms("rz"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Protection::READ_EXECUTE.to_string(), "r-x");
        assert_eq!(Protection::READ_WRITE_EXECUTE.to_string(), "rwx");
        assert_eq!(Protection::empty().to_string(), "---");
    }
}
