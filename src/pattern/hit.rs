// Fri Oct 16 2026 - Alex

use crate::memory::Address;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScanHit {
    pub address: Address,
    /// Distance from the image base, for logging and for mapping back to a file.
    pub offset: usize,
}

impl ScanHit {
    pub fn new(address: Address, offset: usize) -> Self {
        Self { address, offset }
    }

    pub fn relative(&self, delta: usize) -> Option<Address> {
        self.address.checked_add(delta)
    }
}

impl fmt::Display for ScanHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+0x{:x})", self.address, self.offset)
    }
}
