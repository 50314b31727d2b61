// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryRange};
use crate::patch::PatchError;
use crate::pattern::ScanHit;
use crate::utils::bytes_to_string;
use std::fmt;

/// Bytes to place at an address. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    range: MemoryRange,
    bytes: Vec<u8>,
}

impl PatchOperation {
    pub fn new(address: Address, bytes: Vec<u8>) -> Result<Self, PatchError> {
        if bytes.is_empty() {
            return Err(PatchError::Empty);
        }
        let range = MemoryRange::new(address, bytes.len()).map_err(|_| PatchError::OutOfImage {
            address,
            len: bytes.len(),
        })?;
        Ok(Self { range, bytes })
    }

    /// A patch `offset` bytes past a scan hit.
    pub fn at_hit(hit: &ScanHit, offset: usize, bytes: Vec<u8>) -> Result<Self, PatchError> {
        let address = hit.relative(offset).ok_or(PatchError::OutOfImage {
            address: hit.address,
            len: bytes.len(),
        })?;
        Self::new(address, bytes)
    }

    /// Like [`PatchOperation::new`], but also requires the patch to fall inside `bounds`.
    pub fn within(bounds: MemoryRange, address: Address, bytes: Vec<u8>) -> Result<Self, PatchError> {
        let op = Self::new(address, bytes)?;
        if !bounds.contains_range(&op.range()) {
            return Err(PatchError::OutOfImage {
                address,
                len: op.len(),
            });
        }
        Ok(op)
    }

    pub fn address(&self) -> Address {
        self.range.start()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn range(&self) -> MemoryRange {
        self.range
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' @ {}", bytes_to_string(&self.bytes), self.range.start())
    }
}
