// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryError};
use std::fmt;

/// Half-open range `[start, start + len)`. Never empty and never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRange {
    start: Address,
    len: usize,
}

impl MemoryRange {
    pub fn new(start: Address, len: usize) -> Result<Self, MemoryError> {
        if len == 0 {
            return Err(MemoryError::InvalidRange(format!("empty range at {}", start)));
        }
        if start.checked_add(len).is_none() {
            return Err(MemoryError::InvalidRange(format!(
                "range at {} with length 0x{:x} overflows the address space",
                start, len
            )));
        }
        Ok(Self { start, len })
    }

    pub fn from_bounds(start: Address, end: Address) -> Result<Self, MemoryError> {
        match end.offset_from(start) {
            Some(len) => Self::new(start, len),
            None => Err(MemoryError::InvalidRange(format!("end {} below start {}", end, start))),
        }
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.start + self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr < self.end()
    }

    pub fn contains_range(&self, other: &Self) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        if start < end {
            Self::from_bounds(start, end).ok()
        } else {
            None
        }
    }

    /// Smallest page-aligned range covering `self`.
    pub fn page_cover(&self, page_size: usize) -> Self {
        let start = self.start.align_down(page_size);
        let end = self.end().align_up(page_size);
        Self {
            start,
            len: end.as_usize() - start.as_usize(),
        }
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, len: usize) -> MemoryRange {
        MemoryRange::new(Address::new(start), len).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_wrapping() {
        assert!(MemoryRange::new(Address::new(0x1000), 0).is_err());
        assert!(MemoryRange::new(Address::new(usize::MAX - 1), 4).is_err());
    }

    #[test]
    fn test_contains_and_overlaps() {
        let r = range(0x1000, 0x100);
        assert!(r.contains(Address::new(0x1000)));
        assert!(r.contains(Address::new(0x10FF)));
        assert!(!r.contains(Address::new(0x1100)));
        assert!(r.contains_range(&range(0x1010, 0x10)));
        assert!(!r.contains_range(&range(0x10F0, 0x20)));
        assert!(r.overlaps(&range(0x10FF, 1)));
        assert!(!r.overlaps(&range(0x1100, 1)));
    }

    #[test]
    fn test_page_cover_spans_boundary() {
        let cover = range(0x1FFE, 4).page_cover(0x1000);
        assert_eq!(cover.start(), Address::new(0x1000));
        assert_eq!(cover.len(), 0x2000);
    }

    #[test]
    fn test_intersection() {
        let a = range(0x1000, 0x100);
        let b = range(0x1080, 0x100);
        assert_eq!(a.intersection(&b), Some(range(0x1080, 0x80)));
        assert_eq!(a.intersection(&range(0x2000, 1)), None);
    }
}
