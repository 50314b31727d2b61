// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryRange, Protection, ProtectionSnapshot, SavedProtection};
use std::fmt;

#[derive(Debug, Clone)]
pub struct MemoryRegion {
    range: MemoryRange,
    protection: Protection,
    name: String,
}

impl MemoryRegion {
    pub fn new(range: MemoryRange, protection: Protection, name: String) -> Self {
        Self {
            range,
            protection,
            name,
        }
    }

    /// Parses one line of `/proc/<pid>/maps`:
    /// `7f3c1000-7f3c2000 r-xp 00000000 08:01 1234   /usr/lib/libc.so.6`
    pub fn parse_maps_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let span = fields.next()?;
        let perms = fields.next()?;
        let _offset = fields.next()?;
        let _dev = fields.next()?;
        let _inode = fields.next()?;
        let name = fields.collect::<Vec<_>>().join(" ");

        let (start, end) = span.split_once('-')?;
        let start = usize::from_str_radix(start, 16).ok()?;
        let end = usize::from_str_radix(end, 16).ok()?;
        let range = MemoryRange::from_bounds(Address::new(start), Address::new(end)).ok()?;
        let protection = Protection::from_maps_perms(perms)?;

        Some(Self::new(range, protection, name))
    }

    pub fn parse_maps(contents: &str) -> Vec<Self> {
        contents.lines().filter_map(Self::parse_maps_line).collect()
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.range, self.protection, self.name)
    }
}

/// Splits `target` into the pieces covered by `regions`, each paired with
/// its current protection. Returns `Err(addr)` with the first address of
/// `target` that no region maps.
pub fn covering_protections(
    regions: &[MemoryRegion],
    target: &MemoryRange,
) -> Result<Vec<(MemoryRange, Protection)>, Address> {
    let mut pieces: Vec<(MemoryRange, Protection)> = regions
        .iter()
        .filter_map(|r| r.range.intersection(target).map(|i| (i, r.protection)))
        .collect();
    pieces.sort_by_key(|(range, _)| range.start());

    let mut cursor = target.start();
    for (range, _) in &pieces {
        if range.start() != cursor {
            return Err(cursor);
        }
        cursor = range.end();
    }
    if cursor != target.end() {
        return Err(cursor);
    }
    Ok(pieces)
}

/// Records the protection of every region overlapping `target`, clipped to
/// it. `query` describes the whole region holding an address, or `None` if
/// nothing is committed there. Returns `Err(addr)` at the first hole.
pub fn walk_protections<F>(target: &MemoryRange, mut query: F) -> Result<ProtectionSnapshot, Address>
where
    F: FnMut(Address) -> Option<SavedProtection>,
{
    let mut snapshot = ProtectionSnapshot::new();
    let mut cursor = target.start();
    while cursor < target.end() {
        let region = query(cursor).ok_or(cursor)?;
        if !region.range.contains(cursor) {
            return Err(cursor);
        }
        let range = region.range.intersection(target).ok_or(cursor)?;
        cursor = range.end();
        snapshot.push(SavedProtection { range, ..region });
    }
    Ok(snapshot)
}
