// Fri Oct 16 2026 - Alex

use crate::memory::{MemoryError, MemoryRange, ModuleImage};
use crate::pattern::{BytePattern, ScanHit};
use rayon::prelude::*;

/// Finds every occurrence of a pattern in a module image.
///
/// Hits come back in ascending address order and overlapping occurrences are
/// all reported: `AA AA` over `AA AA AA` yields two hits. The image is only
/// read, so any number of scans may run at once as long as nothing writes to
/// the image meanwhile.
#[derive(Debug, Clone)]
pub struct PatternScanner {
    chunk_size: usize,
    use_parallel: bool,
}

impl PatternScanner {
    pub fn new() -> Self {
        Self {
            chunk_size: 0x10000,
            use_parallel: false,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Splits large images into chunks of candidate offsets scanned on the
    /// rayon pool. Hit order is unaffected.
    pub fn use_parallel(mut self, parallel: bool) -> Self {
        self.use_parallel = parallel;
        self
    }

    pub fn scan(&self, image: &ModuleImage<'_>, pattern: &BytePattern) -> Vec<ScanHit> {
        let data = image.bytes();
        if pattern.len() > data.len() {
            return Vec::new();
        }
        let last = data.len() - pattern.len();

        let offsets: Vec<usize> = if self.use_parallel && last >= self.chunk_size {
            let starts: Vec<usize> = (0..=last).step_by(self.chunk_size).collect();
            starts
                .into_par_iter()
                .map(|start| {
                    let end = start.saturating_add(self.chunk_size - 1).min(last);
                    match_offsets(data, pattern, start, end)
                })
                .flatten()
                .collect()
        } else {
            match_offsets(data, pattern, 0, last)
        };

        offsets
            .into_iter()
            .map(|offset| ScanHit::new(image.base() + offset, offset))
            .collect()
    }

    pub fn scan_first(&self, image: &ModuleImage<'_>, pattern: &BytePattern) -> Option<ScanHit> {
        let data = image.bytes();
        if pattern.len() > data.len() {
            return None;
        }
        let last = data.len() - pattern.len();
        (0..=last)
            .find(|&i| candidate(data, pattern, i) && pattern.matches(&data[i..]))
            .map(|offset| ScanHit::new(image.base() + offset, offset))
    }

    /// Scans only `range`, which must lie inside the image. Hit offsets stay
    /// relative to the image base.
    pub fn scan_within(
        &self,
        image: &ModuleImage<'_>,
        range: MemoryRange,
        pattern: &BytePattern,
    ) -> Result<Vec<ScanHit>, MemoryError> {
        let bytes = image.read(range.start(), range.len())?;
        let skip = range.start().as_usize() - image.base().as_usize();
        let sub = ModuleImage::from_validated(range, bytes);
        Ok(self
            .scan(&sub, pattern)
            .into_iter()
            .map(|hit| ScanHit::new(hit.address, hit.offset + skip))
            .collect())
    }
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate(data: &[u8], pattern: &BytePattern, offset: usize) -> bool {
    match pattern.anchor() {
        Some((index, byte)) => data[offset + index] == byte,
        None => true,
    }
}

/// Match offsets in `[first, last]`, ascending. `last + pattern.len()` must
/// not exceed `data.len()`.
fn match_offsets(data: &[u8], pattern: &BytePattern, first: usize, last: usize) -> Vec<usize> {
    (first..=last)
        .filter(|&i| candidate(data, pattern, i) && pattern.matches(&data[i..]))
        .collect()
}

pub fn scan(image: &ModuleImage<'_>, pattern: &BytePattern) -> Vec<ScanHit> {
    PatternScanner::new().scan(image, pattern)
}
