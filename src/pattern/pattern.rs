// Fri Oct 16 2026 - Alex

use crate::pattern::{compiler, PatternError};
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternByte {
    Exact(u8),
    Any,
}

impl PatternByte {
    pub fn matches(&self, byte: u8) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(b) => *b == byte,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn value(&self) -> Option<u8> {
        match self {
            Self::Any => None,
            Self::Exact(b) => Some(*b),
        }
    }
}

impl fmt::Display for PatternByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "??"),
            Self::Exact(b) => write!(f, "{:02X}", b),
        }
    }
}

/// A compiled byte signature. Never empty; element order is match order, the
/// first element aligning with the lowest address of a hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BytePattern {
    elements: Vec<PatternByte>,
    anchor: Option<usize>,
}

impl BytePattern {
    pub fn new(elements: Vec<PatternByte>) -> Result<Self, PatternError> {
        if elements.is_empty() {
            return Err(PatternError::Empty);
        }
        let anchor = elements.iter().position(|e| !e.is_wildcard());
        Ok(Self { elements, anchor })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PatternError> {
        Self::new(bytes.iter().map(|&b| PatternByte::Exact(b)).collect())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PatternByte] {
        &self.elements
    }

    /// Index of the first concrete byte, used to prefilter candidate offsets.
    /// `None` when every element is a wildcard.
    pub fn anchor(&self) -> Option<(usize, u8)> {
        self.anchor
            .and_then(|i| self.elements[i].value().map(|b| (i, b)))
    }

    /// Checks the pattern against the start of `data`.
    pub fn matches(&self, data: &[u8]) -> bool {
        if data.len() < self.elements.len() {
            return false;
        }
        self.elements
            .iter()
            .zip(data)
            .all(|(element, &byte)| element.matches(byte))
    }

    pub fn significant_byte_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_wildcard()).count()
    }

    pub fn wildcard_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_wildcard()).count()
    }

    /// The bytes of a wildcard-free pattern.
    pub fn concrete_bytes(&self) -> Option<Vec<u8>> {
        self.elements.iter().map(PatternByte::value).collect()
    }

    pub fn to_pattern_string(&self) -> String {
        self.elements.iter().join(" ")
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_pattern_string())
    }
}

impl FromStr for BytePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compiler::compile(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_skips_leading_wildcards() {
        let pattern: BytePattern = "?? ?? 0F 10".parse().unwrap();
        assert_eq!(pattern.anchor(), Some((2, 0x0F)));

        let all_wild: BytePattern = "?? ?".parse().unwrap();
        assert_eq!(all_wild.anchor(), None);
    }

    #[test]
    fn test_matches_requires_full_length() {
        let pattern: BytePattern = "DE ?? EF".parse().unwrap();
        assert!(pattern.matches(&[0xDE, 0x00, 0xEF, 0x99]));
        assert!(!pattern.matches(&[0xDE, 0xEF]));
    }

    #[test]
    fn test_concrete_bytes() {
        assert_eq!(
            BytePattern::from_bytes(&[0xF6, 0x41]).unwrap().concrete_bytes(),
            Some(vec![0xF6, 0x41])
        );
        let wild: BytePattern = "F6 ??".parse().unwrap();
        assert_eq!(wild.concrete_bytes(), None);
        assert_eq!(wild.significant_byte_count(), 1);
        assert_eq!(wild.wildcard_count(), 1);
    }

    #[test]
    fn test_from_bytes_rejects_empty() {
        assert_eq!(BytePattern::from_bytes(&[]), Err(PatternError::Empty));
    }

    #[test]
    fn test_display_uses_canonical_tokens() {
        let pattern: BytePattern = "f3 ? 9c".parse().unwrap();
        assert_eq!(pattern.to_string(), "F3 ?? 9C");
    }
}
