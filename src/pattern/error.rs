// Fri Oct 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Malformed pattern: no tokens")]
    Empty,
    #[error("Malformed pattern: invalid token '{token}' at position {index}")]
    InvalidToken { token: String, index: usize },
    #[error("Wildcard at position {index} where a concrete byte is required")]
    UnexpectedWildcard { index: usize },
}

impl PatternError {
    /// True for every failure to read the pattern text itself.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Empty | Self::InvalidToken { .. })
    }
}
