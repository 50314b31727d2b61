// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacilityError {
    #[error("Facility refused interception at {address}: {reason}")]
    Rejected { address: Address, reason: String },
    #[error("No interception installed at {0}")]
    NotInstalled(Address),
}

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Interception at {address} (+{len}) overlaps active point #{existing} at {existing_address}")]
    Overlap {
        address: Address,
        len: usize,
        existing: u64,
        existing_address: Address,
    },
    #[error("Interception point #{0} is not active")]
    Removal(u64),
    #[error("Trampoline facility error: {0}")]
    Facility(#[from] FacilityError),
    #[error("Invalid interception range: {0}")]
    InvalidRange(#[from] MemoryError),
}
