// Fri Oct 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid memory range: {0}")]
    InvalidRange(String),
    #[error("Out of bounds: address 0x{0:x} not in image")]
    OutOfBounds(usize),
    #[error("Address 0x{0:x} is not mapped")]
    Unmapped(usize),
    #[error("Access violation writing address 0x{0:x}")]
    AccessViolation(usize),
    #[error("Protection change failed at 0x{address:x} (+0x{len:x}): {reason}")]
    ProtectFailed { address: usize, len: usize, reason: String },
    #[error("Binary parse error: {0}")]
    BinaryParseError(String),
    #[error("Not supported: {0}")]
    NotSupported(String),
}
