// Fri Oct 16 2026 - Alex

pub mod compiler;
pub mod error;
pub mod hit;
pub mod pattern;
pub mod scanner;

pub use compiler::{compile, compile_bytes};
pub use error::PatternError;
pub use hit::ScanHit;
pub use pattern::{BytePattern, PatternByte};
pub use scanner::{scan, PatternScanner};
