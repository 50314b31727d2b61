// Fri Oct 16 2026 - Alex

pub mod logging;

pub use logging::LoggingUtils;

use itertools::Itertools;

/// Space-separated uppercase hex, the same form patterns are written in:
/// `[0x39, 0x8E, 0x63, 0x40]` becomes `"39 8E 63 40"`.
pub fn bytes_to_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).join(" ")
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
