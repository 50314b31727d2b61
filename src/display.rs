// Fri Oct 16 2026 - Alex

use crate::config::Resolution;

/// Host display geometry, consulted when the configured resolution is `0x0`.
pub trait DisplayQuery {
    fn desktop_resolution(&self) -> Option<Resolution>;
}

/// A display with known geometry, for runs away from the host (files, tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDisplay(pub Resolution);

impl DisplayQuery for FixedDisplay {
    fn desktop_resolution(&self) -> Option<Resolution> {
        Some(self.0)
    }
}

/// No display available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl DisplayQuery for NoDisplay {
    fn desktop_resolution(&self) -> Option<Resolution> {
        None
    }
}

/// Picks the configured resolution, falling back to the display's when the
/// configuration leaves it unset.
pub fn resolve_resolution(configured: Resolution, display: &dyn DisplayQuery) -> Option<Resolution> {
    if configured.is_unset() {
        display
            .desktop_resolution()
            .filter(|r| r.aspect_ratio().is_some())
    } else {
        Some(configured).filter(|r| r.aspect_ratio().is_some())
    }
}
