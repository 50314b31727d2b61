// Fri Oct 16 2026 - Alex

use crate::config::FixConfig;
use crate::fixes::{Fix, FixContext, FixError, FixEvent, FixOutcome};

/// 16:9 as a little-endian `f32`.
pub const ASPECT_RATIO_PATTERN: &str = "39 8E E3 3F";

/// Replaces every hard-coded 16:9 aspect ratio constant with the target
/// ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionFix;

impl Fix for ResolutionFix {
    fn name(&self) -> &str {
        "resolution"
    }

    fn enabled(&self, config: &FixConfig) -> bool {
        config.resolution_enabled()
    }

    fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixOutcome, FixError> {
        let aspect = ctx.aspect_ratio()?;
        if let Some(resolution) = ctx.resolution() {
            let (w, h) = resolution.reduced();
            ctx.notify(self.name(), FixEvent::Info(format!("Resolution: {}", resolution)));
            ctx.notify(self.name(), FixEvent::Info(format!("Aspect Ratio: {}:{} {}", w, h, aspect)));
        }

        let hits = ctx.find(self.name(), ASPECT_RATIO_PATTERN)?;
        if hits.is_empty() {
            return Ok(FixOutcome::NotFound);
        }
        // Sites are patched independently; a refused page does not stop the rest.
        let bytes = aspect.to_le_bytes();
        let mut sites = 0;
        let mut failures = Vec::new();
        for hit in &hits {
            match ctx.patch_at(self.name(), ASPECT_RATIO_PATTERN, hit, 0, bytes.to_vec()) {
                Ok(()) => sites += 1,
                Err(e) => {
                    ctx.notify(self.name(), FixEvent::Failed(format!("0x{:x}: {}", hit.offset, e)));
                    failures.push(e);
                }
            }
        }

        match (sites, failures.is_empty()) {
            (_, true) => Ok(FixOutcome::Patched { sites }),
            (0, false) => Err(failures.swap_remove(0)),
            _ => Ok(FixOutcome::Partial { sites, failures }),
        }
    }
}
