// Fri Oct 16 2026 - Alex

use crate::config::FixConfig;
use crate::fixes::{Fix, FixContext, FixError, FixOutcome};
use crate::pattern::compile_bytes;

pub const PILLARBOX_PATTERN: &str = "F6 41 2C 01 4C";
pub const PILLARBOX_PATCH: &str = "F6 41 2C 00";

/// Clears the flag that makes the renderer pillarbox anything wider than
/// 16:9. Only the first match is patched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PillarboxFix;

impl Fix for PillarboxFix {
    fn name(&self) -> &str {
        "pillarbox"
    }

    fn enabled(&self, config: &FixConfig) -> bool {
        config.pillarbox_enabled()
    }

    fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixOutcome, FixError> {
        let bytes = compile_bytes(PILLARBOX_PATCH)?;
        let hits = ctx.find(self.name(), PILLARBOX_PATTERN)?;
        let Some(hit) = hits.first() else {
            return Ok(FixOutcome::NotFound);
        };
        ctx.patch_at(self.name(), PILLARBOX_PATTERN, hit, 0, bytes)?;
        Ok(FixOutcome::Patched { sites: 1 })
    }
}
