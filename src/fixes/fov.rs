// Fri Oct 16 2026 - Alex

use crate::config::FixConfig;
use crate::fixes::{Fix, FixContext, FixError, FixEvent, FixOutcome, NATIVE_ASPECT_RATIO};
use crate::hook::RegisterContext;
use crate::patch::PatchError;
use std::f32::consts::PI;

/// `movss xmm0,[rcx+39C]; xorps xmm1,xmm1; comiss xmm0,xmm1`
pub const FOV_PATTERN: &str = "F3 0F 10 81 9C 03 00 00 0F 57 C9 0F 2F C1";
/// From the match to the `xorps`, right after xmm0 is loaded.
pub const FOV_HOOK_OFFSET: usize = 8;
/// Length of the `xorps xmm1,xmm1` the interception point covers.
pub const FOV_HOOK_LEN: usize = 3;
pub const NATIVE_FOV: f32 = 68.0;

/// Horizontal FOV keeping the native vertical FOV at `aspect`, scaled by
/// `multiplier`.
pub fn fov_for_aspect(aspect: f32, multiplier: f32) -> f32 {
    let half = (NATIVE_FOV * PI / 360.0).tan() / NATIVE_ASPECT_RATIO * aspect;
    half.atan() * 360.0 / PI * multiplier
}

/// Widens the camera FOV for the target aspect ratio by overwriting xmm0 just
/// after the game loads its FOV.
#[derive(Debug, Clone, Copy, Default)]
pub struct FovFix;

impl Fix for FovFix {
    fn name(&self) -> &str {
        "fov"
    }

    fn enabled(&self, config: &FixConfig) -> bool {
        config.fov_enabled()
    }

    fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixOutcome, FixError> {
        let fov = fov_for_aspect(ctx.aspect_ratio()?, ctx.config().fixes.fov.multiplier);

        let hits = ctx.find(self.name(), FOV_PATTERN)?;
        let Some(hit) = hits.first() else {
            return Ok(FixOutcome::NotFound);
        };

        let address = hit.relative(FOV_HOOK_OFFSET).ok_or(PatchError::OutOfImage {
            address: hit.address,
            len: FOV_HOOK_LEN,
        })?;
        let point = ctx
            .hooks()
            .install(address, FOV_HOOK_LEN, move |regs: &mut RegisterContext| {
                regs.xmm_mut(0).set_f32(0, fov);
            })?;

        ctx.notify(
            self.name(),
            FixEvent::Hooked {
                offset: hit.offset,
                hook_offset: FOV_HOOK_OFFSET,
            },
        );
        ctx.notify(self.name(), FixEvent::Info(format!("New FOV: {}", fov)));
        Ok(FixOutcome::Hooked { point })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_aspect_keeps_native_fov() {
        assert!((fov_for_aspect(16.0 / 9.0, 1.0) - 68.0).abs() < 1e-3);
    }

    #[test]
    fn test_wider_aspect_widens_fov() {
        assert!((fov_for_aspect(32.0 / 9.0, 1.0) - 106.902).abs() < 1e-2);
        assert!((fov_for_aspect(21.0 / 9.0, 1.0) - 83.036).abs() < 1e-2);
        let scaled = fov_for_aspect(32.0 / 9.0, 0.5);
        assert!((scaled - 53.451).abs() < 1e-2);
    }
}
