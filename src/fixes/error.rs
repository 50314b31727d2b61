// Fri Oct 16 2026 - Alex

use crate::config::ConfigError;
use crate::hook::HookError;
use crate::memory::MemoryError;
use crate::patch::PatchError;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),
    #[error("Patch failed: {0}")]
    Patch(#[from] PatchError),
    #[error("Interception failed: {0}")]
    Hook(#[from] HookError),
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("No target resolution: none configured and the display did not report one")]
    NoResolution,
}
