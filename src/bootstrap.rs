// Fri Oct 16 2026 - Alex

//! Load-time entry: read the configuration, then fix the module.

use crate::config::FixConfig;
use crate::display::DisplayQuery;
use crate::fixes::{run_fixes, FixError, FixReport, LogObserver};
use crate::hook::{InterceptionAdapter, TrampolineFacility};
use crate::memory::PatchMemory;
use std::path::Path;

/// What a run leaves behind. Dropping `hooks` does not remove the installed
/// interception points; keep it to remove them later.
pub struct FixSession {
    pub config: FixConfig,
    pub report: FixReport,
    pub hooks: InterceptionAdapter,
}

pub fn start(
    memory: &mut dyn PatchMemory,
    config_path: &Path,
    display: &dyn DisplayQuery,
    facility: Box<dyn TrampolineFacility>,
) -> Result<FixSession, FixError> {
    let config = FixConfig::load(config_path)?;
    let hooks = InterceptionAdapter::with_boxed(facility);
    let report = run_fixes(&config, display, memory, &hooks, &LogObserver);
    Ok(FixSession { config, report, hooks })
}

/// Fixes the executable of the current process.
#[cfg(windows)]
pub fn start_in_main_module(
    config_path: &Path,
    display: &dyn DisplayQuery,
    facility: Box<dyn TrampolineFacility>,
) -> Result<FixSession, FixError> {
    let mut memory = crate::memory::ProcessMemory::main_module()?;
    start(&mut memory, config_path, display, facility)
}
