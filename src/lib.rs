// Fri Oct 16 2026 - Alex

pub mod bootstrap;
pub mod config;
pub mod display;
pub mod fixes;
pub mod hook;
pub mod memory;
pub mod patch;
pub mod pattern;
pub mod utils;

pub use config::{FixConfig, Resolution};
pub use display::{DisplayQuery, FixedDisplay};
pub use fixes::{run_fixes, FixError, FixOutcome, FixReport, Orchestrator};
pub use hook::{InterceptionAdapter, InterceptionPoint, RegisterContext, TrampolineFacility};
pub use memory::{Address, ModuleImage};
pub use patch::{PatchApplier, PatchOperation};
pub use pattern::{compile, BytePattern, PatternScanner, ScanHit};
