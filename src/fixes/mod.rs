// Fri Oct 16 2026 - Alex

pub mod base;
pub mod error;
pub mod fov;
pub mod observer;
pub mod orchestrator;
pub mod pillarbox;
pub mod report;
pub mod resolution;

pub use base::{Fix, FixContext, NATIVE_ASPECT_RATIO};
pub use error::FixError;
pub use fov::{fov_for_aspect, FovFix};
pub use observer::{FixEvent, FixObserver, LogObserver, RecordingObserver};
pub use orchestrator::{run_fixes, Orchestrator};
pub use pillarbox::PillarboxFix;
pub use report::{FixOutcome, FixReport, FixReportEntry};
pub use resolution::ResolutionFix;
