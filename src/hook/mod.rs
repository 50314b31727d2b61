// Fri Oct 16 2026 - Alex

pub mod adapter;
pub mod context;
pub mod error;
pub mod facility;

pub use adapter::{InterceptionAdapter, InterceptionPoint};
pub use context::{RegisterContext, XmmRegister};
pub use error::{FacilityError, HookError};
pub use facility::{HookCallback, RecordingFacility, TrampolineFacility};
