// Fri Oct 16 2026 - Alex

pub mod applier;
pub mod error;
pub mod operation;

pub use applier::{PatchApplier, PatchRecord};
pub use error::PatchError;
pub use operation::PatchOperation;
