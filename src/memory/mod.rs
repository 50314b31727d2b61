// Fri Oct 16 2026 - Alex

pub mod address;
pub mod buffer;
pub mod error;
pub mod image;
pub mod pe;
pub mod process;
pub mod protection;
pub mod range;
pub mod region;
pub mod traits;

pub use address::Address;
pub use buffer::BufferMemory;
pub use error::MemoryError;
pub use image::ModuleImage;
pub use process::ProcessMemory;
pub use protection::Protection;
pub use range::MemoryRange;
pub use region::MemoryRegion;
pub use traits::{
    MemoryProtector, MemoryReader, MemoryWriter, PatchMemory, ProtectionSnapshot, SavedProtection,
};
