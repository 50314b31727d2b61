// Fri Oct 16 2026 - Alex

use crate::memory::MemoryError;
use goblin::pe::header::Header;
use goblin::pe::PE;

/// `SizeOfImage` from the PE headers at the start of `header`: the number of
/// bytes the loader mapped for the module.
pub fn image_size(header: &[u8]) -> Result<usize, MemoryError> {
    let parsed = Header::parse(header)
        .map_err(|e| MemoryError::BinaryParseError(format!("Failed to parse PE header: {}", e)))?;
    let optional = parsed
        .optional_header
        .ok_or_else(|| MemoryError::BinaryParseError("PE image has no optional header".to_string()))?;
    let size = optional.windows_fields.size_of_image as usize;
    if size == 0 {
        return Err(MemoryError::BinaryParseError("SizeOfImage is zero".to_string()));
    }
    Ok(size)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub name: String,
    pub virtual_address: u32,
    pub virtual_size: u32,
    pub raw_offset: u32,
    pub raw_size: u32,
}

impl SectionInfo {
    pub fn contains_file_offset(&self, offset: usize) -> bool {
        let start = self.raw_offset as usize;
        offset >= start && offset < start + self.raw_size as usize
    }
}

/// Section table of a PE file read from disk.
pub fn sections(file: &[u8]) -> Result<Vec<SectionInfo>, MemoryError> {
    let pe = PE::parse(file)
        .map_err(|e| MemoryError::BinaryParseError(format!("Failed to parse PE: {}", e)))?;
    Ok(pe
        .sections
        .iter()
        .map(|s| SectionInfo {
            name: s.name().unwrap_or("").to_string(),
            virtual_address: s.virtual_address,
            virtual_size: s.virtual_size,
            raw_offset: s.pointer_to_raw_data,
            raw_size: s.size_of_raw_data,
        })
        .collect())
}

/// Maps a file offset to the RVA it is loaded at, with the owning section.
pub fn file_offset_to_rva(sections: &[SectionInfo], offset: usize) -> Option<(u64, &SectionInfo)> {
    sections.iter().find(|s| s.contains_file_offset(offset)).map(|s| {
        let rva = s.virtual_address as u64 + (offset - s.raw_offset as usize) as u64;
        (rva, s)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_rejects_garbage() {
        assert!(image_size(&[0u8; 64]).is_err());
        assert!(image_size(b"MZ").is_err());
    }

    #[test]
    fn test_file_offset_to_rva() {
        let sections = vec![
            SectionInfo {
                name: ".text".to_string(),
                virtual_address: 0x1000,
                virtual_size: 0x2000,
                raw_offset: 0x400,
                raw_size: 0x2000,
            },
            SectionInfo {
                name: ".rdata".to_string(),
                virtual_address: 0x4000,
                virtual_size: 0x800,
                raw_offset: 0x2400,
                raw_size: 0x800,
            },
        ];
        let (rva, section) = file_offset_to_rva(&sections, 0x410).unwrap();
        assert_eq!(rva, 0x1010);
        assert_eq!(section.name, ".text");
        let (rva, section) = file_offset_to_rva(&sections, 0x2400).unwrap();
        assert_eq!(rva, 0x4000);
        assert_eq!(section.name, ".rdata");
        assert!(file_offset_to_rva(&sections, 0x100).is_none());
    }
}
