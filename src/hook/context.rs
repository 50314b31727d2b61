// Fri Oct 16 2026 - Alex

//! CPU state handed to interception callbacks.
//!
//! Layout follows the x86-64 register file: the sixteen general-purpose
//! registers, `rip`, `rflags`, and the sixteen SSE registers. Which fields are
//! written back when the callback returns is up to the trampoline facility.

use std::fmt;

/// One 128-bit SSE register.
#[repr(C, align(16))]
#[derive(Clone, Copy, Default, PartialEq)]
pub struct XmmRegister {
    bytes: [u8; 16],
}

impl XmmRegister {
    pub fn from_f32(lanes: [f32; 4]) -> Self {
        let mut reg = Self::default();
        for (i, lane) in lanes.iter().enumerate() {
            reg.set_f32(i, *lane);
        }
        reg
    }

    pub fn from_u64(lanes: [u64; 2]) -> Self {
        let mut reg = Self::default();
        reg.set_u64(0, lanes[0]);
        reg.set_u64(1, lanes[1]);
        reg
    }

    /// Lane `index` (0 to 3) as a single-precision float.
    pub fn f32(&self, index: usize) -> f32 {
        let start = index * 4;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[start..start + 4]);
        f32::from_le_bytes(raw)
    }

    pub fn set_f32(&mut self, index: usize, value: f32) {
        let start = index * 4;
        self.bytes[start..start + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn u64(&self, index: usize) -> u64 {
        let start = index * 8;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[start..start + 8]);
        u64::from_le_bytes(raw)
    }

    pub fn set_u64(&mut self, index: usize, value: u64) {
        let start = index * 8;
        self.bytes[start..start + 8].copy_from_slice(&value.to_le_bytes());
    }

    pub fn f32x4(&self) -> [f32; 4] {
        [self.f32(0), self.f32(1), self.f32(2), self.f32(3)]
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }
}

impl fmt::Debug for XmmRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xmm[{:?}]", self.f32x4())
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegisterContext {
    pub rax: u64,
    pub rbx: u64,
    pub rcx: u64,
    pub rdx: u64,
    pub rsi: u64,
    pub rdi: u64,
    pub rbp: u64,
    pub rsp: u64,
    pub r8: u64,
    pub r9: u64,
    pub r10: u64,
    pub r11: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,
    pub rip: u64,
    pub rflags: u64,
    pub xmm: [XmmRegister; 16],
}

impl RegisterContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xmm(&self, index: usize) -> &XmmRegister {
        &self.xmm[index]
    }

    pub fn xmm_mut(&mut self, index: usize) -> &mut XmmRegister {
        &mut self.xmm[index]
    }
}
