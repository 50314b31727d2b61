// Fri Oct 16 2026 - Alex

use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address {
    value: usize,
}

impl Address {
    pub fn new(value: usize) -> Self {
        Self { value }
    }

    pub fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self { value: ptr as usize }
    }

    pub fn as_usize(&self) -> usize {
        self.value
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.value as *const u8
    }

    pub fn as_mut_ptr(&self) -> *mut u8 {
        self.value as *mut u8
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn is_aligned(&self, alignment: usize) -> bool {
        self.value % alignment == 0
    }

    /// `alignment` must be a power of two.
    pub fn align_down(&self, alignment: usize) -> Self {
        Self { value: self.value & !(alignment - 1) }
    }

    /// `alignment` must be a power of two. Saturates at the top of the address space.
    pub fn align_up(&self, alignment: usize) -> Self {
        match self.value.checked_add(alignment - 1) {
            Some(v) => Self { value: v & !(alignment - 1) },
            None => Self { value: usize::MAX & !(alignment - 1) },
        }
    }

    pub fn checked_add(&self, offset: usize) -> Option<Self> {
        self.value.checked_add(offset).map(Self::new)
    }

    /// Distance from `base` to `self`, or `None` if `self` lies below `base`.
    pub fn offset_from(&self, base: Address) -> Option<usize> {
        self.value.checked_sub(base.value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<usize> for Address {
    type Output = Self;
    fn add(self, rhs: usize) -> Self::Output {
        Self { value: self.value + rhs }
    }
}

impl Sub<usize> for Address {
    type Output = Self;
    fn sub(self, rhs: usize) -> Self::Output {
        Self { value: self.value - rhs }
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl From<Address> for usize {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
