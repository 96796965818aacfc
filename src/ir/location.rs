use std::fmt;

/// Location descriptor: uniquely identifies the guest code a block was translated from.
/// The low 32 bits hold the VAX PC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationDescriptor(pub u64);

impl LocationDescriptor {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn from_pc(pc: u32) -> Self {
        Self(pc as u64)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn pc(self) -> u32 {
        self.0 as u32
    }

    /// Return a new descriptor with the PC advanced by `amount` bytes.
    pub fn advance_pc(self, amount: u32) -> Self {
        Self::from_pc(self.pc().wrapping_add(amount))
    }
}

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc:{:#010x}", self.pc())
    }
}
