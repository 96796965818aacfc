use std::fmt;

/// IR type system. Types are bit flags to allow compatibility checks via bitwise OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Type {
    Void = 0,
    Reg = 1 << 0,
    Opaque = 1 << 1,
    U1 = 1 << 2,
    U8 = 1 << 3,
    U16 = 1 << 4,
    U32 = 1 << 5,
    U64 = 1 << 6,
    U128 = 1 << 7,
    Cond = 1 << 8,
    Width = 1 << 9,
    CcOp = 1 << 10,
    Helper = 1 << 11,
}

impl Type {
    /// Returns the raw bit value of this type.
    pub fn bits(self) -> u16 {
        self as u16
    }

    /// Check if two types are compatible.
    /// Opaque is compatible with any non-Void type.
    pub fn is_compatible_with(self, other: Type) -> bool {
        if self == other {
            return true;
        }
        if self == Type::Opaque && other != Type::Void {
            return true;
        }
        if other == Type::Opaque && self != Type::Void {
            return true;
        }
        false
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Operand width tag carried by width-generic IR operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Width {
    W1,
    W8,
    W16,
    W32,
    W64,
    W128,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::W1 => 1,
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
            Width::W128 => 128,
        }
    }

    pub fn bytes(self) -> u32 {
        self.bits().div_ceil(8)
    }

    /// All-ones mask of this width.
    pub fn mask(self) -> u128 {
        match self {
            Width::W128 => u128::MAX,
            w => (1u128 << w.bits()) - 1,
        }
    }

    /// The width twice as wide, used by packing operations.
    pub fn double(self) -> Option<Width> {
        match self {
            Width::W8 => Some(Width::W16),
            Width::W16 => Some(Width::W32),
            Width::W32 => Some(Width::W64),
            Width::W64 => Some(Width::W128),
            Width::W1 | Width::W128 => None,
        }
    }

    /// IR type of an immediate of this width.
    pub fn imm_type(self) -> Type {
        match self {
            Width::W1 => Type::U1,
            Width::W8 => Type::U8,
            Width::W16 => Type::U16,
            Width::W32 => Type::U32,
            Width::W64 => Type::U64,
            Width::W128 => Type::U128,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.bits())
    }
}
