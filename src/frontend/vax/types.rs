use std::fmt;

use crate::ir::types::Width;

/// VAX general-purpose register (R0-R15).
/// R12 = AP, R13 = FP, R14 = SP, R15 = PC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Reg {
    R0 = 0, R1, R2, R3, R4, R5, R6, R7,
    R8, R9, R10, R11, R12, R13, R14, R15,
}

impl Reg {
    pub const AP: Reg = Reg::R12;
    pub const FP: Reg = Reg::R13;
    pub const SP: Reg = Reg::R14;
    pub const PC: Reg = Reg::R15;

    pub fn number(self) -> usize {
        self as usize
    }

    /// Register from the low nibble of `val`.
    pub fn from_u8(val: u8) -> Self {
        match val & 0xF {
            0 => Reg::R0, 1 => Reg::R1, 2 => Reg::R2, 3 => Reg::R3,
            4 => Reg::R4, 5 => Reg::R5, 6 => Reg::R6, 7 => Reg::R7,
            8 => Reg::R8, 9 => Reg::R9, 10 => Reg::R10, 11 => Reg::R11,
            12 => Reg::R12, 13 => Reg::R13, 14 => Reg::R14, _ => Reg::R15,
        }
    }

    /// The register `n` places above this one, if it exists.
    pub fn offset(self, n: usize) -> Option<Reg> {
        let idx = self.number() + n;
        if idx <= 15 { Some(Reg::from_u8(idx as u8)) } else { None }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reg::R12 => write!(f, "AP"),
            Reg::R13 => write!(f, "FP"),
            Reg::R14 => write!(f, "SP"),
            Reg::R15 => write!(f, "PC"),
            r => write!(f, "R{}", r as u8),
        }
    }
}

/// Operand data type as declared by the instruction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Byte,
    Word,
    Long,
    Quad,
    Octa,
    FFloating,
    DFloating,
    GFloating,
    HFloating,
}

impl DataType {
    /// Size in bytes; also the autoincrement/autodecrement step.
    pub fn size(self) -> u32 {
        match self {
            DataType::Byte => 1,
            DataType::Word => 2,
            DataType::Long | DataType::FFloating => 4,
            DataType::Quad | DataType::DFloating | DataType::GFloating => 8,
            DataType::Octa | DataType::HFloating => 16,
        }
    }

    /// IR width carrying a value of this type.
    pub fn width(self) -> Width {
        match self.size() {
            1 => Width::W8,
            2 => Width::W16,
            4 => Width::W32,
            8 => Width::W64,
            _ => Width::W128,
        }
    }

    pub fn is_floating(self) -> bool {
        matches!(self, DataType::FFloating | DataType::DFloating | DataType::GFloating | DataType::HFloating)
    }

    /// Number of consecutive general registers a register-mode operand occupies.
    pub fn register_span(self) -> usize {
        (self.size() as usize).div_ceil(4)
    }

    /// Mnemonic suffix letter (B, W, L, Q, O, F, D, G, H).
    pub fn suffix(self) -> char {
        match self {
            DataType::Byte => 'B',
            DataType::Word => 'W',
            DataType::Long => 'L',
            DataType::Quad => 'Q',
            DataType::Octa => 'O',
            DataType::FFloating => 'F',
            DataType::DFloating => 'D',
            DataType::GFloating => 'G',
            DataType::HFloating => 'H',
        }
    }
}

/// How an instruction uses an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// `.r`: value is read.
    Read,
    /// `.w`: value is written.
    Write,
    /// `.m`: value is read, then written.
    Modify,
    /// `.a`: only the effective address is used.
    Address,
    /// `.v`: base of a variable-length bit field (address or register).
    Field,
    /// `.b`: branch displacement, stored inline rather than as a specifier.
    Branch,
    /// Raw inline data following the opcode (BUGW/BUGL code).
    Inline,
}

impl Access {
    pub fn is_specifier(self) -> bool {
        !matches!(self, Access::Branch | Access::Inline)
    }
}

/// Access type plus data type for one operand slot of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandSpec {
    pub access: Access,
    pub data_type: DataType,
}

impl OperandSpec {
    pub const fn new(access: Access, data_type: DataType) -> Self {
        Self { access, data_type }
    }
}

/// Processor access mode (PSL<CUR_MOD>, PSL<PRV_MOD>).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AccessMode {
    Kernel = 0,
    Executive = 1,
    Supervisor = 2,
    User = 3,
}

impl AccessMode {
    pub fn from_u32(val: u32) -> Self {
        match val & 3 {
            0 => AccessMode::Kernel,
            1 => AccessMode::Executive,
            2 => AccessMode::Supervisor,
            _ => AccessMode::User,
        }
    }
}

/// Sign-extend the low `bits` bits of `value`.
pub fn sign_extend(value: u32, bits: u32) -> u32 {
    let shift = 32 - bits;
    (((value << shift) as i32) >> shift) as u32
}
