use std::fmt;
use crate::ir::types::Type;

/// IR opcodes.
///
/// Arithmetic and memory operations are width-generic: their first argument is
/// a `Width` immediate, and values are truncated to that width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    // --- Core ---
    Void,

    // --- Context getters/setters ---
    GetRegister,
    SetRegister,
    GetPsl,
    SetPsl,
    GetIpr,
    SetIpr,

    // --- Condition codes ---
    GetCondition,
    GetCarry,
    GetIntegerOverflowEnable,
    IsKernelMode,
    SetConditionCodes,
    SetCheckBit,

    // --- Memory ---
    ReadMemory,
    WriteMemory,

    // --- ALU ---
    Add,
    AddWithCarry,
    Sub,
    SubWithBorrow,
    Mul,
    SignedDiv,
    And,
    Or,
    Xor,
    Not,
    LogicalShiftLeft,
    LogicalShiftRight,
    ArithmeticShift,
    RotateLeft,

    // --- Width conversion ---
    SignExtend,
    ZeroExtend,
    Truncate,
    Pack,

    // --- Comparison ---
    IsZero,
    CompareLessSigned,
    CompareLessUnsigned,
    Select,

    // --- Exceptions ---
    RaiseException,
    RaiseExceptionIf,
    Halt,

    // --- Semantic helpers ---
    HelperArgRegister,
    HelperArgAddress,
    HelperArgValue,
    CallHelper,
}

/// Opcode metadata: return type and argument types.
struct OpcodeInfo {
    ret: Type,
    args: &'static [Type],
}

impl Opcode {
    /// Returns the return type of this opcode.
    pub fn return_type(self) -> Type {
        self.info().ret
    }

    /// Returns the argument types of this opcode.
    pub fn arg_types(self) -> &'static [Type] {
        self.info().args
    }

    /// Returns the number of arguments this opcode takes.
    pub fn num_args(self) -> usize {
        self.info().args.len()
    }

    /// Returns true if this opcode has side effects (writes to state, memory, or control flow).
    pub fn has_side_effects(self) -> bool {
        use Opcode::*;
        matches!(self,
            SetRegister | SetPsl | GetIpr | SetIpr |
            SetConditionCodes | SetCheckBit |
            WriteMemory |
            RaiseException | RaiseExceptionIf | Halt |
            HelperArgRegister | HelperArgAddress | HelperArgValue | CallHelper
        )
    }

    /// Returns true if this is a memory read operation.
    pub fn is_memory_read(self) -> bool {
        matches!(self, Opcode::ReadMemory)
    }

    /// Returns true if this is a memory write operation.
    pub fn is_memory_write(self) -> bool {
        matches!(self, Opcode::WriteMemory)
    }

    /// Returns true if this writes a general register.
    pub fn writes_to_core_register(self) -> bool {
        matches!(self, Opcode::SetRegister)
    }

    /// Returns true if this reads the condition codes.
    pub fn reads_condition_codes(self) -> bool {
        use Opcode::*;
        matches!(self, GetCondition | GetCarry | GetPsl)
    }

    /// Returns true if this replaces the condition codes.
    pub fn writes_condition_codes(self) -> bool {
        use Opcode::*;
        matches!(self, SetConditionCodes | SetPsl | CallHelper)
    }

    fn info(self) -> OpcodeInfo {
        use Opcode::*;
        // Type aliases (avoiding glob import due to Void collision)
        const V: Type = Type::Void;
        const U1: Type = Type::U1;
        const U8: Type = Type::U8;
        const U16: Type = Type::U16;
        const U32: Type = Type::U32;
        const OPQ: Type = Type::Opaque;
        const REG: Type = Type::Reg;
        const COND: Type = Type::Cond;
        const W: Type = Type::Width;
        const CCOP: Type = Type::CcOp;
        const HELPER: Type = Type::Helper;

        match self {
            Void => OpcodeInfo { ret: V, args: &[] },

            GetRegister => OpcodeInfo { ret: U32, args: &[REG] },
            SetRegister => OpcodeInfo { ret: V, args: &[REG, U32] },
            GetPsl => OpcodeInfo { ret: U32, args: &[] },
            SetPsl => OpcodeInfo { ret: V, args: &[U32] },
            GetIpr => OpcodeInfo { ret: U32, args: &[U32, U32] },
            SetIpr => OpcodeInfo { ret: V, args: &[U32, U32, U32] },

            GetCondition => OpcodeInfo { ret: U1, args: &[COND] },
            GetCarry => OpcodeInfo { ret: U1, args: &[] },
            GetIntegerOverflowEnable => OpcodeInfo { ret: U1, args: &[] },
            IsKernelMode => OpcodeInfo { ret: U1, args: &[] },
            // op, width, result, src1, src2, aux
            SetConditionCodes => OpcodeInfo { ret: V, args: &[CCOP, W, OPQ, OPQ, OPQ, OPQ] },
            SetCheckBit => OpcodeInfo { ret: V, args: &[U1] },

            ReadMemory => OpcodeInfo { ret: OPQ, args: &[W, U32] },
            WriteMemory => OpcodeInfo { ret: V, args: &[W, U32, OPQ] },

            Add | Sub | Mul | SignedDiv | And | Or | Xor |
            LogicalShiftLeft | LogicalShiftRight | ArithmeticShift | RotateLeft
                => OpcodeInfo { ret: OPQ, args: &[W, OPQ, OPQ] },
            AddWithCarry | SubWithBorrow => OpcodeInfo { ret: OPQ, args: &[W, OPQ, OPQ, U1] },
            Not => OpcodeInfo { ret: OPQ, args: &[W, OPQ] },

            // from, to, value
            SignExtend | ZeroExtend => OpcodeInfo { ret: OPQ, args: &[W, W, OPQ] },
            Truncate => OpcodeInfo { ret: OPQ, args: &[W, OPQ] },
            // half width, low, high
            Pack => OpcodeInfo { ret: OPQ, args: &[W, OPQ, OPQ] },

            IsZero => OpcodeInfo { ret: U1, args: &[W, OPQ] },
            CompareLessSigned | CompareLessUnsigned => OpcodeInfo { ret: U1, args: &[W, OPQ, OPQ] },
            Select => OpcodeInfo { ret: OPQ, args: &[W, U1, OPQ, OPQ] },

            // code, pc
            RaiseException => OpcodeInfo { ret: V, args: &[U8, U32] },
            RaiseExceptionIf => OpcodeInfo { ret: V, args: &[U1, U8, U32] },
            Halt => OpcodeInfo { ret: V, args: &[U32] },

            HelperArgRegister => OpcodeInfo { ret: V, args: &[U8, REG] },
            HelperArgAddress => OpcodeInfo { ret: V, args: &[U8, U32] },
            HelperArgValue => OpcodeInfo { ret: V, args: &[U8, OPQ] },
            // family, opcode; returns the branch decision for loop helpers
            CallHelper => OpcodeInfo { ret: U1, args: &[HELPER, U16] },
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_metadata() {
        assert_eq!(Opcode::Void.return_type(), Type::Void);
        assert_eq!(Opcode::Void.num_args(), 0);

        assert_eq!(Opcode::Add.return_type(), Type::Opaque);
        assert_eq!(Opcode::Add.num_args(), 3);
        assert_eq!(Opcode::Add.arg_types(), &[Type::Width, Type::Opaque, Type::Opaque]);

        assert_eq!(Opcode::GetRegister.return_type(), Type::U32);
        assert_eq!(Opcode::GetRegister.arg_types(), &[Type::Reg]);

        assert_eq!(Opcode::SetConditionCodes.num_args(), 6);
        assert_eq!(Opcode::ReadMemory.num_args(), 2);
    }

    #[test]
    fn test_opcode_side_effects() {
        assert!(Opcode::SetRegister.has_side_effects());
        assert!(Opcode::WriteMemory.has_side_effects());
        assert!(Opcode::SetConditionCodes.has_side_effects());
        assert!(Opcode::GetIpr.has_side_effects());
        assert!(!Opcode::Add.has_side_effects());
        assert!(!Opcode::GetRegister.has_side_effects());
        assert!(!Opcode::ReadMemory.has_side_effects());
    }

    #[test]
    fn test_opcode_memory_classification() {
        assert!(Opcode::ReadMemory.is_memory_read());
        assert!(!Opcode::ReadMemory.is_memory_write());
        assert!(Opcode::WriteMemory.is_memory_write());
        assert!(!Opcode::WriteMemory.is_memory_read());
    }
}
