use std::fmt;

/// Exceptions the translator can request through `RaiseException`/`RaiseExceptionIf`.
///
/// Codes 1-10 are the arithmetic exception type codes pushed on the stack with
/// the arithmetic trap/fault; the remaining codes are local to the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Exception {
    /// Integer overflow trap.
    IntegerOverflow = 1,
    /// Integer divide-by-zero trap.
    IntegerDivideByZero = 2,
    FloatingOverflowTrap = 3,
    FloatingDivideByZeroTrap = 4,
    FloatingUnderflowTrap = 5,
    /// Decimal string overflow trap.
    DecimalOverflow = 6,
    /// INDEX subscript out of range.
    SubscriptRange = 7,
    FloatingOverflowFault = 8,
    FloatingDivideByZeroFault = 9,
    FloatingUnderflowFault = 10,

    ReservedOperand = 0x10,
    ReservedAddressingMode = 0x11,
    /// Reserved or privileged instruction fault (shared SCB vector).
    ReservedInstruction = 0x12,
    PrivilegedInstruction = 0x13,
    /// XFC: customer reserved instruction fault.
    CustomerReserved = 0x14,
    Breakpoint = 0x15,
}

impl Exception {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Exception> {
        use Exception::*;
        Some(match code {
            1 => IntegerOverflow,
            2 => IntegerDivideByZero,
            3 => FloatingOverflowTrap,
            4 => FloatingDivideByZeroTrap,
            5 => FloatingUnderflowTrap,
            6 => DecimalOverflow,
            7 => SubscriptRange,
            8 => FloatingOverflowFault,
            9 => FloatingDivideByZeroFault,
            10 => FloatingUnderflowFault,
            0x10 => ReservedOperand,
            0x11 => ReservedAddressingMode,
            0x12 => ReservedInstruction,
            0x13 => PrivilegedInstruction,
            0x14 => CustomerReserved,
            0x15 => Breakpoint,
            _ => return None,
        })
    }

    /// True for the arithmetic trap/fault family delivered through one SCB vector.
    pub fn is_arithmetic(self) -> bool {
        (self as u8) <= 10
    }

    /// Offset of the exception's vector in the system control block.
    pub fn scb_vector(self) -> u32 {
        match self {
            Exception::ReservedInstruction | Exception::PrivilegedInstruction => 0x10,
            Exception::CustomerReserved => 0x14,
            Exception::ReservedOperand => 0x18,
            Exception::ReservedAddressingMode => 0x1C,
            Exception::Breakpoint => 0x2C,
            _ => 0x34,
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Exception::IntegerOverflow => "integer overflow",
            Exception::IntegerDivideByZero => "integer divide by zero",
            Exception::FloatingOverflowTrap => "floating overflow",
            Exception::FloatingDivideByZeroTrap => "floating divide by zero",
            Exception::FloatingUnderflowTrap => "floating underflow",
            Exception::DecimalOverflow => "decimal overflow",
            Exception::SubscriptRange => "subscript range",
            Exception::FloatingOverflowFault => "floating overflow fault",
            Exception::FloatingDivideByZeroFault => "floating divide by zero fault",
            Exception::FloatingUnderflowFault => "floating underflow fault",
            Exception::ReservedOperand => "reserved operand",
            Exception::ReservedAddressingMode => "reserved addressing mode",
            Exception::ReservedInstruction => "reserved instruction",
            Exception::PrivilegedInstruction => "privileged instruction",
            Exception::CustomerReserved => "customer reserved instruction",
            Exception::Breakpoint => "breakpoint",
        };
        write!(f, "{}", s)
    }
}
