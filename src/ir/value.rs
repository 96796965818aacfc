use std::fmt;

use crate::frontend::vax::cc::CcOp;
use crate::frontend::vax::opcodes::HelperFamily;
use crate::frontend::vax::types::Reg;
use crate::ir::cond::Cond;
use crate::ir::types::{Type, Width};

/// Index into a Block's instruction arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstRef(pub u32);

impl InstRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// An IR value: either an immediate or a reference to an instruction's result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Void,
    Inst(InstRef),
    ImmU1(bool),
    ImmU8(u8),
    ImmU16(u16),
    ImmU32(u32),
    ImmU64(u64),
    ImmU128(u128),
    ImmReg(Reg),
    ImmCond(Cond),
    ImmWidth(Width),
    ImmCcOp(CcOp),
    ImmHelper(HelperFamily),
}

impl Value {
    /// Immediate of the given width holding the low bits of `value`.
    pub fn imm(width: Width, value: u128) -> Value {
        let v = value & width.mask();
        match width {
            Width::W1 => Value::ImmU1(v != 0),
            Width::W8 => Value::ImmU8(v as u8),
            Width::W16 => Value::ImmU16(v as u16),
            Width::W32 => Value::ImmU32(v as u32),
            Width::W64 => Value::ImmU64(v as u64),
            Width::W128 => Value::ImmU128(v),
        }
    }

    /// Get the IR type of this value.
    pub fn get_type(&self) -> Type {
        match self {
            Value::Void => Type::Void,
            Value::Inst(_) => Type::Opaque,
            Value::ImmU1(_) => Type::U1,
            Value::ImmU8(_) => Type::U8,
            Value::ImmU16(_) => Type::U16,
            Value::ImmU32(_) => Type::U32,
            Value::ImmU64(_) => Type::U64,
            Value::ImmU128(_) => Type::U128,
            Value::ImmReg(_) => Type::Reg,
            Value::ImmCond(_) => Type::Cond,
            Value::ImmWidth(_) => Type::Width,
            Value::ImmCcOp(_) => Type::CcOp,
            Value::ImmHelper(_) => Type::Helper,
        }
    }

    /// Returns true if this is an immediate value (not an instruction reference).
    pub fn is_immediate(&self) -> bool {
        !matches!(self, Value::Inst(_) | Value::Void)
    }

    /// Returns true if this is a reference to an instruction.
    pub fn is_inst(&self) -> bool {
        matches!(self, Value::Inst(_))
    }

    /// Get the instruction reference, panics if not an Inst value.
    pub fn inst_ref(&self) -> InstRef {
        match self {
            Value::Inst(r) => *r,
            _ => panic!("Value::inst_ref called on non-Inst value: {:?}", self),
        }
    }

    /// Get as u8, panics if not ImmU8.
    pub fn get_u8(&self) -> u8 {
        match self {
            Value::ImmU8(v) => *v,
            _ => panic!("Value::get_u8 called on {:?}", self),
        }
    }

    /// Get as u16, panics if not ImmU16.
    pub fn get_u16(&self) -> u16 {
        match self {
            Value::ImmU16(v) => *v,
            _ => panic!("Value::get_u16 called on {:?}", self),
        }
    }

    /// Get as Reg, panics if not ImmReg.
    pub fn get_reg(&self) -> Reg {
        match self {
            Value::ImmReg(r) => *r,
            _ => panic!("Value::get_reg called on {:?}", self),
        }
    }

    /// Get as Cond, panics if not ImmCond.
    pub fn get_cond(&self) -> Cond {
        match self {
            Value::ImmCond(c) => *c,
            _ => panic!("Value::get_cond called on {:?}", self),
        }
    }

    /// Get as Width, panics if not ImmWidth.
    pub fn get_width(&self) -> Width {
        match self {
            Value::ImmWidth(w) => *w,
            _ => panic!("Value::get_width called on {:?}", self),
        }
    }

    /// Get as CcOp, panics if not ImmCcOp.
    pub fn get_cc_op(&self) -> CcOp {
        match self {
            Value::ImmCcOp(op) => *op,
            _ => panic!("Value::get_cc_op called on {:?}", self),
        }
    }

    /// Get as HelperFamily, panics if not ImmHelper.
    pub fn get_helper(&self) -> HelperFamily {
        match self {
            Value::ImmHelper(h) => *h,
            _ => panic!("Value::get_helper called on {:?}", self),
        }
    }

    /// Get any integer immediate zero-extended to u128.
    pub fn get_imm_as_u128(&self) -> u128 {
        match self {
            Value::ImmU1(v) => *v as u128,
            Value::ImmU8(v) => *v as u128,
            Value::ImmU16(v) => *v as u128,
            Value::ImmU32(v) => *v as u128,
            Value::ImmU64(v) => *v as u128,
            Value::ImmU128(v) => *v,
            _ => panic!("Value::get_imm_as_u128 called on {:?}", self),
        }
    }

    /// Returns true if this is an integer immediate zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::ImmU1(v) => !v,
            Value::ImmU8(v) => *v == 0,
            Value::ImmU16(v) => *v == 0,
            Value::ImmU32(v) => *v == 0,
            Value::ImmU64(v) => *v == 0,
            Value::ImmU128(v) => *v == 0,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Inst(r) => write!(f, "{}", r),
            Value::ImmU1(v) => write!(f, "#{}", *v as u8),
            Value::ImmU8(v) => write!(f, "#{:#x}", v),
            Value::ImmU16(v) => write!(f, "#{:#x}", v),
            Value::ImmU32(v) => write!(f, "#{:#x}", v),
            Value::ImmU64(v) => write!(f, "#{:#x}", v),
            Value::ImmU128(v) => write!(f, "#{:#x}", v),
            Value::ImmReg(r) => write!(f, "{}", r),
            Value::ImmCond(c) => write!(f, "{}", c),
            Value::ImmWidth(w) => write!(f, "{}", w),
            Value::ImmCcOp(op) => write!(f, "{}", op),
            Value::ImmHelper(h) => write!(f, "{:?}", h),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::ImmU1(v) }
}
impl From<u8> for Value {
    fn from(v: u8) -> Self { Value::ImmU8(v) }
}
impl From<u16> for Value {
    fn from(v: u16) -> Self { Value::ImmU16(v) }
}
impl From<u32> for Value {
    fn from(v: u32) -> Self { Value::ImmU32(v) }
}
impl From<u64> for Value {
    fn from(v: u64) -> Self { Value::ImmU64(v) }
}
impl From<u128> for Value {
    fn from(v: u128) -> Self { Value::ImmU128(v) }
}
impl From<Reg> for Value {
    fn from(r: Reg) -> Self { Value::ImmReg(r) }
}
impl From<Cond> for Value {
    fn from(c: Cond) -> Self { Value::ImmCond(c) }
}
impl From<Width> for Value {
    fn from(w: Width) -> Self { Value::ImmWidth(w) }
}
impl From<CcOp> for Value {
    fn from(op: CcOp) -> Self { Value::ImmCcOp(op) }
}
impl From<InstRef> for Value {
    fn from(r: InstRef) -> Self { Value::Inst(r) }
}
