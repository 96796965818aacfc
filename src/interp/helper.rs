use crate::frontend::vax::cc::Nzvc;
use crate::frontend::vax::opcodes::HelperFamily;
use crate::frontend::vax::state::CpuState;
use crate::frontend::vax::types::Reg;
use crate::interp::memory::Memory;
use crate::interp::ExecError;

/// One staged helper argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperArg {
    /// Register destination (first register of a pair for quad operands).
    Register(Reg),
    /// Memory operand or effective address.
    Address(u32),
    /// Operand value, branch target or inline data.
    Value(u128),
}

/// A delegated instruction with its operands in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCall {
    pub family: HelperFamily,
    pub opcode: u16,
    pub args: Vec<HelperArg>,
}

/// What the helper reports back to the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HelperOutcome {
    /// Branch decision for loop helpers (ACBF/D/G/H).
    pub branch: bool,
    /// New condition codes; `None` leaves them unchanged.
    pub flags: Option<Nzvc>,
}

/// Host implementation of the delegated instruction families.
///
/// Control-transfer families (CALLx/RET, CHMx, REI, LDPCTX/SVPCTX) find PC at
/// the next instruction and leave the new PC in `cpu`.
pub trait HelperHost {
    fn call(&mut self, call: &HelperCall, cpu: &mut CpuState, mem: &mut dyn Memory) -> Result<HelperOutcome, ExecError>;
}

/// Host without any helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHelpers;

impl HelperHost for NoHelpers {
    fn call(&mut self, call: &HelperCall, _cpu: &mut CpuState, _mem: &mut dyn Memory) -> Result<HelperOutcome, ExecError> {
        Err(ExecError::HelperUnavailable { family: call.family, opcode: call.opcode })
    }
}
