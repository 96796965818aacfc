use crate::error::StateError;
use crate::frontend::vax::cc::LazyCc;
use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::psl::Psl;
use crate::frontend::vax::state::CpuState;
use crate::halt_reason::HaltReason;
use crate::interp::helper::{HelperArg, HelperCall, HelperHost};
use crate::interp::memory::Memory;
use crate::interp::ExecError;
use crate::ir::block::Block;
use crate::ir::inst::Inst;
use crate::ir::opcode::Opcode;
use crate::ir::terminal::Terminal;
use crate::ir::types::Width;
use crate::ir::value::{InstRef, Value};

/// An exception requested by the block, not yet delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingException {
    pub exception: Exception,
    /// PC the exception is reported at.
    pub pc: u32,
}

/// How a block left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockExit {
    /// PC after the block; also written to the CPU state.
    pub next_pc: u32,
    pub halt: HaltReason,
    pub exception: Option<PendingException>,
}

fn sext(value: u128, width: Width) -> i128 {
    let shift = 128 - width.bits();
    ((value << shift) as i128) >> shift
}

fn shift_left(width: Width, value: u128, count: u32) -> u128 {
    if count >= width.bits() { 0 } else { (value << count) & width.mask() }
}

fn shift_right(width: Width, value: u128, count: u32) -> u128 {
    if count >= width.bits() { 0 } else { (value & width.mask()) >> count }
}

/// Signed shift: positive counts shift left, negative counts shift right
/// arithmetically.
fn arithmetic_shift(width: Width, value: u128, count: i8) -> u128 {
    if count >= 0 {
        shift_left(width, value, count as u32)
    } else {
        let count = (-(count as i32) as u32).min(width.bits() - 1).min(127);
        (sext(value, width) >> count) as u128 & width.mask()
    }
}

fn rotate_left(width: Width, value: u128, count: u32) -> u128 {
    let bits = width.bits();
    let count = count % bits;
    let value = value & width.mask();
    if count == 0 {
        value
    } else {
        ((value << count) | (value >> (bits - count))) & width.mask()
    }
}

fn signed_div(width: Width, dividend: u128, divisor: u128) -> u128 {
    let a = sext(dividend, width);
    let b = sext(divisor, width);
    let min = sext(1 << (width.bits() - 1), width);
    if b == 0 || (a == min && b == -1) {
        dividend & width.mask()
    } else {
        (a / b) as u128 & width.mask()
    }
}

struct Machine<'a> {
    cpu: &'a mut CpuState,
    mem: &'a mut dyn Memory,
    helpers: &'a mut dyn HelperHost,
    values: Vec<u128>,
    args: Vec<HelperArg>,
    check_bit: bool,
    halt: HaltReason,
    halt_pc: u32,
}

enum Step {
    Continue,
    Raise(PendingException),
}

impl<'a> Machine<'a> {
    fn value(&self, value: Value) -> u128 {
        match value {
            Value::Inst(r) => self.values[r.index()],
            v => v.get_imm_as_u128(),
        }
    }

    fn u32_arg(&self, inst: &Inst, idx: usize) -> u32 {
        self.value(inst.arg(idx)) as u32
    }

    fn bool_arg(&self, inst: &Inst, idx: usize) -> bool {
        self.value(inst.arg(idx)) & 1 != 0
    }

    fn stage(&mut self, slot: u8, arg: HelperArg) {
        let slot = slot as usize;
        if self.args.len() <= slot {
            self.args.resize(slot + 1, HelperArg::Value(0));
        }
        self.args[slot] = arg;
    }

    fn raise(code: u8, pc: u32) -> Result<Step, ExecError> {
        let exception = Exception::from_code(code).ok_or(ExecError::UnknownException(code))?;
        Ok(Step::Raise(PendingException { exception, pc }))
    }

    fn ipr_fault(err: StateError, pc: u32) -> Step {
        tracing::warn!(%err, pc = format_args!("{:#010x}", pc), "reserved operand");
        Step::Raise(PendingException { exception: Exception::ReservedOperand, pc })
    }

    fn binary(&self, inst: &Inst) -> (Width, u128, u128) {
        let width = inst.arg(0).get_width();
        (width, self.value(inst.arg(1)) & width.mask(), self.value(inst.arg(2)) & width.mask())
    }

    /// Execute one instruction, storing its result in `values`.
    fn step(&mut self, r: InstRef, inst: &Inst) -> Result<Step, ExecError> {
        use Opcode::*;
        let result: u128 = match inst.opcode {
            Void => 0,

            GetRegister => self.cpu.reg(inst.arg(0).get_reg()) as u128,
            SetRegister => {
                self.cpu.set_reg(inst.arg(0).get_reg(), self.u32_arg(inst, 1));
                0
            }
            GetPsl => self.cpu.psl().value() as u128,
            SetPsl => {
                self.cpu.set_psl(Psl::new(self.u32_arg(inst, 0)));
                0
            }
            GetIpr => match self.cpu.read_ipr(self.u32_arg(inst, 0)) {
                Ok(value) => value as u128,
                Err(err) => return Ok(Self::ipr_fault(err, self.u32_arg(inst, 1))),
            },
            SetIpr => match self.cpu.write_ipr(self.u32_arg(inst, 0), self.u32_arg(inst, 1)) {
                Ok(()) => 0,
                Err(err) => return Ok(Self::ipr_fault(err, self.u32_arg(inst, 2))),
            },

            GetCondition => inst.arg(0).get_cond().holds(self.cpu.flags()) as u128,
            GetCarry => self.cpu.flags().c() as u128,
            GetIntegerOverflowEnable => self.cpu.integer_overflow_enabled() as u128,
            IsKernelMode => self.cpu.is_kernel_mode() as u128,
            SetConditionCodes => {
                let width = inst.arg(1).get_width();
                let cc = LazyCc::new(
                    inst.arg(0).get_cc_op(),
                    width,
                    self.value(inst.arg(2)),
                    self.value(inst.arg(3)),
                    self.value(inst.arg(4)),
                    self.value(inst.arg(5)),
                );
                self.cpu.set_lazy_cc(cc);
                0
            }
            SetCheckBit => {
                self.check_bit = self.bool_arg(inst, 0);
                0
            }

            ReadMemory => {
                let width = inst.arg(0).get_width();
                let address = self.u32_arg(inst, 1);
                self.mem.read_le(address, width.bytes()).ok_or(ExecError::MemoryFault { address })?
            }
            WriteMemory => {
                let width = inst.arg(0).get_width();
                let address = self.u32_arg(inst, 1);
                let value = self.value(inst.arg(2));
                self.mem
                    .write_le(address, width.bytes(), value)
                    .map_err(|address| ExecError::MemoryFault { address })?;
                0
            }

            Add => {
                let (w, a, b) = self.binary(inst);
                a.wrapping_add(b) & w.mask()
            }
            AddWithCarry => {
                let (w, a, b) = self.binary(inst);
                let c = self.bool_arg(inst, 3) as u128;
                a.wrapping_add(b).wrapping_add(c) & w.mask()
            }
            Sub => {
                let (w, a, b) = self.binary(inst);
                a.wrapping_sub(b) & w.mask()
            }
            SubWithBorrow => {
                let (w, a, b) = self.binary(inst);
                let c = self.bool_arg(inst, 3) as u128;
                a.wrapping_sub(b).wrapping_sub(c) & w.mask()
            }
            Mul => {
                let (w, a, b) = self.binary(inst);
                a.wrapping_mul(b) & w.mask()
            }
            SignedDiv => {
                let (w, a, b) = self.binary(inst);
                signed_div(w, a, b)
            }
            And => {
                let (_, a, b) = self.binary(inst);
                a & b
            }
            Or => {
                let (_, a, b) = self.binary(inst);
                a | b
            }
            Xor => {
                let (_, a, b) = self.binary(inst);
                a ^ b
            }
            Not => {
                let width = inst.arg(0).get_width();
                !self.value(inst.arg(1)) & width.mask()
            }
            LogicalShiftLeft => {
                let width = inst.arg(0).get_width();
                let count = self.value(inst.arg(2)).min(u32::MAX as u128) as u32;
                shift_left(width, self.value(inst.arg(1)), count)
            }
            LogicalShiftRight => {
                let width = inst.arg(0).get_width();
                let count = self.value(inst.arg(2)).min(u32::MAX as u128) as u32;
                shift_right(width, self.value(inst.arg(1)), count)
            }
            ArithmeticShift => {
                let width = inst.arg(0).get_width();
                arithmetic_shift(width, self.value(inst.arg(1)), self.value(inst.arg(2)) as u8 as i8)
            }
            RotateLeft => {
                let width = inst.arg(0).get_width();
                rotate_left(width, self.value(inst.arg(1)), self.value(inst.arg(2)) as u32)
            }

            SignExtend => {
                let from = inst.arg(0).get_width();
                let to = inst.arg(1).get_width();
                sext(self.value(inst.arg(2)), from) as u128 & to.mask()
            }
            ZeroExtend => {
                let from = inst.arg(0).get_width();
                self.value(inst.arg(2)) & from.mask()
            }
            Truncate => {
                let to = inst.arg(0).get_width();
                self.value(inst.arg(1)) & to.mask()
            }
            Pack => {
                let half = inst.arg(0).get_width();
                let lo = self.value(inst.arg(1)) & half.mask();
                let hi = self.value(inst.arg(2)) & half.mask();
                (hi << half.bits()) | lo
            }

            IsZero => {
                let width = inst.arg(0).get_width();
                (self.value(inst.arg(1)) & width.mask() == 0) as u128
            }
            CompareLessSigned => {
                let (w, a, b) = self.binary(inst);
                (sext(a, w) < sext(b, w)) as u128
            }
            CompareLessUnsigned => {
                let (_, a, b) = self.binary(inst);
                (a < b) as u128
            }
            Select => {
                let width = inst.arg(0).get_width();
                let chosen = if self.bool_arg(inst, 1) { inst.arg(2) } else { inst.arg(3) };
                self.value(chosen) & width.mask()
            }

            RaiseException => {
                return Self::raise(inst.arg(0).get_u8(), self.u32_arg(inst, 1));
            }
            RaiseExceptionIf => {
                if self.bool_arg(inst, 0) {
                    return Self::raise(inst.arg(1).get_u8(), self.u32_arg(inst, 2));
                }
                0
            }
            Halt => {
                self.halt |= HaltReason::HALT_INSTRUCTION;
                self.halt_pc = self.u32_arg(inst, 0);
                0
            }

            HelperArgRegister => {
                self.stage(inst.arg(0).get_u8(), HelperArg::Register(inst.arg(1).get_reg()));
                0
            }
            HelperArgAddress => {
                let address = self.u32_arg(inst, 1);
                self.stage(inst.arg(0).get_u8(), HelperArg::Address(address));
                0
            }
            HelperArgValue => {
                let value = self.value(inst.arg(1));
                self.stage(inst.arg(0).get_u8(), HelperArg::Value(value));
                0
            }
            CallHelper => {
                let call = HelperCall {
                    family: inst.arg(0).get_helper(),
                    opcode: inst.arg(1).get_u16(),
                    args: std::mem::take(&mut self.args),
                };
                tracing::trace!(family = ?call.family, opcode = call.opcode, "helper call");
                let outcome = self.helpers.call(&call, self.cpu, self.mem)?;
                if let Some(flags) = outcome.flags {
                    self.cpu.set_flags(flags);
                }
                outcome.branch as u128
            }
        };
        self.values[r.index()] = result;
        Ok(Step::Continue)
    }

    fn resolve(&self, terminal: &Terminal) -> Result<u32, ExecError> {
        Ok(match terminal {
            Terminal::Invalid => return Err(ExecError::InvalidTerminal),
            Terminal::ReturnToDispatch | Terminal::PopRSBHint | Terminal::FastDispatchHint => self.cpu.pc(),
            Terminal::LinkBlock { next } => next.pc(),
            Terminal::If { cond, then_, else_ } => {
                if cond.holds(self.cpu.flags()) {
                    self.resolve(then_)?
                } else {
                    self.resolve(else_)?
                }
            }
            Terminal::CheckBit { then_, else_ } => {
                if self.check_bit {
                    self.resolve(then_)?
                } else {
                    self.resolve(else_)?
                }
            }
            Terminal::CheckHalt { else_ } => {
                if self.halt.is_empty() {
                    self.resolve(else_)?
                } else {
                    self.halt_pc
                }
            }
        })
    }
}

/// Run `block` against `cpu` and `mem`. Execution stops at the first
/// exception request, leaving PC at the exception's reported address.
pub fn execute_block(
    block: &Block,
    cpu: &mut CpuState,
    mem: &mut dyn Memory,
    helpers: &mut dyn HelperHost,
) -> Result<BlockExit, ExecError> {
    let mut machine = Machine {
        cpu,
        mem,
        helpers,
        values: vec![0; block.inst_count()],
        args: Vec::new(),
        check_bit: false,
        halt: HaltReason::empty(),
        halt_pc: 0,
    };

    for (r, inst) in block.iter_live() {
        match machine.step(r, inst)? {
            Step::Continue => {}
            Step::Raise(pending) => {
                let mut halt = machine.halt | HaltReason::EXCEPTION;
                if pending.exception == Exception::Breakpoint {
                    halt |= HaltReason::BREAKPOINT;
                }
                machine.cpu.set_pc(pending.pc);
                tracing::debug!(
                    exception = ?pending.exception,
                    pc = format_args!("{:#010x}", pending.pc),
                    inst = %r,
                    "exception requested"
                );
                return Ok(BlockExit { next_pc: pending.pc, halt, exception: Some(pending) });
            }
        }
    }

    let next_pc = machine.resolve(&block.terminal)?;
    machine.cpu.set_pc(next_pc);
    Ok(BlockExit { next_pc, halt: machine.halt, exception: None })
}
