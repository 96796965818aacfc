use crate::frontend::vax::cc::CcOp;
use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::opcodes::HelperFamily;
use crate::frontend::vax::types::Reg;
use crate::ir::block::Block;
use crate::ir::cond::Cond;
use crate::ir::emitter::IREmitter;
use crate::ir::location::LocationDescriptor;
use crate::ir::opcode::Opcode;
use crate::ir::terminal::Terminal;
use crate::ir::types::Width;
use crate::ir::value::Value;

/// VAX-specific IR emitter. Extends IREmitter with register, PSL, IPR,
/// memory, condition-code, exception and helper operations.
pub struct VaxIREmitter<'a> {
    pub base: IREmitter<'a>,
    pub current_location: LocationDescriptor,
}

impl<'a> VaxIREmitter<'a> {
    pub fn new(block: &'a mut Block, location: LocationDescriptor) -> Self {
        Self {
            base: IREmitter::new(block),
            current_location: location,
        }
    }

    /// Address of the instruction being translated.
    pub fn pc(&self) -> u32 {
        self.current_location.pc()
    }

    pub fn ir(&mut self) -> &mut IREmitter<'a> {
        &mut self.base
    }

    pub fn set_term(&mut self, terminal: Terminal) {
        self.base.set_term(terminal);
    }

    // --- Internal helpers ---

    fn emit(&mut self, opcode: Opcode, args: &[Value]) -> Value {
        let r = self.base.block.append(opcode, args);
        Value::Inst(r)
    }

    fn emit_void(&mut self, opcode: Opcode, args: &[Value]) {
        self.base.block.append(opcode, args);
    }

    // --- Registers ---

    pub fn get_register(&mut self, reg: Reg) -> Value {
        self.emit(Opcode::GetRegister, &[Value::ImmReg(reg)])
    }

    pub fn set_register(&mut self, reg: Reg, value: Value) {
        self.emit_void(Opcode::SetRegister, &[Value::ImmReg(reg), value]);
    }

    /// Write PC. The caller ends the block with a dispatch terminal.
    pub fn branch_write_pc(&mut self, value: Value) {
        self.set_register(Reg::PC, value);
    }

    // --- PSL / IPR ---

    pub fn get_psl(&mut self) -> Value {
        self.emit(Opcode::GetPsl, &[])
    }

    /// Write the PSL, including NZVC.
    pub fn set_psl(&mut self, value: Value) {
        self.emit_void(Opcode::SetPsl, &[value]);
    }

    /// Read an IPR. An index that cannot be read raises a reserved-operand
    /// fault at the current instruction.
    pub fn get_ipr(&mut self, index: Value) -> Value {
        let pc = Value::ImmU32(self.pc());
        self.emit(Opcode::GetIpr, &[index, pc])
    }

    pub fn set_ipr(&mut self, index: Value, value: Value) {
        let pc = Value::ImmU32(self.pc());
        self.emit_void(Opcode::SetIpr, &[index, value, pc]);
    }

    pub fn is_kernel_mode(&mut self) -> Value {
        self.emit(Opcode::IsKernelMode, &[])
    }

    // --- Condition codes ---

    pub fn get_condition(&mut self, cond: Cond) -> Value {
        self.emit(Opcode::GetCondition, &[Value::ImmCond(cond)])
    }

    pub fn get_carry(&mut self) -> Value {
        self.emit(Opcode::GetCarry, &[])
    }

    pub fn get_integer_overflow_enable(&mut self) -> Value {
        self.emit(Opcode::GetIntegerOverflowEnable, &[])
    }

    /// Record a lazy condition-code update.
    pub fn set_condition_codes(
        &mut self,
        op: CcOp,
        width: Width,
        result: Value,
        src1: Value,
        src2: Value,
        aux: Value,
    ) {
        self.emit_void(
            Opcode::SetConditionCodes,
            &[Value::ImmCcOp(op), Value::ImmWidth(width), result, src1, src2, aux],
        );
    }

    /// NZVC given directly as a 4-bit value.
    pub fn set_nzvc(&mut self, nzvc: Value) {
        let zero = Value::ImmU8(0);
        self.set_condition_codes(CcOp::Explicit, Width::W8, zero, nzvc, zero, zero);
    }

    pub fn set_check_bit(&mut self, value: Value) {
        self.emit_void(Opcode::SetCheckBit, &[value]);
    }

    // --- Memory ---

    pub fn read_memory(&mut self, width: Width, vaddr: Value) -> Value {
        self.emit(Opcode::ReadMemory, &[Value::ImmWidth(width), vaddr])
    }

    pub fn write_memory(&mut self, width: Width, vaddr: Value, value: Value) {
        self.emit_void(Opcode::WriteMemory, &[Value::ImmWidth(width), vaddr, value]);
    }

    // --- Exceptions ---

    /// Unconditionally request `exception`, reported at `pc`.
    pub fn raise_exception(&mut self, exception: Exception, pc: u32) {
        self.emit_void(
            Opcode::RaiseException,
            &[Value::ImmU8(exception.code()), Value::ImmU32(pc)],
        );
    }

    /// Request `exception` when `cond` (U1) is set.
    pub fn raise_exception_if(&mut self, cond: Value, exception: Exception, pc: u32) {
        self.emit_void(
            Opcode::RaiseExceptionIf,
            &[cond, Value::ImmU8(exception.code()), Value::ImmU32(pc)],
        );
    }

    /// Raise PrivilegedInstruction unless running in kernel mode.
    pub fn require_kernel_mode(&mut self) {
        let kernel = self.is_kernel_mode();
        let not_kernel = self.base.not(Width::W1, kernel);
        let pc = self.pc();
        self.raise_exception_if(not_kernel, Exception::PrivilegedInstruction, pc);
    }

    pub fn halt(&mut self, pc: u32) {
        self.emit_void(Opcode::Halt, &[Value::ImmU32(pc)]);
    }

    // --- Semantic helpers ---

    pub fn helper_arg_register(&mut self, slot: u8, reg: Reg) {
        self.emit_void(Opcode::HelperArgRegister, &[Value::ImmU8(slot), Value::ImmReg(reg)]);
    }

    pub fn helper_arg_address(&mut self, slot: u8, address: Value) {
        self.emit_void(Opcode::HelperArgAddress, &[Value::ImmU8(slot), address]);
    }

    pub fn helper_arg_value(&mut self, slot: u8, value: Value) {
        self.emit_void(Opcode::HelperArgValue, &[Value::ImmU8(slot), value]);
    }

    /// Invoke the helper for `family`/`opcode` with the arguments staged so far.
    /// Returns the helper's branch decision.
    pub fn call_helper(&mut self, family: HelperFamily, opcode: u16) -> Value {
        self.emit(Opcode::CallHelper, &[Value::ImmHelper(family), Value::ImmU16(opcode)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_round_trip_emission() {
        let mut block = Block::new(LocationDescriptor::from_pc(0x400));
        {
            let mut ir = VaxIREmitter::new(&mut block, LocationDescriptor::from_pc(0x400));
            assert_eq!(ir.pc(), 0x400);
            let r1 = ir.get_register(Reg::R1);
            ir.set_register(Reg::R2, r1);
        }
        assert_eq!(block.inst_count(), 2);
        assert_eq!(block.instructions[1].opcode, Opcode::SetRegister);
        assert_eq!(block.instructions[0].use_count, 1);
    }

    #[test]
    fn test_require_kernel_mode() {
        let mut block = Block::new(LocationDescriptor(0));
        {
            let mut ir = VaxIREmitter::new(&mut block, LocationDescriptor::from_pc(0x10));
            ir.require_kernel_mode();
        }
        let ops: Vec<Opcode> = block.instructions.iter().map(|i| i.opcode).collect();
        assert_eq!(ops, vec![Opcode::IsKernelMode, Opcode::Not, Opcode::RaiseExceptionIf]);
        assert_eq!(
            block.instructions[2].arg(1),
            Value::ImmU8(Exception::PrivilegedInstruction.code())
        );
    }
}
