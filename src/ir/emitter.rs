use crate::ir::block::Block;
use crate::ir::opcode::Opcode;
use crate::ir::terminal::Terminal;
use crate::ir::types::Width;
use crate::ir::value::Value;

/// Base IR emitter: the builder API for constructing IR blocks.
/// Wraps a Block and appends width-generic instructions to it.
pub struct IREmitter<'a> {
    pub block: &'a mut Block,
}

impl<'a> IREmitter<'a> {
    pub fn new(block: &'a mut Block) -> Self {
        Self { block }
    }

    /// Internal: emit an instruction and return its Value as an InstRef.
    fn emit(&mut self, opcode: Opcode, args: &[Value]) -> Value {
        let r = self.block.append(opcode, args);
        Value::Inst(r)
    }

    /// Set the block terminal.
    pub fn set_term(&mut self, terminal: Terminal) {
        self.block.set_terminal(terminal);
    }

    // --- Immediates ---

    pub fn imm(&self, width: Width, value: u128) -> Value { Value::imm(width, value) }
    pub fn imm1(&self, value: bool) -> Value { Value::ImmU1(value) }
    pub fn imm8(&self, value: u8) -> Value { Value::ImmU8(value) }
    pub fn imm32(&self, value: u32) -> Value { Value::ImmU32(value) }

    // --- ALU ---

    pub fn add(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::Add, &[Value::ImmWidth(width), a, b])
    }

    pub fn add_with_carry(&mut self, width: Width, a: Value, b: Value, carry_in: Value) -> Value {
        self.emit(Opcode::AddWithCarry, &[Value::ImmWidth(width), a, b, carry_in])
    }

    /// `a - b`.
    pub fn sub(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::Sub, &[Value::ImmWidth(width), a, b])
    }

    pub fn sub_with_borrow(&mut self, width: Width, a: Value, b: Value, borrow_in: Value) -> Value {
        self.emit(Opcode::SubWithBorrow, &[Value::ImmWidth(width), a, b, borrow_in])
    }

    pub fn mul(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::Mul, &[Value::ImmWidth(width), a, b])
    }

    /// Truncating signed division. A zero divisor yields the dividend.
    pub fn signed_div(&mut self, width: Width, dividend: Value, divisor: Value) -> Value {
        self.emit(Opcode::SignedDiv, &[Value::ImmWidth(width), dividend, divisor])
    }

    pub fn and(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::And, &[Value::ImmWidth(width), a, b])
    }

    pub fn or(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::Or, &[Value::ImmWidth(width), a, b])
    }

    pub fn eor(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::Xor, &[Value::ImmWidth(width), a, b])
    }

    pub fn not(&mut self, width: Width, a: Value) -> Value {
        self.emit(Opcode::Not, &[Value::ImmWidth(width), a])
    }

    // --- Shifts ---

    pub fn logical_shift_left(&mut self, width: Width, value: Value, count: Value) -> Value {
        self.emit(Opcode::LogicalShiftLeft, &[Value::ImmWidth(width), value, count])
    }

    pub fn logical_shift_right(&mut self, width: Width, value: Value, count: Value) -> Value {
        self.emit(Opcode::LogicalShiftRight, &[Value::ImmWidth(width), value, count])
    }

    /// Shift by a signed byte count: positive shifts left, negative shifts right arithmetically.
    pub fn arithmetic_shift(&mut self, width: Width, value: Value, count: Value) -> Value {
        self.emit(Opcode::ArithmeticShift, &[Value::ImmWidth(width), value, count])
    }

    /// Rotate left by `count` modulo the width.
    pub fn rotate_left(&mut self, width: Width, value: Value, count: Value) -> Value {
        self.emit(Opcode::RotateLeft, &[Value::ImmWidth(width), value, count])
    }

    // --- Width conversion ---

    pub fn sign_extend(&mut self, from: Width, to: Width, value: Value) -> Value {
        if from == to {
            return value;
        }
        self.emit(Opcode::SignExtend, &[Value::ImmWidth(from), Value::ImmWidth(to), value])
    }

    pub fn zero_extend(&mut self, from: Width, to: Width, value: Value) -> Value {
        if from == to {
            return value;
        }
        self.emit(Opcode::ZeroExtend, &[Value::ImmWidth(from), Value::ImmWidth(to), value])
    }

    pub fn truncate(&mut self, to: Width, value: Value) -> Value {
        self.emit(Opcode::Truncate, &[Value::ImmWidth(to), value])
    }

    /// Concatenate two `half`-width values into one of twice the width.
    pub fn pack(&mut self, half: Width, lo: Value, hi: Value) -> Value {
        self.emit(Opcode::Pack, &[Value::ImmWidth(half), lo, hi])
    }

    // --- Comparison ---

    pub fn is_zero(&mut self, width: Width, value: Value) -> Value {
        self.emit(Opcode::IsZero, &[Value::ImmWidth(width), value])
    }

    pub fn is_not_zero(&mut self, width: Width, value: Value) -> Value {
        let z = self.is_zero(width, value);
        self.not(Width::W1, z)
    }

    pub fn compare_less_signed(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::CompareLessSigned, &[Value::ImmWidth(width), a, b])
    }

    pub fn compare_less_unsigned(&mut self, width: Width, a: Value, b: Value) -> Value {
        self.emit(Opcode::CompareLessUnsigned, &[Value::ImmWidth(width), a, b])
    }

    /// `cond ? then_val : else_val`.
    pub fn select(&mut self, width: Width, cond: Value, then_val: Value, else_val: Value) -> Value {
        self.emit(Opcode::Select, &[Value::ImmWidth(width), cond, then_val, else_val])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::location::LocationDescriptor;

    #[test]
    fn test_emitter_builds_block() {
        let mut block = Block::new(LocationDescriptor(0));
        {
            let mut ir = IREmitter::new(&mut block);
            let a = ir.imm(Width::W32, 5);
            let b = ir.imm(Width::W32, 7);
            let sum = ir.add(Width::W32, a, b);
            let _ = ir.is_zero(Width::W32, sum);
            ir.set_term(Terminal::ReturnToDispatch);
        }
        assert_eq!(block.inst_count(), 2);
        assert_eq!(block.instructions[0].opcode, Opcode::Add);
        assert_eq!(block.instructions[0].use_count, 1);
        assert_eq!(block.terminal, Terminal::ReturnToDispatch);
    }

    #[test]
    fn test_same_width_extension_is_free() {
        let mut block = Block::new(LocationDescriptor(0));
        let mut ir = IREmitter::new(&mut block);
        let v = ir.imm(Width::W32, 1);
        assert_eq!(ir.sign_extend(Width::W32, Width::W32, v), v);
        assert_eq!(ir.zero_extend(Width::W8, Width::W8, v), v);
        assert!(block.is_empty());
    }
}
