use crate::frontend::vax::cc::CcOp;
use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::translate::operand::{float_exponent_mask, Operand};
use crate::frontend::vax::translate::visitor::TranslatorVisitor;
use crate::ir::types::Width;
use crate::ir::value::Value;

impl<'a> TranslatorVisitor<'a> {
    /// MOVB/W/L/Q/O
    pub fn mov(&mut self, ops: &[Operand]) -> bool {
        let value = ops[0].value();
        self.write_operand(&ops[1], value);
        self.set_logical_cc(ops[1].width(), value);
        true
    }

    /// MOVF/D/G/H: bit copy. A reserved operand (sign set, exponent zero)
    /// faults before anything is stored.
    pub fn mov_float(&mut self, ops: &[Operand]) -> bool {
        let data_type = ops[1].location().data_type;
        let exp_mask = float_exponent_mask(data_type);
        let value = ops[0].value();

        let word = self.ir.ir().truncate(Width::W16, value);
        let sign_bit = self.ir.ir().and(Width::W16, word, Value::ImmU16(0x8000));
        let negative = self.ir.ir().is_not_zero(Width::W16, sign_bit);
        let exponent = self.ir.ir().and(Width::W16, word, Value::ImmU16(exp_mask));
        let exp_zero = self.ir.ir().is_zero(Width::W16, exponent);
        // A reserved immediate already raised when the operand was evaluated.
        if !value.is_immediate() {
            let reserved = self.ir.ir().and(Width::W1, negative, exp_zero);
            let pc = self.ir.pc();
            self.ir.raise_exception_if(reserved, Exception::ReservedOperand, pc);
        }

        self.write_operand(&ops[1], value);

        let carry = self.ir.get_carry();
        self.set_flags(negative, exp_zero, Value::ImmU1(false), carry);
        true
    }

    /// MOVZ: zero extend into a wider destination.
    pub fn movz(&mut self, ops: &[Operand]) -> bool {
        let to = ops[1].width();
        let result = self.ir.ir().zero_extend(ops[0].width(), to, ops[0].value());
        self.write_operand(&ops[1], result);
        self.set_logical_cc(to, result);
        true
    }

    /// Integer CVT: sign extend or truncate; V on lost significance.
    pub fn cvt(&mut self, ops: &[Operand]) -> bool {
        let from = ops[0].width();
        let to = ops[1].width();
        let src = ops[0].value();
        let widening = to.bits() > from.bits();
        let result = if widening {
            self.ir.ir().sign_extend(from, to, src)
        } else {
            self.ir.ir().truncate(to, src)
        };
        self.write_operand(&ops[1], result);
        let from_bits = Value::ImmU8(from.bits() as u8);
        self.ir.set_condition_codes(CcOp::Convert, to, result, src, Value::ImmU8(0), from_bits);
        if !widening {
            self.integer_overflow_trap();
        }
        true
    }

    pub fn clr(&mut self, ops: &[Operand]) -> bool {
        let width = ops[0].width();
        let zero = Value::imm(width, 0);
        self.write_operand(&ops[0], zero);
        self.set_logical_cc(width, zero);
        true
    }

    /// PUSHL src: the source is evaluated before SP moves.
    pub fn push(&mut self, ops: &[Operand]) -> bool {
        let value = ops[0].value();
        self.push_long(value);
        self.set_logical_cc(Width::W32, value);
        true
    }

    pub fn mova(&mut self, ops: &[Operand]) -> bool {
        let address = ops[0].address();
        self.write_operand(&ops[1], address);
        self.set_logical_cc(Width::W32, address);
        true
    }

    pub fn pusha(&mut self, ops: &[Operand]) -> bool {
        let address = ops[0].address();
        self.push_long(address);
        self.set_logical_cc(Width::W32, address);
        true
    }

    /// MOVPSL: condition codes are not affected.
    pub fn movpsl(&mut self, ops: &[Operand]) -> bool {
        let psl = self.ir.get_psl();
        self.write_operand(&ops[0], psl);
        true
    }
}
