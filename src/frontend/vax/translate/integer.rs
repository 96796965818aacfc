use crate::frontend::vax::cc::CcOp;
use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::translate::operand::{Operand, OperandKind};
use crate::frontend::vax::translate::visitor::TranslatorVisitor;
use crate::ir::cond::Cond;
use crate::ir::types::Width;
use crate::ir::value::Value;

const ZERO: Value = Value::ImmU8(0);

impl<'a> TranslatorVisitor<'a> {
    /// N and Z from `result`, V cleared, C kept.
    pub fn set_logical_cc(&mut self, width: Width, result: Value) {
        let carry = self.ir.get_carry();
        self.ir.set_condition_codes(CcOp::Logical, width, result, ZERO, ZERO, carry);
    }

    fn logical(&mut self, dst: &Operand, result: Value) -> bool {
        self.write_operand(dst, result);
        self.set_logical_cc(dst.width(), result);
        true
    }

    /// ADD2/ADD3: `dst <- augend + addend`.
    pub fn add(&mut self, addend: Value, dst: &Operand, augend: Value) -> bool {
        let width = dst.width();
        let result = self.ir.ir().add(width, augend, addend);
        self.write_operand(dst, result);
        self.ir.set_condition_codes(CcOp::Add, width, result, augend, addend, ZERO);
        self.integer_overflow_trap();
        true
    }

    /// SUB2/SUB3: `dst <- minuend - subtrahend`.
    pub fn sub(&mut self, subtrahend: Value, dst: &Operand, minuend: Value) -> bool {
        let width = dst.width();
        let result = self.ir.ir().sub(width, minuend, subtrahend);
        self.write_operand(dst, result);
        self.ir.set_condition_codes(CcOp::Sub, width, result, minuend, subtrahend, ZERO);
        self.integer_overflow_trap();
        true
    }

    /// MUL2/MUL3.
    pub fn mul(&mut self, multiplier: Value, dst: &Operand, multiplicand: Value) -> bool {
        let width = dst.width();
        let result = self.ir.ir().mul(width, multiplicand, multiplier);
        self.write_operand(dst, result);
        self.ir.set_condition_codes(CcOp::Mul, width, result, multiplicand, multiplier, ZERO);
        self.integer_overflow_trap();
        true
    }

    /// DIV2/DIV3. A zero divisor leaves the dividend as the quotient and traps.
    pub fn div(&mut self, divisor: Value, dst: &Operand, dividend: Value) -> bool {
        let width = dst.width();
        let result = self.ir.ir().signed_div(width, dividend, divisor);
        self.write_operand(dst, result);
        self.ir.set_condition_codes(CcOp::Div, width, result, dividend, divisor, ZERO);

        let by_zero = self.ir.ir().is_zero(width, divisor);
        self.ir.raise_exception_if(by_zero, Exception::IntegerDivideByZero, self.next_pc);

        let v = self.ir.get_condition(Cond::VS);
        let iv = self.ir.get_integer_overflow_enable();
        let nonzero = self.ir.ir().not(Width::W1, by_zero);
        let enabled = self.ir.ir().and(Width::W1, v, iv);
        let trap = self.ir.ir().and(Width::W1, enabled, nonzero);
        self.ir.raise_exception_if(trap, Exception::IntegerOverflow, self.next_pc);
        true
    }

    /// ADWC add.rl, sum.ml
    pub fn adwc(&mut self, ops: &[Operand]) -> bool {
        let addend = ops[0].value();
        let augend = ops[1].value();
        let carry = self.ir.get_carry();
        let result = self.ir.ir().add_with_carry(Width::W32, augend, addend, carry);
        self.write_operand(&ops[1], result);
        self.ir.set_condition_codes(CcOp::Add, Width::W32, result, augend, addend, carry);
        self.integer_overflow_trap();
        true
    }

    /// SBWC sub.rl, dif.ml
    pub fn sbwc(&mut self, ops: &[Operand]) -> bool {
        let subtrahend = ops[0].value();
        let minuend = ops[1].value();
        let borrow = self.ir.get_carry();
        let result = self.ir.ir().sub_with_borrow(Width::W32, minuend, subtrahend, borrow);
        self.write_operand(&ops[1], result);
        self.ir.set_condition_codes(CcOp::Sub, Width::W32, result, minuend, subtrahend, borrow);
        self.integer_overflow_trap();
        true
    }

    /// ADAWI add.rw, sum.mw: a memory sum must be word aligned.
    pub fn adawi(&mut self, ops: &[Operand]) -> bool {
        if let OperandKind::Memory { address, .. } = ops[1].location().kind {
            let low = self.ir.ir().and(Width::W32, address, Value::ImmU32(1));
            let odd = self.ir.ir().is_not_zero(Width::W32, low);
            let pc = self.ir.pc();
            self.ir.raise_exception_if(odd, Exception::ReservedOperand, pc);
        }
        self.add(ops[0].value(), &ops[1], ops[1].value())
    }

    pub fn inc(&mut self, ops: &[Operand]) -> bool {
        let one = Value::imm(ops[0].width(), 1);
        self.add(one, &ops[0], ops[0].value())
    }

    pub fn dec(&mut self, ops: &[Operand]) -> bool {
        let one = Value::imm(ops[0].width(), 1);
        self.sub(one, &ops[0], ops[0].value())
    }

    /// MNEG: `dst <- 0 - src`.
    pub fn mneg(&mut self, ops: &[Operand]) -> bool {
        let width = ops[1].width();
        let zero = Value::imm(width, 0);
        self.sub(ops[0].value(), &ops[1], zero)
    }

    pub fn mcom(&mut self, ops: &[Operand]) -> bool {
        let result = self.ir.ir().not(ops[1].width(), ops[0].value());
        self.logical(&ops[1], result)
    }

    pub fn bis(&mut self, mask: Value, dst: &Operand, src: Value) -> bool {
        let result = self.ir.ir().or(dst.width(), src, mask);
        self.logical(dst, result)
    }

    /// BIC: clear the bits set in `mask`.
    pub fn bic(&mut self, mask: Value, dst: &Operand, src: Value) -> bool {
        let width = dst.width();
        let inverted = self.ir.ir().not(width, mask);
        let result = self.ir.ir().and(width, src, inverted);
        self.logical(dst, result)
    }

    pub fn xor(&mut self, mask: Value, dst: &Operand, src: Value) -> bool {
        let result = self.ir.ir().eor(dst.width(), src, mask);
        self.logical(dst, result)
    }

    /// BIT mask, src: flags of `src AND mask`, nothing stored.
    pub fn bit(&mut self, ops: &[Operand]) -> bool {
        let width = ops[1].width();
        let result = self.ir.ir().and(width, ops[1].value(), ops[0].value());
        self.set_logical_cc(width, result);
        true
    }

    pub fn cmp(&mut self, ops: &[Operand]) -> bool {
        let width = ops[0].width();
        self.ir.set_condition_codes(CcOp::Compare, width, ZERO, ops[0].value(), ops[1].value(), ZERO);
        true
    }

    pub fn tst(&mut self, ops: &[Operand]) -> bool {
        let width = ops[0].width();
        let zero = Value::imm(width, 0);
        self.ir.set_condition_codes(CcOp::Compare, width, ZERO, ops[0].value(), zero, ZERO);
        true
    }

    /// ASHL/ASHQ cnt.rb, src, dst: positive counts shift left.
    pub fn ash(&mut self, ops: &[Operand]) -> bool {
        let width = ops[2].width();
        let count = ops[0].value();
        let src = ops[1].value();
        let result = self.ir.ir().arithmetic_shift(width, src, count);
        self.write_operand(&ops[2], result);
        self.ir.set_condition_codes(CcOp::ArithShift, width, result, src, count, ZERO);
        self.integer_overflow_trap();
        true
    }

    /// ROTL cnt.rb, src.rl, dst.wl
    pub fn rotl(&mut self, ops: &[Operand]) -> bool {
        let result = self.ir.ir().rotate_left(Width::W32, ops[1].value(), ops[0].value());
        self.logical(&ops[2], result)
    }

    /// EMUL mulr, muld, add, prod.wq: `prod <- mulr * muld + add` in 64 bits.
    pub fn emul(&mut self, ops: &[Operand]) -> bool {
        let mulr = self.ir.ir().sign_extend(Width::W32, Width::W64, ops[0].value());
        let muld = self.ir.ir().sign_extend(Width::W32, Width::W64, ops[1].value());
        let addend = self.ir.ir().sign_extend(Width::W32, Width::W64, ops[2].value());
        let product = self.ir.ir().mul(Width::W64, mulr, muld);
        let result = self.ir.ir().add(Width::W64, product, addend);
        self.write_operand(&ops[3], result);
        self.ir.set_condition_codes(CcOp::Compare, Width::W64, ZERO, result, Value::ImmU64(0), ZERO);
        true
    }

    /// INDEX subscript, low, high, size, indexin, indexout.
    pub fn index(&mut self, ops: &[Operand]) -> bool {
        let subscript = ops[0].value();
        let sum = self.ir.ir().add(Width::W32, ops[4].value(), subscript);
        let result = self.ir.ir().mul(Width::W32, sum, ops[3].value());
        self.write_operand(&ops[5], result);
        self.ir.set_condition_codes(CcOp::Compare, Width::W32, ZERO, result, Value::ImmU32(0), ZERO);

        let below = self.ir.ir().compare_less_signed(Width::W32, subscript, ops[1].value());
        let above = self.ir.ir().compare_less_signed(Width::W32, ops[2].value(), subscript);
        let out_of_range = self.ir.ir().or(Width::W1, below, above);
        self.ir.raise_exception_if(out_of_range, Exception::SubscriptRange, self.next_pc);
        true
    }
}
