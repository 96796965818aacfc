use crate::frontend::vax::cc::CcOp;
use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::translate::operand::{Operand, OperandKind};
use crate::frontend::vax::translate::visitor::TranslatorVisitor;
use crate::ir::cond::Cond;
use crate::ir::terminal::Terminal;
use crate::ir::types::Width;
use crate::ir::value::Value;

impl<'a> TranslatorVisitor<'a> {
    /// End the block on the check bit: `target` when set, else fall through.
    fn branch_on_check_bit(&mut self, taken: Value, target: u32) -> bool {
        self.ir.set_check_bit(taken);
        let then_ = self.link(target);
        let else_ = self.link(self.next_pc);
        self.ir.set_term(Terminal::check_bit(then_, else_));
        false
    }

    /// Bcc displ.bb
    pub fn bcc(&mut self, cond: Cond, ops: &[Operand]) -> bool {
        let then_ = self.link(ops[0].target());
        let else_ = self.link(self.next_pc);
        self.ir.set_term(Terminal::if_then_else(cond, then_, else_));
        false
    }

    /// BRB/BRW
    pub fn br(&mut self, ops: &[Operand]) -> bool {
        let term = self.link(ops[0].target());
        self.ir.set_term(term);
        false
    }

    /// BSBB/BSBW: push the return address, then branch.
    pub fn bsb(&mut self, ops: &[Operand]) -> bool {
        self.push_long(Value::ImmU32(self.next_pc));
        let term = self.link(ops[0].target());
        self.ir.set_term(term);
        false
    }

    pub fn jmp(&mut self, ops: &[Operand]) -> bool {
        self.ir.branch_write_pc(ops[0].address());
        self.ir.set_term(Terminal::FastDispatchHint);
        false
    }

    /// JSB dst.ab: the destination is evaluated before the push.
    pub fn jsb(&mut self, ops: &[Operand]) -> bool {
        let target = ops[0].address();
        self.push_long(Value::ImmU32(self.next_pc));
        self.ir.branch_write_pc(target);
        self.ir.set_term(Terminal::FastDispatchHint);
        false
    }

    pub fn rsb(&mut self) -> bool {
        let target = self.pop_long();
        self.ir.branch_write_pc(target);
        self.ir.set_term(Terminal::PopRSBHint);
        false
    }

    /// BLBS/BLBC src.rl, displ.bb
    pub fn blb(&mut self, set: bool, ops: &[Operand]) -> bool {
        let low = self.ir.ir().and(Width::W32, ops[0].value(), Value::ImmU32(1));
        let taken = if set {
            self.ir.ir().is_not_zero(Width::W32, low)
        } else {
            self.ir.ir().is_zero(Width::W32, low)
        };
        self.branch_on_check_bit(taken, ops[1].target())
    }

    /// SOBGEQ/SOBGTR index.ml, displ.bb
    pub fn sob(&mut self, gtr: bool, ops: &[Operand]) -> bool {
        let old = ops[0].value();
        let one = Value::ImmU32(1);
        let new = self.ir.ir().sub(Width::W32, old, one);
        self.write_operand(&ops[0], new);

        let n = self.is_negative(Width::W32, new);
        let z = self.ir.ir().is_zero(Width::W32, new);
        let v = self.sub_overflow(Width::W32, old, one, new);
        let c = self.ir.get_carry();
        self.set_flags(n, z, v, c);
        self.integer_overflow_trap();

        let taken = if gtr {
            self.ir.ir().compare_less_signed(Width::W32, Value::ImmU32(0), new)
        } else {
            self.ir.ir().not(Width::W1, n)
        };
        self.branch_on_check_bit(taken, ops[1].target())
    }

    /// AOBLSS/AOBLEQ limit.rl, index.ml, displ.bb
    pub fn aob(&mut self, leq: bool, ops: &[Operand]) -> bool {
        let limit = ops[0].value();
        let old = ops[1].value();
        let one = Value::ImmU32(1);
        let new = self.ir.ir().add(Width::W32, old, one);
        self.write_operand(&ops[1], new);

        let n = self.is_negative(Width::W32, new);
        let z = self.ir.ir().is_zero(Width::W32, new);
        let v = self.add_overflow(Width::W32, old, one, new);
        let c = self.ir.get_carry();
        self.set_flags(n, z, v, c);
        self.integer_overflow_trap();

        let taken = if leq {
            let above = self.ir.ir().compare_less_signed(Width::W32, limit, new);
            self.ir.ir().not(Width::W1, above)
        } else {
            self.ir.ir().compare_less_signed(Width::W32, new, limit)
        };
        self.branch_on_check_bit(taken, ops[2].target())
    }

    /// ACBB/ACBW/ACBL limit, add, index.mx, displ.bw: the loop test direction
    /// follows the sign of `add`.
    pub fn acb(&mut self, ops: &[Operand]) -> bool {
        let width = ops[2].width();
        let limit = ops[0].value();
        let addend = ops[1].value();
        let old = ops[2].value();
        let new = self.ir.ir().add(width, old, addend);
        self.write_operand(&ops[2], new);

        let n = self.is_negative(width, new);
        let z = self.ir.ir().is_zero(width, new);
        let v = self.add_overflow(width, old, addend, new);
        let c = self.ir.get_carry();
        self.set_flags(n, z, v, c);
        self.integer_overflow_trap();

        let descending = self.is_negative(width, addend);
        let above = self.ir.ir().compare_less_signed(width, limit, new);
        let below = self.ir.ir().compare_less_signed(width, new, limit);
        let le = self.ir.ir().not(Width::W1, above);
        let ge = self.ir.ir().not(Width::W1, below);
        let taken = self.ir.ir().select(Width::W1, descending, ge, le);
        self.branch_on_check_bit(taken, ops[3].target())
    }

    /// CASEB/W/L selector, base, limit. The word displacement table follows
    /// the operands; an out-of-range index falls past the table.
    pub fn case(&mut self, ops: &[Operand]) -> bool {
        let width = ops[0].width();
        let limit = ops[2].value();
        let tmp = self.ir.ir().sub(width, ops[0].value(), ops[1].value());
        self.ir.set_condition_codes(CcOp::Compare, width, Value::ImmU8(0), tmp, limit, Value::ImmU8(0));

        let above = self.ir.ir().compare_less_unsigned(width, limit, tmp);
        let in_range = self.ir.ir().not(Width::W1, above);
        let table = Value::ImmU32(self.next_pc);

        let tmp32 = self.ir.ir().zero_extend(width, Width::W32, tmp);
        let index = self.ir.ir().select(Width::W32, in_range, tmp32, Value::ImmU32(0));
        let offset = self.ir.ir().logical_shift_left(Width::W32, index, Value::ImmU8(1));
        let entry = self.ir.ir().add(Width::W32, table, offset);
        let raw = self.ir.read_memory(Width::W16, entry);
        let disp = self.ir.ir().sign_extend(Width::W16, Width::W32, raw);
        let selected = self.ir.ir().add(Width::W32, table, disp);

        let limit32 = self.ir.ir().zero_extend(width, Width::W32, limit);
        let entries = self.ir.ir().add(Width::W32, limit32, Value::ImmU32(1));
        let table_len = self.ir.ir().logical_shift_left(Width::W32, entries, Value::ImmU8(1));
        let past_table = self.ir.ir().add(Width::W32, table, table_len);

        let target = self.ir.ir().select(Width::W32, in_range, selected, past_table);
        self.ir.branch_write_pc(target);
        self.ir.set_term(Terminal::FastDispatchHint);
        false
    }

    /// BBS/BBC and the set/clear/interlocked forms: pos.rl, base.vb, displ.bb.
    pub fn bb(&mut self, set: bool, update: Option<bool>, ops: &[Operand]) -> bool {
        let pos = ops[0].value();
        let bit = match ops[1].location().kind {
            OperandKind::Register(reg) => {
                let too_far = self.ir.ir().compare_less_unsigned(Width::W32, Value::ImmU32(31), pos);
                let pc = self.ir.pc();
                self.ir.raise_exception_if(too_far, Exception::ReservedOperand, pc);

                let value = self.ir.get_register(reg);
                let shifted = self.ir.ir().logical_shift_right(Width::W32, value, pos);
                let low = self.ir.ir().and(Width::W32, shifted, Value::ImmU32(1));
                let bit = self.ir.ir().is_not_zero(Width::W32, low);
                if let Some(new) = update {
                    let mask = self.ir.ir().logical_shift_left(Width::W32, Value::ImmU32(1), pos);
                    let updated = self.update_bit(Width::W32, value, mask, new);
                    self.ir.set_register(reg, updated);
                }
                bit
            }
            OperandKind::Memory { address, .. } => {
                // pos is a signed bit offset from the base byte
                let byte_offset = self.ir.ir().arithmetic_shift(Width::W32, pos, Value::ImmU8(-3i8 as u8));
                let byte_address = self.ir.ir().add(Width::W32, address, byte_offset);
                let bit_number = self.ir.ir().and(Width::W32, pos, Value::ImmU32(7));
                let byte = self.ir.read_memory(Width::W8, byte_address);
                let shifted = self.ir.ir().logical_shift_right(Width::W8, byte, bit_number);
                let low = self.ir.ir().and(Width::W8, shifted, Value::ImmU8(1));
                let bit = self.ir.ir().is_not_zero(Width::W8, low);
                if let Some(new) = update {
                    let mask = self.ir.ir().logical_shift_left(Width::W8, Value::ImmU8(1), bit_number);
                    let updated = self.update_bit(Width::W8, byte, mask, new);
                    self.ir.write_memory(Width::W8, byte_address, updated);
                }
                bit
            }
            OperandKind::Immediate(_) => panic!("bit field base cannot be an immediate"),
        };

        let taken = if set { bit } else { self.ir.ir().not(Width::W1, bit) };
        self.branch_on_check_bit(taken, ops[2].target())
    }

    fn update_bit(&mut self, width: Width, value: Value, mask: Value, set: bool) -> Value {
        if set {
            self.ir.ir().or(width, value, mask)
        } else {
            let inverted = self.ir.ir().not(width, mask);
            self.ir.ir().and(width, value, inverted)
        }
    }
}
