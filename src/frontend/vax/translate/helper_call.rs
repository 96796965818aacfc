//! Instruction families whose semantics live in a host helper.
//!
//! Operands are resolved exactly as for inline families, then staged one per
//! slot: read operands by value, destinations by register or address, branch
//! displacements by target address.

use crate::frontend::vax::opcodes::HelperFamily;
use crate::frontend::vax::translate::operand::{Operand, OperandKind};
use crate::frontend::vax::translate::visitor::TranslatorVisitor;
use crate::ir::terminal::Terminal;
use crate::ir::value::Value;

const OPCODE_RET: u16 = 0x04;

impl<'a> TranslatorVisitor<'a> {
    fn stage_helper_args(&mut self, family: HelperFamily, ops: &[Operand]) {
        if family.is_privileged() {
            self.ir.require_kernel_mode();
        }
        for (slot, op) in ops.iter().enumerate() {
            let slot = slot as u8;
            match *op {
                Operand::Read { value, .. } => self.ir.helper_arg_value(slot, value),
                Operand::Modify { location, .. } | Operand::Write { location } | Operand::Field { location } => {
                    match location.kind {
                        OperandKind::Register(reg) => self.ir.helper_arg_register(slot, reg),
                        OperandKind::Memory { address, .. } => self.ir.helper_arg_address(slot, address),
                        OperandKind::Immediate(value) => self.ir.helper_arg_value(slot, value),
                    }
                }
                Operand::Address { address } => self.ir.helper_arg_address(slot, address),
                Operand::Branch { target } => self.ir.helper_arg_value(slot, Value::ImmU32(target)),
                Operand::Inline { value } => self.ir.helper_arg_value(slot, Value::ImmU32(value)),
            }
        }
    }

    /// Delegate to the helper for `family`. Control-transfer families see PC
    /// pointing at the next instruction and end the block.
    pub fn call_helper(&mut self, family: HelperFamily, opcode: u16, ops: &[Operand]) -> bool {
        self.stage_helper_args(family, ops);
        if !family.transfers_control() {
            self.ir.call_helper(family, opcode);
            return true;
        }

        self.ir.branch_write_pc(Value::ImmU32(self.next_pc));
        self.ir.call_helper(family, opcode);
        let term = if family == HelperFamily::Procedure && opcode == OPCODE_RET {
            Terminal::PopRSBHint
        } else {
            Terminal::ReturnToDispatch
        };
        self.ir.set_term(term);
        false
    }

    /// Delegate a loop instruction; the helper's result decides the branch to
    /// the last (displacement) operand.
    pub fn call_helper_branch(&mut self, family: HelperFamily, opcode: u16, ops: &[Operand]) -> bool {
        self.stage_helper_args(family, ops);
        let taken = self.ir.call_helper(family, opcode);
        self.ir.set_check_bit(taken);

        let target = ops.last().map_or(self.next_pc, Operand::target);
        let then_ = self.link(target);
        let else_ = self.link(self.next_pc);
        self.ir.set_term(Terminal::check_bit(then_, else_));
        false
    }
}
