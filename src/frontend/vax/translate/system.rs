use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::translate::operand::Operand;
use crate::frontend::vax::translate::visitor::TranslatorVisitor;
use crate::ir::terminal::Terminal;
use crate::ir::types::Width;
use crate::ir::value::Value;

impl<'a> TranslatorVisitor<'a> {
    /// HALT: kernel mode only; resumes after the HALT if the host continues.
    pub fn halt(&mut self) -> bool {
        self.ir.require_kernel_mode();
        self.ir.halt(self.next_pc);
        let resume = self.link(self.next_pc);
        self.ir.set_term(Terminal::check_halt(resume));
        false
    }

    pub fn bpt(&mut self) -> bool {
        self.raise_fault(Exception::Breakpoint)
    }

    pub fn xfc(&mut self) -> bool {
        self.raise_fault(Exception::CustomerReserved)
    }

    /// BUGW/BUGL: reserved instruction fault; the inline code is for the handler.
    pub fn bug(&mut self) -> bool {
        self.raise_fault(Exception::ReservedInstruction)
    }

    fn raise_fault(&mut self, exception: Exception) -> bool {
        let pc = self.ir.pc();
        self.ir.raise_exception(exception, pc);
        self.ir.set_term(Terminal::ReturnToDispatch);
        false
    }

    /// Reserved operand unless the high byte of the PSW mask is zero.
    fn check_psw_mask(&mut self, mask: Value) -> Value {
        let high = self.ir.ir().and(Width::W16, mask, Value::ImmU16(0xFF00));
        let bad = self.ir.ir().is_not_zero(Width::W16, high);
        let pc = self.ir.pc();
        self.ir.raise_exception_if(bad, Exception::ReservedOperand, pc);
        self.ir.ir().zero_extend(Width::W16, Width::W32, mask)
    }

    /// BISPSW mask.rw. Ends the block: T and the trap enables may change.
    pub fn bispsw(&mut self, ops: &[Operand]) -> bool {
        let mask = self.check_psw_mask(ops[0].value());
        let psl = self.ir.get_psl();
        let new = self.ir.ir().or(Width::W32, psl, mask);
        self.ir.set_psl(new);
        let term = self.link(self.next_pc);
        self.ir.set_term(term);
        false
    }

    /// BICPSW mask.rw
    pub fn bicpsw(&mut self, ops: &[Operand]) -> bool {
        let mask = self.check_psw_mask(ops[0].value());
        let psl = self.ir.get_psl();
        let inverted = self.ir.ir().not(Width::W32, mask);
        let new = self.ir.ir().and(Width::W32, psl, inverted);
        self.ir.set_psl(new);
        let term = self.link(self.next_pc);
        self.ir.set_term(term);
        false
    }

    /// MTPR src.rl, procreg.rl. Ends the block.
    pub fn mtpr(&mut self, ops: &[Operand]) -> bool {
        self.ir.require_kernel_mode();
        let src = ops[0].value();
        self.ir.set_ipr(ops[1].value(), src);
        self.set_logical_cc(Width::W32, src);
        let term = self.link(self.next_pc);
        self.ir.set_term(term);
        false
    }

    /// MFPR procreg.rl, dst.wl
    pub fn mfpr(&mut self, ops: &[Operand]) -> bool {
        self.ir.require_kernel_mode();
        let value = self.ir.get_ipr(ops[0].value());
        self.write_operand(&ops[1], value);
        self.set_logical_cc(Width::W32, value);
        true
    }
}
