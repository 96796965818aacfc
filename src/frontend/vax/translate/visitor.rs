use crate::error::DecodeError;
use crate::frontend::vax::decoder::{decode_operand, fetch_opcode};
use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::opcodes::{Handler, InstInfo};
use crate::frontend::vax::specifier::Cursor;
use crate::frontend::vax::translate::operand::Operand;
use crate::frontend::vax::types::Reg;
use crate::ir::block::Block;
use crate::ir::cond::Cond;
use crate::ir::location::LocationDescriptor;
use crate::ir::terminal::Terminal;
use crate::ir::types::Width;
use crate::ir::value::Value;
use crate::ir::vax_emitter::VaxIREmitter;

/// Translator visitor: translates decoded VAX instructions into IR.
pub struct TranslatorVisitor<'a> {
    pub ir: VaxIREmitter<'a>,
    /// Address of the byte after the instruction being translated.
    pub next_pc: u32,
}

impl<'a> TranslatorVisitor<'a> {
    pub fn new(block: &'a mut Block, location: LocationDescriptor) -> Self {
        Self {
            ir: VaxIREmitter::new(block, location),
            next_pc: location.pc(),
        }
    }

    /// Decode the instruction at the current location, resolving each operand
    /// as soon as its bytes are parsed, and emit its semantics.
    ///
    /// Returns whether the block may continue after this instruction. On error
    /// the IR of the partial instruction is left in the block for the caller
    /// to discard.
    pub fn translate_instruction(&mut self, read_code: &dyn Fn(u32) -> Option<u8>) -> Result<bool, DecodeError> {
        let pc = self.ir.pc();
        let mut cursor = Cursor::new(read_code, pc);
        let info = fetch_opcode(&mut cursor)?;

        let mut operands = Vec::with_capacity(info.operands.len());
        for spec in info.operands {
            let spec_pc = cursor.pc();
            let decoded = decode_operand(&mut cursor, *spec)?;
            operands.push(self.evaluate_operand(*spec, &decoded, spec_pc));
        }
        self.next_pc = cursor.pc();

        tracing::trace!(
            pc = format_args!("{:#010x}", pc),
            mnemonic = %info.mnemonic,
            length = self.next_pc.wrapping_sub(pc),
            "translate instruction"
        );
        Ok(self.dispatch(info, &operands))
    }

    /// Emit the semantics of `info` over already evaluated operands.
    pub fn dispatch(&mut self, info: &InstInfo, ops: &[Operand]) -> bool {
        use Handler::*;
        match info.handler {
            Halt => self.halt(),
            Nop => true,
            Bpt => self.bpt(),
            Xfc => self.xfc(),
            Bug => self.bug(),

            Add2 => self.add(ops[0].value(), &ops[1], ops[1].value()),
            Add3 => self.add(ops[0].value(), &ops[2], ops[1].value()),
            Sub2 => self.sub(ops[0].value(), &ops[1], ops[1].value()),
            Sub3 => self.sub(ops[0].value(), &ops[2], ops[1].value()),
            Mul2 => self.mul(ops[0].value(), &ops[1], ops[1].value()),
            Mul3 => self.mul(ops[0].value(), &ops[2], ops[1].value()),
            Div2 => self.div(ops[0].value(), &ops[1], ops[1].value()),
            Div3 => self.div(ops[0].value(), &ops[2], ops[1].value()),
            Adwc => self.adwc(ops),
            Sbwc => self.sbwc(ops),
            Adawi => self.adawi(ops),
            Inc => self.inc(ops),
            Dec => self.dec(ops),
            Mneg => self.mneg(ops),
            Mcom => self.mcom(ops),
            Bis2 => self.bis(ops[0].value(), &ops[1], ops[1].value()),
            Bis3 => self.bis(ops[0].value(), &ops[2], ops[1].value()),
            Bic2 => self.bic(ops[0].value(), &ops[1], ops[1].value()),
            Bic3 => self.bic(ops[0].value(), &ops[2], ops[1].value()),
            Xor2 => self.xor(ops[0].value(), &ops[1], ops[1].value()),
            Xor3 => self.xor(ops[0].value(), &ops[2], ops[1].value()),
            Bit => self.bit(ops),
            Cmp => self.cmp(ops),
            Tst => self.tst(ops),
            Ash => self.ash(ops),
            Rotl => self.rotl(ops),
            Emul => self.emul(ops),
            Index => self.index(ops),

            Mov => self.mov(ops),
            MovFloat => self.mov_float(ops),
            Movz => self.movz(ops),
            Cvt => self.cvt(ops),
            Clr => self.clr(ops),
            Push => self.push(ops),
            Mova => self.mova(ops),
            Pusha => self.pusha(ops),
            Movpsl => self.movpsl(ops),

            Bispsw => self.bispsw(ops),
            Bicpsw => self.bicpsw(ops),
            Mtpr => self.mtpr(ops),
            Mfpr => self.mfpr(ops),

            Bcc(cond) => self.bcc(cond, ops),
            Br => self.br(ops),
            Bsb => self.bsb(ops),
            Jmp => self.jmp(ops),
            Jsb => self.jsb(ops),
            Rsb => self.rsb(),
            Blb { set } => self.blb(set, ops),
            Sob { gtr } => self.sob(gtr, ops),
            Aob { leq } => self.aob(leq, ops),
            Acb => self.acb(ops),
            Case => self.case(ops),
            Bb { set, update } => self.bb(set, update, ops),

            Helper(family) => self.call_helper(family, info.opcode, ops),
            HelperBranch(family) => self.call_helper_branch(family, info.opcode, ops),
        }
    }

    // --- Shared helpers ---

    /// Terminal continuing at `pc`.
    pub fn link(&self, pc: u32) -> Terminal {
        Terminal::link_block(LocationDescriptor::from_pc(pc))
    }

    /// Trap if V is set and PSL<IV> is enabled.
    pub fn integer_overflow_trap(&mut self) {
        let v = self.ir.get_condition(Cond::VS);
        let iv = self.ir.get_integer_overflow_enable();
        let trap = self.ir.ir().and(Width::W1, v, iv);
        self.ir.raise_exception_if(trap, Exception::IntegerOverflow, self.next_pc);
    }

    /// Replace the condition codes with four U1 values.
    pub fn set_flags(&mut self, n: Value, z: Value, v: Value, c: Value) {
        let mut nzvc = Value::ImmU8(0);
        for (bit, flag) in [(3u8, n), (2, z), (1, v), (0, c)] {
            if flag.is_zero() {
                continue;
            }
            let wide = self.ir.ir().zero_extend(Width::W1, Width::W8, flag);
            let placed = if bit == 0 {
                wide
            } else {
                self.ir.ir().logical_shift_left(Width::W8, wide, Value::ImmU8(bit))
            };
            nzvc = self.ir.ir().or(Width::W8, nzvc, placed);
        }
        self.ir.set_nzvc(nzvc);
    }

    /// `value < 0` as U1.
    pub fn is_negative(&mut self, width: Width, value: Value) -> Value {
        self.ir.ir().compare_less_signed(width, value, Value::imm(width, 0))
    }

    /// Signed overflow of `result = a + b`.
    pub fn add_overflow(&mut self, width: Width, a: Value, b: Value, result: Value) -> Value {
        let ar = self.ir.ir().eor(width, a, result);
        let br = self.ir.ir().eor(width, b, result);
        let both = self.ir.ir().and(width, ar, br);
        self.is_negative(width, both)
    }

    /// Signed overflow of `result = a - b`.
    pub fn sub_overflow(&mut self, width: Width, a: Value, b: Value, result: Value) -> Value {
        let ab = self.ir.ir().eor(width, a, b);
        let ar = self.ir.ir().eor(width, a, result);
        let both = self.ir.ir().and(width, ab, ar);
        self.is_negative(width, both)
    }

    /// `-(SP) <- value` for a longword.
    pub fn push_long(&mut self, value: Value) {
        let sp = self.ir.get_register(Reg::SP);
        let new_sp = self.ir.ir().sub(Width::W32, sp, Value::ImmU32(4));
        self.ir.write_memory(Width::W32, new_sp, value);
        self.ir.set_register(Reg::SP, new_sp);
    }

    /// Longword from `(SP)+`.
    pub fn pop_long(&mut self) -> Value {
        let sp = self.ir.get_register(Reg::SP);
        let value = self.ir.read_memory(Width::W32, sp);
        let new_sp = self.ir.ir().add(Width::W32, sp, Value::ImmU32(4));
        self.ir.set_register(Reg::SP, new_sp);
        value
    }
}
