mod branch;
mod helper_call;
mod integer;
mod moves;
pub mod operand;
mod system;
mod visitor;

pub use operand::{Operand, OperandKind, OperandValue};
pub use visitor::TranslatorVisitor;

use crate::config::{Optimizations, TranslationOptions};
use crate::error::DecodeError;
use crate::ir::block::Block;
use crate::ir::location::LocationDescriptor;
use crate::ir::opt;
use crate::ir::terminal::Terminal;

/// A decode error together with the address of the instruction it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeFault {
    /// Address of the instruction whose decode failed.
    pub address: u32,
    pub error: DecodeError,
}

/// Why the builder stopped adding instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// An instruction ended the block (branch, trap, PSL write, ...).
    Branch,
    /// The instruction or byte limit was reached.
    Limit,
    /// The next instruction could not be decoded.
    Fault(DecodeFault),
}

/// Result of translating one block.
#[derive(Debug, Clone)]
pub struct Translation {
    pub block: Block,
    /// Address following the last translated instruction; for a fault, the
    /// address of the faulting instruction.
    pub next_pc: u32,
    pub reason: TerminationReason,
}

/// Translate the block of VAX instructions starting at `pc`.
pub fn translate(
    pc: u32,
    read_code: &dyn Fn(u32) -> Option<u8>,
    options: &TranslationOptions,
) -> Translation {
    let location = LocationDescriptor::from_pc(pc);
    let mut block = Block::new(location);
    let limit = options.instruction_limit();
    let mut visitor = TranslatorVisitor::new(&mut block, location);

    let mut current = pc;
    let mut count = 0usize;
    let reason = loop {
        if count >= limit || (count > 0 && current.wrapping_sub(pc) >= options.max_block_bytes) {
            break TerminationReason::Limit;
        }

        visitor.ir.current_location = LocationDescriptor::from_pc(current);
        let start_len = visitor.ir.base.block.inst_count();
        match visitor.translate_instruction(read_code) {
            Ok(should_continue) => {
                count += 1;
                visitor.ir.base.block.cycle_count += 1;
                current = visitor.next_pc;
                if !should_continue {
                    break TerminationReason::Branch;
                }
            }
            Err(error) => {
                visitor.ir.base.block.truncate(start_len);
                tracing::warn!(
                    pc = format_args!("{:#010x}", current),
                    %error,
                    "decode fault, block ends before the faulting instruction"
                );
                break TerminationReason::Fault(DecodeFault { address: current, error });
            }
        }
    };

    if block.terminal.is_invalid() {
        block.set_terminal(Terminal::link_block(LocationDescriptor::from_pc(current)));
    }

    if options.has_optimization(Optimizations::DEAD_CODE_ELIMINATION) {
        opt::dead_code_elimination(&mut block);
    }
    if options.has_optimization(Optimizations::VERIFY) {
        opt::verification_pass(&block);
    }

    tracing::debug!(
        pc = format_args!("{:#010x}", pc),
        instructions = count,
        ir = block.live_inst_count(),
        reason = ?reason,
        "translated block"
    );

    Translation { block, next_pc: current, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::vax::cc::Nzvc;
    use crate::frontend::vax::exception::Exception;
    use crate::frontend::vax::opcodes;
    use crate::frontend::vax::state::CpuState;
    use crate::frontend::vax::types::Reg;
    use crate::halt_reason::HaltReason;
    use crate::interp::{execute_block, BlockExit, FlatMemory, NoHelpers};
    use crate::ir::opcode::Opcode;

    const BASE: u32 = 0x1000;

    fn verified() -> TranslationOptions {
        TranslationOptions {
            optimizations: Optimizations::DEAD_CODE_ELIMINATION | Optimizations::VERIFY,
            ..Default::default()
        }
    }

    fn translate_bytes(code: &[u8], options: &TranslationOptions) -> Translation {
        let code = code.to_vec();
        let read = move |addr: u32| code.get(addr.wrapping_sub(BASE) as usize).copied();
        translate(BASE, &read, options)
    }

    fn machine(code: &[u8]) -> (CpuState, FlatMemory) {
        let mut mem = FlatMemory::new(0, 0x10000);
        mem.load(BASE, code);
        let mut cpu = CpuState::new();
        cpu.reset();
        cpu.set_reg(Reg::SP, 0x8000);
        (cpu, mem)
    }

    fn run(code: &[u8], cpu: &mut CpuState, mem: &mut FlatMemory) -> (Translation, BlockExit) {
        let t = translate_bytes(code, &verified());
        let exit = execute_block(&t.block, cpu, mem, &mut NoHelpers).unwrap();
        (t, exit)
    }

    fn count_opcode(block: &Block, opcode: Opcode) -> usize {
        block.iter_live().filter(|(_, inst)| inst.opcode == opcode).count()
    }

    #[test]
    fn test_addl3_registers() {
        // ADDL3 R1, R2, R3
        let code = [0xC1, 0x51, 0x52, 0x53];
        let cases: [(u32, u32, Nzvc); 4] = [
            (1, 2, Nzvc::empty()),
            (0x7FFF_FFFF, 1, Nzvc::N | Nzvc::V),
            (0xFFFF_FFFF, 1, Nzvc::Z | Nzvc::C),
            (0x8000_0000, 0x8000_0000, Nzvc::Z | Nzvc::V | Nzvc::C),
        ];
        for (a, b, flags) in cases {
            let (mut cpu, mut mem) = machine(&code);
            cpu.set_reg(Reg::R1, a);
            cpu.set_reg(Reg::R2, b);
            run(&code, &mut cpu, &mut mem);
            assert_eq!(cpu.reg(Reg::R3), a.wrapping_add(b));
            assert_eq!(cpu.flags(), flags, "{:#x} + {:#x}", a, b);
        }
    }

    #[test]
    fn test_movl_keeps_carry() {
        // MOVL R1, R2
        let code = [0xD0, 0x51, 0x52];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R1, 0x8000_0001);
        cpu.set_flags(Nzvc::C | Nzvc::V | Nzvc::Z);
        run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R2), 0x8000_0001);
        assert_eq!(cpu.flags(), Nzvc::N | Nzvc::C);
    }

    #[test]
    fn test_register_mode_has_no_memory_access() {
        for r in 0..14u8 {
            // MOVL Rr, R(r+1)
            let code = [0xD0, 0x50 | r, 0x50 | (r + 1)];
            let t = translate_bytes(&code, &verified());
            assert_eq!(count_opcode(&t.block, Opcode::ReadMemory), 0);
            assert_eq!(count_opcode(&t.block, Opcode::WriteMemory), 0);
            let writes: Vec<_> = t
                .block
                .iter_live()
                .filter(|(_, i)| i.opcode == Opcode::SetRegister)
                .map(|(_, i)| i.arg(0).get_reg())
                .collect();
            assert_eq!(writes, vec![Reg::from_u8(r + 1)]);
        }
    }

    #[test]
    fn test_autoincrement_and_autodecrement() {
        // MOVW (R1)+, -(R2)
        let code = [0xB0, 0x81, 0x72];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R1, 0x2000);
        cpu.set_reg(Reg::R2, 0x3000);
        mem.load(0x2000, &[0x34, 0x12]);
        run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R1), 0x2002);
        assert_eq!(cpu.reg(Reg::R2), 0x2FFE);
        assert_eq!(mem.read_bytes(0x2FFE, 2), Some(vec![0x34, 0x12]));
    }

    #[test]
    fn test_autoincrement_step_follows_operand_size() {
        // MOVQ (R1)+, R8 ; MOVQ -(R2), R10 ; MOVO (R3)+, -(R4) ; MOVQ @(R5)+, R6
        let code = [
            0x7D, 0x81, 0x58, 0x7D, 0x72, 0x5A, 0xFD, 0x7D, 0x83, 0x74, 0x7D, 0x95, 0x56,
        ];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R1, 0x2000);
        cpu.set_reg(Reg::R2, 0x3000);
        cpu.set_reg(Reg::R3, 0x4000);
        cpu.set_reg(Reg::R4, 0x4800);
        cpu.set_reg(Reg::R5, 0x5000);
        mem.load(0x2000, &0x1122_3344_5566_7788u64.to_le_bytes());
        mem.load(0x2FF8, &0xAABB_CCDD_EEFF_0011u64.to_le_bytes());
        let octa: Vec<u8> = (0..16).collect();
        mem.load(0x4000, &octa);
        mem.load(0x5000, &0x5100u32.to_le_bytes());
        mem.load(0x5100, &0x0102_0304_0506_0708u64.to_le_bytes());

        let (t, _) = run(&code, &mut cpu, &mut mem);
        assert_eq!(t.block.cycle_count, 4);

        assert_eq!(cpu.reg(Reg::R1), 0x2008);
        assert_eq!((cpu.reg(Reg::R8), cpu.reg(Reg::R9)), (0x5566_7788, 0x1122_3344));
        assert_eq!(cpu.reg(Reg::R2), 0x2FF8);
        assert_eq!((cpu.reg(Reg::R10), cpu.reg(Reg::R11)), (0xEEFF_0011, 0xAABB_CCDD));
        assert_eq!(cpu.reg(Reg::R3), 0x4010);
        assert_eq!(cpu.reg(Reg::R4), 0x47F0);
        assert_eq!(mem.read_bytes(0x47F0, 16), Some(octa));
        // the deferred form steps over the longword pointer only
        assert_eq!(cpu.reg(Reg::R5), 0x5004);
        assert_eq!((cpu.reg(Reg::R6), cpu.reg(Reg::R7)), (0x0506_0708, 0x0102_0304));
    }

    #[test]
    fn test_indexed_with_autoincrement_base() {
        // MOVQ (R1)+[R2], R6
        let code = [0x7D, 0x42, 0x81, 0x56];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R1, 0x2000);
        cpu.set_reg(Reg::R2, 3);
        mem.load(0x2018, &0x0000_0001_FFFF_FFFEu64.to_le_bytes());
        run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R1), 0x2008);
        assert_eq!(cpu.reg(Reg::R2), 3);
        assert_eq!((cpu.reg(Reg::R6), cpu.reg(Reg::R7)), (0xFFFF_FFFE, 1));
    }

    #[test]
    fn test_source_read_before_later_autoincrement() {
        // MOVL R1, (R1)+ stores the value R1 had before the increment
        let code = [0xD0, 0x51, 0x81];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R1, 0x2000);
        run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R1), 0x2004);
        assert_eq!(mem.read_bytes(0x2000, 4), Some(vec![0x00, 0x20, 0x00, 0x00]));
    }

    #[test]
    fn test_byte_register_write_keeps_upper_bits() {
        // MOVB #7, R0
        let code = [0x90, 0x07, 0x50];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R0, 0xAABB_CCDD);
        run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R0), 0xAABB_CC07);
    }

    #[test]
    fn test_quad_register_pair() {
        // MOVQ R0, R2 ; EMUL R4, R5, #0, R6
        let code = [0x7D, 0x50, 0x52, 0x7A, 0x54, 0x55, 0x00, 0x56];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R0, 0x1111_1111);
        cpu.set_reg(Reg::R1, 0x2222_2222);
        cpu.set_reg(Reg::R4, 0xFFFF_FFFE); // -2
        cpu.set_reg(Reg::R5, 0x4000_0000);
        run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R2), 0x1111_1111);
        assert_eq!(cpu.reg(Reg::R3), 0x2222_2222);
        // -2 * 2^30 = -2^31
        assert_eq!(cpu.reg(Reg::R6), 0x8000_0000);
        assert_eq!(cpu.reg(Reg::R7), 0xFFFF_FFFF);
        assert_eq!(cpu.flags(), Nzvc::N);
    }

    #[test]
    fn test_displacement_deferred_and_indexed() {
        // MOVL @4(R1), R2 ; MOVL 0x10(R3)[R4], R5
        let code = [0xD0, 0xB1, 0x04, 0x52, 0xD0, 0x44, 0xA3, 0x10, 0x55];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R1, 0x2000);
        mem.load(0x2004, &0x3000u32.to_le_bytes());
        mem.load(0x3000, &0xCAFE_F00Du32.to_le_bytes());
        cpu.set_reg(Reg::R3, 0x4000);
        cpu.set_reg(Reg::R4, 3);
        mem.load(0x401C, &0x1234_5678u32.to_le_bytes());
        run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R2), 0xCAFE_F00D);
        assert_eq!(cpu.reg(Reg::R5), 0x1234_5678);
    }

    #[test]
    fn test_pushl_and_rsb() {
        // PUSHL #0x20 ; RSB
        let code = [0xDD, 0x20, 0x05];
        let (mut cpu, mut mem) = machine(&code);
        let (t, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(t.reason, TerminationReason::Branch);
        assert_eq!(t.block.terminal, Terminal::PopRSBHint);
        assert_eq!(exit.next_pc, 0x20);
        assert_eq!(cpu.sp(), 0x8000);
    }

    #[test]
    fn test_conditional_branch_terminal() {
        // TSTL R0 ; BEQL .+4
        let code = [0xD5, 0x50, 0x13, 0x02];
        let (mut cpu, mut mem) = machine(&code);
        let (t, exit) = run(&code, &mut cpu, &mut mem);
        assert!(matches!(t.block.terminal, Terminal::If { .. }));
        assert_eq!(t.next_pc, BASE + 4);
        assert_eq!(exit.next_pc, BASE + 6);

        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R0, 1);
        let (_, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(exit.next_pc, BASE + 4);
    }

    #[test]
    fn test_sobgtr_loop_count() {
        // SOBGTR R0, .-3 (back to itself)
        let code = [0xF5, 0x50, 0xFD];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R0, 3);
        cpu.set_flags(Nzvc::C);
        let mut taken = 0;
        loop {
            let (_, exit) = run(&code, &mut cpu, &mut mem);
            if exit.next_pc != BASE {
                break;
            }
            taken += 1;
        }
        assert_eq!(taken, 2);
        assert_eq!(cpu.reg(Reg::R0), 0);
        assert_eq!(cpu.flags(), Nzvc::Z | Nzvc::C);
    }

    #[test]
    fn test_casel_dispatch() {
        // CASEL R0, #1, #2 ; table of three word displacements
        let mut code = vec![0xCF, 0x50, 0x01, 0x02];
        for disp in [0x10i16, 0x20, 0x30] {
            code.extend_from_slice(&disp.to_le_bytes());
        }
        let table = BASE + 4;
        for (sel, expected) in [(1u32, table + 0x10), (3, table + 0x30), (0, table + 6), (4, table + 6)] {
            let (mut cpu, mut mem) = machine(&code);
            cpu.set_reg(Reg::R0, sel);
            let (t, exit) = run(&code, &mut cpu, &mut mem);
            assert_eq!(t.next_pc, table);
            assert_eq!(exit.next_pc, expected, "selector {}", sel);
        }
    }

    #[test]
    fn test_bbs_register_and_memory() {
        // BBSS #3, R1, .+0x10
        let code = [0xE2, 0x03, 0x51, 0x10];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R1, 0);
        let (_, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(exit.next_pc, BASE + 4);
        assert_eq!(cpu.reg(Reg::R1), 8);

        // BBC #10, (R2), .+0x10 -> bit 2 of byte 0x2001
        let code = [0xE1, 0x0A, 0x62, 0x10];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R2, 0x2000);
        mem.load(0x2001, &[0x04]);
        let (_, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(exit.next_pc, BASE + 4);
        mem.load(0x2001, &[0x00]);
        let (_, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(exit.next_pc, BASE + 4 + 0x10);
    }

    #[test]
    fn test_integer_overflow_trap() {
        // BISPSW #0x20 (IV) ; ADDL2 #1, R0
        let code = [0xB8, 0x8F, 0x20, 0x00, 0xC0, 0x01, 0x50];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R0, 0x7FFF_FFFF);
        let (t, _) = run(&code, &mut cpu, &mut mem);
        assert_eq!(t.next_pc, BASE + 4);
        assert!(cpu.integer_overflow_enabled());

        let add = &code[4..];
        let mut mem2 = FlatMemory::new(0, 0x10000);
        mem2.load(BASE, add);
        let t = translate_bytes(add, &verified());
        let exit = execute_block(&t.block, &mut cpu, &mut mem2, &mut NoHelpers).unwrap();
        assert_eq!(cpu.reg(Reg::R0), 0x8000_0000);
        assert!(exit.halt.contains(HaltReason::EXCEPTION));
        assert_eq!(exit.exception.map(|e| e.exception), Some(Exception::IntegerOverflow));
        assert_eq!(exit.next_pc, BASE + 3);
    }

    #[test]
    fn test_divide_by_zero() {
        // DIVL3 R1, R2, R3
        let code = [0xC7, 0x51, 0x52, 0x53];
        let (mut cpu, mut mem) = machine(&code);
        cpu.set_reg(Reg::R2, 42);
        let (_, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(cpu.reg(Reg::R3), 42);
        assert_eq!(exit.exception.map(|e| e.exception), Some(Exception::IntegerDivideByZero));
    }

    #[test]
    fn test_fault_mid_block_keeps_prefix() {
        // MOVL R1, R2 ; CLRL R3 ; 0x57 (reserved)
        let prefix = [0xD0, 0x51, 0x52, 0xD4, 0x53];
        let mut code = prefix.to_vec();
        code.push(0x57);

        let options = TranslationOptions { optimizations: Optimizations::empty(), ..Default::default() };
        let full = translate_bytes(&code, &options);
        let alone = translate_bytes(&prefix, &TranslationOptions { max_instructions: 2, ..options.clone() });

        assert_eq!(
            full.reason,
            TerminationReason::Fault(DecodeFault {
                address: BASE + 5,
                error: DecodeError::IllegalOpcode { address: BASE + 5, opcode: 0x57 },
            })
        );
        assert_eq!(full.next_pc, BASE + 5);
        assert_eq!(full.block.terminal, Terminal::link_block(LocationDescriptor::from_pc(BASE + 5)));
        let ops = |b: &Block| b.instructions.iter().map(|i| i.opcode).collect::<Vec<_>>();
        assert_eq!(ops(&full.block), ops(&alone.block));
    }

    #[test]
    fn test_fault_in_later_operand_discards_partial_ir() {
        // MOVL (R1)+, R15 : autoincrement IR is emitted, then the destination faults
        let code = [0xD0, 0x81, 0x5F];
        let t = translate_bytes(&code, &TranslationOptions { optimizations: Optimizations::empty(), ..Default::default() });
        assert!(t.block.instructions.is_empty());
        assert_eq!(
            t.reason,
            TerminationReason::Fault(DecodeFault {
                address: BASE,
                error: DecodeError::UnsupportedAddressingMode { address: BASE + 2, specifier: 0x5F },
            })
        );
    }

    #[test]
    fn test_limits() {
        // NOP x 4
        let code = [0x01; 4];
        let t = translate_bytes(&code, &TranslationOptions { max_instructions: 3, ..Default::default() });
        assert_eq!(t.reason, TerminationReason::Limit);
        assert_eq!(t.next_pc, BASE + 3);
        assert_eq!(t.block.cycle_count, 3);

        let t = translate_bytes(&code, &TranslationOptions::single_step());
        assert_eq!(t.block.cycle_count, 1);
        assert_eq!(t.block.terminal, Terminal::link_block(LocationDescriptor::from_pc(BASE + 1)));

        let t = translate_bytes(&code, &TranslationOptions { max_block_bytes: 2, ..Default::default() });
        assert_eq!(t.next_pc, BASE + 2);
    }

    #[test]
    fn test_reserved_float_immediate_requests_trap() {
        // MOVF #0x8000 (sign set, exponent 0), R0 ; NOP
        let code = [0x50, 0x8F, 0x00, 0x80, 0x00, 0x00, 0x50, 0x01];
        let t = translate_bytes(&code, &verified());
        assert!(count_opcode(&t.block, Opcode::RaiseException) == 1);
        assert_eq!(count_opcode(&t.block, Opcode::RaiseExceptionIf), 0);
        // decoding continued past the MOVF
        assert_eq!(t.block.cycle_count, 2);
    }

    #[test]
    fn test_privileged_in_user_mode() {
        // MFPR #18, R0
        let code = [0xDB, 0x12, 0x50];
        let (mut cpu, mut mem) = machine(&code);
        let mut psl = cpu.psl();
        psl.set_cur_mode(crate::frontend::vax::types::AccessMode::User);
        cpu.set_psl(psl);
        let (_, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(exit.exception.map(|e| e.exception), Some(Exception::PrivilegedInstruction));
        assert_eq!(exit.next_pc, BASE);
    }

    #[test]
    fn test_mtpr_ends_block() {
        // MTPR #1, #56 (MAPEN) ; NOP
        let code = [0xDA, 0x01, 0x38, 0x01];
        let (mut cpu, mut mem) = machine(&code);
        let (t, exit) = run(&code, &mut cpu, &mut mem);
        assert_eq!(t.block.cycle_count, 1);
        assert_eq!(t.reason, TerminationReason::Branch);
        assert_eq!(t.block.terminal, Terminal::link_block(LocationDescriptor::from_pc(BASE + 3)));
        assert_eq!(exit.next_pc, BASE + 3);
        assert_eq!(cpu.ipr(crate::frontend::vax::ipr::Ipr::Mapen), 1);
    }

    #[test]
    fn test_halt_and_bpt() {
        let (mut cpu, mut mem) = machine(&[0x00]);
        let (_, exit) = run(&[0x00], &mut cpu, &mut mem);
        assert!(exit.halt.contains(HaltReason::HALT_INSTRUCTION));
        assert_eq!(exit.next_pc, BASE + 1);

        let (mut cpu, mut mem) = machine(&[0x03]);
        let (_, exit) = run(&[0x03], &mut cpu, &mut mem);
        assert!(exit.halt.contains(HaltReason::BREAKPOINT | HaltReason::EXCEPTION));
        assert_eq!(exit.next_pc, BASE);
    }

    #[test]
    fn test_every_opcode_translates_to_a_verified_block() {
        // Operands: every specifier is R0..R3 style register or short literal
        // where allowed; branch and inline bytes are zero.
        use crate::frontend::vax::types::Access;
        for info in opcodes::all() {
            let mut code = Vec::new();
            if info.opcode > 0xFF {
                code.push((info.opcode >> 8) as u8);
            }
            code.push(info.opcode as u8);
            for spec in info.operands {
                match spec.access {
                    Access::Read => code.push(0x01),
                    Access::Write | Access::Modify | Access::Field => code.push(0x50),
                    Access::Address => code.push(0x60),
                    Access::Branch | Access::Inline => {
                        let n = spec.data_type.size().min(4) as usize;
                        code.extend(std::iter::repeat(0).take(n));
                    }
                }
            }
            let t = translate_bytes(&code, &TranslationOptions { max_instructions: 1, ..verified() });
            assert!(
                !matches!(t.reason, TerminationReason::Fault(_)),
                "{} failed: {:?}",
                info.mnemonic,
                t.reason
            );
            assert_eq!(t.next_pc, BASE + code.len() as u32, "{}", info.mnemonic);
        }
    }
}
