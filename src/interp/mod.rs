//! Reference interpreter for translated blocks.
//!
//! Executes the IR directly against a `CpuState` and a `Memory`. It defines
//! what each IR operation means and is what the tests run blocks through.

mod exec;
mod helper;
mod memory;

pub use exec::{execute_block, BlockExit, PendingException};
pub use helper::{HelperArg, HelperCall, HelperHost, HelperOutcome, NoHelpers};
pub use memory::{FlatMemory, Memory};

use crate::config::TranslationOptions;
use crate::error::DecodeError;
use crate::frontend::vax::opcodes::HelperFamily;
use crate::frontend::vax::state::CpuState;
use crate::frontend::vax::translate::{translate, TerminationReason};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("memory fault at {address:#010x}")]
    MemoryFault { address: u32 },
    #[error("no helper for {family:?} (opcode {opcode:#x})")]
    HelperUnavailable { family: HelperFamily, opcode: u16 },
    #[error("helper failed: {0}")]
    HelperFailed(String),
    #[error("unknown exception code {0}")]
    UnknownException(u8),
    #[error("block has no terminal")]
    InvalidTerminal,
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Translate the block at the CPU's PC from `mem` and execute it.
///
/// A decode fault on the first instruction is returned as an error; a fault
/// later in the block ends the block before the faulting instruction.
pub fn step_block<M: Memory>(
    cpu: &mut CpuState,
    mem: &mut M,
    helpers: &mut dyn HelperHost,
    options: &TranslationOptions,
) -> Result<BlockExit, ExecError> {
    let pc = cpu.pc();
    let translation = {
        let code: &M = mem;
        translate(pc, &|address| code.read_u8(address), options)
    };
    if let TerminationReason::Fault(fault) = translation.reason {
        if translation.block.cycle_count == 0 {
            return Err(fault.error.into());
        }
    }
    execute_block(&translation.block, cpu, mem, helpers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::vax::cc::Nzvc;
    use crate::frontend::vax::types::Reg;
    use crate::halt_reason::HaltReason;

    const BASE: u32 = 0x200;

    fn boot(code: &[u8]) -> (CpuState, FlatMemory) {
        let mut mem = FlatMemory::new(0, 0x1000);
        assert!(mem.load(BASE, code));
        let mut cpu = CpuState::new();
        cpu.reset();
        cpu.set_reg(Reg::SP, 0x800);
        cpu.set_pc(BASE);
        (cpu, mem)
    }

    fn run_to_halt(cpu: &mut CpuState, mem: &mut FlatMemory) -> BlockExit {
        let options = TranslationOptions::default();
        for _ in 0..100 {
            let exit = step_block(cpu, mem, &mut NoHelpers, &options).unwrap();
            if !exit.halt.is_empty() {
                return exit;
            }
        }
        panic!("program did not halt");
    }

    #[test]
    fn test_sum_loop_program() {
        // CLRL R0 ; MOVL #10, R1
        // loop: ADDL2 R1, R0 ; SOBGTR R1, loop ; HALT
        let code = [0xD4, 0x50, 0xD0, 0x0A, 0x51, 0xC0, 0x51, 0x50, 0xF5, 0x51, 0xFA, 0x00];
        let (mut cpu, mut mem) = boot(&code);
        let exit = run_to_halt(&mut cpu, &mut mem);
        assert_eq!(exit.halt, HaltReason::HALT_INSTRUCTION);
        assert_eq!(cpu.reg(Reg::R0), 55);
        assert_eq!(cpu.reg(Reg::R1), 0);
        assert_eq!(cpu.pc(), BASE + code.len() as u32);
    }

    #[test]
    fn test_subroutine_call_and_return() {
        // BSBB sub ; HALT ; sub: INCL R2 ; RSB
        let code = [0x10, 0x01, 0x00, 0xD6, 0x52, 0x05];
        let (mut cpu, mut mem) = boot(&code);
        let exit = run_to_halt(&mut cpu, &mut mem);
        assert!(exit.halt.contains(HaltReason::HALT_INSTRUCTION));
        assert_eq!(cpu.reg(Reg::R2), 1);
        assert_eq!(cpu.sp(), 0x800);
        assert_eq!(cpu.flags(), Nzvc::empty());
    }

    #[test]
    fn test_decode_fault_reported() {
        let (mut cpu, mut mem) = boot(&[0x57]);
        let err = step_block(&mut cpu, &mut mem, &mut NoHelpers, &TranslationOptions::default()).unwrap_err();
        assert_eq!(err, ExecError::Decode(DecodeError::IllegalOpcode { address: BASE, opcode: 0x57 }));
    }

    #[test]
    fn test_memory_fault_and_missing_helper() {
        // MOVL @#0x4000, R0
        let (mut cpu, mut mem) = boot(&[0xD0, 0x9F, 0x00, 0x40, 0x00, 0x00, 0x50]);
        let err = step_block(&mut cpu, &mut mem, &mut NoHelpers, &TranslationOptions::default()).unwrap_err();
        assert_eq!(err, ExecError::MemoryFault { address: 0x4000 });

        // MOVC3 #1, (R1), (R2)
        let (mut cpu, mut mem) = boot(&[0x28, 0x01, 0x61, 0x62]);
        let err = step_block(&mut cpu, &mut mem, &mut NoHelpers, &TranslationOptions::default()).unwrap_err();
        assert!(matches!(err, ExecError::HelperUnavailable { family: HelperFamily::String, opcode: 0x28 }));
    }

    #[test]
    fn test_reserved_ipr_is_reserved_operand_fault() {
        use crate::frontend::vax::exception::Exception;

        // MOVL #7, R3 ; MTPR #0, #5 ; HALT
        let (mut cpu, mut mem) = boot(&[0xD0, 0x07, 0x53, 0xDA, 0x00, 0x05, 0x00]);
        let exit = step_block(&mut cpu, &mut mem, &mut NoHelpers, &TranslationOptions::default()).unwrap();
        let fault = PendingException { exception: Exception::ReservedOperand, pc: BASE + 3 };
        assert_eq!(exit.exception, Some(fault));
        assert!(exit.halt.contains(HaltReason::EXCEPTION));
        assert_eq!(cpu.pc(), BASE + 3);
        assert_eq!(cpu.reg(Reg::R3), 7);

        // MFPR #20 (SIRR, write-only), R0
        let (mut cpu, mut mem) = boot(&[0xDB, 0x14, 0x50]);
        cpu.set_reg(Reg::R0, 0x55);
        let exit = step_block(&mut cpu, &mut mem, &mut NoHelpers, &TranslationOptions::default()).unwrap();
        assert_eq!(exit.exception, Some(PendingException { exception: Exception::ReservedOperand, pc: BASE }));
        assert_eq!(cpu.pc(), BASE);
        assert_eq!(cpu.reg(Reg::R0), 0x55);
    }

    struct Recorder(Vec<HelperCall>);

    impl HelperHost for Recorder {
        fn call(&mut self, call: &HelperCall, _cpu: &mut CpuState, _mem: &mut dyn Memory) -> Result<HelperOutcome, ExecError> {
            self.0.push(call.clone());
            Ok(HelperOutcome { branch: false, flags: Some(Nzvc::Z) })
        }
    }

    #[test]
    fn test_helper_receives_operands_in_order() {
        // ADDF3 #1.0, R1, (R2)
        let (mut cpu, mut mem) = boot(&[0x41, 0x08, 0x51, 0x62, 0x00]);
        cpu.set_reg(Reg::R1, 0x4080);
        cpu.set_reg(Reg::R2, 0x300);
        let mut host = Recorder(Vec::new());
        let options = TranslationOptions { max_instructions: 1, ..Default::default() };
        let exit = step_block(&mut cpu, &mut mem, &mut host, &options).unwrap();
        assert_eq!(exit.next_pc, BASE + 4);
        assert_eq!(cpu.flags(), Nzvc::Z);
        assert_eq!(
            host.0,
            vec![HelperCall {
                family: HelperFamily::Float,
                opcode: 0x41,
                args: vec![HelperArg::Value(0x4080), HelperArg::Value(0x4080), HelperArg::Address(0x300)],
            }]
        );
    }
}
