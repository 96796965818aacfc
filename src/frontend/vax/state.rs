use crate::error::StateError;
use crate::frontend::vax::cc::{LazyCc, Nzvc};
use crate::frontend::vax::ipr::{Ipr, IPR_COUNT};
use crate::frontend::vax::psl::{Psl, PSL_IS, PSL_NZVC_MASK};
use crate::frontend::vax::types::{AccessMode, Reg};

/// Architectural state of one VAX CPU.
///
/// The NZVC bits of the PSL live in the lazy condition-code record; `psl()`
/// merges them back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    regs: [u32; 16],
    psl: Psl,
    ipr: [u32; IPR_COUNT],
    cc: LazyCc,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuState {
    pub fn new() -> Self {
        Self {
            regs: [0; 16],
            psl: Psl::default(),
            ipr: [0; IPR_COUNT],
            cc: LazyCc::default(),
        }
    }

    /// Power-up state: kernel mode on the interrupt stack at IPL 31, memory
    /// management off. The SID register keeps its model value.
    pub fn reset(&mut self) {
        let sid = self.ipr[Ipr::Sid.index()];
        self.regs = [0; 16];
        self.ipr = [0; IPR_COUNT];
        self.ipr[Ipr::Sid.index()] = sid;

        let mut psl = Psl::new(PSL_IS);
        psl.set_cur_mode(AccessMode::Kernel);
        psl.set_ipl(31);
        self.set_psl(psl);
        self.ipr[Ipr::Mapen.index()] = 0;
    }

    // --- General registers ---

    pub fn reg(&self, reg: Reg) -> u32 {
        self.regs[reg.number()]
    }

    pub fn set_reg(&mut self, reg: Reg, value: u32) {
        self.regs[reg.number()] = value;
    }

    pub fn regs(&self) -> &[u32; 16] {
        &self.regs
    }

    pub fn pc(&self) -> u32 {
        self.regs[Reg::PC.number()]
    }

    pub fn set_pc(&mut self, value: u32) {
        self.regs[Reg::PC.number()] = value;
    }

    pub fn sp(&self) -> u32 {
        self.regs[Reg::SP.number()]
    }

    // --- PSL ---

    /// The PSL with materialized condition codes.
    pub fn psl(&self) -> Psl {
        Psl::new((self.psl.value() & !PSL_NZVC_MASK) | self.cc.flags().bits() as u32)
    }

    /// Replace the PSL, including its condition codes.
    pub fn set_psl(&mut self, psl: Psl) {
        self.psl = Psl::new(psl.value() & !PSL_NZVC_MASK);
        self.cc = LazyCc::explicit(Nzvc::from_bits_truncate(psl.nzvc() as u8));
    }

    pub fn is_kernel_mode(&self) -> bool {
        self.psl.is_kernel()
    }

    pub fn integer_overflow_enabled(&self) -> bool {
        self.psl.iv()
    }

    // --- Condition codes ---

    pub fn flags(&self) -> Nzvc {
        self.cc.flags()
    }

    pub fn set_flags(&mut self, flags: Nzvc) {
        self.cc = LazyCc::explicit(flags);
    }

    pub fn lazy_cc(&self) -> &LazyCc {
        &self.cc
    }

    pub fn set_lazy_cc(&mut self, cc: LazyCc) {
        self.cc = cc;
    }

    // --- Internal processor registers ---

    pub fn ipr(&self, ipr: Ipr) -> u32 {
        match ipr {
            Ipr::Ipl => self.psl.ipl(),
            _ => self.ipr[ipr.index()],
        }
    }

    /// Unchecked IPR write, for reset, model initialization and debuggers.
    pub fn set_ipr(&mut self, ipr: Ipr, value: u32) {
        match ipr {
            Ipr::Ipl => {
                self.psl.set_ipl(value & 0x1F);
                self.ipr[ipr.index()] = value & 0x1F;
            }
            _ => self.ipr[ipr.index()] = value,
        }
    }

    /// MFPR semantics: read by raw index.
    pub fn read_ipr(&self, index: u32) -> Result<u32, StateError> {
        let ipr = Ipr::from_index(index).ok_or(StateError::ReservedIpr(index))?;
        if matches!(ipr, Ipr::Sirr | Ipr::Tbia | Ipr::Tbis | Ipr::Tbchk) {
            return Err(StateError::WriteOnlyIpr(ipr));
        }
        Ok(self.ipr(ipr))
    }

    /// MTPR semantics: write by raw index.
    pub fn write_ipr(&mut self, index: u32, value: u32) -> Result<(), StateError> {
        let ipr = Ipr::from_index(index).ok_or(StateError::ReservedIpr(index))?;
        if ipr == Ipr::Sid {
            return Err(StateError::ReadOnlyIpr(ipr));
        }
        self.set_ipr(ipr, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::vax::cc::CcOp;
    use crate::ir::types::Width;

    fn assert_send<T: Send>() {}

    #[test]
    fn test_state_is_send() {
        assert_send::<CpuState>();
    }

    #[test]
    fn test_registers() {
        let mut cpu = CpuState::new();
        cpu.set_reg(Reg::R3, 0xDEAD_BEEF);
        cpu.set_pc(0x2000);
        assert_eq!(cpu.reg(Reg::R3), 0xDEAD_BEEF);
        assert_eq!(cpu.reg(Reg::R15), 0x2000);
        assert_eq!(cpu.regs()[15], 0x2000);
    }

    #[test]
    fn test_reset() {
        let mut cpu = CpuState::new();
        cpu.set_ipr(Ipr::Sid, 0x1300_0000);
        cpu.set_ipr(Ipr::Mapen, 1);
        cpu.set_reg(Reg::R0, 7);
        cpu.reset();
        let psl = cpu.psl();
        assert!(psl.is());
        assert_eq!(psl.ipl(), 31);
        assert_eq!(psl.cur_mode(), AccessMode::Kernel);
        assert_eq!(cpu.ipr(Ipr::Mapen), 0);
        assert_eq!(cpu.ipr(Ipr::Sid), 0x1300_0000);
        assert_eq!(cpu.reg(Reg::R0), 0);
        assert_eq!(psl.value(), 0x041F_0000);
    }

    #[test]
    fn test_psl_merges_lazy_flags() {
        let mut cpu = CpuState::new();
        cpu.set_lazy_cc(LazyCc::new(CcOp::Add, Width::W32, 0, 0xFFFF_FFFF, 1, 0));
        let psl = cpu.psl();
        assert!(psl.z() && psl.c());

        cpu.set_psl(Psl::new(0x0000_0008));
        assert!(cpu.flags().n());
        assert_eq!(cpu.psl().value(), 8);
    }

    #[test]
    fn test_ipl_aliases_psl() {
        let mut cpu = CpuState::new();
        cpu.write_ipr(Ipr::Ipl.index() as u32, 0x16).unwrap();
        assert_eq!(cpu.psl().ipl(), 0x16);
        assert_eq!(cpu.read_ipr(18).unwrap(), 0x16);
    }

    #[test]
    fn test_ipr_access_rules() {
        let mut cpu = CpuState::new();
        assert_eq!(cpu.read_ipr(5), Err(StateError::ReservedIpr(5)));
        assert_eq!(cpu.write_ipr(64, 0), Err(StateError::ReservedIpr(64)));
        assert_eq!(cpu.write_ipr(62, 1), Err(StateError::ReadOnlyIpr(Ipr::Sid)));
        assert_eq!(cpu.read_ipr(20), Err(StateError::WriteOnlyIpr(Ipr::Sirr)));
        cpu.write_ipr(16, 0x8000_1000).unwrap();
        assert_eq!(cpu.ipr(Ipr::Pcbb), 0x8000_1000);
    }
}
