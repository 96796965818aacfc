use crate::frontend::vax::types::AccessMode;

/// Processor Status Longword.
/// The low word is the Processor Status Word (PSW), writable by BISPSW/BICPSW.
///
/// Layout:
///   [31] CM  - Compatibility mode
///   [30] TP  - Trace pending
///   [27] FPD - First part done
///   [26] IS  - Interrupt stack
///   [25:24] CUR_MOD - Current access mode
///   [23:22] PRV_MOD - Previous access mode
///   [20:16] IPL - Interrupt priority level
///   [7]  DV  - Decimal overflow trap enable
///   [6]  FU  - Floating underflow fault enable
///   [5]  IV  - Integer overflow trap enable
///   [4]  T   - Trace
///   [3]  N   [2] Z   [1] V   [0] C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Psl(pub u32);

pub const PSL_CM: u32 = 1 << 31;
pub const PSL_TP: u32 = 1 << 30;
pub const PSL_FPD: u32 = 1 << 27;
pub const PSL_IS: u32 = 1 << 26;
pub const PSL_CUR_MOD_SHIFT: u32 = 24;
pub const PSL_PRV_MOD_SHIFT: u32 = 22;
pub const PSL_IPL_SHIFT: u32 = 16;
pub const PSL_IPL_MASK: u32 = 0x1F << PSL_IPL_SHIFT;
pub const PSL_DV: u32 = 1 << 7;
pub const PSL_FU: u32 = 1 << 6;
pub const PSL_IV: u32 = 1 << 5;
pub const PSL_T: u32 = 1 << 4;
pub const PSL_NZVC_MASK: u32 = 0xF;
/// Bits that must be zero in a valid PSL.
pub const PSL_MBZ: u32 = 0x3020_FF00;

impl Psl {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    // --- Condition flags ---

    pub fn n(self) -> bool { self.0 & (1 << 3) != 0 }
    pub fn z(self) -> bool { self.0 & (1 << 2) != 0 }
    pub fn v(self) -> bool { self.0 & (1 << 1) != 0 }
    pub fn c(self) -> bool { self.0 & 1 != 0 }

    pub fn set_n(&mut self, val: bool) { self.set_bit(3, val); }
    pub fn set_z(&mut self, val: bool) { self.set_bit(2, val); }
    pub fn set_v(&mut self, val: bool) { self.set_bit(1, val); }
    pub fn set_c(&mut self, val: bool) { self.set_bit(0, val); }

    pub fn nzvc(self) -> u32 {
        self.0 & PSL_NZVC_MASK
    }

    pub fn set_nzvc(&mut self, nzvc: u32) {
        self.0 = (self.0 & !PSL_NZVC_MASK) | (nzvc & PSL_NZVC_MASK);
    }

    // --- Trap enables ---

    pub fn t(self) -> bool { self.0 & PSL_T != 0 }
    pub fn iv(self) -> bool { self.0 & PSL_IV != 0 }
    pub fn fu(self) -> bool { self.0 & PSL_FU != 0 }
    pub fn dv(self) -> bool { self.0 & PSL_DV != 0 }

    pub fn set_t(&mut self, val: bool) { self.set_bit(4, val); }
    pub fn set_iv(&mut self, val: bool) { self.set_bit(5, val); }
    pub fn set_fu(&mut self, val: bool) { self.set_bit(6, val); }
    pub fn set_dv(&mut self, val: bool) { self.set_bit(7, val); }

    /// Processor Status Word (low 16 bits).
    pub fn psw(self) -> u16 {
        self.0 as u16
    }

    // --- Priority and modes ---

    pub fn ipl(self) -> u32 {
        (self.0 & PSL_IPL_MASK) >> PSL_IPL_SHIFT
    }

    pub fn set_ipl(&mut self, ipl: u32) {
        self.0 = (self.0 & !PSL_IPL_MASK) | ((ipl & 0x1F) << PSL_IPL_SHIFT);
    }

    pub fn cur_mode(self) -> AccessMode {
        AccessMode::from_u32(self.0 >> PSL_CUR_MOD_SHIFT)
    }

    pub fn set_cur_mode(&mut self, mode: AccessMode) {
        self.0 = (self.0 & !(3 << PSL_CUR_MOD_SHIFT)) | ((mode as u32) << PSL_CUR_MOD_SHIFT);
    }

    pub fn prv_mode(self) -> AccessMode {
        AccessMode::from_u32(self.0 >> PSL_PRV_MOD_SHIFT)
    }

    pub fn set_prv_mode(&mut self, mode: AccessMode) {
        self.0 = (self.0 & !(3 << PSL_PRV_MOD_SHIFT)) | ((mode as u32) << PSL_PRV_MOD_SHIFT);
    }

    pub fn is_kernel(self) -> bool {
        self.cur_mode() == AccessMode::Kernel
    }

    // --- Single-bit state ---

    pub fn cm(self) -> bool { self.0 & PSL_CM != 0 }
    pub fn tp(self) -> bool { self.0 & PSL_TP != 0 }
    pub fn fpd(self) -> bool { self.0 & PSL_FPD != 0 }
    pub fn is(self) -> bool { self.0 & PSL_IS != 0 }

    pub fn set_cm(&mut self, val: bool) { self.set_bit(31, val); }
    pub fn set_tp(&mut self, val: bool) { self.set_bit(30, val); }
    pub fn set_fpd(&mut self, val: bool) { self.set_bit(27, val); }
    pub fn set_is(&mut self, val: bool) { self.set_bit(26, val); }

    fn set_bit(&mut self, bit: u32, val: bool) {
        if val {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psl_flags() {
        let mut psl = Psl::new(0);
        psl.set_n(true);
        psl.set_c(true);
        assert_eq!(psl.nzvc(), 0b1001);
        assert!(psl.n() && !psl.z() && !psl.v() && psl.c());
        psl.set_nzvc(0b0110);
        assert!(psl.z() && psl.v());
        assert!(!psl.n());
    }

    #[test]
    fn test_psl_modes_and_ipl() {
        let mut psl = Psl::default();
        assert!(psl.is_kernel());
        psl.set_cur_mode(AccessMode::User);
        psl.set_prv_mode(AccessMode::Supervisor);
        psl.set_ipl(31);
        assert_eq!(psl.cur_mode(), AccessMode::User);
        assert_eq!(psl.prv_mode(), AccessMode::Supervisor);
        assert_eq!(psl.ipl(), 31);
        assert_eq!(psl.value(), 0x031F_0000 | (2 << 22));
    }

    #[test]
    fn test_psl_single_bits() {
        let mut psl = Psl::default();
        psl.set_is(true);
        psl.set_iv(true);
        assert_eq!(psl.value(), PSL_IS | PSL_IV);
        assert_eq!(psl.psw(), PSL_IV as u16);
        psl.set_is(false);
        assert!(!psl.is());
    }
}
