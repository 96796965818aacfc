use std::fmt;

use crate::frontend::vax::cc::Nzvc;

/// Branch conditions, numbered by the low nibble of the VAX Bcc opcode.
/// Complementary conditions differ only in bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cond {
    NEQ = 0x2,  // Z=0
    EQL = 0x3,  // Z=1
    GTR = 0x4,  // (N|Z)=0
    LEQ = 0x5,  // (N|Z)=1
    GEQ = 0x8,  // N=0
    LSS = 0x9,  // N=1
    GTRU = 0xA, // (C|Z)=0
    LEQU = 0xB, // (C|Z)=1
    VC = 0xC,   // V=0
    VS = 0xD,   // V=1
    GEQU = 0xE, // C=0
    LSSU = 0xF, // C=1
}

impl Cond {
    /// Aliases
    pub const CC: Cond = Cond::GEQU;
    pub const CS: Cond = Cond::LSSU;

    /// Invert the condition code.
    pub fn invert(self) -> Cond {
        let val = self as u8;
        // Every valid code has a valid partner
        Cond::from_u8(val ^ 1).unwrap_or(self)
    }

    /// Create from the low nibble of a Bcc opcode.
    pub fn from_u8(val: u8) -> Option<Cond> {
        Some(match val & 0xF {
            0x2 => Cond::NEQ,
            0x3 => Cond::EQL,
            0x4 => Cond::GTR,
            0x5 => Cond::LEQ,
            0x8 => Cond::GEQ,
            0x9 => Cond::LSS,
            0xA => Cond::GTRU,
            0xB => Cond::LEQU,
            0xC => Cond::VC,
            0xD => Cond::VS,
            0xE => Cond::GEQU,
            0xF => Cond::LSSU,
            _ => return None,
        })
    }

    /// Evaluate against materialized condition codes.
    pub fn holds(self, f: Nzvc) -> bool {
        match self {
            Cond::NEQ => !f.z(),
            Cond::EQL => f.z(),
            Cond::GTR => !(f.n() || f.z()),
            Cond::LEQ => f.n() || f.z(),
            Cond::GEQ => !f.n(),
            Cond::LSS => f.n(),
            Cond::GTRU => !(f.c() || f.z()),
            Cond::LEQU => f.c() || f.z(),
            Cond::VC => !f.v(),
            Cond::VS => f.v(),
            Cond::GEQU => !f.c(),
            Cond::LSSU => f.c(),
        }
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Cond::NEQ => "neq",
            Cond::EQL => "eql",
            Cond::GTR => "gtr",
            Cond::LEQ => "leq",
            Cond::GEQ => "geq",
            Cond::LSS => "lss",
            Cond::GTRU => "gtru",
            Cond::LEQU => "lequ",
            Cond::VC => "vc",
            Cond::VS => "vs",
            Cond::GEQU => "gequ",
            Cond::LSSU => "lssu",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_pairs() {
        assert_eq!(Cond::NEQ.invert(), Cond::EQL);
        assert_eq!(Cond::LSS.invert(), Cond::GEQ);
        assert_eq!(Cond::LSSU.invert(), Cond::GEQU);
        assert_eq!(Cond::GTRU.invert().invert(), Cond::GTRU);
    }

    #[test]
    fn test_from_opcode_nibble() {
        assert_eq!(Cond::from_u8(0x13), Some(Cond::EQL));
        assert_eq!(Cond::from_u8(0x1F), Some(Cond::LSSU));
        assert_eq!(Cond::from_u8(0x11), None);
    }

    #[test]
    fn test_holds() {
        let zero = Nzvc::Z;
        assert!(Cond::EQL.holds(zero));
        assert!(Cond::LEQ.holds(zero));
        assert!(!Cond::GTR.holds(zero));
        let neg_carry = Nzvc::N | Nzvc::C;
        assert!(Cond::LSS.holds(neg_carry));
        assert!(Cond::LSSU.holds(neg_carry));
        assert!(!Cond::GTRU.holds(neg_carry));
        assert!(Cond::VC.holds(neg_carry));
    }
}
