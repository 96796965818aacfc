use std::fmt;

use bitflags::bitflags;

use crate::ir::types::Width;

bitflags! {
    /// Materialized condition codes, laid out as PSL<3:0>.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Nzvc: u8 {
        const N = 1 << 3;
        const Z = 1 << 2;
        const V = 1 << 1;
        const C = 1 << 0;
    }
}

impl Nzvc {
    pub fn from_flags(n: bool, z: bool, v: bool, c: bool) -> Self {
        let mut f = Nzvc::empty();
        f.set(Nzvc::N, n);
        f.set(Nzvc::Z, z);
        f.set(Nzvc::V, v);
        f.set(Nzvc::C, c);
        f
    }

    pub fn n(self) -> bool { self.contains(Nzvc::N) }
    pub fn z(self) -> bool { self.contains(Nzvc::Z) }
    pub fn v(self) -> bool { self.contains(Nzvc::V) }
    pub fn c(self) -> bool { self.contains(Nzvc::C) }
}

/// Which algorithm last produced the condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CcOp {
    /// result = src1 + src2 + aux(carry in).
    Add,
    /// result = src1 - src2 - aux(borrow in).
    Sub,
    Mul,
    /// src1 = dividend, src2 = divisor.
    Div,
    /// aux holds the carry to preserve.
    Logical,
    /// Flags of `src1 - src2` without a stored result.
    Compare,
    /// src1 = source value, aux = source width in bits.
    Convert,
    /// src1 = value, src2 = signed shift count.
    ArithShift,
    /// src1 holds NZVC directly.
    Explicit,
}

impl fmt::Display for CcOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Lazily evaluated condition-code record.
///
/// Flag-setting instructions store their operands and result here; NZVC are
/// only computed when something reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LazyCc {
    pub op: CcOp,
    pub width: Width,
    pub result: u128,
    pub src1: u128,
    pub src2: u128,
    pub aux: u128,
}

impl Default for LazyCc {
    fn default() -> Self {
        LazyCc::explicit(Nzvc::empty())
    }
}

fn sext(value: u128, bits: u32) -> i128 {
    if bits >= 128 {
        value as i128
    } else {
        let shift = 128 - bits;
        ((value << shift) as i128) >> shift
    }
}

fn sign_bit(value: u128, bits: u32) -> bool {
    (value >> (bits - 1)) & 1 != 0
}

impl LazyCc {
    pub fn new(op: CcOp, width: Width, result: u128, src1: u128, src2: u128, aux: u128) -> Self {
        Self { op, width, result, src1, src2, aux }
    }

    pub fn explicit(flags: Nzvc) -> Self {
        Self::new(CcOp::Explicit, Width::W32, 0, flags.bits() as u128, 0, 0)
    }

    /// Compute NZVC from the stored record.
    pub fn flags(&self) -> Nzvc {
        let bits = self.width.bits();
        let mask = self.width.mask();
        let r = self.result & mask;
        let a = self.src1 & mask;
        let b = self.src2 & mask;
        let n = sign_bit(r, bits);
        let z = r == 0;

        match self.op {
            CcOp::Add => {
                let cin = self.aux & 1;
                let (s1, o1) = a.overflowing_add(b);
                let (s2, o2) = s1.overflowing_add(cin);
                let c = if bits >= 128 { o1 || o2 } else { (s2 >> bits) & 1 != 0 };
                let v = sign_bit(!(a ^ b) & (a ^ r), bits);
                Nzvc::from_flags(n, z, v, c)
            }
            CcOp::Sub => {
                let bin = self.aux & 1;
                let c = b.checked_add(bin).map_or(true, |t| a < t);
                let v = sign_bit((a ^ b) & (a ^ r), bits);
                Nzvc::from_flags(n, z, v, c)
            }
            CcOp::Mul => {
                let v = match sext(a, bits).checked_mul(sext(b, bits)) {
                    Some(p) => p != sext(r, bits),
                    None => true,
                };
                Nzvc::from_flags(n, z, v, false)
            }
            CcOp::Div => {
                let min = if bits >= 128 { i128::MIN } else { -(1i128 << (bits - 1)) };
                let v = b == 0 || (sext(a, bits) == min && sext(b, bits) == -1);
                Nzvc::from_flags(n, z, v, false)
            }
            CcOp::Logical => Nzvc::from_flags(n, z, false, self.aux & 1 != 0),
            CcOp::Compare => {
                Nzvc::from_flags(sext(a, bits) < sext(b, bits), a == b, false, a < b)
            }
            CcOp::Convert => {
                let from_bits = (self.aux as u32).clamp(1, 128);
                let v = sext(r, bits) != sext(self.src1, from_bits);
                Nzvc::from_flags(n, z, v, false)
            }
            CcOp::ArithShift => {
                let count = self.src2 as u8 as i8;
                let v = if count <= 0 {
                    false
                } else if count as u32 >= bits {
                    a != 0
                } else {
                    (sext(r, bits) >> count) != sext(a, bits)
                };
                Nzvc::from_flags(n, z, v, false)
            }
            CcOp::Explicit => Nzvc::from_bits_truncate(self.src1 as u8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn add32(a: u32, b: u32) -> Nzvc {
        let r = a.wrapping_add(b);
        LazyCc::new(CcOp::Add, Width::W32, r as u128, a as u128, b as u128, 0).flags()
    }

    fn sub32(min: u32, sub: u32) -> Nzvc {
        let r = min.wrapping_sub(sub);
        LazyCc::new(CcOp::Sub, Width::W32, r as u128, min as u128, sub as u128, 0).flags()
    }

    #[test]
    fn test_add_flags() {
        // 0x7FFFFFFF + 1 overflows signed, no carry
        let f = add32(0x7FFF_FFFF, 1);
        assert!(f.n() && f.v() && !f.c() && !f.z());

        // 0xFFFFFFFF + 1 carries out, result zero
        let f = add32(0xFFFF_FFFF, 1);
        assert!(f.z() && f.c() && !f.v() && !f.n());
    }

    #[test]
    fn test_add_with_carry_in() {
        let f = LazyCc::new(CcOp::Add, Width::W32, 0, 0xFFFF_FFFF, 0, 1).flags();
        assert!(f.c() && f.z());
    }

    #[test]
    fn test_sub_borrow() {
        // 1 - 2 borrows
        let f = sub32(1, 2);
        assert!(f.n() && f.c() && !f.v());

        // 0x80000000 - 1 overflows
        let f = sub32(0x8000_0000, 1);
        assert!(f.v() && !f.n() && !f.c());
    }

    #[test]
    fn test_byte_width() {
        let f = LazyCc::new(CcOp::Add, Width::W8, 0x00, 0x80, 0x80, 0).flags();
        assert!(f.z() && f.c() && f.v());
    }

    #[test]
    fn test_mul_overflow() {
        let f = LazyCc::new(CcOp::Mul, Width::W16, 0x0000, 0x100, 0x100, 0).flags();
        assert!(f.v() && f.z() && !f.c());
        let f = LazyCc::new(CcOp::Mul, Width::W16, 0xFFFA, 0xFFFE, 3, 0).flags();
        assert!(!f.v() && f.n());
    }

    #[test]
    fn test_div_flags() {
        let f = LazyCc::new(CcOp::Div, Width::W32, 7, 7, 0, 0).flags();
        assert!(f.v() && !f.c());
        let f = LazyCc::new(CcOp::Div, Width::W32, 0x8000_0000, 0x8000_0000, 0xFFFF_FFFF, 0).flags();
        assert!(f.v() && f.n());
        let f = LazyCc::new(CcOp::Div, Width::W32, 3, 9, 3, 0).flags();
        assert!(!f.v());
    }

    #[test]
    fn test_logical_keeps_carry() {
        let f = LazyCc::new(CcOp::Logical, Width::W32, 0, 0, 0, 1).flags();
        assert!(f.z() && f.c() && !f.v());
        let f = LazyCc::new(CcOp::Logical, Width::W32, 0x8000_0000, 0, 0, 0).flags();
        assert!(f.n() && !f.c());
    }

    #[test]
    fn test_compare() {
        // -1 vs 1: signed less, unsigned greater
        let f = LazyCc::new(CcOp::Compare, Width::W32, 0, 0xFFFF_FFFF, 1, 0).flags();
        assert!(f.n() && !f.c() && !f.z() && !f.v());
        let f = LazyCc::new(CcOp::Compare, Width::W8, 0, 5, 5, 0).flags();
        assert!(f.z() && !f.n());
    }

    #[test]
    fn test_convert_truncation() {
        // CVTLB of 0x180
        let f = LazyCc::new(CcOp::Convert, Width::W8, 0x80, 0x180, 0, 32).flags();
        assert!(f.v() && f.n());
        // CVTBL of 0x80 sign-extends without overflow
        let f = LazyCc::new(CcOp::Convert, Width::W32, 0xFFFF_FF80, 0x80, 0, 8).flags();
        assert!(!f.v() && f.n());
    }

    #[test]
    fn test_arith_shift_overflow() {
        let f = LazyCc::new(CcOp::ArithShift, Width::W32, 0x8000_0000, 0x4000_0000, 1, 0).flags();
        assert!(f.v());
        let f = LazyCc::new(CcOp::ArithShift, Width::W32, 0x4, 0x8, 0xFF, 0).flags();
        assert!(!f.v());
    }

    #[test]
    fn test_explicit() {
        let f = LazyCc::explicit(Nzvc::Z | Nzvc::C).flags();
        assert_eq!(f, Nzvc::Z | Nzvc::C);
    }

    proptest! {
        #[test]
        fn add_flags_match_wide_arithmetic(a in any::<u32>(), b in any::<u32>()) {
            let f = add32(a, b);
            let wide = a as u64 + b as u64;
            let signed = a as i32 as i64 + b as i32 as i64;
            prop_assert_eq!(f.c(), wide > u32::MAX as u64);
            prop_assert_eq!(f.v(), signed != (signed as i32) as i64);
            prop_assert_eq!(f.n(), (wide as u32 as i32) < 0);
            prop_assert_eq!(f.z(), wide as u32 == 0);
        }

        #[test]
        fn sub_flags_match_wide_arithmetic(a in any::<u32>(), b in any::<u32>()) {
            let f = sub32(a, b);
            let signed = a as i32 as i64 - b as i32 as i64;
            prop_assert_eq!(f.c(), a < b);
            prop_assert_eq!(f.v(), signed != (signed as i32) as i64);
        }
    }
}
