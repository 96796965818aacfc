//! Operand specifier parsing.
//!
//! Pure byte-level layer: reads a specifier (plus displacement, immediate data
//! and the base of an indexed specifier) from the instruction stream and
//! validates it against the operand's access type. No IR is emitted here.

use std::fmt;

use crate::error::DecodeError;
use crate::frontend::vax::types::{sign_extend, Access, OperandSpec, Reg};

/// Reads instruction-stream bytes and tracks the address of the next byte.
pub struct Cursor<'a> {
    read_code: &'a dyn Fn(u32) -> Option<u8>,
    pc: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(read_code: &'a dyn Fn(u32) -> Option<u8>, pc: u32) -> Self {
        Self { read_code, pc }
    }

    /// Address of the next unread byte.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = (self.read_code)(self.pc).ok_or(DecodeError::CodeFetch { address: self.pc })?;
        self.pc = self.pc.wrapping_add(1);
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(self.read_le(2)? as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(self.read_le(4)? as u32)
    }

    /// Read `len` bytes (at most 16) as a little-endian integer.
    pub fn read_le(&mut self, len: u32) -> Result<u128, DecodeError> {
        let mut value = 0u128;
        for i in 0..len {
            value |= (self.read_u8()? as u128) << (8 * i);
        }
        Ok(value)
    }

    /// Read a signed displacement of `size` bytes, sign-extended to 32 bits.
    pub fn read_disp(&mut self, size: DispSize) -> Result<i32, DecodeError> {
        let raw = self.read_le(size.bytes())? as u32;
        Ok(sign_extend(raw, size.bytes() * 8) as i32)
    }
}

/// Width of a displacement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispSize {
    Byte,
    Word,
    Long,
}

impl DispSize {
    pub fn bytes(self) -> u32 {
        match self {
            DispSize::Byte => 1,
            DispSize::Word => 2,
            DispSize::Long => 4,
        }
    }

    /// Non-deferred mode nibble (A, C, E).
    fn mode(self) -> u8 {
        match self {
            DispSize::Byte => 0xA,
            DispSize::Word => 0xC,
            DispSize::Long => 0xE,
        }
    }

    fn prefix(self) -> char {
        match self {
            DispSize::Byte => 'B',
            DispSize::Word => 'W',
            DispSize::Long => 'L',
        }
    }
}

/// A parsed operand specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandSpecifier {
    /// Short literal, modes 0-3: 6-bit value.
    Literal(u8),
    /// `base[Rx]`.
    Indexed { index: Reg, base: Box<OperandSpecifier> },
    /// `Rn`.
    Register(Reg),
    /// `(Rn)`.
    RegisterDeferred(Reg),
    /// `-(Rn)`.
    Autodecrement(Reg),
    /// `(Rn)+`.
    Autoincrement(Reg),
    /// `@(Rn)+`.
    AutoincrementDeferred(Reg),
    /// `d(Rn)` / `@d(Rn)`.
    Displacement { base: Reg, disp: i32, size: DispSize, deferred: bool },
    /// `#data`, `(PC)+`: `len` bytes of inline data.
    Immediate { value: u128, len: u8 },
    /// `@#addr`, `@(PC)+`.
    Absolute(u32),
    /// `d(PC)` / `@d(PC)`; `target` is the address the displacement reaches.
    Relative { disp: i32, size: DispSize, deferred: bool, target: u32 },
}

impl OperandSpecifier {
    /// Encoded length in bytes, including any base specifier.
    pub fn len(&self) -> u32 {
        match self {
            OperandSpecifier::Indexed { base, .. } => 1 + base.len(),
            OperandSpecifier::Displacement { size, .. } | OperandSpecifier::Relative { size, .. } => {
                1 + size.bytes()
            }
            OperandSpecifier::Immediate { len, .. } => 1 + *len as u32,
            OperandSpecifier::Absolute(_) => 5,
            _ => 1,
        }
    }

    /// Append the encoded bytes of this specifier to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            OperandSpecifier::Literal(v) => out.push(v & 0x3F),
            OperandSpecifier::Indexed { index, base } => {
                out.push(0x40 | index.number() as u8);
                base.encode(out);
            }
            OperandSpecifier::Register(r) => out.push(0x50 | r.number() as u8),
            OperandSpecifier::RegisterDeferred(r) => out.push(0x60 | r.number() as u8),
            OperandSpecifier::Autodecrement(r) => out.push(0x70 | r.number() as u8),
            OperandSpecifier::Autoincrement(r) => out.push(0x80 | r.number() as u8),
            OperandSpecifier::AutoincrementDeferred(r) => out.push(0x90 | r.number() as u8),
            OperandSpecifier::Displacement { base, disp, size, deferred } => {
                let mode = size.mode() + *deferred as u8;
                out.push((mode << 4) | base.number() as u8);
                out.extend_from_slice(&disp.to_le_bytes()[..size.bytes() as usize]);
            }
            OperandSpecifier::Immediate { value, len } => {
                out.push(0x8F);
                out.extend_from_slice(&value.to_le_bytes()[..*len as usize]);
            }
            OperandSpecifier::Absolute(addr) => {
                out.push(0x9F);
                out.extend_from_slice(&addr.to_le_bytes());
            }
            OperandSpecifier::Relative { disp, size, deferred, .. } => {
                let mode = size.mode() + *deferred as u8;
                out.push((mode << 4) | 0xF);
                out.extend_from_slice(&disp.to_le_bytes()[..size.bytes() as usize]);
            }
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, OperandSpecifier::Literal(_))
    }
}

impl fmt::Display for OperandSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSpecifier::Literal(v) => write!(f, "#{}", v),
            OperandSpecifier::Indexed { index, base } => write!(f, "{}[{}]", base, index),
            OperandSpecifier::Register(r) => write!(f, "{}", r),
            OperandSpecifier::RegisterDeferred(r) => write!(f, "({})", r),
            OperandSpecifier::Autodecrement(r) => write!(f, "-({})", r),
            OperandSpecifier::Autoincrement(r) => write!(f, "({})+", r),
            OperandSpecifier::AutoincrementDeferred(r) => write!(f, "@({})+", r),
            OperandSpecifier::Displacement { base, disp, size, deferred } => {
                let at = if *deferred { "@" } else { "" };
                write!(f, "{}{}^{}({})", at, size.prefix(), disp, base)
            }
            OperandSpecifier::Immediate { value, .. } => write!(f, "I^#{:#x}", value),
            OperandSpecifier::Absolute(addr) => write!(f, "@#{:#x}", addr),
            OperandSpecifier::Relative { target, size, deferred, .. } => {
                let at = if *deferred { "@" } else { "" };
                write!(f, "{}{}^{:#x}", at, size.prefix(), target)
            }
        }
    }
}

/// Parse one operand specifier for an operand declared as `spec`.
pub fn parse(cursor: &mut Cursor<'_>, spec: OperandSpec) -> Result<OperandSpecifier, DecodeError> {
    let address = cursor.pc();
    let byte = cursor.read_u8()?;
    let mode = byte >> 4;
    let reg = Reg::from_u8(byte);
    let reserved = DecodeError::ReservedAddressingMode { address, specifier: byte };
    let unsupported = DecodeError::UnsupportedAddressingMode { address, specifier: byte };

    match mode {
        0..=3 => {
            if spec.access != Access::Read {
                return Err(reserved);
            }
            Ok(OperandSpecifier::Literal(byte & 0x3F))
        }
        4 => {
            if reg == Reg::PC {
                return Err(reserved);
            }
            let base = parse_index_base(cursor, spec)?;
            Ok(OperandSpecifier::Indexed { index: reg, base: Box::new(base) })
        }
        5 => {
            if reg == Reg::PC {
                return Err(unsupported);
            }
            if spec.access == Access::Address {
                return Err(reserved);
            }
            let span = if spec.access == Access::Field { 1 } else { spec.data_type.register_span() };
            if reg.offset(span - 1).map_or(true, |last| last == Reg::PC) {
                return Err(unsupported);
            }
            Ok(OperandSpecifier::Register(reg))
        }
        6 | 7 if reg == Reg::PC => Err(unsupported),
        6 => Ok(OperandSpecifier::RegisterDeferred(reg)),
        7 => Ok(OperandSpecifier::Autodecrement(reg)),
        8 if reg == Reg::PC => {
            if matches!(spec.access, Access::Write | Access::Modify | Access::Field) {
                return Err(unsupported);
            }
            let len = spec.data_type.size();
            let value = cursor.read_le(len)?;
            Ok(OperandSpecifier::Immediate { value, len: len as u8 })
        }
        8 => Ok(OperandSpecifier::Autoincrement(reg)),
        9 if reg == Reg::PC => Ok(OperandSpecifier::Absolute(cursor.read_u32()?)),
        9 => Ok(OperandSpecifier::AutoincrementDeferred(reg)),
        _ => {
            let size = match mode {
                0xA | 0xB => DispSize::Byte,
                0xC | 0xD => DispSize::Word,
                _ => DispSize::Long,
            };
            let deferred = mode & 1 != 0;
            let disp = cursor.read_disp(size)?;
            if reg == Reg::PC {
                let target = cursor.pc().wrapping_add(disp as u32);
                Ok(OperandSpecifier::Relative { disp, size, deferred, target })
            } else {
                Ok(OperandSpecifier::Displacement { base: reg, disp, size, deferred })
            }
        }
    }
}

/// Parse the base specifier that follows an index prefix.
fn parse_index_base(cursor: &mut Cursor<'_>, spec: OperandSpec) -> Result<OperandSpecifier, DecodeError> {
    let address = cursor.pc();
    let byte = cursor.read_u8()?;
    let mode = byte >> 4;
    let reg = Reg::from_u8(byte);
    match mode {
        // literal, indexed, register
        0..=5 => Err(DecodeError::ReservedAddressingMode { address, specifier: byte }),
        8 if reg == Reg::PC => Err(DecodeError::UnsupportedAddressingMode { address, specifier: byte }),
        _ => {
            let mut base_cursor = Cursor { read_code: cursor.read_code, pc: address };
            let base = parse(&mut base_cursor, spec)?;
            cursor.pc = base_cursor.pc;
            Ok(base)
        }
    }
}
