use std::fmt;

use crate::error::DecodeError;
use crate::frontend::vax::opcodes::{self, InstInfo, Mnemonic};
use crate::frontend::vax::specifier::{self, Cursor, DispSize, OperandSpecifier};
use crate::frontend::vax::types::{Access, DataType, OperandSpec};

/// One decoded operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedOperand {
    /// A general operand specifier.
    Specifier(OperandSpecifier),
    /// Branch displacement with its resolved target.
    Branch { disp: i32, size: DispSize, target: u32 },
    /// Raw inline data (BUGW/BUGL).
    Inline { value: u32, size: DispSize },
}

impl DecodedOperand {
    pub fn len(&self) -> u32 {
        match self {
            DecodedOperand::Specifier(s) => s.len(),
            DecodedOperand::Branch { size, .. } | DecodedOperand::Inline { size, .. } => size.bytes(),
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            DecodedOperand::Specifier(s) => s.encode(out),
            DecodedOperand::Branch { disp, size, .. } => {
                out.extend_from_slice(&disp.to_le_bytes()[..size.bytes() as usize]);
            }
            DecodedOperand::Inline { value, size } => {
                out.extend_from_slice(&value.to_le_bytes()[..size.bytes() as usize]);
            }
        }
    }
}

impl fmt::Display for DecodedOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedOperand::Specifier(s) => write!(f, "{}", s),
            DecodedOperand::Branch { target, .. } => write!(f, "{:#x}", target),
            DecodedOperand::Inline { value, .. } => write!(f, "#{:#x}", value),
        }
    }
}

/// A fully decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub address: u32,
    pub info: &'static InstInfo,
    pub operands: Vec<DecodedOperand>,
    /// Encoded length: opcode bytes plus every operand's bytes.
    pub length: u32,
}

impl DecodedInstruction {
    pub fn mnemonic(&self) -> Mnemonic {
        self.info.mnemonic
    }

    pub fn opcode(&self) -> u16 {
        self.info.opcode
    }

    /// Address of the byte following the instruction.
    pub fn next_pc(&self) -> u32 {
        self.address.wrapping_add(self.length)
    }

    /// Re-encode to instruction-stream bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.length as usize);
        if self.info.opcode > 0xFF {
            out.push((self.info.opcode >> 8) as u8);
        }
        out.push(self.info.opcode as u8);
        for operand in &self.operands {
            operand.encode(&mut out);
        }
        out
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info.mnemonic)?;
        for (i, operand) in self.operands.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, operand)?;
        }
        Ok(())
    }
}

/// Read a one- or two-byte opcode and look it up.
pub fn fetch_opcode(cursor: &mut Cursor<'_>) -> Result<&'static InstInfo, DecodeError> {
    let address = cursor.pc();
    let first = cursor.read_u8()?;
    let opcode = if opcodes::is_prefix(first) {
        ((first as u16) << 8) | cursor.read_u8()? as u16
    } else {
        first as u16
    };
    opcodes::lookup(opcode).ok_or(DecodeError::IllegalOpcode { address, opcode })
}

/// Decode one operand of the given declared type.
pub fn decode_operand(cursor: &mut Cursor<'_>, spec: OperandSpec) -> Result<DecodedOperand, DecodeError> {
    Ok(match spec.access {
        Access::Branch => {
            let size = disp_size(spec.data_type);
            let disp = cursor.read_disp(size)?;
            let target = cursor.pc().wrapping_add(disp as u32);
            DecodedOperand::Branch { disp, size, target }
        }
        Access::Inline => {
            let size = disp_size(spec.data_type);
            let value = cursor.read_le(size.bytes())? as u32;
            DecodedOperand::Inline { value, size }
        }
        _ => DecodedOperand::Specifier(specifier::parse(cursor, spec)?),
    })
}

/// Decode the operands declared by `info`, in encoded order.
pub fn decode_operands(cursor: &mut Cursor<'_>, info: &InstInfo) -> Result<Vec<DecodedOperand>, DecodeError> {
    info.operands.iter().map(|spec| decode_operand(cursor, *spec)).collect()
}

fn disp_size(data_type: DataType) -> DispSize {
    match data_type {
        DataType::Byte => DispSize::Byte,
        DataType::Word => DispSize::Word,
        _ => DispSize::Long,
    }
}

/// Decode the instruction at `address` without emitting IR.
pub fn decode_instruction(
    address: u32,
    read_code: &dyn Fn(u32) -> Option<u8>,
) -> Result<DecodedInstruction, DecodeError> {
    let mut cursor = Cursor::new(read_code, address);
    let info = fetch_opcode(&mut cursor)?;
    let operands = decode_operands(&mut cursor, info)?;
    let length = cursor.pc().wrapping_sub(address);
    Ok(DecodedInstruction { address, info, operands, length })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(bytes: &[u8]) -> Result<DecodedInstruction, DecodeError> {
        let code = bytes.to_vec();
        let read = move |addr: u32| code.get(addr.wrapping_sub(0x1000) as usize).copied();
        decode_instruction(0x1000, &read)
    }

    #[test]
    fn test_halt_has_no_operands() {
        let inst = decode(&[0x00, 0x51, 0x52]).unwrap();
        assert_eq!(inst.mnemonic(), Mnemonic::HALT);
        assert!(inst.operands.is_empty());
        assert_eq!(inst.length, 1);
    }

    #[test]
    fn test_reserved_opcodes() {
        for byte in [0x57u8, 0x59, 0x5A, 0x5B, 0x77] {
            assert_eq!(
                decode(&[byte]),
                Err(DecodeError::IllegalOpcode { address: 0x1000, opcode: byte as u16 })
            );
        }
        assert_eq!(
            decode(&[0xFE, 0x00]),
            Err(DecodeError::IllegalOpcode { address: 0x1000, opcode: 0xFE00 })
        );
    }

    #[test]
    fn test_disassembly_text() {
        assert_eq!(decode(&[0xC1, 0x51, 0x52, 0x53]).unwrap().to_string(), "ADDL3 R1, R2, R3");
        assert_eq!(decode(&[0xD0, 0x05, 0x7E]).unwrap().to_string(), "MOVL #5, -(SP)");
        assert_eq!(decode(&[0x11, 0x02]).unwrap().to_string(), "BRB 0x1004");
        assert_eq!(decode(&[0x31, 0xFD, 0xFF]).unwrap().to_string(), "BRW 0x1000");
        assert_eq!(decode(&[0xFF, 0xFE, 0x34, 0x12]).unwrap().to_string(), "BUGW #0x1234");
    }

    #[test]
    fn test_length_matches_operands() {
        // MOVL L^0x12345678(R1), @#0x2000
        let bytes = [0xD0, 0xE1, 0x78, 0x56, 0x34, 0x12, 0x9F, 0x00, 0x20, 0x00, 0x00];
        let inst = decode(&bytes).unwrap();
        assert_eq!(inst.length, 11);
        let sum: u32 = inst.operands.iter().map(|o| o.len()).sum();
        assert_eq!(inst.length, inst.info.opcode_len() + sum);
        assert_eq!(inst.encode(), bytes.to_vec());
    }

    #[test]
    fn test_two_byte_opcode() {
        // MOVO R0, R4
        let inst = decode(&[0xFD, 0x7D, 0x50, 0x54]).unwrap();
        assert_eq!(inst.mnemonic(), Mnemonic::MOVO);
        assert_eq!(inst.length, 4);
        assert_eq!(inst.encode(), vec![0xFD, 0x7D, 0x50, 0x54]);
    }

    #[test]
    fn test_octaword_register_span() {
        // MOVO R0, R12 would need R12..R15
        assert_eq!(
            decode(&[0xFD, 0x7D, 0x50, 0x5C]),
            Err(DecodeError::UnsupportedAddressingMode { address: 0x1003, specifier: 0x5C })
        );
    }

    proptest! {
        #[test]
        fn decode_length_and_reencode(bytes in proptest::collection::vec(any::<u8>(), 1..40)) {
            if let Ok(inst) = decode(&bytes) {
                let sum: u32 = inst.operands.iter().map(|o| o.len()).sum();
                prop_assert_eq!(inst.length, inst.info.opcode_len() + sum);
                let encoded = inst.encode();
                prop_assert_eq!(&encoded[..], &bytes[..inst.length as usize]);
                let again = decode(&encoded).unwrap();
                prop_assert_eq!(again.encode(), encoded);
            }
        }
    }
}
