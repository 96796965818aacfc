use crate::frontend::vax::ipr::Ipr;

/// Errors that stop decoding of the current instruction.
///
/// All of them are fatal to the block being translated; the builder keeps the
/// IR of the instructions before the failing one.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("illegal opcode {opcode:#x} at {address:#010x}")]
    IllegalOpcode { address: u32, opcode: u16 },
    #[error("unsupported addressing mode in specifier {specifier:#04x} at {address:#010x}")]
    UnsupportedAddressingMode { address: u32, specifier: u8 },
    #[error("reserved addressing mode in specifier {specifier:#04x} at {address:#010x}")]
    ReservedAddressingMode { address: u32, specifier: u8 },
    #[error("code fetch failed at {address:#010x}")]
    CodeFetch { address: u32 },
}

impl DecodeError {
    /// Address the error is reported at.
    pub fn address(&self) -> u32 {
        match *self {
            DecodeError::IllegalOpcode { address, .. }
            | DecodeError::UnsupportedAddressingMode { address, .. }
            | DecodeError::ReservedAddressingMode { address, .. }
            | DecodeError::CodeFetch { address } => address,
        }
    }
}

/// Architectural access to processor state that faults with a reserved operand.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("reserved internal processor register {0}")]
    ReservedIpr(u32),
    #[error("internal processor register {0} is read-only")]
    ReadOnlyIpr(Ipr),
    #[error("internal processor register {0} is write-only")]
    WriteOnlyIpr(Ipr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = DecodeError::IllegalOpcode { address: 0x1000, opcode: 0x57 };
        assert_eq!(e.to_string(), "illegal opcode 0x57 at 0x00001000");
        assert_eq!(e.address(), 0x1000);

        let e = DecodeError::UnsupportedAddressingMode { address: 0x2001, specifier: 0x5F };
        assert_eq!(e.to_string(), "unsupported addressing mode in specifier 0x5f at 0x00002001");
    }

    #[test]
    fn test_state_error_display() {
        assert_eq!(StateError::ReservedIpr(70).to_string(), "reserved internal processor register 70");
        assert_eq!(StateError::ReadOnlyIpr(Ipr::Sid).to_string(), "internal processor register SID is read-only");
    }
}
