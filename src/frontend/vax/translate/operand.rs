//! Operand materialization.
//!
//! Turns parsed specifiers into IR. Register side effects of autoincrement and
//! autodecrement are emitted when the specifier is resolved, so they appear in
//! encoded operand order. Read and modify operands are loaded at the same
//! point, before any later specifier can change the registers they depend on.

use crate::frontend::vax::decoder::DecodedOperand;
use crate::frontend::vax::exception::Exception;
use crate::frontend::vax::specifier::OperandSpecifier;
use crate::frontend::vax::translate::visitor::TranslatorVisitor;
use crate::frontend::vax::types::{Access, DataType, OperandSpec, Reg};
use crate::ir::types::Width;
use crate::ir::value::Value;

/// Where a resolved specifier lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperandKind {
    /// General register, or the first of a register pair/quad.
    Register(Reg),
    /// Operand in memory at `address`. With `deferred` set, `address` holds a
    /// longword pointer to the operand instead.
    Memory { address: Value, deferred: bool },
    Immediate(Value),
}

/// A resolved specifier tagged with the declared data type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperandValue {
    pub kind: OperandKind,
    pub data_type: DataType,
}

impl OperandValue {
    pub fn width(&self) -> Width {
        self.data_type.width()
    }
}

/// An operand after its access type has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// `.r`: the value read.
    Read { value: Value, data_type: DataType },
    /// `.m`: the settled location and the value read from it.
    Modify { location: OperandValue, value: Value },
    /// `.w`: the settled destination.
    Write { location: OperandValue },
    /// `.a`: the effective address.
    Address { address: Value },
    /// `.v`: register or settled memory location of a bit field base.
    Field { location: OperandValue },
    Branch { target: u32 },
    Inline { value: u32 },
}

// Handlers index operands by the signature of their opcode table entry, so
// the access kind of `ops[i]` is fixed when the handler is written. The
// accessors below panic if a handler asks for the wrong kind.
impl Operand {
    /// Value of a `.r` or `.m` operand. Panics on any other access kind.
    pub fn value(&self) -> Value {
        match *self {
            Operand::Read { value, .. } | Operand::Modify { value, .. } => value,
            _ => unreachable!("Operand::value on {:?}: table signature is not .r/.m", self),
        }
    }

    /// Location of a `.m`, `.w` or `.v` operand. Panics on any other access kind.
    pub fn location(&self) -> OperandValue {
        match *self {
            Operand::Modify { location, .. }
            | Operand::Write { location }
            | Operand::Field { location } => location,
            _ => unreachable!("Operand::location on {:?}: table signature is not .m/.w/.v", self),
        }
    }

    /// Panics unless this is an `.a` operand.
    pub fn address(&self) -> Value {
        match *self {
            Operand::Address { address } => address,
            _ => unreachable!("Operand::address on {:?}: table signature is not .a", self),
        }
    }

    /// Panics unless this is a `.b` operand.
    pub fn target(&self) -> u32 {
        match *self {
            Operand::Branch { target } => target,
            _ => unreachable!("Operand::target on {:?}: table signature is not .b", self),
        }
    }

    /// IR width of the operand's data.
    pub fn width(&self) -> Width {
        match *self {
            Operand::Read { data_type, .. } => data_type.width(),
            Operand::Modify { location, .. }
            | Operand::Write { location }
            | Operand::Field { location } => location.width(),
            Operand::Address { .. } | Operand::Branch { .. } | Operand::Inline { .. } => Width::W32,
        }
    }
}

/// Bits of the first word holding a floating exponent.
pub fn float_exponent_mask(data_type: DataType) -> u16 {
    match data_type {
        DataType::FFloating | DataType::DFloating => 0x7F80,
        DataType::GFloating => 0x7FF0,
        DataType::HFloating => 0x7FFF,
        _ => 0,
    }
}

/// Sign set with a zero exponent.
pub fn is_reserved_float(data_type: DataType, bits: u128) -> bool {
    let word = bits as u16;
    data_type.is_floating() && word & 0x8000 != 0 && word & float_exponent_mask(data_type) == 0
}

/// Value of a short literal for an operand of `data_type`.
pub fn expand_literal(data_type: DataType, literal: u8) -> u128 {
    let literal = (literal & 0x3F) as u128;
    let exp = literal >> 3;
    let frac = literal & 7;
    match data_type {
        DataType::FFloating | DataType::DFloating => ((128 + exp) << 7) | (frac << 4),
        DataType::GFloating => ((1024 + exp) << 4) | (frac << 1),
        DataType::HFloating => (16384 + exp) | (frac << 29),
        _ => literal,
    }
}

fn reg_plus(reg: Reg, n: usize) -> Reg {
    Reg::from_u8((reg.number() + n) as u8)
}

impl<'a> TranslatorVisitor<'a> {
    /// Apply the access type of `spec` to a decoded operand whose first byte is
    /// at `spec_pc`.
    pub fn evaluate_operand(&mut self, spec: OperandSpec, decoded: &DecodedOperand, spec_pc: u32) -> Operand {
        let specifier = match decoded {
            DecodedOperand::Branch { target, .. } => return Operand::Branch { target: *target },
            DecodedOperand::Inline { value, .. } => return Operand::Inline { value: *value },
            DecodedOperand::Specifier(s) => s,
        };
        let data_type = spec.data_type;
        let resolved = self.resolve(specifier, data_type, spec_pc);

        match spec.access {
            Access::Read => {
                if let OperandSpecifier::Immediate { value, .. } = specifier {
                    if is_reserved_float(data_type, *value) {
                        let pc = self.ir.pc();
                        tracing::warn!(pc = format_args!("{:#010x}", pc), "reserved floating immediate");
                        self.ir.raise_exception(Exception::ReservedOperand, pc);
                    }
                }
                let value = self.load(resolved);
                Operand::Read { value, data_type }
            }
            Access::Modify => {
                let location = self.settle(resolved);
                let value = self.load(location);
                Operand::Modify { location, value }
            }
            Access::Write => Operand::Write { location: self.settle(resolved) },
            Access::Field => Operand::Field { location: self.settle(resolved) },
            Access::Address | Access::Branch | Access::Inline => {
                Operand::Address { address: self.effective_address(resolved, spec_pc) }
            }
        }
    }

    /// Resolve a specifier to an `OperandValue`, emitting its register reads
    /// and register updates.
    pub fn resolve(&mut self, specifier: &OperandSpecifier, data_type: DataType, spec_pc: u32) -> OperandValue {
        let width = data_type.width();
        let size = data_type.size();

        let kind = match *specifier {
            OperandSpecifier::Literal(literal) => {
                OperandKind::Immediate(Value::imm(width, expand_literal(data_type, literal)))
            }
            OperandSpecifier::Indexed { index, ref base } => {
                let rx = self.ir.get_register(index);
                let scale = Value::ImmU32(size);
                let offset = self.ir.ir().mul(Width::W32, rx, scale);
                let base = self.resolve(base, data_type, spec_pc.wrapping_add(1));
                let base_address = self.effective_address(base, spec_pc.wrapping_add(1));
                let address = self.ir.ir().add(Width::W32, base_address, offset);
                OperandKind::Memory { address, deferred: false }
            }
            OperandSpecifier::Register(reg) => OperandKind::Register(reg),
            OperandSpecifier::RegisterDeferred(reg) => {
                let address = self.ir.get_register(reg);
                OperandKind::Memory { address, deferred: false }
            }
            OperandSpecifier::Autodecrement(reg) => {
                let old = self.ir.get_register(reg);
                let address = self.ir.ir().sub(Width::W32, old, Value::ImmU32(size));
                self.ir.set_register(reg, address);
                OperandKind::Memory { address, deferred: false }
            }
            OperandSpecifier::Autoincrement(reg) => {
                let address = self.ir.get_register(reg);
                let new = self.ir.ir().add(Width::W32, address, Value::ImmU32(size));
                self.ir.set_register(reg, new);
                OperandKind::Memory { address, deferred: false }
            }
            OperandSpecifier::AutoincrementDeferred(reg) => {
                let address = self.ir.get_register(reg);
                let new = self.ir.ir().add(Width::W32, address, Value::ImmU32(4));
                self.ir.set_register(reg, new);
                OperandKind::Memory { address, deferred: true }
            }
            OperandSpecifier::Displacement { base, disp, deferred, .. } => {
                let rn = self.ir.get_register(base);
                let address = self.ir.ir().add(Width::W32, rn, Value::ImmU32(disp as u32));
                OperandKind::Memory { address, deferred }
            }
            OperandSpecifier::Immediate { value, .. } => OperandKind::Immediate(Value::imm(width, value)),
            OperandSpecifier::Absolute(address) => {
                OperandKind::Memory { address: Value::ImmU32(address), deferred: false }
            }
            OperandSpecifier::Relative { target, deferred, .. } => {
                OperandKind::Memory { address: Value::ImmU32(target), deferred }
            }
        };
        OperandValue { kind, data_type }
    }

    /// Replace a deferred memory reference with the pointer it refers to.
    pub fn settle(&mut self, operand: OperandValue) -> OperandValue {
        match operand.kind {
            OperandKind::Memory { address, deferred: true } => {
                let pointer = self.ir.read_memory(Width::W32, address);
                OperandValue { kind: OperandKind::Memory { address: pointer, deferred: false }, ..operand }
            }
            _ => operand,
        }
    }

    /// Read the operand's value.
    pub fn load(&mut self, operand: OperandValue) -> Value {
        let operand = self.settle(operand);
        match operand.kind {
            OperandKind::Register(reg) => self.read_register(reg, operand.data_type),
            OperandKind::Memory { address, .. } => self.ir.read_memory(operand.width(), address),
            OperandKind::Immediate(value) => value,
        }
    }

    /// Effective address of a memory or immediate operand. The address of an
    /// immediate is that of its data in the instruction stream.
    ///
    /// `specifier::parse` rejects register mode for `.a` operands and for
    /// index bases, the two callers.
    pub fn effective_address(&mut self, operand: OperandValue, spec_pc: u32) -> Value {
        match self.settle(operand).kind {
            OperandKind::Memory { address, .. } => address,
            OperandKind::Immediate(_) => Value::ImmU32(spec_pc.wrapping_add(1)),
            OperandKind::Register(reg) => {
                unreachable!("register {} has no address: specifier::parse rejects Rn for .a", reg)
            }
        }
    }

    /// Read `data_type` from `reg` (and the registers after it for quad/octa).
    pub fn read_register(&mut self, reg: Reg, data_type: DataType) -> Value {
        match data_type.width() {
            Width::W8 | Width::W16 => {
                let full = self.ir.get_register(reg);
                self.ir.ir().truncate(data_type.width(), full)
            }
            Width::W64 => {
                let lo = self.ir.get_register(reg);
                let hi = self.ir.get_register(reg_plus(reg, 1));
                self.ir.ir().pack(Width::W32, lo, hi)
            }
            Width::W128 => {
                let r0 = self.ir.get_register(reg);
                let r1 = self.ir.get_register(reg_plus(reg, 1));
                let r2 = self.ir.get_register(reg_plus(reg, 2));
                let r3 = self.ir.get_register(reg_plus(reg, 3));
                let lo = self.ir.ir().pack(Width::W32, r0, r1);
                let hi = self.ir.ir().pack(Width::W32, r2, r3);
                self.ir.ir().pack(Width::W64, lo, hi)
            }
            _ => self.ir.get_register(reg),
        }
    }

    /// Write `data_type` to `reg`. Byte and word writes keep the upper bits.
    pub fn write_register(&mut self, reg: Reg, data_type: DataType, value: Value) {
        let width = data_type.width();
        match width {
            Width::W8 | Width::W16 => {
                let old = self.ir.get_register(reg);
                let keep = Value::ImmU32(!(width.mask() as u32));
                let upper = self.ir.ir().and(Width::W32, old, keep);
                let low = self.ir.ir().zero_extend(width, Width::W32, value);
                let merged = self.ir.ir().or(Width::W32, upper, low);
                self.ir.set_register(reg, merged);
            }
            Width::W64 | Width::W128 => {
                for k in 0..(width.bytes() / 4) as usize {
                    let part = if k == 0 {
                        value
                    } else {
                        self.ir.ir().logical_shift_right(width, value, Value::ImmU8(32 * k as u8))
                    };
                    let word = self.ir.ir().truncate(Width::W32, part);
                    self.ir.set_register(reg_plus(reg, k), word);
                }
            }
            _ => self.ir.set_register(reg, value),
        }
    }

    /// Store `value` into a settled location. `specifier::parse` rejects
    /// literal and immediate modes for `.w` and `.m`, so the location is never
    /// an immediate.
    pub fn store(&mut self, location: OperandValue, value: Value) {
        match location.kind {
            OperandKind::Register(reg) => self.write_register(reg, location.data_type, value),
            OperandKind::Memory { address, .. } => self.ir.write_memory(location.width(), address, value),
            OperandKind::Immediate(_) => {
                unreachable!("store to immediate: specifier::parse rejects #imm for .w/.m")
            }
        }
    }

    /// Store into a write or modify operand.
    pub fn write_operand(&mut self, operand: &Operand, value: Value) {
        self.store(operand.location(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_literals() {
        // 0.5 and 1.0 in F format
        assert_eq!(expand_literal(DataType::FFloating, 0), 0x4000);
        assert_eq!(expand_literal(DataType::FFloating, 8), 0x4080);
        assert_eq!(expand_literal(DataType::DFloating, 8), 0x4080);
        // 1.0 in G format
        assert_eq!(expand_literal(DataType::GFloating, 8), 0x4010);
        // 1.5 in H format: exponent 16385, top fraction bit set
        assert_eq!(expand_literal(DataType::HFloating, 0x0C), 0x4001 | (4 << 29));
        assert_eq!(expand_literal(DataType::Long, 0x3F), 63);
    }

    #[test]
    #[should_panic(expected = "table signature is not .r/.m")]
    fn test_value_of_branch_operand_panics() {
        Operand::Branch { target: 0x1000 }.value();
    }

    #[test]
    fn test_reserved_float_patterns() {
        assert!(is_reserved_float(DataType::FFloating, 0x8000));
        assert!(is_reserved_float(DataType::GFloating, 0x800F));
        assert!(!is_reserved_float(DataType::GFloating, 0x8010));
        assert!(!is_reserved_float(DataType::FFloating, 0x0000));
        assert!(!is_reserved_float(DataType::Long, 0x8000));
        assert!(is_reserved_float(DataType::HFloating, 0x8000));
    }
}
