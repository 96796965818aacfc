//! VAX opcode dispatch table.
//!
//! One entry per defined opcode: mnemonic, operand signature and the semantic
//! handler that emits its IR. Single-byte opcodes occupy 0x00-0xFC; the 0xFD,
//! 0xFE and 0xFF prefixes form two-byte opcodes `(prefix << 8) | next`.

use std::fmt;

use crate::frontend::vax::types::{Access, DataType, OperandSpec};
use crate::ir::cond::Cond;

/// Two-byte opcode prefixes.
pub const PREFIX_FD: u8 = 0xFD;
pub const PREFIX_FE: u8 = 0xFE;
pub const PREFIX_FF: u8 = 0xFF;

pub fn is_prefix(byte: u8) -> bool {
    byte >= PREFIX_FD
}

/// Families whose semantics are supplied by a host helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperFamily {
    /// F/D/G/H arithmetic, conversion, comparison, EMOD, POLY, ACBx.
    Float,
    /// Packed decimal arithmetic, conversion and comparison.
    Decimal,
    /// Character string instructions.
    String,
    Crc,
    Edit,
    /// Absolute and self-relative queues.
    Queue,
    /// Variable-length bit field instructions.
    Field,
    ExtendedDivide,
    /// PUSHR/POPR.
    RegisterMask,
    /// CALLG/CALLS/RET.
    Procedure,
    ChangeMode,
    Rei,
    /// LDPCTX/SVPCTX.
    Context,
    Probe,
}

impl HelperFamily {
    /// Families that load a new PC and so must end the block.
    pub fn transfers_control(self) -> bool {
        matches!(
            self,
            HelperFamily::Procedure | HelperFamily::ChangeMode | HelperFamily::Rei | HelperFamily::Context
        )
    }

    /// Families only executable in kernel mode.
    pub fn is_privileged(self) -> bool {
        matches!(self, HelperFamily::Context)
    }
}

/// Semantic handler selected by dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    Halt,
    Nop,
    Bpt,
    Xfc,
    Bug,

    Add2,
    Add3,
    Sub2,
    Sub3,
    Mul2,
    Mul3,
    Div2,
    Div3,
    Adwc,
    Sbwc,
    Adawi,
    Inc,
    Dec,
    Mneg,
    Mcom,
    Bis2,
    Bis3,
    Bic2,
    Bic3,
    Xor2,
    Xor3,
    Bit,
    Mov,
    /// F/D/G/H move: bit copy with floating condition codes.
    MovFloat,
    Movz,
    Cvt,
    Clr,
    Cmp,
    Tst,
    Ash,
    Rotl,
    Emul,
    Index,
    Push,
    Mova,
    Pusha,
    Movpsl,
    Bispsw,
    Bicpsw,
    Mtpr,
    Mfpr,

    Bcc(Cond),
    Br,
    Bsb,
    Jmp,
    Jsb,
    Rsb,
    /// BLBS (`set`) / BLBC.
    Blb { set: bool },
    /// SOBGTR (`gtr`) / SOBGEQ.
    Sob { gtr: bool },
    /// AOBLEQ (`leq`) / AOBLSS.
    Aob { leq: bool },
    Acb,
    Case,
    /// Branch on bit: branch when the bit equals `set`, then optionally
    /// write `update` into it.
    Bb { set: bool, update: Option<bool> },

    Helper(HelperFamily),
    /// Helper whose boolean result decides a branch (ACBF/D/G/H).
    HelperBranch(HelperFamily),
}

impl Handler {
    /// True if the instruction always ends the translation block.
    pub fn ends_block(self) -> bool {
        use Handler::*;
        match self {
            Halt | Bpt | Xfc | Bug => true,
            Bcc(_) | Br | Bsb | Jmp | Jsb | Rsb => true,
            Blb { .. } | Sob { .. } | Aob { .. } | Acb | Case | Bb { .. } => true,
            HelperBranch(_) => true,
            Helper(family) => family.transfers_control(),
            // PSL writes may change the trace or overflow-enable bits
            Bispsw | Bicpsw => true,
            // IPL, MAPEN and the TB registers change the context of later code
            Mtpr => true,
            _ => false,
        }
    }
}

/// One dispatch table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstInfo {
    pub mnemonic: Mnemonic,
    pub opcode: u16,
    pub handler: Handler,
    pub operands: &'static [OperandSpec],
}

impl InstInfo {
    /// Encoded opcode length in bytes.
    pub fn opcode_len(&self) -> u32 {
        if self.opcode > 0xFF { 2 } else { 1 }
    }
}

const fn op(access: Access, data_type: DataType) -> OperandSpec {
    OperandSpec::new(access, data_type)
}

const RB: OperandSpec = op(Access::Read, DataType::Byte);
const RW: OperandSpec = op(Access::Read, DataType::Word);
const RL: OperandSpec = op(Access::Read, DataType::Long);
const RQ: OperandSpec = op(Access::Read, DataType::Quad);
const RO: OperandSpec = op(Access::Read, DataType::Octa);
const RF: OperandSpec = op(Access::Read, DataType::FFloating);
const RD: OperandSpec = op(Access::Read, DataType::DFloating);
const RG: OperandSpec = op(Access::Read, DataType::GFloating);
const RH: OperandSpec = op(Access::Read, DataType::HFloating);

const WB: OperandSpec = op(Access::Write, DataType::Byte);
const WW: OperandSpec = op(Access::Write, DataType::Word);
const WL: OperandSpec = op(Access::Write, DataType::Long);
const WQ: OperandSpec = op(Access::Write, DataType::Quad);
const WO: OperandSpec = op(Access::Write, DataType::Octa);
const WF: OperandSpec = op(Access::Write, DataType::FFloating);
const WD: OperandSpec = op(Access::Write, DataType::DFloating);
const WG: OperandSpec = op(Access::Write, DataType::GFloating);
const WH: OperandSpec = op(Access::Write, DataType::HFloating);

const MB: OperandSpec = op(Access::Modify, DataType::Byte);
const MW: OperandSpec = op(Access::Modify, DataType::Word);
const ML: OperandSpec = op(Access::Modify, DataType::Long);
const MF: OperandSpec = op(Access::Modify, DataType::FFloating);
const MD: OperandSpec = op(Access::Modify, DataType::DFloating);
const MG: OperandSpec = op(Access::Modify, DataType::GFloating);
const MH: OperandSpec = op(Access::Modify, DataType::HFloating);

const AB: OperandSpec = op(Access::Address, DataType::Byte);
const AW: OperandSpec = op(Access::Address, DataType::Word);
const AL: OperandSpec = op(Access::Address, DataType::Long);
const AQ: OperandSpec = op(Access::Address, DataType::Quad);
const AO: OperandSpec = op(Access::Address, DataType::Octa);

const VB: OperandSpec = op(Access::Field, DataType::Byte);

const BB: OperandSpec = op(Access::Branch, DataType::Byte);
const BW: OperandSpec = op(Access::Branch, DataType::Word);

const IW: OperandSpec = op(Access::Inline, DataType::Word);
const IL: OperandSpec = op(Access::Inline, DataType::Long);

macro_rules! vax_opcodes {
    ($( $opc:literal $name:ident $handler:expr => [$($spec:ident),*]; )*) => {
        /// Instruction mnemonics.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        pub enum Mnemonic {
            $($name,)*
        }

        impl Mnemonic {
            pub fn name(self) -> &'static str {
                match self {
                    $(Mnemonic::$name => stringify!($name),)*
                }
            }
        }

        /// Dispatch table, sorted by opcode.
        static TABLE: &[InstInfo] = &[
            $(InstInfo {
                mnemonic: Mnemonic::$name,
                opcode: $opc,
                handler: $handler,
                operands: &[$($spec),*],
            },)*
        ];
    };
}

use self::HelperFamily as H;
use self::Handler as X;

vax_opcodes! {
    0x00 HALT X::Halt => [];
    0x01 NOP X::Nop => [];
    0x02 REI X::Helper(H::Rei) => [];
    0x03 BPT X::Bpt => [];
    0x04 RET X::Helper(H::Procedure) => [];
    0x05 RSB X::Rsb => [];
    0x06 LDPCTX X::Helper(H::Context) => [];
    0x07 SVPCTX X::Helper(H::Context) => [];
    0x08 CVTPS X::Helper(H::Decimal) => [RW, AB, RW, AB];
    0x09 CVTSP X::Helper(H::Decimal) => [RW, AB, RW, AB];
    0x0A INDEX X::Index => [RL, RL, RL, RL, RL, WL];
    0x0B CRC X::Helper(H::Crc) => [AB, RL, RW, AB];
    0x0C PROBER X::Helper(H::Probe) => [RB, RW, AB];
    0x0D PROBEW X::Helper(H::Probe) => [RB, RW, AB];
    0x0E INSQUE X::Helper(H::Queue) => [AB, AB];
    0x0F REMQUE X::Helper(H::Queue) => [AB, WL];

    0x10 BSBB X::Bsb => [BB];
    0x11 BRB X::Br => [BB];
    0x12 BNEQ X::Bcc(Cond::NEQ) => [BB];
    0x13 BEQL X::Bcc(Cond::EQL) => [BB];
    0x14 BGTR X::Bcc(Cond::GTR) => [BB];
    0x15 BLEQ X::Bcc(Cond::LEQ) => [BB];
    0x16 JSB X::Jsb => [AB];
    0x17 JMP X::Jmp => [AB];
    0x18 BGEQ X::Bcc(Cond::GEQ) => [BB];
    0x19 BLSS X::Bcc(Cond::LSS) => [BB];
    0x1A BGTRU X::Bcc(Cond::GTRU) => [BB];
    0x1B BLEQU X::Bcc(Cond::LEQU) => [BB];
    0x1C BVC X::Bcc(Cond::VC) => [BB];
    0x1D BVS X::Bcc(Cond::VS) => [BB];
    0x1E BGEQU X::Bcc(Cond::GEQU) => [BB];
    0x1F BLSSU X::Bcc(Cond::LSSU) => [BB];

    0x20 ADDP4 X::Helper(H::Decimal) => [RW, AB, RW, AB];
    0x21 ADDP6 X::Helper(H::Decimal) => [RW, AB, RW, AB, RW, AB];
    0x22 SUBP4 X::Helper(H::Decimal) => [RW, AB, RW, AB];
    0x23 SUBP6 X::Helper(H::Decimal) => [RW, AB, RW, AB, RW, AB];
    0x24 CVTPT X::Helper(H::Decimal) => [RW, AB, AB, RW, AB];
    0x25 MULP X::Helper(H::Decimal) => [RW, AB, RW, AB, RW, AB];
    0x26 CVTTP X::Helper(H::Decimal) => [RW, AB, AB, RW, AB];
    0x27 DIVP X::Helper(H::Decimal) => [RW, AB, RW, AB, RW, AB];
    0x28 MOVC3 X::Helper(H::String) => [RW, AB, AB];
    0x29 CMPC3 X::Helper(H::String) => [RW, AB, AB];
    0x2A SCANC X::Helper(H::String) => [RW, AB, AB, RB];
    0x2B SPANC X::Helper(H::String) => [RW, AB, AB, RB];
    0x2C MOVC5 X::Helper(H::String) => [RW, AB, RB, RW, AB];
    0x2D CMPC5 X::Helper(H::String) => [RW, AB, RB, RW, AB];
    0x2E MOVTC X::Helper(H::String) => [RW, AB, RB, AB, RW, AB];
    0x2F MOVTUC X::Helper(H::String) => [RW, AB, RB, AB, RW, AB];

    0x30 BSBW X::Bsb => [BW];
    0x31 BRW X::Br => [BW];
    0x32 CVTWL X::Cvt => [RW, WL];
    0x33 CVTWB X::Cvt => [RW, WB];
    0x34 MOVP X::Helper(H::Decimal) => [RW, AB, AB];
    0x35 CMPP3 X::Helper(H::Decimal) => [RW, AB, AB];
    0x36 CVTPL X::Helper(H::Decimal) => [RW, AB, WL];
    0x37 CMPP4 X::Helper(H::Decimal) => [RW, AB, RW, AB];
    0x38 EDITPC X::Helper(H::Edit) => [RW, AB, AB, AB];
    0x39 MATCHC X::Helper(H::String) => [RW, AB, RW, AB];
    0x3A LOCC X::Helper(H::String) => [RB, RW, AB];
    0x3B SKPC X::Helper(H::String) => [RB, RW, AB];
    0x3C MOVZWL X::Movz => [RW, WL];
    0x3D ACBW X::Acb => [RW, RW, MW, BW];
    0x3E MOVAW X::Mova => [AW, WL];
    0x3F PUSHAW X::Pusha => [AW];

    0x40 ADDF2 X::Helper(H::Float) => [RF, MF];
    0x41 ADDF3 X::Helper(H::Float) => [RF, RF, WF];
    0x42 SUBF2 X::Helper(H::Float) => [RF, MF];
    0x43 SUBF3 X::Helper(H::Float) => [RF, RF, WF];
    0x44 MULF2 X::Helper(H::Float) => [RF, MF];
    0x45 MULF3 X::Helper(H::Float) => [RF, RF, WF];
    0x46 DIVF2 X::Helper(H::Float) => [RF, MF];
    0x47 DIVF3 X::Helper(H::Float) => [RF, RF, WF];
    0x48 CVTFB X::Helper(H::Float) => [RF, WB];
    0x49 CVTFW X::Helper(H::Float) => [RF, WW];
    0x4A CVTFL X::Helper(H::Float) => [RF, WL];
    0x4B CVTRFL X::Helper(H::Float) => [RF, WL];
    0x4C CVTBF X::Helper(H::Float) => [RB, WF];
    0x4D CVTWF X::Helper(H::Float) => [RW, WF];
    0x4E CVTLF X::Helper(H::Float) => [RL, WF];
    0x4F ACBF X::HelperBranch(H::Float) => [RF, RF, MF, BW];
    0x50 MOVF X::MovFloat => [RF, WF];
    0x51 CMPF X::Helper(H::Float) => [RF, RF];
    0x52 MNEGF X::Helper(H::Float) => [RF, WF];
    0x53 TSTF X::Helper(H::Float) => [RF];
    0x54 EMODF X::Helper(H::Float) => [RF, RB, RF, WL, WF];
    0x55 POLYF X::Helper(H::Float) => [RF, RW, AB];
    0x56 CVTFD X::Helper(H::Float) => [RF, WD];
    0x58 ADAWI X::Adawi => [RW, MW];
    0x5C INSQHI X::Helper(H::Queue) => [AB, AQ];
    0x5D INSQTI X::Helper(H::Queue) => [AB, AQ];
    0x5E REMQHI X::Helper(H::Queue) => [AQ, WL];
    0x5F REMQTI X::Helper(H::Queue) => [AQ, WL];

    0x60 ADDD2 X::Helper(H::Float) => [RD, MD];
    0x61 ADDD3 X::Helper(H::Float) => [RD, RD, WD];
    0x62 SUBD2 X::Helper(H::Float) => [RD, MD];
    0x63 SUBD3 X::Helper(H::Float) => [RD, RD, WD];
    0x64 MULD2 X::Helper(H::Float) => [RD, MD];
    0x65 MULD3 X::Helper(H::Float) => [RD, RD, WD];
    0x66 DIVD2 X::Helper(H::Float) => [RD, MD];
    0x67 DIVD3 X::Helper(H::Float) => [RD, RD, WD];
    0x68 CVTDB X::Helper(H::Float) => [RD, WB];
    0x69 CVTDW X::Helper(H::Float) => [RD, WW];
    0x6A CVTDL X::Helper(H::Float) => [RD, WL];
    0x6B CVTRDL X::Helper(H::Float) => [RD, WL];
    0x6C CVTBD X::Helper(H::Float) => [RB, WD];
    0x6D CVTWD X::Helper(H::Float) => [RW, WD];
    0x6E CVTLD X::Helper(H::Float) => [RL, WD];
    0x6F ACBD X::HelperBranch(H::Float) => [RD, RD, MD, BW];
    0x70 MOVD X::MovFloat => [RD, WD];
    0x71 CMPD X::Helper(H::Float) => [RD, RD];
    0x72 MNEGD X::Helper(H::Float) => [RD, WD];
    0x73 TSTD X::Helper(H::Float) => [RD];
    0x74 EMODD X::Helper(H::Float) => [RD, RB, RD, WL, WD];
    0x75 POLYD X::Helper(H::Float) => [RD, RW, AB];
    0x76 CVTDF X::Helper(H::Float) => [RD, WF];
    0x78 ASHL X::Ash => [RB, RL, WL];
    0x79 ASHQ X::Ash => [RB, RQ, WQ];
    0x7A EMUL X::Emul => [RL, RL, RL, WQ];
    0x7B EDIV X::Helper(H::ExtendedDivide) => [RL, RQ, WL, WL];
    0x7C CLRQ X::Clr => [WQ];
    0x7D MOVQ X::Mov => [RQ, WQ];
    0x7E MOVAQ X::Mova => [AQ, WL];
    0x7F PUSHAQ X::Pusha => [AQ];

    0x80 ADDB2 X::Add2 => [RB, MB];
    0x81 ADDB3 X::Add3 => [RB, RB, WB];
    0x82 SUBB2 X::Sub2 => [RB, MB];
    0x83 SUBB3 X::Sub3 => [RB, RB, WB];
    0x84 MULB2 X::Mul2 => [RB, MB];
    0x85 MULB3 X::Mul3 => [RB, RB, WB];
    0x86 DIVB2 X::Div2 => [RB, MB];
    0x87 DIVB3 X::Div3 => [RB, RB, WB];
    0x88 BISB2 X::Bis2 => [RB, MB];
    0x89 BISB3 X::Bis3 => [RB, RB, WB];
    0x8A BICB2 X::Bic2 => [RB, MB];
    0x8B BICB3 X::Bic3 => [RB, RB, WB];
    0x8C XORB2 X::Xor2 => [RB, MB];
    0x8D XORB3 X::Xor3 => [RB, RB, WB];
    0x8E MNEGB X::Mneg => [RB, WB];
    0x8F CASEB X::Case => [RB, RB, RB];
    0x90 MOVB X::Mov => [RB, WB];
    0x91 CMPB X::Cmp => [RB, RB];
    0x92 MCOMB X::Mcom => [RB, WB];
    0x93 BITB X::Bit => [RB, RB];
    0x94 CLRB X::Clr => [WB];
    0x95 TSTB X::Tst => [RB];
    0x96 INCB X::Inc => [MB];
    0x97 DECB X::Dec => [MB];
    0x98 CVTBL X::Cvt => [RB, WL];
    0x99 CVTBW X::Cvt => [RB, WW];
    0x9A MOVZBL X::Movz => [RB, WL];
    0x9B MOVZBW X::Movz => [RB, WW];
    0x9C ROTL X::Rotl => [RB, RL, WL];
    0x9D ACBB X::Acb => [RB, RB, MB, BW];
    0x9E MOVAB X::Mova => [AB, WL];
    0x9F PUSHAB X::Pusha => [AB];

    0xA0 ADDW2 X::Add2 => [RW, MW];
    0xA1 ADDW3 X::Add3 => [RW, RW, WW];
    0xA2 SUBW2 X::Sub2 => [RW, MW];
    0xA3 SUBW3 X::Sub3 => [RW, RW, WW];
    0xA4 MULW2 X::Mul2 => [RW, MW];
    0xA5 MULW3 X::Mul3 => [RW, RW, WW];
    0xA6 DIVW2 X::Div2 => [RW, MW];
    0xA7 DIVW3 X::Div3 => [RW, RW, WW];
    0xA8 BISW2 X::Bis2 => [RW, MW];
    0xA9 BISW3 X::Bis3 => [RW, RW, WW];
    0xAA BICW2 X::Bic2 => [RW, MW];
    0xAB BICW3 X::Bic3 => [RW, RW, WW];
    0xAC XORW2 X::Xor2 => [RW, MW];
    0xAD XORW3 X::Xor3 => [RW, RW, WW];
    0xAE MNEGW X::Mneg => [RW, WW];
    0xAF CASEW X::Case => [RW, RW, RW];
    0xB0 MOVW X::Mov => [RW, WW];
    0xB1 CMPW X::Cmp => [RW, RW];
    0xB2 MCOMW X::Mcom => [RW, WW];
    0xB3 BITW X::Bit => [RW, RW];
    0xB4 CLRW X::Clr => [WW];
    0xB5 TSTW X::Tst => [RW];
    0xB6 INCW X::Inc => [MW];
    0xB7 DECW X::Dec => [MW];
    0xB8 BISPSW X::Bispsw => [RW];
    0xB9 BICPSW X::Bicpsw => [RW];
    0xBA POPR X::Helper(H::RegisterMask) => [RW];
    0xBB PUSHR X::Helper(H::RegisterMask) => [RW];
    0xBC CHMK X::Helper(H::ChangeMode) => [RW];
    0xBD CHME X::Helper(H::ChangeMode) => [RW];
    0xBE CHMS X::Helper(H::ChangeMode) => [RW];
    0xBF CHMU X::Helper(H::ChangeMode) => [RW];

    0xC0 ADDL2 X::Add2 => [RL, ML];
    0xC1 ADDL3 X::Add3 => [RL, RL, WL];
    0xC2 SUBL2 X::Sub2 => [RL, ML];
    0xC3 SUBL3 X::Sub3 => [RL, RL, WL];
    0xC4 MULL2 X::Mul2 => [RL, ML];
    0xC5 MULL3 X::Mul3 => [RL, RL, WL];
    0xC6 DIVL2 X::Div2 => [RL, ML];
    0xC7 DIVL3 X::Div3 => [RL, RL, WL];
    0xC8 BISL2 X::Bis2 => [RL, ML];
    0xC9 BISL3 X::Bis3 => [RL, RL, WL];
    0xCA BICL2 X::Bic2 => [RL, ML];
    0xCB BICL3 X::Bic3 => [RL, RL, WL];
    0xCC XORL2 X::Xor2 => [RL, ML];
    0xCD XORL3 X::Xor3 => [RL, RL, WL];
    0xCE MNEGL X::Mneg => [RL, WL];
    0xCF CASEL X::Case => [RL, RL, RL];
    0xD0 MOVL X::Mov => [RL, WL];
    0xD1 CMPL X::Cmp => [RL, RL];
    0xD2 MCOML X::Mcom => [RL, WL];
    0xD3 BITL X::Bit => [RL, RL];
    0xD4 CLRL X::Clr => [WL];
    0xD5 TSTL X::Tst => [RL];
    0xD6 INCL X::Inc => [ML];
    0xD7 DECL X::Dec => [ML];
    0xD8 ADWC X::Adwc => [RL, ML];
    0xD9 SBWC X::Sbwc => [RL, ML];
    0xDA MTPR X::Mtpr => [RL, RL];
    0xDB MFPR X::Mfpr => [RL, WL];
    0xDC MOVPSL X::Movpsl => [WL];
    0xDD PUSHL X::Push => [RL];
    0xDE MOVAL X::Mova => [AL, WL];
    0xDF PUSHAL X::Pusha => [AL];

    0xE0 BBS X::Bb { set: true, update: None } => [RL, VB, BB];
    0xE1 BBC X::Bb { set: false, update: None } => [RL, VB, BB];
    0xE2 BBSS X::Bb { set: true, update: Some(true) } => [RL, VB, BB];
    0xE3 BBCS X::Bb { set: false, update: Some(true) } => [RL, VB, BB];
    0xE4 BBSC X::Bb { set: true, update: Some(false) } => [RL, VB, BB];
    0xE5 BBCC X::Bb { set: false, update: Some(false) } => [RL, VB, BB];
    0xE6 BBSSI X::Bb { set: true, update: Some(true) } => [RL, VB, BB];
    0xE7 BBCCI X::Bb { set: false, update: Some(false) } => [RL, VB, BB];
    0xE8 BLBS X::Blb { set: true } => [RL, BB];
    0xE9 BLBC X::Blb { set: false } => [RL, BB];
    0xEA FFS X::Helper(H::Field) => [RL, RB, VB, WL];
    0xEB FFC X::Helper(H::Field) => [RL, RB, VB, WL];
    0xEC CMPV X::Helper(H::Field) => [RL, RB, VB, RL];
    0xED CMPZV X::Helper(H::Field) => [RL, RB, VB, RL];
    0xEE EXTV X::Helper(H::Field) => [RL, RB, VB, WL];
    0xEF EXTZV X::Helper(H::Field) => [RL, RB, VB, WL];

    0xF0 INSV X::Helper(H::Field) => [RL, RL, RB, VB];
    0xF1 ACBL X::Acb => [RL, RL, ML, BW];
    0xF2 AOBLSS X::Aob { leq: false } => [RL, ML, BB];
    0xF3 AOBLEQ X::Aob { leq: true } => [RL, ML, BB];
    0xF4 SOBGEQ X::Sob { gtr: false } => [ML, BB];
    0xF5 SOBGTR X::Sob { gtr: true } => [ML, BB];
    0xF6 CVTLB X::Cvt => [RL, WB];
    0xF7 CVTLW X::Cvt => [RL, WW];
    0xF8 ASHP X::Helper(H::Decimal) => [RB, RW, AB, RB, RW, AB];
    0xF9 CVTLP X::Helper(H::Decimal) => [RL, RW, AB];
    0xFA CALLG X::Helper(H::Procedure) => [AB, AB];
    0xFB CALLS X::Helper(H::Procedure) => [RL, AB];
    0xFC XFC X::Xfc => [];

    0xFD32 CVTDH X::Helper(H::Float) => [RD, WH];
    0xFD33 CVTGF X::Helper(H::Float) => [RG, WF];
    0xFD40 ADDG2 X::Helper(H::Float) => [RG, MG];
    0xFD41 ADDG3 X::Helper(H::Float) => [RG, RG, WG];
    0xFD42 SUBG2 X::Helper(H::Float) => [RG, MG];
    0xFD43 SUBG3 X::Helper(H::Float) => [RG, RG, WG];
    0xFD44 MULG2 X::Helper(H::Float) => [RG, MG];
    0xFD45 MULG3 X::Helper(H::Float) => [RG, RG, WG];
    0xFD46 DIVG2 X::Helper(H::Float) => [RG, MG];
    0xFD47 DIVG3 X::Helper(H::Float) => [RG, RG, WG];
    0xFD48 CVTGB X::Helper(H::Float) => [RG, WB];
    0xFD49 CVTGW X::Helper(H::Float) => [RG, WW];
    0xFD4A CVTGL X::Helper(H::Float) => [RG, WL];
    0xFD4B CVTRGL X::Helper(H::Float) => [RG, WL];
    0xFD4C CVTBG X::Helper(H::Float) => [RB, WG];
    0xFD4D CVTWG X::Helper(H::Float) => [RW, WG];
    0xFD4E CVTLG X::Helper(H::Float) => [RL, WG];
    0xFD4F ACBG X::HelperBranch(H::Float) => [RG, RG, MG, BW];
    0xFD50 MOVG X::MovFloat => [RG, WG];
    0xFD51 CMPG X::Helper(H::Float) => [RG, RG];
    0xFD52 MNEGG X::Helper(H::Float) => [RG, WG];
    0xFD53 TSTG X::Helper(H::Float) => [RG];
    0xFD54 EMODG X::Helper(H::Float) => [RG, RW, RG, WL, WG];
    0xFD55 POLYG X::Helper(H::Float) => [RG, RW, AB];
    0xFD56 CVTGH X::Helper(H::Float) => [RG, WH];
    0xFD60 ADDH2 X::Helper(H::Float) => [RH, MH];
    0xFD61 ADDH3 X::Helper(H::Float) => [RH, RH, WH];
    0xFD62 SUBH2 X::Helper(H::Float) => [RH, MH];
    0xFD63 SUBH3 X::Helper(H::Float) => [RH, RH, WH];
    0xFD64 MULH2 X::Helper(H::Float) => [RH, MH];
    0xFD65 MULH3 X::Helper(H::Float) => [RH, RH, WH];
    0xFD66 DIVH2 X::Helper(H::Float) => [RH, MH];
    0xFD67 DIVH3 X::Helper(H::Float) => [RH, RH, WH];
    0xFD68 CVTHB X::Helper(H::Float) => [RH, WB];
    0xFD69 CVTHW X::Helper(H::Float) => [RH, WW];
    0xFD6A CVTHL X::Helper(H::Float) => [RH, WL];
    0xFD6B CVTRHL X::Helper(H::Float) => [RH, WL];
    0xFD6C CVTBH X::Helper(H::Float) => [RB, WH];
    0xFD6D CVTWH X::Helper(H::Float) => [RW, WH];
    0xFD6E CVTLH X::Helper(H::Float) => [RL, WH];
    0xFD6F ACBH X::HelperBranch(H::Float) => [RH, RH, MH, BW];
    0xFD70 MOVH X::MovFloat => [RH, WH];
    0xFD71 CMPH X::Helper(H::Float) => [RH, RH];
    0xFD72 MNEGH X::Helper(H::Float) => [RH, WH];
    0xFD73 TSTH X::Helper(H::Float) => [RH];
    0xFD74 EMODH X::Helper(H::Float) => [RH, RW, RH, WL, WH];
    0xFD75 POLYH X::Helper(H::Float) => [RH, RW, AB];
    0xFD76 CVTHG X::Helper(H::Float) => [RH, WG];
    0xFD7C CLRO X::Clr => [WO];
    0xFD7D MOVO X::Mov => [RO, WO];
    0xFD7E MOVAO X::Mova => [AO, WL];
    0xFD7F PUSHAO X::Pusha => [AO];
    0xFD98 CVTFH X::Helper(H::Float) => [RF, WH];
    0xFD99 CVTFG X::Helper(H::Float) => [RF, WG];
    0xFDF6 CVTHF X::Helper(H::Float) => [RH, WF];
    0xFDF7 CVTHD X::Helper(H::Float) => [RH, WD];

    0xFFFD BUGL X::Bug => [IL];
    0xFFFE BUGW X::Bug => [IW];
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Find the table entry for a (possibly two-byte) opcode.
pub fn lookup(opcode: u16) -> Option<&'static InstInfo> {
    TABLE
        .binary_search_by_key(&opcode, |info| info.opcode)
        .ok()
        .map(|idx| &TABLE[idx])
}

/// Every defined opcode, in ascending order.
pub fn all() -> &'static [InstInfo] {
    TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESERVED: [u8; 5] = [0x57, 0x59, 0x5A, 0x5B, 0x77];

    #[test]
    fn test_table_sorted_and_unique() {
        for pair in TABLE.windows(2) {
            assert!(pair[0].opcode < pair[1].opcode, "{} before {}", pair[0].mnemonic, pair[1].mnemonic);
        }
    }

    #[test]
    fn test_single_byte_coverage() {
        for byte in 0x00u16..=0xFC {
            let found = lookup(byte);
            if RESERVED.contains(&(byte as u8)) {
                assert!(found.is_none(), "{:#04x} should be reserved", byte);
            } else {
                let info = found.unwrap_or_else(|| panic!("{:#04x} missing", byte));
                assert_eq!(info.opcode, byte);
            }
        }
    }

    #[test]
    fn test_prefix_bytes_are_not_entries() {
        for byte in [PREFIX_FD, PREFIX_FE, PREFIX_FF] {
            assert!(is_prefix(byte));
            assert!(lookup(byte as u16).is_none());
        }
        assert!(!is_prefix(0xFC));
    }

    #[test]
    fn test_two_byte_entries() {
        assert_eq!(lookup(0xFD32).map(|i| i.mnemonic), Some(Mnemonic::CVTDH));
        assert_eq!(lookup(0xFD7D).map(|i| i.mnemonic), Some(Mnemonic::MOVO));
        assert_eq!(lookup(0xFFFD).map(|i| i.mnemonic), Some(Mnemonic::BUGL));
        assert_eq!(lookup(0xFFFE).map(|i| i.mnemonic), Some(Mnemonic::BUGW));
        assert!(lookup(0xFD00).is_none());
        assert!(lookup(0xFE00).is_none());
        assert_eq!(lookup(0xFD40).map(|i| i.opcode_len()), Some(2));
    }

    #[test]
    fn test_operand_signatures() {
        let addl3 = lookup(0xC1).unwrap();
        assert_eq!(addl3.mnemonic, Mnemonic::ADDL3);
        assert_eq!(addl3.operands, &[RL, RL, WL]);
        assert_eq!(addl3.handler, Handler::Add3);

        let halt = lookup(0x00).unwrap();
        assert!(halt.operands.is_empty());

        let index = lookup(0x0A).unwrap();
        assert_eq!(index.operands.len(), 6);

        let bbss = lookup(0xE2).unwrap();
        assert_eq!(bbss.handler, Handler::Bb { set: true, update: Some(true) });
    }

    #[test]
    fn test_block_enders() {
        assert!(Handler::Br.ends_block());
        assert!(Handler::Helper(HelperFamily::Procedure).ends_block());
        assert!(!Handler::Helper(HelperFamily::Float).ends_block());
        assert!(!Handler::Add3.ends_block());
        assert!(Handler::Halt.ends_block());
        assert!(Handler::Mtpr.ends_block());
        assert!(!Handler::Mfpr.ends_block());
    }
}
