pub mod types;
pub mod psl;
pub mod ipr;
pub mod cc;
pub mod exception;
pub mod state;
pub mod opcodes;
pub mod specifier;
pub mod decoder;
pub mod translate;

pub use types::{AccessMode, DataType, Reg};
pub use cc::{CcOp, LazyCc, Nzvc};
pub use exception::Exception;
pub use state::CpuState;
pub use decoder::{decode_instruction, DecodedInstruction};
pub use translate::{translate, TerminationReason, Translation, TranslatorVisitor};
