//! VAX instruction decoder and translator.
//!
//! Guest code is decoded one instruction at a time and translated into blocks
//! of an architecture-neutral IR (`ir`). The architectural state the IR reads
//! and writes lives in `frontend::vax::state::CpuState`; `interp` executes
//! blocks against it.

pub mod config;
pub mod error;
pub mod frontend;
pub mod halt_reason;
pub mod interp;
pub mod ir;
pub mod model;

pub use config::{Optimizations, TranslationOptions};
pub use error::{DecodeError, StateError};
pub use frontend::vax::{translate, CpuState, TerminationReason, Translation};
pub use halt_reason::HaltReason;
