pub mod block;
pub mod cond;
pub mod emitter;
pub mod inst;
pub mod location;
pub mod opcode;
pub mod opt;
pub mod terminal;
pub mod types;
pub mod value;
pub mod vax_emitter;
