use std::fmt;

use crate::ir::opcode::Opcode;
use crate::ir::types::Type;
use crate::ir::value::Value;

/// Maximum number of arguments per IR instruction.
pub const MAX_ARGS: usize = 6;

/// A single IR instruction in SSA form.
#[derive(Debug, Clone)]
pub struct Inst {
    /// The operation this instruction performs.
    pub opcode: Opcode,
    /// Arguments to the instruction (up to MAX_ARGS, rest are Value::Void).
    pub args: [Value; MAX_ARGS],
    /// Number of other instructions that use this instruction's result.
    pub use_count: u32,
}

impl Inst {
    /// Create a new instruction with the given opcode and arguments.
    pub fn new(opcode: Opcode, args: &[Value]) -> Self {
        assert!(args.len() <= MAX_ARGS, "Too many args ({}) for opcode {:?}", args.len(), opcode);
        let mut inst_args = [Value::Void; MAX_ARGS];
        inst_args[..args.len()].copy_from_slice(args);
        Self {
            opcode,
            args: inst_args,
            use_count: 0,
        }
    }

    /// Get the return type of this instruction.
    pub fn return_type(&self) -> Type {
        self.opcode.return_type()
    }

    /// Get the number of arguments.
    pub fn num_args(&self) -> usize {
        self.opcode.num_args()
    }

    /// Get argument at index.
    pub fn arg(&self, idx: usize) -> Value {
        self.args[idx]
    }

    /// Returns true if this instruction has been tombstoned (removed).
    pub fn is_tombstone(&self) -> bool {
        self.opcode == Opcode::Void && self.use_count == 0
    }

    /// Returns true if this opcode has side effects.
    pub fn has_side_effects(&self) -> bool {
        self.opcode.has_side_effects()
    }

    /// Tombstone this instruction (mark as removed).
    pub fn tombstone(&mut self) {
        self.opcode = Opcode::Void;
        self.args = [Value::Void; MAX_ARGS];
    }

    /// Get all argument values as an iterator.
    pub fn arg_values(&self) -> impl Iterator<Item = &Value> {
        self.args[..self.num_args()].iter()
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        let n = self.num_args();
        if n > 0 {
            write!(f, " ")?;
            for i in 0..n {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.args[i])?;
            }
        }
        Ok(())
    }
}
