use std::fmt;

use crate::ir::inst::Inst;
use crate::ir::location::LocationDescriptor;
use crate::ir::opcode::Opcode;
use crate::ir::terminal::Terminal;
use crate::ir::value::{InstRef, Value};

/// An IR basic block: a sequence of instructions followed by a terminal.
/// Instructions are stored in a `Vec<Inst>` arena, indexed by `InstRef(u32)`.
/// Removal is done by tombstoning (setting opcode to Void).
#[derive(Debug, Clone)]
pub struct Block {
    /// The location this block represents.
    pub location: LocationDescriptor,
    /// Arena of instructions.
    pub instructions: Vec<Inst>,
    /// Block terminator.
    pub terminal: Terminal,
    /// Number of guest instructions this block represents.
    pub cycle_count: u64,
}

impl Block {
    /// Create a new empty block at the given location.
    pub fn new(location: LocationDescriptor) -> Self {
        Self {
            location,
            instructions: Vec::new(),
            terminal: Terminal::Invalid,
            cycle_count: 0,
        }
    }

    /// Append a new instruction with the given opcode and args, return its InstRef.
    /// Also increments use_count for any InstRef arguments.
    pub fn append(&mut self, opcode: Opcode, args: &[Value]) -> InstRef {
        for arg in args {
            if let Value::Inst(ref_) = arg {
                self.instructions[ref_.index()].use_count += 1;
            }
        }
        let idx = self.instructions.len();
        self.instructions.push(Inst::new(opcode, args));
        InstRef(idx as u32)
    }

    /// Get an instruction by reference.
    pub fn get(&self, r: InstRef) -> &Inst {
        &self.instructions[r.index()]
    }

    /// Get a mutable instruction by reference.
    pub fn get_mut(&mut self, r: InstRef) -> &mut Inst {
        &mut self.instructions[r.index()]
    }

    /// Set the terminal instruction.
    pub fn set_terminal(&mut self, terminal: Terminal) {
        self.terminal = terminal;
    }

    /// Drop every instruction from `len` onwards, releasing the uses they held
    /// on earlier instructions.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.instructions.len() {
            return;
        }
        let removed: Vec<Inst> = self.instructions.drain(len..).collect();
        for inst in &removed {
            for arg in inst.arg_values() {
                if let Value::Inst(r) = arg {
                    if let Some(target) = self.instructions.get_mut(r.index()) {
                        target.use_count = target.use_count.saturating_sub(1);
                    }
                }
            }
        }
    }

    /// Returns the number of (non-tombstoned) instructions.
    pub fn live_inst_count(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_tombstone()).count()
    }

    /// Returns the total number of instruction slots (including tombstones).
    pub fn inst_count(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the block has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterate over all live (non-tombstoned) instructions with their InstRefs.
    pub fn iter_live(&self) -> impl Iterator<Item = (InstRef, &Inst)> {
        self.instructions.iter().enumerate()
            .filter(|(_, inst)| !inst.is_tombstone())
            .map(|(i, inst)| (InstRef(i as u32), inst))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block {} (instructions: {}):", self.location, self.cycle_count)?;
        for (ref_, inst) in self.iter_live() {
            if inst.return_type() != crate::ir::types::Type::Void {
                writeln!(f, "  {} = {}", ref_, inst)?;
            } else {
                writeln!(f, "  {}", inst)?;
            }
        }
        writeln!(f, "  terminal: {}", self.terminal)?;
        Ok(())
    }
}
