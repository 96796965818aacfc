use std::collections::HashMap;

use crate::ir::block::Block;
use crate::ir::value::Value;

/// Verification pass: checks IR block invariants.
///
/// 1. Each instruction's argument types match the opcode's expected arg types.
/// 2. Every instruction reference points at an earlier, live instruction.
/// 3. Actual use counts match the `use_count` field on each instruction.
/// 4. The block has a terminal.
///
/// Panics if any invariant is violated.
pub fn verification_pass(block: &Block) {
    for (i, inst) in block.instructions.iter().enumerate() {
        if inst.is_tombstone() {
            continue;
        }

        let expected_arg_types = inst.opcode.arg_types();
        for (j, expected_type) in expected_arg_types.iter().enumerate() {
            let arg = inst.args[j];
            let actual_type = arg.get_type();
            if !actual_type.is_compatible_with(*expected_type) {
                panic!(
                    "Verification failed at instruction %{}: arg {} has type {:?}, expected {:?}. Opcode: {:?}",
                    i, j, actual_type, expected_type, inst.opcode
                );
            }
            if let Value::Inst(r) = arg {
                if r.index() >= i || block.instructions[r.index()].is_tombstone() {
                    panic!(
                        "Verification failed at instruction %{}: arg {} refers to {} which is not an earlier live value",
                        i, j, r
                    );
                }
            }
        }
    }

    let mut actual_uses: HashMap<usize, u32> = HashMap::new();
    for inst in &block.instructions {
        if inst.is_tombstone() {
            continue;
        }
        for arg in inst.arg_values() {
            if let Value::Inst(r) = arg {
                *actual_uses.entry(r.index()).or_insert(0) += 1;
            }
        }
    }

    for (i, inst) in block.instructions.iter().enumerate() {
        if inst.is_tombstone() {
            continue;
        }
        let count = actual_uses.get(&i).copied().unwrap_or(0);
        if inst.use_count != count {
            panic!(
                "Verification failed: instruction %{} has use_count={}, but actual uses={}. Opcode: {:?}",
                i, inst.use_count, count, inst.opcode
            );
        }
    }

    if block.terminal.is_invalid() {
        panic!("Verification failed: block {} has no terminal", block.location);
    }
}
