use crate::ir::block::Block;
use crate::ir::value::Value;

/// Dead code elimination pass.
/// Iterates instructions in reverse order. Any instruction with no uses
/// and no side effects is tombstoned. Removing an instruction decrements
/// use counts for its arguments, potentially enabling further eliminations.
pub fn dead_code_elimination(block: &mut Block) {
    let mut removed = 0usize;
    for i in (0..block.instructions.len()).rev() {
        let inst = &block.instructions[i];
        if inst.is_tombstone() {
            continue;
        }
        if inst.use_count == 0 && !inst.has_side_effects() {
            let arg_refs: Vec<_> = inst
                .arg_values()
                .filter_map(|arg| if let Value::Inst(r) = arg { Some(*r) } else { None })
                .collect();

            block.instructions[i].tombstone();
            removed += 1;

            for arg_ref in &arg_refs {
                let target = &mut block.instructions[arg_ref.index()];
                if target.use_count > 0 {
                    target.use_count -= 1;
                }
            }
        }
    }
    if removed > 0 {
        tracing::trace!(location = %block.location, removed, "dead code eliminated");
    }
}
