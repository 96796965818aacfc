use bitflags::bitflags;

bitflags! {
    /// IR passes run on each translated block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Optimizations: u32 {
        /// Remove side-effect-free instructions whose results are unused.
        const DEAD_CODE_ELIMINATION = 1 << 0;
        /// Check block invariants after translation (panics on failure).
        const VERIFY                = 1 << 1;
    }
}

impl Default for Optimizations {
    fn default() -> Self {
        Optimizations::DEAD_CODE_ELIMINATION
    }
}

/// Per-translation limits and pass selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOptions {
    /// Maximum number of guest instructions in one block.
    pub max_instructions: usize,
    /// Maximum number of code bytes one block may span.
    pub max_block_bytes: u32,
    /// Translate exactly one instruction per block.
    pub single_step: bool,
    pub optimizations: Optimizations,
}

impl TranslationOptions {
    pub const DEFAULT_MAX_INSTRUCTIONS: usize = 64;
    pub const DEFAULT_MAX_BLOCK_BYTES: u32 = 1024;

    pub fn single_step() -> Self {
        Self { single_step: true, ..Self::default() }
    }

    /// Effective instruction limit, taking `single_step` into account.
    pub fn instruction_limit(&self) -> usize {
        if self.single_step { 1 } else { self.max_instructions.max(1) }
    }

    pub fn has_optimization(&self, flag: Optimizations) -> bool {
        self.optimizations.contains(flag)
    }
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_instructions: Self::DEFAULT_MAX_INSTRUCTIONS,
            max_block_bytes: Self::DEFAULT_MAX_BLOCK_BYTES,
            single_step: false,
            optimizations: Optimizations::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = TranslationOptions::default();
        assert_eq!(opts.max_instructions, 64);
        assert_eq!(opts.max_block_bytes, 1024);
        assert_eq!(opts.instruction_limit(), 64);
        assert!(opts.has_optimization(Optimizations::DEAD_CODE_ELIMINATION));
        assert!(!opts.has_optimization(Optimizations::VERIFY));
    }

    #[test]
    fn test_single_step_limit() {
        let opts = TranslationOptions::single_step();
        assert_eq!(opts.instruction_limit(), 1);
        let zero = TranslationOptions { max_instructions: 0, ..Default::default() };
        assert_eq!(zero.instruction_limit(), 1);
    }
}
