use bitflags::bitflags;

bitflags! {
    /// Reasons block execution stopped before falling through to the next block.
    ///
    /// Multiple reasons can be active simultaneously (OR'd together).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HaltReason: u32 {
        /// HALT executed in kernel mode.
        const HALT_INSTRUCTION = 1 << 0;
        /// BPT executed.
        const BREAKPOINT       = 1 << 1;
        /// An exception was requested and is pending delivery.
        const EXCEPTION        = 1 << 2;
    }
}
