pub mod dead_code_elimination;
pub mod verification;

pub use dead_code_elimination::dead_code_elimination;
pub use verification::verification_pass;
