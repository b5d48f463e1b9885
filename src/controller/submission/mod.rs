pub mod assembler;
pub mod guard;

pub use assembler::*;
pub use guard::*;
