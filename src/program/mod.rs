pub mod codec;
pub mod instruction;
pub mod sanitizer;

pub use codec::*;
pub use instruction::*;
pub use sanitizer::*;
