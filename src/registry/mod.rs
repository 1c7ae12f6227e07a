pub mod descriptor;
pub mod index;
pub mod validation;

pub use descriptor::*;
pub use index::*;
pub use validation::*;
