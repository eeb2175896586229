/// Batched pass derivation

pub mod pass;
pub mod pass_deriver;

pub use pass::*;
pub use pass_deriver::*;
