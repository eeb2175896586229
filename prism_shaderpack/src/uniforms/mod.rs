/// Uniform declarations for patched programs

pub mod program_uniforms;
pub mod frame;
pub mod common;
pub mod builtin;

pub use program_uniforms::*;
pub use frame::*;
pub use common::add_common_uniforms;
pub use builtin::{add_builtin_replacement_uniforms, lightmap_texture_matrix};

#[cfg(test)]
#[path = "uniforms_tests.rs"]
mod tests;
