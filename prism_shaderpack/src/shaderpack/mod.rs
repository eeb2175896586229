//! Shader pack description: program catalogue, directives and imports

pub mod program;
pub mod import;

pub use program::*;
pub use import::*;
