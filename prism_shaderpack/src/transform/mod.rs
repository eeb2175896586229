/// Shader transform collaborator and patched-shader debug dump

pub mod patcher;
pub mod debug_dump;

pub use patcher::*;
pub use debug_dump::*;

// Mock patcher for tests (no GLSL rewriting)
#[cfg(test)]
pub mod mock_patcher;

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
