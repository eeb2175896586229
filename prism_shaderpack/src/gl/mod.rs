/// GL-level state types: blend overrides, alpha tests, framebuffers

pub mod blending;
pub mod framebuffer;

pub use blending::*;
pub use alpha_test::*;
pub use framebuffer::*;

#[cfg(test)]
#[path = "blending_tests.rs"]
mod blending_tests;
