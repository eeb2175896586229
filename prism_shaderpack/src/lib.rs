/*!
# Prism Shaderpack

Adapts a shader pack written for a multi-stage forward renderer
(gbuffers terrain / water / shadow programs) to a batched chunk renderer.

This crate is a configuration-derivation layer. It never issues draw calls,
compiles shaders or owns GPU memory. Everything engine-specific (the GLSL
patcher, framebuffer allocation, asset lookup, sampler/image binding) is
reached through traits supplied by the host.

## Architecture

- **PassDeriver**: resolves the terrain, translucent and shadow passes
  (sources, framebuffer, blend state, alpha test) from a program catalogue
- **ProgramCatalogue**: immutable set of programs declared by the pack
- **ShaderPatcher**: external GLSL transform producing batched variants
- **FramebufferAllocator**: external gbuffer framebuffer factory
- **StripBuffer**: vertex stream with strip-preserving segment splits
*/

// Internal modules
mod error;
pub mod log;
pub mod gl;
pub mod shaderpack;
pub mod transform;
pub mod uniforms;
pub mod pipeline;
pub mod vertex;

// Main prism namespace module
pub mod prism {
    // Error types
    pub use crate::error::{Error, Result};

    // Pass deriver
    pub use crate::pipeline::{PassDeriver, PassDeriverDesc, PassKind, ResolvedPass, ResolvedPasses};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            log, log_detailed, set_logger, reset_logger,
        };
    }

    // Blend, alpha test and framebuffer types
    pub mod gl {
        pub use crate::gl::*;
    }

    // Shader pack description
    pub mod shaderpack {
        pub use crate::shaderpack::*;
    }

    // Patcher collaborator and debug dump
    pub mod transform {
        pub use crate::transform::*;
    }

    // Uniform declarations
    pub mod uniforms {
        pub use crate::uniforms::*;
    }

    // Pass derivation
    pub mod pipeline {
        pub use crate::pipeline::*;
    }

    // Vertex stream building
    pub mod vertex {
        pub use crate::vertex::*;
    }
}

// Re-export math library at crate root
pub use glam;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
