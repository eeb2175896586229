/// Gbuffer framebuffer allocation
///
/// The pass deriver never creates GPU objects itself. It asks a
/// `FramebufferAllocator` for a framebuffer matching a flipped-buffer set
/// and a draw-buffer list, and keeps the returned handle.
///
/// `GbufferTargets` is the in-crate allocator: it records the layout of every
/// framebuffer it hands out so a backend can realize them later.

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::prism_bail;

new_key_type! {
    /// Opaque framebuffer handle
    pub struct FramebufferHandle;
}

// ===== FLIPPED BUFFERS =====

/// Set of colortex indices currently ping-ponged ("flipped")
///
/// A flipped buffer is written through its alternate texture, so the
/// framebuffer attachment for that index changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlippedBuffers {
    indices: FxHashSet<u32>,
}

impl FlippedBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_flipped(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl FromIterator<u32> for FlippedBuffers {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self { indices: iter.into_iter().collect() }
    }
}

/// Flipped buffer sets at the two checkpoints the batched passes render at
#[derive(Debug, Clone, Default)]
pub struct GbufferTargetsDesc {
    /// Flipped buffers once the prepare passes have run (terrain pass)
    pub flipped_after_prepare: FlippedBuffers,
    /// Flipped buffers once the translucent passes have run (translucent pass)
    pub flipped_after_translucent: FlippedBuffers,
}

// ===== ALLOCATOR =====

/// Framebuffer allocation collaborator
pub trait FramebufferAllocator {
    /// Create a gbuffer framebuffer writing `draw_buffers` in that order
    fn create_gbuffer_framebuffer(
        &mut self,
        flipped: &FlippedBuffers,
        draw_buffers: &[u32],
    ) -> Result<FramebufferHandle>;
}

/// Kind of targets a framebuffer attaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferKind {
    Gbuffer,
    Shadow,
}

/// Recorded framebuffer layout
#[derive(Debug, Clone)]
pub struct FramebufferLayout {
    pub kind: FramebufferKind,
    /// Draw buffers in attachment order
    pub draw_buffers: Vec<u32>,
    /// For each draw buffer, whether the alternate texture is attached
    pub alternate: Vec<bool>,
}

/// Slot-map backed framebuffer registry
pub struct GbufferTargets {
    color_target_count: u32,
    framebuffers: SlotMap<FramebufferHandle, FramebufferLayout>,
}

impl GbufferTargets {
    /// Create a registry for `color_target_count` colortex targets
    pub fn new(color_target_count: u32) -> Self {
        Self {
            color_target_count,
            framebuffers: SlotMap::with_key(),
        }
    }

    /// Number of colortex targets draw buffers may reference
    pub fn color_target_count(&self) -> u32 {
        self.color_target_count
    }

    /// Create the shadow framebuffer (shadowcolor targets are never flipped)
    pub fn create_shadow_framebuffer(&mut self, draw_buffers: &[u32]) -> Result<FramebufferHandle> {
        self.validate(draw_buffers)?;
        Ok(self.framebuffers.insert(FramebufferLayout {
            kind: FramebufferKind::Shadow,
            draw_buffers: draw_buffers.to_vec(),
            alternate: vec![false; draw_buffers.len()],
        }))
    }

    /// Get the layout of a framebuffer
    pub fn framebuffer(&self, handle: FramebufferHandle) -> Option<&FramebufferLayout> {
        self.framebuffers.get(handle)
    }

    /// Destroy a framebuffer, returning its layout
    pub fn destroy_framebuffer(&mut self, handle: FramebufferHandle) -> Option<FramebufferLayout> {
        self.framebuffers.remove(handle)
    }

    /// Number of live framebuffers
    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    fn validate(&self, draw_buffers: &[u32]) -> Result<()> {
        if draw_buffers.is_empty() {
            prism_bail!(Error::InvalidResource, "prism::GbufferTargets",
                "Framebuffer must draw to at least one buffer");
        }
        if let Some(&index) = draw_buffers.iter().find(|&&index| index >= self.color_target_count) {
            prism_bail!(Error::InvalidResource, "prism::GbufferTargets",
                "Draw buffer {} out of range ({} color targets)", index, self.color_target_count);
        }
        Ok(())
    }
}

impl FramebufferAllocator for GbufferTargets {
    fn create_gbuffer_framebuffer(
        &mut self,
        flipped: &FlippedBuffers,
        draw_buffers: &[u32],
    ) -> Result<FramebufferHandle> {
        self.validate(draw_buffers)?;
        let alternate = draw_buffers.iter().map(|&index| flipped.is_flipped(index)).collect();
        Ok(self.framebuffers.insert(FramebufferLayout {
            kind: FramebufferKind::Gbuffer,
            draw_buffers: draw_buffers.to_vec(),
            alternate,
        }))
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
