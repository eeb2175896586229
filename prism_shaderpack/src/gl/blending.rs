/// Blend state overrides declared by shader pack directives

use crate::prism_debug;

// ===== COLOR BLEND ENUMS =====

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

impl BlendFactor {
    /// Parse a factor as written in pack directives (`blend.gbuffers_water=SRC_ALPHA ...`)
    pub fn from_directive(token: &str) -> Option<Self> {
        let factor = match token {
            "ZERO" => BlendFactor::Zero,
            "ONE" => BlendFactor::One,
            "SRC_COLOR" => BlendFactor::SrcColor,
            "ONE_MINUS_SRC_COLOR" => BlendFactor::OneMinusSrcColor,
            "DST_COLOR" => BlendFactor::DstColor,
            "ONE_MINUS_DST_COLOR" => BlendFactor::OneMinusDstColor,
            "SRC_ALPHA" => BlendFactor::SrcAlpha,
            "ONE_MINUS_SRC_ALPHA" => BlendFactor::OneMinusSrcAlpha,
            "DST_ALPHA" => BlendFactor::DstAlpha,
            "ONE_MINUS_DST_ALPHA" => BlendFactor::OneMinusDstAlpha,
            "SRC_ALPHA_SATURATE" => BlendFactor::SrcAlphaSaturate,
            _ => return None,
        };
        Some(factor)
    }
}

// ===== BLEND MODE =====

/// Separate RGB / alpha blend factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendMode {
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl BlendMode {
    pub const fn new(
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Self {
        Self { src_rgb, dst_rgb, src_alpha, dst_alpha }
    }

    /// Parse the four-factor directive form, e.g. `SRC_ALPHA ONE_MINUS_SRC_ALPHA ONE ZERO`
    pub fn from_directive(value: &str) -> Option<Self> {
        let mut tokens = value.split_whitespace().map(BlendFactor::from_directive);
        let mode = Self::new(
            tokens.next()??,
            tokens.next()??,
            tokens.next()??,
            tokens.next()??,
        );
        if tokens.next().is_some() {
            return None;
        }
        Some(mode)
    }
}

/// Replacement for the default blend state of a program
///
/// `Off` disables blending entirely, `Mode` forces the given factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendModeOverride {
    Off,
    Mode(BlendMode),
}

impl BlendModeOverride {
    /// Parse a directive value: `off` or four blend factors
    pub fn from_directive(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("off") {
            return Some(BlendModeOverride::Off);
        }
        BlendMode::from_directive(value).map(BlendModeOverride::Mode)
    }
}

// ===== PER-BUFFER OVERRIDES =====

/// Per-buffer blend override as declared by the pack
///
/// `index` is the absolute colortex index (`blend.gbuffers_water.colortex3=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferBlendInformation {
    pub index: u32,
    pub blend_mode: BlendModeOverride,
}

impl BufferBlendInformation {
    pub fn new(index: u32, blend_mode: BlendModeOverride) -> Self {
        Self { index, blend_mode }
    }
}

/// Per-buffer blend override resolved against a program's draw buffers
///
/// `index` is the position of the buffer inside the framebuffer's draw
/// buffer list, which is what the backend binds blend state against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferBlendOverride {
    pub index: usize,
    pub blend_mode: BlendModeOverride,
}

impl BufferBlendOverride {
    pub fn new(index: usize, blend_mode: BlendModeOverride) -> Self {
        Self { index, blend_mode }
    }
}

/// Map absolute per-buffer overrides onto positions in `draw_buffers`
///
/// Overrides naming a buffer the program does not draw to are dropped,
/// so the result is never longer than `overrides`.
pub fn resolve_buffer_overrides(
    draw_buffers: &[u32],
    overrides: &[BufferBlendInformation],
) -> Vec<BufferBlendOverride> {
    let mut resolved = Vec::with_capacity(overrides.len());
    for information in overrides {
        match draw_buffers.iter().position(|&buffer| buffer == information.index) {
            Some(position) => resolved.push(BufferBlendOverride::new(position, information.blend_mode)),
            None => prism_debug!("prism::BlendOverrides",
                "Dropping blend override for buffer {} (not in draw buffers {:?})",
                information.index, draw_buffers),
        }
    }
    resolved
}
