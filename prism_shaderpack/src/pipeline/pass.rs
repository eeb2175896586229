/// Resolved batched passes
///
/// A `ResolvedPass` is the complete configuration one batched pass renders
/// with: patched sources, target framebuffer, blend state and alpha test.
/// The three passes are derived together and stored as one
/// `ResolvedPasses` value that is never mutated after construction.

use crate::gl::{AlphaTest, BlendModeOverride, BufferBlendOverride, FramebufferHandle};
use crate::shaderpack::{ProgramCatalogue, ProgramId, ProgramSource};

// ===== PASS KIND =====

/// The batched passes derived from a shader pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Opaque and cutout terrain
    Terrain,
    /// Translucent terrain (water, stained glass)
    Translucent,
    /// Shadow map terrain
    Shadow,
}

const TERRAIN_CANDIDATES: [ProgramId; 4] = [
    ProgramId::Terrain,
    ProgramId::TexturedLit,
    ProgramId::Textured,
    ProgramId::Basic,
];

// Water, then whatever terrain resolves to
const TRANSLUCENT_CANDIDATES: [ProgramId; 5] = [
    ProgramId::Water,
    ProgramId::Terrain,
    ProgramId::TexturedLit,
    ProgramId::Textured,
    ProgramId::Basic,
];

const SHADOW_CANDIDATES: [ProgramId; 1] = [ProgramId::Shadow];

impl PassKind {
    pub const ALL: [PassKind; 3] = [PassKind::Terrain, PassKind::Translucent, PassKind::Shadow];

    /// Slot of this pass in `ResolvedPasses`
    pub fn index(&self) -> usize {
        match self {
            PassKind::Terrain => 0,
            PassKind::Translucent => 1,
            PassKind::Shadow => 2,
        }
    }

    /// Program this pass stands in for
    ///
    /// Its default blend override applies whichever program the pass
    /// actually resolved to.
    pub fn program_id(&self) -> ProgramId {
        match self {
            PassKind::Terrain => ProgramId::Terrain,
            PassKind::Translucent => ProgramId::Water,
            PassKind::Shadow => ProgramId::Shadow,
        }
    }

    /// Programs tried in order when resolving this pass
    pub fn candidates(&self) -> &'static [ProgramId] {
        match self {
            PassKind::Terrain => &TERRAIN_CANDIDATES,
            PassKind::Translucent => &TRANSLUCENT_CANDIDATES,
            PassKind::Shadow => &SHADOW_CANDIDATES,
        }
    }

    /// Alpha test used when the pack declares none
    pub fn default_alpha(&self) -> AlphaTest {
        match self {
            PassKind::Terrain => AlphaTest::ONE_TENTH_ALPHA,
            PassKind::Translucent => AlphaTest::ALWAYS,
            PassKind::Shadow => AlphaTest::NON_ZERO_ALPHA,
        }
    }

    /// Whether the pass carries a cutout fragment variant
    pub fn has_cutout(&self) -> bool {
        !matches!(self, PassKind::Translucent)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PassKind::Terrain => "terrain",
            PassKind::Translucent => "translucent",
            PassKind::Shadow => "shadow",
        }
    }
}

// ===== PROGRAM RESOLUTION =====

/// Outcome of resolving an ordered candidate list
#[derive(Debug, Clone, Copy)]
pub enum ProgramResolution<'a> {
    Present(ProgramId, &'a ProgramSource),
    Absent,
}

impl<'a> ProgramResolution<'a> {
    pub fn is_present(&self) -> bool {
        matches!(self, ProgramResolution::Present(..))
    }

    pub fn source(&self) -> Option<&'a ProgramSource> {
        match self {
            ProgramResolution::Present(_, source) => Some(source),
            ProgramResolution::Absent => None,
        }
    }
}

/// Resolve the first program of `candidates` the catalogue declares
pub fn resolve_first<'a>(catalogue: &'a ProgramCatalogue, candidates: &[ProgramId]) -> ProgramResolution<'a> {
    candidates
        .iter()
        .find_map(|&id| catalogue.get(id).map(|source| ProgramResolution::Present(id, source)))
        .unwrap_or(ProgramResolution::Absent)
}

// ===== BATCHING PARAMETERS =====

/// Batching parameters forwarded to the shader patcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchingParams {
    /// Maximum number of chunk sections drawn by one batch
    pub max_batch_size: u32,
    /// Extent of a batch region in blocks
    pub vertex_range: f32,
    /// Whether the base vertex is supplied through instancing
    pub base_instanced: bool,
}

impl Default for BatchingParams {
    fn default() -> Self {
        Self {
            max_batch_size: 1024,
            vertex_range: 32.0,
            base_instanced: false,
        }
    }
}

// ===== RESOLVED PASS =====

/// Configuration of one batched pass
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPass {
    pub(crate) program_name: Option<String>,
    pub(crate) vertex: Option<String>,
    pub(crate) geometry: Option<String>,
    pub(crate) fragment: Option<String>,
    pub(crate) cutout_fragment: Option<String>,
    pub(crate) framebuffer: FramebufferHandle,
    pub(crate) blend_override: Option<BlendModeOverride>,
    pub(crate) buffer_overrides: Vec<BufferBlendOverride>,
    pub(crate) alpha_test: AlphaTest,
}

impl ResolvedPass {
    /// Pass configuration when no candidate program exists
    pub(crate) fn absent(kind: PassKind, framebuffer: FramebufferHandle) -> Self {
        Self {
            program_name: None,
            vertex: None,
            geometry: None,
            fragment: None,
            cutout_fragment: None,
            framebuffer,
            blend_override: None,
            buffer_overrides: Vec::new(),
            alpha_test: kind.default_alpha(),
        }
    }

    /// Name of the program the pass was resolved from
    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    pub fn vertex_source(&self) -> Option<&str> {
        self.vertex.as_deref()
    }

    pub fn geometry_source(&self) -> Option<&str> {
        self.geometry.as_deref()
    }

    pub fn fragment_source(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Fragment variant with the pass alpha test baked in (never set for translucent)
    pub fn cutout_fragment_source(&self) -> Option<&str> {
        self.cutout_fragment.as_deref()
    }

    pub fn framebuffer(&self) -> FramebufferHandle {
        self.framebuffer
    }

    /// None means default blending
    pub fn blend_override(&self) -> Option<BlendModeOverride> {
        self.blend_override
    }

    /// Per-buffer overrides, indexed by position in the draw-buffer list
    pub fn buffer_overrides(&self) -> &[BufferBlendOverride] {
        &self.buffer_overrides
    }

    pub fn alpha_test(&self) -> AlphaTest {
        self.alpha_test
    }

    /// Whether a program was resolved for this pass
    pub fn is_present(&self) -> bool {
        self.program_name.is_some()
    }
}

/// The three resolved passes, indexed by `PassKind`
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPasses {
    passes: [ResolvedPass; 3],
}

impl ResolvedPasses {
    pub(crate) fn new(terrain: ResolvedPass, translucent: ResolvedPass, shadow: ResolvedPass) -> Self {
        Self { passes: [terrain, translucent, shadow] }
    }

    pub fn get(&self, kind: PassKind) -> &ResolvedPass {
        &self.passes[kind.index()]
    }

    pub fn terrain(&self) -> &ResolvedPass {
        self.get(PassKind::Terrain)
    }

    pub fn translucent(&self) -> &ResolvedPass {
        self.get(PassKind::Translucent)
    }

    pub fn shadow(&self) -> &ResolvedPass {
        self.get(PassKind::Shadow)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PassKind, &ResolvedPass)> {
        PassKind::ALL.into_iter().zip(self.passes.iter())
    }
}
