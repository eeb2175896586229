/// Shader transform collaborator.
///
/// The GLSL rewriting engine that turns a pack program into a variant the
/// batched renderer can draw is external. This module only defines what is
/// handed to it and what comes back.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::gl::AlphaTest;

/// Output stage of a patched program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchShaderType {
    Vertex,
    Geometry,
    Fragment,
    /// Fragment stage with the cutout alpha test baked in
    FragmentCutout,
}

impl PatchShaderType {
    /// File extension used when dumping this stage
    pub fn extension(&self) -> &'static str {
        match self {
            PatchShaderType::Vertex => "vsh",
            PatchShaderType::Geometry => "gsh",
            PatchShaderType::Fragment | PatchShaderType::FragmentCutout => "fsh",
        }
    }
}

bitflags! {
    /// Vertex attributes the batched vertex format feeds the program
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderAttributeInputs: u32 {
        const COLOR = 1 << 0;
        const TEX = 1 << 1;
        const OVERLAY = 1 << 2;
        const LIGHT = 1 << 3;
        const NORMAL = 1 << 4;
    }
}

impl ShaderAttributeInputs {
    /// Inputs of the batched terrain vertex format (no overlay)
    pub const TERRAIN: Self = Self::COLOR
        .union(Self::TEX)
        .union(Self::LIGHT)
        .union(Self::NORMAL);
}

/// Everything the patcher needs to produce one program's variants
#[derive(Debug, Clone, Copy)]
pub struct PatchRequest<'a> {
    pub vertex: Option<&'a str>,
    pub geometry: Option<&'a str>,
    pub fragment: Option<&'a str>,
    /// Alpha test of the cutout fragment variant; None requests no cutout variant
    pub cutout_alpha: Option<AlphaTest>,
    /// Alpha test of the regular fragment variant
    pub base_alpha: Option<AlphaTest>,
    pub inputs: ShaderAttributeInputs,
    pub max_batch_size: u32,
    pub vertex_range: f32,
    pub base_instanced: bool,
}

/// Patched sources keyed by stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchedSources {
    stages: FxHashMap<PatchShaderType, String>,
}

impl PatchedSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stage: PatchShaderType, source: String) {
        self.stages.insert(stage, source);
    }

    pub fn get(&self, stage: PatchShaderType) -> Option<&str> {
        self.stages.get(&stage).map(String::as_str)
    }

    /// Move a stage's source out
    pub fn take(&mut self, stage: PatchShaderType) -> Option<String> {
        self.stages.remove(&stage)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl FromIterator<(PatchShaderType, String)> for PatchedSources {
    fn from_iter<I: IntoIterator<Item = (PatchShaderType, String)>>(iter: I) -> Self {
        Self { stages: iter.into_iter().collect() }
    }
}

/// Shader transform collaborator
///
/// A stage given as None must come back absent.
pub trait ShaderPatcher {
    fn patch_sodium(&self, request: &PatchRequest<'_>) -> Result<PatchedSources>;
}
