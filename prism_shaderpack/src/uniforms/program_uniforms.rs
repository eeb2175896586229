/// Declarative uniform sets.
///
/// A `ProgramUniforms` bundle lists the uniforms a patched program expects,
/// where each value comes from and how often it changes. Uploading is the
/// backend's job; the bundle only describes.

use std::sync::Arc;
use glam::{IVec2, Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashSet;
use crate::error::{Error, Result};
use crate::prism_bail;
use crate::shaderpack::IdMap;
use super::frame::FrameStats;

/// Opaque handle of a linked program in the backend
pub type ProgramHandle = u32;

// ===== VALUE TYPES =====

/// GLSL type of a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    Mat3,
    Mat4,
}

/// Concrete uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    IVec2(IVec2),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Int(_) => UniformType::Int,
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Vec2(_) => UniformType::Vec2,
            UniformValue::Vec3(_) => UniformType::Vec3,
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::IVec2(_) => UniformType::IVec2,
            UniformValue::Mat3(_) => UniformType::Mat3,
            UniformValue::Mat4(_) => UniformType::Mat4,
        }
    }
}

/// How often the backend must refresh a uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformUpdateFrequency {
    Once,
    PerTick,
    PerFrame,
}

/// Value owned by the host renderer, read at upload time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostValue {
    CameraPosition,
    PreviousCameraPosition,
    ModelViewMatrix,
    ModelViewInverse,
    PreviousModelViewMatrix,
    ProjectionMatrix,
    ProjectionInverse,
    PreviousProjectionMatrix,
    NormalMatrix,
    ViewWidth,
    ViewHeight,
    AspectRatio,
    WorldTime,
    WorldDay,
    EyeBrightness,
    CenterDepth,
    FogMode,
    FogColor,
    FogDensity,
    FogStart,
    FogEnd,
}

/// Player hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Main,
    Off,
}

/// Frame statistic maintained by the frame update notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameQuantity {
    FrameCounter,
    FrameTime,
    FrameTimeCounter,
}

/// Where a uniform's value comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformSource {
    Constant(UniformValue),
    Host(HostValue),
    /// Host value smoothed over time with the given half life (ticks)
    Smoothed { value: HostValue, half_life: f32 },
    /// Host item name mapped through the pack's id map
    HeldItem(Hand),
    Frame(FrameQuantity),
}

/// One declared uniform
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub name: String,
    pub kind: UniformType,
    pub frequency: UniformUpdateFrequency,
    pub source: UniformSource,
}

/// Fog handling the patched program uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogMode {
    Off,
    PerVertex,
    PerFragment,
}

// ===== BUILDER =====

/// Builder for `ProgramUniforms`
pub struct UniformsBuilder {
    name: String,
    program: ProgramHandle,
    uniforms: Vec<Uniform>,
    names: FxHashSet<String>,
    fog_mode: FogMode,
    id_map: Arc<IdMap>,
    frame_stats: Option<Arc<FrameStats>>,
}

impl UniformsBuilder {
    pub fn new(name: impl Into<String>, program: ProgramHandle) -> Self {
        Self {
            name: name.into(),
            program,
            uniforms: Vec::new(),
            names: FxHashSet::default(),
            fog_mode: FogMode::Off,
            id_map: Arc::new(IdMap::default()),
            frame_stats: None,
        }
    }

    /// Declare a uniform
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already declared, or if a constant's
    /// type does not match `kind`.
    pub fn uniform(
        &mut self,
        name: &str,
        kind: UniformType,
        frequency: UniformUpdateFrequency,
        source: UniformSource,
    ) -> Result<&mut Self> {
        if let UniformSource::Constant(value) = source {
            if value.uniform_type() != kind {
                prism_bail!(Error::InvalidResource, "prism::ProgramUniforms",
                    "Uniform '{}' declared as {:?} but constant is {:?}", name, kind, value.uniform_type());
            }
        }
        if !self.names.insert(name.to_string()) {
            prism_bail!(Error::InvalidResource, "prism::ProgramUniforms",
                "Uniform '{}' already declared in '{}'", name, self.name);
        }

        self.uniforms.push(Uniform {
            name: name.to_string(),
            kind,
            frequency,
            source,
        });
        Ok(self)
    }

    /// Declare a uniform with a constant value uploaded once
    pub fn constant(&mut self, name: &str, value: UniformValue) -> Result<&mut Self> {
        self.uniform(name, value.uniform_type(), UniformUpdateFrequency::Once, UniformSource::Constant(value))
    }

    pub fn fog_mode(&mut self, fog_mode: FogMode) -> &mut Self {
        self.fog_mode = fog_mode;
        self
    }

    pub fn id_map(&mut self, id_map: Arc<IdMap>) -> &mut Self {
        self.id_map = id_map;
        self
    }

    pub fn frame_stats(&mut self, stats: Arc<FrameStats>) -> &mut Self {
        self.frame_stats = Some(stats);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn build_uniforms(self) -> ProgramUniforms {
        ProgramUniforms {
            name: self.name,
            program: self.program,
            uniforms: self.uniforms,
            fog_mode: self.fog_mode,
            id_map: self.id_map,
            frame_stats: self.frame_stats,
        }
    }
}

// ===== BUNDLE =====

/// Uniforms declared for one program
pub struct ProgramUniforms {
    name: String,
    program: ProgramHandle,
    uniforms: Vec<Uniform>,
    fog_mode: FogMode,
    id_map: Arc<IdMap>,
    frame_stats: Option<Arc<FrameStats>>,
}

impl ProgramUniforms {
    pub fn builder(name: impl Into<String>, program: ProgramHandle) -> UniformsBuilder {
        UniformsBuilder::new(name, program)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    pub fn fog_mode(&self) -> FogMode {
        self.fog_mode
    }

    pub fn len(&self) -> usize {
        self.uniforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
    }

    /// Get a uniform by name
    pub fn get(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.iter().find(|uniform| uniform.name == name)
    }

    /// Iterate over uniforms in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Uniform> {
        self.uniforms.iter()
    }

    /// Pack id of a held item name (-1 when unmapped)
    pub fn held_item_id(&self, item: &str) -> i32 {
        self.id_map.item_id(item)
    }

    /// Value of a uniform this crate can produce without the host
    ///
    /// Constants and frame statistics resolve; host-owned values return None.
    pub fn local_value(&self, uniform: &Uniform) -> Option<UniformValue> {
        match uniform.source {
            UniformSource::Constant(value) => Some(value),
            UniformSource::Frame(quantity) => {
                self.frame_stats.as_ref().map(|stats| stats.value(quantity))
            }
            _ => None,
        }
    }
}
