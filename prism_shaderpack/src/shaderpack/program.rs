/// Shader pack program catalogue.
///
/// A `ProgramCatalogue` is the read-only view of the programs a shader pack
/// declares. It is assembled with `ProgramCatalogueBuilder` while the pack is
/// loaded and frozen by `build()`; nothing downstream mutates it.

use rustc_hash::FxHashMap;
use crate::gl::{
    AlphaTest, BlendFactor, BlendMode, BlendModeOverride, BufferBlendInformation,
};

// ===== PROGRAM ID =====

/// Program group a program belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramGroup {
    Gbuffers,
    Shadow,
}

impl ProgramGroup {
    fn prefix(&self) -> &'static str {
        match self {
            ProgramGroup::Gbuffers => "gbuffers",
            ProgramGroup::Shadow => "shadow",
        }
    }
}

/// Identity of a render program in the pack's catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramId {
    Basic,
    Line,
    Textured,
    TexturedLit,
    SkyBasic,
    SkyTextured,
    Clouds,
    Terrain,
    DamagedBlock,
    Block,
    BeaconBeam,
    Entities,
    EntitiesGlowing,
    ArmorGlint,
    SpiderEyes,
    Hand,
    Weather,
    Water,
    HandWater,
    Shadow,
}

impl ProgramId {
    /// Every program id, in catalogue order
    pub const ALL: [ProgramId; 20] = [
        ProgramId::Basic,
        ProgramId::Line,
        ProgramId::Textured,
        ProgramId::TexturedLit,
        ProgramId::SkyBasic,
        ProgramId::SkyTextured,
        ProgramId::Clouds,
        ProgramId::Terrain,
        ProgramId::DamagedBlock,
        ProgramId::Block,
        ProgramId::BeaconBeam,
        ProgramId::Entities,
        ProgramId::EntitiesGlowing,
        ProgramId::ArmorGlint,
        ProgramId::SpiderEyes,
        ProgramId::Hand,
        ProgramId::Weather,
        ProgramId::Water,
        ProgramId::HandWater,
        ProgramId::Shadow,
    ];

    pub fn group(&self) -> ProgramGroup {
        match self {
            ProgramId::Shadow => ProgramGroup::Shadow,
            _ => ProgramGroup::Gbuffers,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            ProgramId::Basic => "basic",
            ProgramId::Line => "line",
            ProgramId::Textured => "textured",
            ProgramId::TexturedLit => "textured_lit",
            ProgramId::SkyBasic => "skybasic",
            ProgramId::SkyTextured => "skytextured",
            ProgramId::Clouds => "clouds",
            ProgramId::Terrain => "terrain",
            ProgramId::DamagedBlock => "damagedblock",
            ProgramId::Block => "block",
            ProgramId::BeaconBeam => "beaconbeam",
            ProgramId::Entities => "entities",
            ProgramId::EntitiesGlowing => "entities_glowing",
            ProgramId::ArmorGlint => "armor_glint",
            ProgramId::SpiderEyes => "spidereyes",
            ProgramId::Hand => "hand",
            ProgramId::Weather => "weather",
            ProgramId::Water => "water",
            ProgramId::HandWater => "hand_water",
            ProgramId::Shadow => "",
        }
    }

    /// Source file stem, e.g. `gbuffers_terrain` or `shadow`
    pub fn source_name(&self) -> String {
        let suffix = self.suffix();
        if suffix.is_empty() {
            self.group().prefix().to_string()
        } else {
            format!("{}_{}", self.group().prefix(), suffix)
        }
    }

    /// Blend override applied when the pack declares none for this program
    pub fn default_blend_override(&self) -> Option<BlendModeOverride> {
        match self {
            ProgramId::SpiderEyes => Some(BlendModeOverride::Mode(BlendMode::new(
                BlendFactor::SrcAlpha,
                BlendFactor::One,
                BlendFactor::Zero,
                BlendFactor::One,
            ))),
            ProgramId::Shadow => Some(BlendModeOverride::Off),
            _ => None,
        }
    }
}

// ===== DIRECTIVES =====

/// Per-program directives parsed from the pack
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDirectives {
    /// Draw buffers in output order (`/* DRAWBUFFERS:0123 */`)
    pub draw_buffers: Vec<u32>,
    /// Global blend override (`blend.<program>=`)
    pub blend_mode_override: Option<BlendModeOverride>,
    /// Per-buffer blend overrides (`blend.<program>.colortexN=`)
    pub buffer_blend_overrides: Vec<BufferBlendInformation>,
    /// Alpha test override (`alphaTest.<program>=`)
    pub alpha_test_override: Option<AlphaTest>,
}

impl Default for ProgramDirectives {
    fn default() -> Self {
        Self {
            draw_buffers: vec![0],
            blend_mode_override: None,
            buffer_blend_overrides: Vec::new(),
            alpha_test_override: None,
        }
    }
}

// ===== PROGRAM SOURCE =====

/// Sources and directives for one program
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSource {
    name: String,
    vertex: Option<String>,
    geometry: Option<String>,
    fragment: Option<String>,
    directives: ProgramDirectives,
}

impl ProgramSource {
    pub fn new(
        name: impl Into<String>,
        vertex: Option<String>,
        geometry: Option<String>,
        fragment: Option<String>,
        directives: ProgramDirectives,
    ) -> Self {
        Self {
            name: name.into(),
            vertex,
            geometry,
            fragment,
            directives,
        }
    }

    /// Program name, e.g. `gbuffers_terrain`
    pub fn name(&self) -> &str {
        &self.name
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

    pub fn directives(&self) -> &ProgramDirectives {
        &self.directives
    }

    /// A program is usable only with both a vertex and a fragment stage
    pub fn is_valid(&self) -> bool {
        self.vertex.is_some() && self.fragment.is_some()
    }
}

// ===== PACK-WIDE DATA =====

/// Block / item / entity id mappings declared by the pack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdMap {
    pub items: FxHashMap<String, i32>,
    pub blocks: FxHashMap<String, i32>,
    pub entities: FxHashMap<String, i32>,
}

impl IdMap {
    /// Pack id for an item, or -1 when the pack does not map it
    pub fn item_id(&self, item: &str) -> i32 {
        self.items.get(item).copied().unwrap_or(-1)
    }
}

/// Pack-wide directives that affect uniforms
#[derive(Debug, Clone, PartialEq)]
pub struct PackDirectives {
    /// Half life (ticks) of `eyeBrightnessSmooth`
    pub eye_brightness_half_life: f32,
    /// Half life (ticks) of `centerDepthSmooth`
    pub center_depth_half_life: f32,
}

impl Default for PackDirectives {
    fn default() -> Self {
        Self {
            eye_brightness_half_life: 10.0,
            center_depth_half_life: 1.0,
        }
    }
}

// ===== CATALOGUE =====

/// Immutable catalogue of the programs a pack declares
#[derive(Debug, Clone, Default)]
pub struct ProgramCatalogue {
    programs: FxHashMap<ProgramId, ProgramSource>,
    id_map: IdMap,
    pack_directives: PackDirectives,
}

impl ProgramCatalogue {
    pub fn builder() -> ProgramCatalogueBuilder {
        ProgramCatalogueBuilder::default()
    }

    /// Get a program's source, if the pack declares it
    pub fn get(&self, id: ProgramId) -> Option<&ProgramSource> {
        self.programs.get(&id)
    }

    pub fn contains(&self, id: ProgramId) -> bool {
        self.programs.contains_key(&id)
    }

    /// Number of declared programs
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn id_map(&self) -> &IdMap {
        &self.id_map
    }

    pub fn pack_directives(&self) -> &PackDirectives {
        &self.pack_directives
    }
}

/// Builder for `ProgramCatalogue`
#[derive(Debug, Default)]
pub struct ProgramCatalogueBuilder {
    programs: FxHashMap<ProgramId, ProgramSource>,
    id_map: IdMap,
    pack_directives: PackDirectives,
}

impl ProgramCatalogueBuilder {
    /// Declare a program
    ///
    /// Programs missing a vertex or fragment stage are not usable and are
    /// left out of the catalogue, as if the pack had not declared them.
    pub fn program(mut self, id: ProgramId, source: ProgramSource) -> Self {
        if source.is_valid() {
            self.programs.insert(id, source);
        } else {
            crate::prism_debug!("prism::ProgramCatalogue",
                "Ignoring '{}': missing vertex or fragment stage", source.name());
        }
        self
    }

    pub fn id_map(mut self, id_map: IdMap) -> Self {
        self.id_map = id_map;
        self
    }

    pub fn pack_directives(mut self, directives: PackDirectives) -> Self {
        self.pack_directives = directives;
        self
    }

    pub fn build(self) -> ProgramCatalogue {
        ProgramCatalogue {
            programs: self.programs,
            id_map: self.id_map,
            pack_directives: self.pack_directives,
        }
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
