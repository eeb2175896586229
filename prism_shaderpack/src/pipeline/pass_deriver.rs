/// Derivation of the batched terrain passes from a shader pack.
///
/// The batched chunk renderer draws terrain in three passes: opaque/cutout
/// terrain, translucent terrain and the shadow map. A shader pack declares
/// programs for a forward renderer instead, so each pass is resolved from
/// the pack's programs through a fallback chain, its directives are applied
/// with pass defaults, and its sources are handed to the external
/// `ShaderPatcher` to produce batching-compatible variants.
///
/// # Lifecycle
///
/// ```text
/// PassDeriver::new()   -> terrain + translucent framebuffers allocated
/// derive(..)           -> all three passes resolved (again on every call)
/// passes() / pass(..)  -> read the current snapshot
/// ```
///
/// Each `derive` builds a complete `ResolvedPasses` and replaces the previous
/// snapshot in one assignment. Snapshots already handed out stay valid.

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::gl::{
    resolve_buffer_overrides, AlphaTest, FlippedBuffers, FramebufferAllocator, FramebufferHandle, GbufferTargetsDesc,
};
use crate::shaderpack::{ProgramCatalogue, ProgramSource};
use crate::transform::{
    PatchRequest, PatchShaderType, PatchedShaderDump, PatchedSources, ShaderAttributeInputs, ShaderPatcher,
};
use crate::uniforms::{
    add_builtin_replacement_uniforms, add_common_uniforms, FogMode, FrameUpdateNotifier, ProgramHandle,
    ProgramUniforms,
};
use crate::{prism_bail, prism_debug, prism_info, prism_warn};
use super::pass::{resolve_first, BatchingParams, PassKind, ProgramResolution, ResolvedPass, ResolvedPasses};

/// Name of the uniform bundle shared by the batched programs
pub const SODIUM_UNIFORMS_NAME: &str = "<sodium shaders>";

// ===== SAMPLER / IMAGE BINDINGS =====

/// Sampler bindings of a linked program, created by the host
pub trait ProgramSamplers {
    /// Bind the samplers before drawing
    fn update(&self);
}

/// Image bindings of a linked program, created by the host
pub trait ProgramImages {
    /// Bind the images before drawing
    fn update(&self);
}

/// Creates sampler bindings for a linked program
pub type SamplerFactory = Box<dyn Fn(ProgramHandle) -> Result<Box<dyn ProgramSamplers>>>;

/// Creates image bindings for a linked program
pub type ImageFactory = Box<dyn Fn(ProgramHandle) -> Result<Box<dyn ProgramImages>>>;

// ===== DESCRIPTOR =====

/// Everything a `PassDeriver` is built from
pub struct PassDeriverDesc {
    /// Programs declared by the shader pack
    pub catalogue: Arc<ProgramCatalogue>,
    /// Flipped buffer sets of the terrain and translucent framebuffers
    pub targets: GbufferTargetsDesc,
    /// Framebuffer of the shadow pass, created by the shadow renderer
    pub shadow_framebuffer: FramebufferHandle,
    pub patcher: Arc<dyn ShaderPatcher>,
    /// Optional sink for patched sources
    pub shader_dump: Option<Arc<dyn PatchedShaderDump>>,
    pub frame_notifier: Arc<FrameUpdateNotifier>,
    pub create_terrain_samplers: SamplerFactory,
    pub create_terrain_images: ImageFactory,
    /// None when the pack has no shadow pass
    pub create_shadow_samplers: Option<SamplerFactory>,
    pub create_shadow_images: Option<ImageFactory>,
}

// ===== PASS DERIVER =====

pub struct PassDeriver {
    catalogue: Arc<ProgramCatalogue>,
    /// Framebuffers indexed by `PassKind`
    framebuffers: [FramebufferHandle; 3],
    patcher: Arc<dyn ShaderPatcher>,
    shader_dump: Option<Arc<dyn PatchedShaderDump>>,
    frame_notifier: Arc<FrameUpdateNotifier>,
    create_terrain_samplers: SamplerFactory,
    create_terrain_images: ImageFactory,
    create_shadow_samplers: Option<SamplerFactory>,
    create_shadow_images: Option<ImageFactory>,
    passes: Option<Arc<ResolvedPasses>>,
}

impl PassDeriver {
    /// Create a deriver, allocating the terrain and translucent framebuffers
    ///
    /// Each framebuffer draws to the buffers of the program its pass
    /// resolves to, or to buffer 0 when the pass has no program.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if a framebuffer cannot be created.
    pub fn new(desc: PassDeriverDesc, allocator: &mut dyn FramebufferAllocator) -> Result<Self> {
        let PassDeriverDesc {
            catalogue,
            targets,
            shadow_framebuffer,
            patcher,
            shader_dump,
            frame_notifier,
            create_terrain_samplers,
            create_terrain_images,
            create_shadow_samplers,
            create_shadow_images,
        } = desc;

        let terrain_framebuffer = Self::allocate_framebuffer(
            &catalogue, PassKind::Terrain, &targets.flipped_after_prepare, allocator)?;
        let translucent_framebuffer = Self::allocate_framebuffer(
            &catalogue, PassKind::Translucent, &targets.flipped_after_translucent, allocator)?;

        prism_info!("prism::PassDeriver",
            "Pass deriver created ({} programs, shadow pass: {})",
            catalogue.program_count(), create_shadow_samplers.is_some());

        Ok(Self {
            catalogue,
            framebuffers: [terrain_framebuffer, translucent_framebuffer, shadow_framebuffer],
            patcher,
            shader_dump,
            frame_notifier,
            create_terrain_samplers,
            create_terrain_images,
            create_shadow_samplers,
            create_shadow_images,
            passes: None,
        })
    }

    fn allocate_framebuffer(
        catalogue: &ProgramCatalogue,
        kind: PassKind,
        flipped: &FlippedBuffers,
        allocator: &mut dyn FramebufferAllocator,
    ) -> Result<FramebufferHandle> {
        match resolve_first(catalogue, kind.candidates()).source() {
            Some(source) => allocator.create_gbuffer_framebuffer(flipped, &source.directives().draw_buffers),
            None => allocator.create_gbuffer_framebuffer(flipped, &[0]),
        }
    }

    // ===== DERIVE =====

    /// Resolve all three passes, replacing any previous result
    ///
    /// # Errors
    ///
    /// Returns the patcher's error if patching a present program fails. The
    /// previous snapshot is kept in that case.
    pub fn derive(&mut self, max_batch_size: u32, vertex_range: f32, base_instanced: bool) -> Result<()> {
        let params = BatchingParams { max_batch_size, vertex_range, base_instanced };

        let terrain = self.derive_pass(PassKind::Terrain, &params)?;
        let translucent = self.derive_pass(PassKind::Translucent, &params)?;
        let shadow = self.derive_pass(PassKind::Shadow, &params)?;

        self.passes = Some(Arc::new(ResolvedPasses::new(terrain, translucent, shadow)));
        Ok(())
    }

    /// `derive` with parameters taken from a `BatchingParams`
    pub fn derive_with(&mut self, params: &BatchingParams) -> Result<()> {
        self.derive(params.max_batch_size, params.vertex_range, params.base_instanced)
    }

    fn derive_pass(&self, kind: PassKind, params: &BatchingParams) -> Result<ResolvedPass> {
        let framebuffer = self.framebuffers[kind.index()];

        match resolve_first(&self.catalogue, kind.candidates()) {
            ProgramResolution::Present(id, source) => {
                prism_debug!("prism::PassDeriver",
                    "Resolved {} pass to {:?} ({})", kind.name(), id, source.name());
                self.derive_present(kind, source, framebuffer, params)
            }
            ProgramResolution::Absent => {
                prism_debug!("prism::PassDeriver",
                    "No program for {} pass, using defaults", kind.name());
                Ok(ResolvedPass::absent(kind, framebuffer))
            }
        }
    }

    fn derive_present(
        &self,
        kind: PassKind,
        source: &ProgramSource,
        framebuffer: FramebufferHandle,
        params: &BatchingParams,
    ) -> Result<ResolvedPass> {
        let directives = source.directives();
        let blend_override = directives
            .blend_mode_override
            .or_else(|| kind.program_id().default_blend_override());
        let buffer_overrides = resolve_buffer_overrides(&directives.draw_buffers, &directives.buffer_blend_overrides);
        let alpha_test = directives.alpha_test_override.unwrap_or_else(|| kind.default_alpha());

        // Cutout passes bake the pass alpha into a separate variant and never
        // discard in the base fragment; translucent tests in the base fragment.
        let (cutout_alpha, base_alpha) = if kind.has_cutout() {
            (Some(alpha_test), Some(AlphaTest::ALWAYS))
        } else {
            (None, Some(alpha_test))
        };

        let request = PatchRequest {
            vertex: source.vertex_source(),
            geometry: source.geometry_source(),
            fragment: source.fragment_source(),
            cutout_alpha,
            base_alpha,
            inputs: ShaderAttributeInputs::TERRAIN,
            max_batch_size: params.max_batch_size,
            vertex_range: params.vertex_range,
            base_instanced: params.base_instanced,
        };
        let mut patched = self.patcher.patch_sodium(&request)?;
        check_patched_stages(kind, source.name(), &request, &patched);

        let vertex = patched.take(PatchShaderType::Vertex);
        let geometry = patched.take(PatchShaderType::Geometry);
        let fragment = patched.take(PatchShaderType::Fragment);
        let cutout_fragment = if kind.has_cutout() {
            patched.take(PatchShaderType::FragmentCutout)
        } else {
            None
        };

        self.dump(&format!("{}_sodium", source.name()),
            vertex.as_deref(), geometry.as_deref(), fragment.as_deref());
        if kind.has_cutout() {
            self.dump(&format!("{}_sodium_cutout", source.name()),
                None, None, cutout_fragment.as_deref());
        }

        Ok(ResolvedPass {
            program_name: Some(source.name().to_string()),
            vertex,
            geometry,
            fragment,
            cutout_fragment,
            framebuffer,
            blend_override,
            buffer_overrides,
            alpha_test,
        })
    }

    fn dump(&self, name: &str, vertex: Option<&str>, geometry: Option<&str>, fragment: Option<&str>) {
        let Some(shader_dump) = &self.shader_dump else {
            return;
        };
        if let Err(error) = shader_dump.dump(name, vertex, geometry, fragment) {
            prism_warn!("prism::PassDeriver", "Failed to dump patched shader '{}': {}", name, error);
        }
    }

    // ===== ACCESSORS =====

    /// Current snapshot of the resolved passes
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` before the first `derive`.
    pub fn passes(&self) -> Result<Arc<ResolvedPasses>> {
        match &self.passes {
            Some(passes) => Ok(Arc::clone(passes)),
            None => prism_bail!(Error::InitializationFailed, "prism::PassDeriver",
                "Passes requested before derive"),
        }
    }

    /// Current configuration of one pass
    pub fn pass(&self, kind: PassKind) -> Result<ResolvedPass> {
        Ok(self.passes()?.get(kind).clone())
    }

    pub fn terrain(&self) -> Result<ResolvedPass> {
        self.pass(PassKind::Terrain)
    }

    pub fn translucent(&self) -> Result<ResolvedPass> {
        self.pass(PassKind::Translucent)
    }

    pub fn shadow(&self) -> Result<ResolvedPass> {
        self.pass(PassKind::Shadow)
    }

    /// Framebuffer of a pass (available from construction)
    pub fn framebuffer(&self, kind: PassKind) -> FramebufferHandle {
        self.framebuffers[kind.index()]
    }

    pub fn catalogue(&self) -> &ProgramCatalogue {
        &self.catalogue
    }

    // ===== PROGRAM BINDINGS =====

    /// Declare the uniforms of a linked batched program
    pub fn init_uniforms(&self, program: ProgramHandle) -> Result<ProgramUniforms> {
        let mut uniforms = ProgramUniforms::builder(SODIUM_UNIFORMS_NAME, program);
        add_common_uniforms(
            &mut uniforms,
            self.catalogue.id_map(),
            self.catalogue.pack_directives(),
            &self.frame_notifier,
            FogMode::PerVertex,
        )?;
        add_builtin_replacement_uniforms(&mut uniforms)?;
        Ok(uniforms.build_uniforms())
    }

    /// Whether the host supplied shadow bindings
    pub fn has_shadow_pass(&self) -> bool {
        self.create_shadow_samplers.is_some()
    }

    pub fn init_terrain_samplers(&self, program: ProgramHandle) -> Result<Box<dyn ProgramSamplers>> {
        (self.create_terrain_samplers)(program)
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if no shadow sampler factory was supplied.
    pub fn init_shadow_samplers(&self, program: ProgramHandle) -> Result<Box<dyn ProgramSamplers>> {
        match &self.create_shadow_samplers {
            Some(create) => create(program),
            None => prism_bail!(Error::InvalidResource, "prism::PassDeriver",
                "No shadow sampler factory (program {})", program),
        }
    }

    pub fn init_terrain_images(&self, program: ProgramHandle) -> Result<Box<dyn ProgramImages>> {
        (self.create_terrain_images)(program)
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if no shadow image factory was supplied.
    pub fn init_shadow_images(&self, program: ProgramHandle) -> Result<Box<dyn ProgramImages>> {
        match &self.create_shadow_images {
            Some(create) => create(program),
            None => prism_bail!(Error::InvalidResource, "prism::PassDeriver",
                "No shadow image factory (program {})", program),
        }
    }
}

/// Warn about stages the patcher was given but did not return
///
/// A missing stage is carried as absent.
fn check_patched_stages(kind: PassKind, program: &str, request: &PatchRequest<'_>, patched: &PatchedSources) {
    let requested = [
        (PatchShaderType::Vertex, request.vertex.is_some()),
        (PatchShaderType::Geometry, request.geometry.is_some()),
        (PatchShaderType::Fragment, request.fragment.is_some()),
        (PatchShaderType::FragmentCutout, request.fragment.is_some() && request.cutout_alpha.is_some()),
    ];
    for (stage, wanted) in requested {
        if wanted && patched.get(stage).is_none() {
            prism_warn!("prism::PassDeriver",
                "Patcher returned no {:?} stage for {} ({} pass)", stage, program, kind.name());
        }
    }
}

#[cfg(test)]
#[path = "pass_deriver_tests.rs"]
mod tests;
