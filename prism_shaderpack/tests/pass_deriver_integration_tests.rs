//! Integration tests for pass derivation
//!
//! These tests run a whole shader pack through a PassDeriver with a small
//! text-level patcher, on-disk shader assets and an on-disk debug dump.
//! No GPU required.
//!
//! Run with: cargo test --test pass_deriver_integration_tests

use prism_shaderpack::prism::{Error, PassDeriver, PassDeriverDesc, PassKind, Result};
use prism_shaderpack::prism::gl::{
    AlphaTest, AlphaTestFunction, BlendModeOverride, BufferBlendInformation, BufferBlendOverride,
    GbufferTargets, GbufferTargetsDesc,
};
use prism_shaderpack::prism::pipeline::{BatchingParams, ProgramImages, ProgramSamplers};
use prism_shaderpack::prism::shaderpack::{
    parse_sodium_import, DirectoryShaderAssets, IdMap, PackDirectives, ProgramCatalogue, ProgramDirectives,
    ProgramId, ProgramSource,
};
use prism_shaderpack::prism::transform::{
    DirectoryShaderDump, PatchRequest, PatchShaderType, PatchedShaderDump, PatchedSources, ShaderPatcher,
};
use prism_shaderpack::prism::uniforms::{FrameUpdateNotifier, UniformValue};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// TEST COLLABORATORS
// ============================================================================

/// Patcher resolving imports and appending alpha tests as GLSL text
struct TextPatcher {
    assets: DirectoryShaderAssets,
}

impl TextPatcher {
    fn expand(&self, source: &str, request: &PatchRequest<'_>) -> Result<String> {
        let mut output = format!("#define MAX_BATCH_SIZE {}\n", request.max_batch_size);
        for line in source.lines() {
            if line.starts_with("#import") {
                output.push_str(&parse_sodium_import(line, &self.assets)?);
                output.push('\n');
            } else {
                output.push_str(line);
                output.push('\n');
            }
        }
        Ok(output)
    }
}

impl ShaderPatcher for TextPatcher {
    fn patch_sodium(&self, request: &PatchRequest<'_>) -> Result<PatchedSources> {
        let mut output = PatchedSources::new();
        if let Some(vertex) = request.vertex {
            output.insert(PatchShaderType::Vertex, self.expand(vertex, request)?);
        }
        if let Some(geometry) = request.geometry {
            output.insert(PatchShaderType::Geometry, self.expand(geometry, request)?);
        }
        if let Some(fragment) = request.fragment {
            let base = self.expand(fragment, request)?;
            if let Some(cutout) = request.cutout_alpha {
                output.insert(PatchShaderType::FragmentCutout,
                    format!("{}{}", base, cutout.to_expression("iris_FragColor.a", "    ")));
            }
            let alpha = request.base_alpha.unwrap_or(AlphaTest::ALWAYS);
            output.insert(PatchShaderType::Fragment,
                format!("{}{}", base, alpha.to_expression("iris_FragColor.a", "    ")));
        }
        Ok(output)
    }
}

struct NoSamplers;

impl ProgramSamplers for NoSamplers {
    fn update(&self) {}
}

struct NoImages;

impl ProgramImages for NoImages {
    fn update(&self) {}
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("prism_it_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_asset(root: &Path, namespace: &str, path: &str, text: &str) {
    let file = root.join(namespace).join(path);
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(file, text).unwrap();
}

fn source(id: ProgramId, fragment: &str, directives: ProgramDirectives) -> ProgramSource {
    ProgramSource::new(
        id.source_name(),
        Some("#import <sodium:include/chunk_vertex.glsl>\nvoid main() {}".to_string()),
        None,
        Some(fragment.to_string()),
        directives,
    )
}

fn pack() -> ProgramCatalogue {
    let mut id_map = IdMap::default();
    id_map.items.insert("minecraft:lantern".to_string(), 12);

    ProgramCatalogue::builder()
        .program(ProgramId::Terrain, source(ProgramId::Terrain, "void main() { /* terrain */ }",
            ProgramDirectives {
                draw_buffers: vec![0, 2],
                buffer_blend_overrides: vec![
                    BufferBlendInformation::new(2, BlendModeOverride::Off),
                    BufferBlendInformation::new(6, BlendModeOverride::Off),
                ],
                ..Default::default()
            }))
        .program(ProgramId::Water, source(ProgramId::Water, "void main() { /* water */ }",
            ProgramDirectives {
                alpha_test_override: Some(AlphaTest::new(AlphaTestFunction::Greater, 0.5)),
                ..Default::default()
            }))
        .program(ProgramId::Shadow, source(ProgramId::Shadow, "void main() { /* shadow */ }",
            ProgramDirectives::default()))
        .id_map(id_map)
        .pack_directives(PackDirectives::default())
        .build()
}

fn desc(
    catalogue: ProgramCatalogue,
    targets: &mut GbufferTargets,
    assets_root: &Path,
    dump: Option<Arc<dyn PatchedShaderDump>>,
) -> PassDeriverDesc {
    PassDeriverDesc {
        catalogue: Arc::new(catalogue),
        targets: GbufferTargetsDesc {
            flipped_after_prepare: [2].into_iter().collect(),
            flipped_after_translucent: [0, 2].into_iter().collect(),
        },
        shadow_framebuffer: targets.create_shadow_framebuffer(&[0]).unwrap(),
        patcher: Arc::new(TextPatcher { assets: DirectoryShaderAssets::new(assets_root) }),
        shader_dump: dump,
        frame_notifier: Arc::new(FrameUpdateNotifier::new()),
        create_terrain_samplers: Box::new(|_| Ok(Box::new(NoSamplers) as Box<dyn ProgramSamplers>)),
        create_terrain_images: Box::new(|_| Ok(Box::new(NoImages) as Box<dyn ProgramImages>)),
        create_shadow_samplers: Some(Box::new(|_| Ok(Box::new(NoSamplers) as Box<dyn ProgramSamplers>))),
        create_shadow_images: None,
    }
}

// ============================================================================
// DERIVATION TESTS
// ============================================================================

#[test]
fn test_integration_full_pack() {
    let assets_root = temp_dir("assets_full");
    write_asset(&assets_root, "sodium", "include/chunk_vertex.glsl", "in vec3 a_Pos;");

    let mut targets = GbufferTargets::new(8);
    let desc = desc(pack(), &mut targets, &assets_root, None);
    let mut deriver = PassDeriver::new(desc, &mut targets).unwrap();
    assert_eq!(targets.framebuffer_count(), 3);

    deriver.derive_with(&BatchingParams::default()).unwrap();
    let passes = deriver.passes().unwrap();

    let terrain = passes.get(PassKind::Terrain);
    let vertex = terrain.vertex_source().unwrap();
    assert!(vertex.starts_with("#define MAX_BATCH_SIZE 1024\n"));
    assert!(vertex.contains("in vec3 a_Pos;"));
    assert!(!vertex.contains("#import"));
    assert!(terrain.fragment_source().unwrap().contains("// alpha test disabled"));
    assert!(terrain.cutout_fragment_source().unwrap().contains("if (!(iris_FragColor.a > 0.1))"));
    assert_eq!(terrain.buffer_overrides(), &[BufferBlendOverride::new(1, BlendModeOverride::Off)]);

    let translucent = passes.get(PassKind::Translucent);
    assert_eq!(translucent.program_name(), Some("gbuffers_water"));
    assert!(translucent.fragment_source().unwrap().contains("if (!(iris_FragColor.a > 0.5))"));
    assert_eq!(translucent.cutout_fragment_source(), None);

    let shadow = passes.get(PassKind::Shadow);
    assert_eq!(shadow.blend_override(), Some(BlendModeOverride::Off));
    assert_eq!(shadow.alpha_test(), AlphaTest::NON_ZERO_ALPHA);
    assert_eq!(shadow.framebuffer(), deriver.framebuffer(PassKind::Shadow));

    let layout = targets.framebuffer(terrain.framebuffer()).unwrap();
    assert_eq!(layout.draw_buffers, vec![0, 2]);
    assert_eq!(layout.alternate, vec![false, true]);

    std::fs::remove_dir_all(&assets_root).ok();
}

#[test]
fn test_integration_missing_import_fails_derive() {
    let assets_root = temp_dir("assets_missing");

    let mut targets = GbufferTargets::new(8);
    let desc = desc(pack(), &mut targets, &assets_root, None);
    let mut deriver = PassDeriver::new(desc, &mut targets).unwrap();

    let result = deriver.derive(256, 8.0, false);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert!(matches!(deriver.terrain(), Err(Error::InitializationFailed(_))));

    std::fs::remove_dir_all(&assets_root).ok();
}

#[test]
fn test_integration_dump_directory() {
    let assets_root = temp_dir("assets_dump");
    write_asset(&assets_root, "sodium", "include/chunk_vertex.glsl", "in vec3 a_Pos;");
    let dump_dir = std::env::temp_dir().join(format!("prism_it_dump_{}", std::process::id()));
    let dump = DirectoryShaderDump::new(&dump_dir).unwrap();

    let mut targets = GbufferTargets::new(8);
    let desc = desc(pack(), &mut targets, &assets_root, Some(Arc::new(dump)));
    let mut deriver = PassDeriver::new(desc, &mut targets).unwrap();
    deriver.derive(1024, 32.0, false).unwrap();

    assert!(dump_dir.join("00_gbuffers_terrain_sodium.vsh").exists());
    assert!(dump_dir.join("00_gbuffers_terrain_sodium.fsh").exists());
    assert!(dump_dir.join("01_gbuffers_terrain_sodium_cutout.fsh").exists());
    assert!(!dump_dir.join("01_gbuffers_terrain_sodium_cutout.vsh").exists());
    assert!(dump_dir.join("02_gbuffers_water_sodium.fsh").exists());
    assert!(dump_dir.join("03_shadow_sodium.vsh").exists());
    assert!(dump_dir.join("04_shadow_sodium_cutout.fsh").exists());

    let cutout = std::fs::read_to_string(dump_dir.join("04_shadow_sodium_cutout.fsh")).unwrap();
    assert!(cutout.contains("discard;"));

    std::fs::remove_dir_all(&assets_root).ok();
    std::fs::remove_dir_all(&dump_dir).ok();
}

// ============================================================================
// PROGRAM BINDING TESTS
// ============================================================================

#[test]
fn test_integration_uniforms_and_bindings() {
    let assets_root = temp_dir("assets_bindings");
    let mut targets = GbufferTargets::new(8);
    let desc = desc(pack(), &mut targets, &assets_root, None);
    let deriver = PassDeriver::new(desc, &mut targets).unwrap();

    let uniforms = deriver.init_uniforms(3).unwrap();
    assert_eq!(uniforms.name(), "<sodium shaders>");
    assert_eq!(uniforms.held_item_id("minecraft:lantern"), 12);
    assert!(uniforms.get("fogMode").is_some());
    assert!(matches!(
        uniforms.local_value(uniforms.get("iris_LightmapTextureMatrix").unwrap()),
        Some(UniformValue::Mat4(_))
    ));

    assert!(deriver.has_shadow_pass());
    assert!(deriver.init_shadow_samplers(3).is_ok());
    assert!(matches!(deriver.init_shadow_images(3), Err(Error::InvalidResource(_))));

    std::fs::remove_dir_all(&assets_root).ok();
}
