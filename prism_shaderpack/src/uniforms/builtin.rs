/// Replacements for built-in GL state the patched shaders no longer read

use glam::{Mat4, Vec3};
use crate::error::Result;
use super::program_uniforms::{
    HostValue, UniformSource, UniformType, UniformUpdateFrequency, UniformValue, UniformsBuilder,
};

/// Texture matrix the lightmap coordinates were multiplied by
///
/// Lightmap coordinates arrive in 0..256 texel units; this maps them to
/// texel centers in 0..1.
pub fn lightmap_texture_matrix() -> Mat4 {
    Mat4::from_scale(Vec3::splat(1.0 / 256.0)) * Mat4::from_translation(Vec3::splat(8.0))
}

pub fn add_builtin_replacement_uniforms(uniforms: &mut UniformsBuilder) -> Result<()> {
    uniforms.constant("iris_LightmapTextureMatrix", UniformValue::Mat4(lightmap_texture_matrix()))?;

    let matrices = [
        ("iris_ModelViewMat", UniformType::Mat4, HostValue::ModelViewMatrix),
        ("iris_ProjMat", UniformType::Mat4, HostValue::ProjectionMatrix),
        ("iris_NormalMat", UniformType::Mat3, HostValue::NormalMatrix),
    ];
    for (name, kind, value) in matrices {
        uniforms.uniform(name, kind, UniformUpdateFrequency::PerFrame, UniformSource::Host(value))?;
    }
    Ok(())
}
