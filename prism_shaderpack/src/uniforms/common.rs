/// Common uniforms shared by every patched program

use std::sync::Arc;
use crate::error::Result;
use crate::shaderpack::{IdMap, PackDirectives};
use super::frame::{FrameStats, FrameUpdateNotifier};
use super::program_uniforms::{
    FogMode, FrameQuantity, Hand, HostValue, UniformSource, UniformType,
    UniformUpdateFrequency as Freq, UniformsBuilder,
};

/// Add camera, matrix, viewport, world, frame, smoothing, held item and fog uniforms
pub fn add_common_uniforms(
    uniforms: &mut UniformsBuilder,
    id_map: &IdMap,
    directives: &PackDirectives,
    notifier: &FrameUpdateNotifier,
    fog_mode: FogMode,
) -> Result<()> {
    uniforms
        .id_map(Arc::new(id_map.clone()))
        .frame_stats(FrameStats::attach(notifier))
        .fog_mode(fog_mode);

    add_camera_uniforms(uniforms)?;
    add_matrix_uniforms(uniforms)?;
    add_viewport_uniforms(uniforms)?;
    add_world_uniforms(uniforms)?;
    add_frame_uniforms(uniforms)?;
    add_smoothed_uniforms(uniforms, directives)?;
    add_held_item_uniforms(uniforms)?;
    add_fog_uniforms(uniforms, fog_mode)?;
    Ok(())
}

fn host(
    uniforms: &mut UniformsBuilder,
    name: &str,
    kind: UniformType,
    frequency: Freq,
    value: HostValue,
) -> Result<()> {
    uniforms.uniform(name, kind, frequency, UniformSource::Host(value))?;
    Ok(())
}

fn add_camera_uniforms(uniforms: &mut UniformsBuilder) -> Result<()> {
    host(uniforms, "cameraPosition", UniformType::Vec3, Freq::PerFrame, HostValue::CameraPosition)?;
    host(uniforms, "previousCameraPosition", UniformType::Vec3, Freq::PerFrame, HostValue::PreviousCameraPosition)
}

fn add_matrix_uniforms(uniforms: &mut UniformsBuilder) -> Result<()> {
    let matrices = [
        ("gbufferModelView", HostValue::ModelViewMatrix),
        ("gbufferModelViewInverse", HostValue::ModelViewInverse),
        ("gbufferPreviousModelView", HostValue::PreviousModelViewMatrix),
        ("gbufferProjection", HostValue::ProjectionMatrix),
        ("gbufferProjectionInverse", HostValue::ProjectionInverse),
        ("gbufferPreviousProjection", HostValue::PreviousProjectionMatrix),
    ];
    for (name, value) in matrices {
        host(uniforms, name, UniformType::Mat4, Freq::PerFrame, value)?;
    }
    Ok(())
}

fn add_viewport_uniforms(uniforms: &mut UniformsBuilder) -> Result<()> {
    host(uniforms, "viewWidth", UniformType::Float, Freq::PerFrame, HostValue::ViewWidth)?;
    host(uniforms, "viewHeight", UniformType::Float, Freq::PerFrame, HostValue::ViewHeight)?;
    host(uniforms, "aspectRatio", UniformType::Float, Freq::PerFrame, HostValue::AspectRatio)
}

fn add_world_uniforms(uniforms: &mut UniformsBuilder) -> Result<()> {
    host(uniforms, "worldTime", UniformType::Int, Freq::PerTick, HostValue::WorldTime)?;
    host(uniforms, "worldDay", UniformType::Int, Freq::PerTick, HostValue::WorldDay)?;
    host(uniforms, "eyeBrightness", UniformType::IVec2, Freq::PerTick, HostValue::EyeBrightness)
}

fn add_frame_uniforms(uniforms: &mut UniformsBuilder) -> Result<()> {
    let frame = [
        ("frameCounter", UniformType::Int, FrameQuantity::FrameCounter),
        ("frameTime", UniformType::Float, FrameQuantity::FrameTime),
        ("frameTimeCounter", UniformType::Float, FrameQuantity::FrameTimeCounter),
    ];
    for (name, kind, quantity) in frame {
        uniforms.uniform(name, kind, Freq::PerFrame, UniformSource::Frame(quantity))?;
    }
    Ok(())
}

fn add_smoothed_uniforms(uniforms: &mut UniformsBuilder, directives: &PackDirectives) -> Result<()> {
    uniforms.uniform(
        "eyeBrightnessSmooth",
        UniformType::IVec2,
        Freq::PerFrame,
        UniformSource::Smoothed {
            value: HostValue::EyeBrightness,
            half_life: directives.eye_brightness_half_life,
        },
    )?;
    uniforms.uniform(
        "centerDepthSmooth",
        UniformType::Float,
        Freq::PerFrame,
        UniformSource::Smoothed {
            value: HostValue::CenterDepth,
            half_life: directives.center_depth_half_life,
        },
    )?;
    Ok(())
}

fn add_held_item_uniforms(uniforms: &mut UniformsBuilder) -> Result<()> {
    uniforms.uniform("heldItemId", UniformType::Int, Freq::PerTick, UniformSource::HeldItem(Hand::Main))?;
    uniforms.uniform("heldItemId2", UniformType::Int, Freq::PerTick, UniformSource::HeldItem(Hand::Off))?;
    Ok(())
}

fn add_fog_uniforms(uniforms: &mut UniformsBuilder, fog_mode: FogMode) -> Result<()> {
    host(uniforms, "fogMode", UniformType::Int, Freq::PerFrame, HostValue::FogMode)?;
    if fog_mode == FogMode::Off {
        return Ok(());
    }

    host(uniforms, "fogColor", UniformType::Vec3, Freq::PerFrame, HostValue::FogColor)?;
    host(uniforms, "fogDensity", UniformType::Float, Freq::PerFrame, HostValue::FogDensity)?;
    host(uniforms, "fogStart", UniformType::Float, Freq::PerFrame, HostValue::FogStart)?;
    host(uniforms, "fogEnd", UniformType::Float, Freq::PerFrame, HostValue::FogEnd)
}
