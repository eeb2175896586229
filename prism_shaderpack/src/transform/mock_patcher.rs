/// Mock shader patcher and dump for unit tests
///
/// The mock patcher does not rewrite GLSL. It tags each input stage with the
/// request parameters so tests can check what the deriver asked for, and
/// records every request it receives.

use std::sync::Mutex;
use crate::error::{Error, Result};
use crate::gl::AlphaTest;
use super::{
    PatchRequest, PatchedSources, PatchShaderType, PatchedShaderDump, ShaderAttributeInputs, ShaderPatcher,
};

// ============================================================================
// Mock Patcher
// ============================================================================

/// Owned copy of a `PatchRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub vertex: Option<String>,
    pub geometry: Option<String>,
    pub fragment: Option<String>,
    pub cutout_alpha: Option<AlphaTest>,
    pub base_alpha: Option<AlphaTest>,
    pub inputs: ShaderAttributeInputs,
    pub max_batch_size: u32,
    pub vertex_range: f32,
    pub base_instanced: bool,
}

pub struct MockPatcher {
    pub requests: Mutex<Vec<RecordedRequest>>,
    /// Stage the mock leaves out of its output even when given
    pub omit: Option<PatchShaderType>,
    /// Fail every request
    pub fail: bool,
}

impl MockPatcher {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            omit: None,
            fail: false,
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> RecordedRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

/// Tag a source the way the mock patches it
pub fn patched(source: &str, tag: &str) -> String {
    format!("{}\n// patched:{}", source, tag)
}

impl ShaderPatcher for MockPatcher {
    fn patch_sodium(&self, request: &PatchRequest<'_>) -> Result<PatchedSources> {
        self.requests.lock().unwrap().push(RecordedRequest {
            vertex: request.vertex.map(str::to_string),
            geometry: request.geometry.map(str::to_string),
            fragment: request.fragment.map(str::to_string),
            cutout_alpha: request.cutout_alpha,
            base_alpha: request.base_alpha,
            inputs: request.inputs,
            max_batch_size: request.max_batch_size,
            vertex_range: request.vertex_range,
            base_instanced: request.base_instanced,
        });

        if self.fail {
            return Err(Error::BackendError("mock patcher failure".to_string()));
        }

        let mut output = PatchedSources::new();
        if let Some(vertex) = request.vertex {
            output.insert(PatchShaderType::Vertex, patched(vertex, "vertex"));
        }
        if let Some(geometry) = request.geometry {
            output.insert(PatchShaderType::Geometry, patched(geometry, "geometry"));
        }
        if let Some(fragment) = request.fragment {
            output.insert(PatchShaderType::Fragment, patched(fragment, "fragment"));
            if request.cutout_alpha.is_some() {
                output.insert(PatchShaderType::FragmentCutout, patched(fragment, "cutout"));
            }
        }
        if let Some(stage) = self.omit {
            output.take(stage);
        }
        Ok(output)
    }
}

// ============================================================================
// Mock Dump
// ============================================================================

pub struct MockDump {
    pub names: Mutex<Vec<String>>,
    pub fail: bool,
}

impl MockDump {
    pub fn new() -> Self {
        Self { names: Mutex::new(Vec::new()), fail: false }
    }

    pub fn failing() -> Self {
        Self { names: Mutex::new(Vec::new()), fail: true }
    }

    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }
}

impl PatchedShaderDump for MockDump {
    fn dump(
        &self,
        name: &str,
        _vertex: Option<&str>,
        _geometry: Option<&str>,
        _fragment: Option<&str>,
    ) -> Result<()> {
        self.names.lock().unwrap().push(name.to_string());
        if self.fail {
            return Err(Error::BackendError("mock dump failure".to_string()));
        }
        Ok(())
    }
}
