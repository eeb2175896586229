/// Debug side channel for patched shaders.
///
/// Patched sources can be written out for inspection. The channel is
/// best-effort: the pass deriver logs dump failures and carries on.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use crate::error::Result;
use super::patcher::PatchShaderType;

/// Debug dump collaborator
pub trait PatchedShaderDump {
    /// Write out the stages of one patched program under `name`
    fn dump(
        &self,
        name: &str,
        vertex: Option<&str>,
        geometry: Option<&str>,
        fragment: Option<&str>,
    ) -> Result<()>;
}

/// Writes patched shaders into a directory
///
/// Files are named `NN_<name>.<ext>` with a running counter so repeated
/// dumps of the same program stay in the order they were produced.
pub struct DirectoryShaderDump {
    directory: PathBuf,
    counter: AtomicU32,
}

impl DirectoryShaderDump {
    /// Create the dump directory, clearing previously dumped shaders
    ///
    /// Only files named like dump output are removed.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        if directory.exists() {
            for entry in std::fs::read_dir(&directory)? {
                let path = entry?.path();
                if is_dumped_shader(&path) {
                    std::fs::remove_file(&path)?;
                }
            }
        } else {
            std::fs::create_dir_all(&directory)?;
        }

        Ok(Self {
            directory,
            counter: AtomicU32::new(0),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl PatchedShaderDump for DirectoryShaderDump {
    fn dump(
        &self,
        name: &str,
        vertex: Option<&str>,
        geometry: Option<&str>,
        fragment: Option<&str>,
    ) -> Result<()> {
        let index = self.counter.fetch_add(1, Ordering::Relaxed);
        let stages = [
            (PatchShaderType::Vertex, vertex),
            (PatchShaderType::Geometry, geometry),
            (PatchShaderType::Fragment, fragment),
        ];

        for (stage, source) in stages {
            if let Some(source) = source {
                let file = self.directory.join(format!("{:02}_{}.{}", index, name, stage.extension()));
                std::fs::write(file, source)?;
            }
        }
        Ok(())
    }
}

/// Whether `path` is named like a dump output (`NN_<name>.<ext>`)
fn is_dumped_shader(path: &Path) -> bool {
    let is_stage = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("vsh") | Some("gsh") | Some("fsh")
    );
    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return false;
    };
    let Some((index, _)) = stem.split_once('_') else {
        return false;
    };
    is_stage && index.len() >= 2 && index.bytes().all(|b| b.is_ascii_digit())
}
