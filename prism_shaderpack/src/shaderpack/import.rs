//! `#import <namespace:path>` directives in batched-renderer shaders.
//!
//! The batched renderer's own shaders pull shared code in with import lines.
//! When a pack replaces those shaders, imports are resolved against the
//! renderer's asset namespace through a `ShaderAssets` lookup.

use std::fmt;
use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::{prism_bail, prism_err};

/// Expected import grammar, reported in malformed-input errors
pub const IMPORT_PATTERN: &str = "#import <(?<namespace>[^:>]*):(?<path>[^>]*)>";

/// Namespace used when an import leaves the namespace empty
pub const DEFAULT_NAMESPACE: &str = "minecraft";

// ===== ASSET LOCATION =====

/// Namespaced asset identifier (`namespace:path`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetLocation {
    namespace: String,
    path: String,
}

impl AssetLocation {
    /// Build a location, validating both halves
    ///
    /// Namespaces allow `[a-z0-9_.-]`, paths additionally allow `/`.
    /// An empty namespace falls back to `DEFAULT_NAMESPACE`. `.` and `..`
    /// segments are rejected so a location never leaves its namespace.
    pub fn new(namespace: &str, path: &str) -> Result<Self> {
        let namespace = if namespace.is_empty() { DEFAULT_NAMESPACE } else { namespace };

        if !namespace.chars().all(is_namespace_char) {
            prism_bail!(Error::MalformedInput, "prism::AssetLocation",
                "Non [a-z0-9_.-] character in namespace of location: {}:{}", namespace, path);
        }
        if !path.chars().all(|c| c == '/' || is_namespace_char(c)) {
            prism_bail!(Error::MalformedInput, "prism::AssetLocation",
                "Non [a-z0-9/._-] character in path of location: {}:{}", namespace, path);
        }
        if is_relative_segment(namespace) || path.split('/').any(is_relative_segment) {
            prism_bail!(Error::MalformedInput, "prism::AssetLocation",
                "Relative segment in location: {}:{}", namespace, path);
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_relative_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

// ===== ASSET LOOKUP =====

/// Asset lookup collaborator returning shader source text
pub trait ShaderAssets {
    fn shader_source(&self, location: &AssetLocation) -> Result<String>;
}

/// Asset lookup reading `<root>/<namespace>/<path>` from disk
pub struct DirectoryShaderAssets {
    root: PathBuf,
}

impl DirectoryShaderAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File a location resolves to
    pub fn resolve(&self, location: &AssetLocation) -> PathBuf {
        let mut file = self.root.join(location.namespace());
        for segment in location.path().split('/').filter(|segment| !segment.is_empty()) {
            file.push(segment);
        }
        file
    }
}

impl ShaderAssets for DirectoryShaderAssets {
    fn shader_source(&self, location: &AssetLocation) -> Result<String> {
        let file = self.resolve(location);
        std::fs::read_to_string(&file).map_err(|err| prism_err!(Error::InvalidResource,
            "prism::DirectoryShaderAssets",
            "Failed to read shader '{}' from {}: {}", location, file.display(), err))
    }
}

// ===== PARSING =====

/// Parse an import line into its asset location
///
/// The whole line must match `#import <namespace:path>`, where the namespace
/// holds no `:` or `>` and the path holds no `>`.
pub fn parse_import_location(line: &str) -> Result<AssetLocation> {
    let Some((namespace, path)) = split_import(line) else {
        prism_bail!(Error::MalformedInput, "prism::Import",
            "Malformed import statement (expected format: {})", IMPORT_PATTERN);
    };
    AssetLocation::new(namespace, path)
}

/// Resolve an import line to the imported shader's source text
pub fn parse_sodium_import(line: &str, assets: &dyn ShaderAssets) -> Result<String> {
    let location = parse_import_location(line)?;
    assets.shader_source(&location)
}

fn split_import(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix("#import <")?.strip_suffix('>')?;
    let (namespace, path) = inner.split_once(':')?;
    if namespace.contains('>') || path.contains('>') {
        return None;
    }
    Some((namespace, path))
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
