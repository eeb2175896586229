/// Vertex stream buffer with strip-preserving segment splits.
///
/// Batched entity rendering fills one buffer for many draws. When a strip
/// primitive (line strip, triangle strip) must be cut into separate
/// segments, `split_strip()` inserts degenerate geometry so the segments
/// still render as one strip without connecting unrelated vertices:
///
/// ```text
/// committed:  A B C | D E        (split after C)
/// stored:     A B C C D D E      (C duplicated at split, D once after)
/// ```
///
/// Strip state machine:
///
/// - `Normal --split--> PendingDuplicate` (only with at least one vertex,
///   duplicates the last vertex immediately)
/// - `PendingDuplicate --vertex committed--> Normal` (duplicates the new vertex)
/// - `* --end--> Normal` (no duplication)

use bytemuck::Pod;
use crate::error::{Error, Result};
use crate::{prism_bail, prism_err, prism_trace};
use super::vertex_format::VertexFormat;

/// The buffer grows in steps of this many bytes
pub const GROWTH_STEP: usize = 2 * 1024 * 1024;

/// Primitive assembly mode of the buffer contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexMode {
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
}

impl VertexMode {
    /// Whether consecutive vertices share primitives
    pub fn is_strip(&self) -> bool {
        matches!(self, VertexMode::LineStrip | VertexMode::TriangleStrip)
    }
}

/// Strip continuity state of a fill session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripState {
    Normal,
    /// The vertex committed next is duplicated once more
    PendingDuplicate,
}

/// Finished buffer contents
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBuffer {
    pub mode: VertexMode,
    pub format: VertexFormat,
    pub vertex_count: u32,
    pub data: Vec<u8>,
}

/// Where appended vertex bytes come from
enum VertexBytes<'a> {
    Provided(&'a [u8]),
    /// The vertex immediately behind the write cursor
    Previous,
}

/// Incrementally filled vertex buffer
pub struct StripBuffer {
    data: Vec<u8>,
    next_element_byte: usize,
    vertices: u32,
    session: Option<(VertexMode, VertexFormat)>,
    strip: StripState,
}

impl StripBuffer {
    /// Create a buffer with `capacity` bytes preallocated
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            next_element_byte: 0,
            vertices: 0,
            session: None,
            strip: StripState::Normal,
        }
    }

    /// Start a fill session
    ///
    /// # Errors
    ///
    /// Returns an error if a session is already in progress.
    pub fn begin(&mut self, mode: VertexMode, format: VertexFormat) -> Result<()> {
        if self.session.is_some() {
            prism_bail!(Error::InvalidResource, "prism::StripBuffer", "Already building");
        }
        if format.vertex_size() == 0 {
            prism_bail!(Error::InvalidResource, "prism::StripBuffer", "Vertex format has no elements");
        }
        self.session = Some((mode, format));
        self.next_element_byte = 0;
        self.vertices = 0;
        self.strip = StripState::Normal;
        Ok(())
    }

    /// Commit one vertex given as raw bytes of exactly one vertex stride
    pub fn vertex(&mut self, bytes: &[u8]) -> Result<()> {
        let stride = self.stride()?;
        if bytes.len() != stride {
            prism_bail!(Error::InvalidResource, "prism::StripBuffer",
                "Vertex is {} bytes, format stride is {}", bytes.len(), stride);
        }
        self.push_vertex_bytes(VertexBytes::Provided(bytes));
        self.on_vertex_committed();
        Ok(())
    }

    /// Commit one vertex from a plain-old-data struct laid out like the format
    pub fn vertex_pod<T: Pod>(&mut self, vertex: &T) -> Result<()> {
        self.vertex(bytemuck::bytes_of(vertex))
    }

    /// Split the strip: the next segment continues it through degenerate vertices
    ///
    /// A split before any vertex is written does nothing.
    pub fn split_strip(&mut self) {
        self.begin_segment_split();
    }

    /// Alias of `split_strip` named after the state transition it triggers
    pub fn begin_segment_split(&mut self) {
        if self.vertices == 0 {
            return;
        }
        self.duplicate_last_vertex();
        self.strip = StripState::PendingDuplicate;
        prism_trace!("prism::StripBuffer", "Strip split at vertex {}", self.vertices);
    }

    /// Finish the session and hand out the written vertices
    pub fn end(&mut self) -> Result<RenderedBuffer> {
        let Some((mode, format)) = self.session.take() else {
            prism_bail!(Error::InvalidResource, "prism::StripBuffer", "Not building");
        };

        let rendered = RenderedBuffer {
            mode,
            format,
            vertex_count: self.vertices,
            data: self.data[..self.next_element_byte].to_vec(),
        };
        self.next_element_byte = 0;
        self.vertices = 0;
        self.on_buffer_ended();
        Ok(rendered)
    }

    // ===== STATE =====

    pub fn is_building(&self) -> bool {
        self.session.is_some()
    }

    /// Vertices written in this session, duplicates included
    pub fn vertex_count(&self) -> u32 {
        self.vertices
    }

    pub fn strip_state(&self) -> StripState {
        self.strip
    }

    /// Bytes written in this session
    pub fn written_bytes(&self) -> &[u8] {
        &self.data[..self.next_element_byte]
    }

    /// Allocated size in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    // ===== STRIP STATE MACHINE =====

    fn on_vertex_committed(&mut self) {
        if self.strip == StripState::PendingDuplicate {
            self.strip = StripState::Normal;
            self.duplicate_last_vertex();
        }
    }

    fn on_buffer_ended(&mut self) {
        self.strip = StripState::Normal;
    }

    // ===== RAW WRITES =====

    fn stride(&self) -> Result<usize> {
        match &self.session {
            Some((_, format)) => Ok(format.vertex_size()),
            None => Err(prism_err!(Error::InvalidResource, "prism::StripBuffer", "Not building")),
        }
    }

    fn duplicate_last_vertex(&mut self) {
        self.push_vertex_bytes(VertexBytes::Previous);
    }

    /// Append one vertex at the write cursor, advance and count it
    fn push_vertex_bytes(&mut self, bytes: VertexBytes<'_>) {
        let Some((_, format)) = &self.session else {
            return;
        };
        let stride = format.vertex_size();
        self.ensure_vertex_capacity(stride);

        let start = self.next_element_byte;
        match bytes {
            VertexBytes::Provided(bytes) => {
                self.data[start..start + stride].copy_from_slice(bytes);
            }
            VertexBytes::Previous => {
                self.data.copy_within(start - stride..start, start);
            }
        }
        self.next_element_byte += stride;
        self.vertices += 1;
    }

    fn ensure_vertex_capacity(&mut self, stride: usize) {
        let needed = self.next_element_byte + stride;
        if needed <= self.data.len() {
            return;
        }
        let shortfall = needed - self.data.len();
        let grow_by = shortfall.div_ceil(GROWTH_STEP) * GROWTH_STEP;
        prism_trace!("prism::StripBuffer",
            "Growing vertex buffer {} -> {} bytes", self.data.len(), self.data.len() + grow_by);
        self.data.resize(self.data.len() + grow_by, 0);
    }
}

impl Default for StripBuffer {
    fn default() -> Self {
        Self::new(GROWTH_STEP)
    }
}

#[cfg(test)]
#[path = "strip_buffer_tests.rs"]
mod tests;
