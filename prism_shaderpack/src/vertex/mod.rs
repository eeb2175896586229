/// Batched vertex stream building

pub mod vertex_format;
pub mod strip_buffer;

pub use vertex_format::*;
pub use strip_buffer::*;
