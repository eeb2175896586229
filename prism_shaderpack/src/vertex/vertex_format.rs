/// Vertex formats of batched geometry

/// Component data type of a vertex element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Float,
    UByte,
    Byte,
    UShort,
    Short,
    UInt,
    Int,
}

impl ElementType {
    /// Size in bytes of one component
    pub fn size_bytes(&self) -> usize {
        match self {
            ElementType::Float | ElementType::UInt | ElementType::Int => 4,
            ElementType::UShort | ElementType::Short => 2,
            ElementType::UByte | ElementType::Byte => 1,
        }
    }
}

/// Meaning of a vertex element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementUsage {
    Position,
    Color,
    Uv0,
    Uv1,
    Uv2,
    Normal,
    Padding,
}

/// One attribute of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexElement {
    pub usage: ElementUsage,
    pub element_type: ElementType,
    pub count: usize,
}

impl VertexElement {
    pub const fn new(usage: ElementUsage, element_type: ElementType, count: usize) -> Self {
        Self { usage, element_type, count }
    }

    pub fn byte_size(&self) -> usize {
        self.element_type.size_bytes() * self.count
    }
}

/// Ordered, tightly packed list of vertex elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexFormat {
    elements: Vec<VertexElement>,
    vertex_size: usize,
}

const POSITION: VertexElement = VertexElement::new(ElementUsage::Position, ElementType::Float, 3);
const COLOR: VertexElement = VertexElement::new(ElementUsage::Color, ElementType::UByte, 4);
const UV0: VertexElement = VertexElement::new(ElementUsage::Uv0, ElementType::Float, 2);
const UV1: VertexElement = VertexElement::new(ElementUsage::Uv1, ElementType::Short, 2);
const UV2: VertexElement = VertexElement::new(ElementUsage::Uv2, ElementType::Short, 2);
const NORMAL: VertexElement = VertexElement::new(ElementUsage::Normal, ElementType::Byte, 3);
const PADDING: VertexElement = VertexElement::new(ElementUsage::Padding, ElementType::Byte, 1);

impl VertexFormat {
    pub fn new(elements: Vec<VertexElement>) -> Self {
        let vertex_size = elements.iter().map(VertexElement::byte_size).sum();
        Self { elements, vertex_size }
    }

    /// Stride in bytes of one vertex
    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// Position + color (lines, debug shapes)
    pub fn position_color() -> Self {
        Self::new(vec![POSITION, COLOR])
    }

    /// Position + color + texture + lightmap (particles, text)
    pub fn position_color_tex_lightmap() -> Self {
        Self::new(vec![POSITION, COLOR, UV0, UV2])
    }

    /// Full entity format with overlay and normal
    pub fn new_entity() -> Self {
        Self::new(vec![POSITION, COLOR, UV0, UV1, UV2, NORMAL, PADDING])
    }
}
