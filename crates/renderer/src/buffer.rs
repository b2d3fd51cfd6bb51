//! Owning wrappers for vertex arrays and buffers, plus attribute layouts.

use std::rc::Rc;

use crate::backend::{AttributeKind, BufferTarget, GlBackend};
use crate::error::{GeometryError, GeometryResult};

/// One attribute slot inside an interleaved vertex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub kind: AttributeKind,
    pub normalized: bool,
    /// Byte offset from the start of the record.
    pub offset: i32,
}

/// Attribute slots plus the record stride in bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: i32,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Tightly packed `f32` slots at locations 0, 1, 2, ...
    ///
    /// `interleaved_f32(&[3, 3])` is position + color at stride 24.
    pub fn interleaved_f32(components: &[i32]) -> Self {
        let size = AttributeKind::F32.size_bytes();
        let mut offset = 0;
        let attributes = components
            .iter()
            .enumerate()
            .map(|(location, &components)| {
                let attr = VertexAttribute {
                    location: location as u32,
                    components,
                    kind: AttributeKind::F32,
                    normalized: false,
                    offset,
                };
                offset += components * size;
                attr
            })
            .collect();
        Self {
            stride: offset,
            attributes,
        }
    }

    /// Configure and enable every slot on the currently bound vertex array
    /// for the currently bound array buffer.
    pub(crate) fn apply<B: GlBackend>(&self, gl: &B) {
        for attr in &self.attributes {
            gl.vertex_attrib_pointer(
                attr.location,
                attr.components,
                attr.kind,
                attr.normalized,
                self.stride,
                attr.offset,
            );
            gl.enable_vertex_attrib_array(attr.location);
        }
    }
}

fn byte_len(what: &'static str, data: &[u8]) -> GeometryResult<i32> {
    i32::try_from(data.len()).map_err(|_| GeometryError::TooLarge {
        what,
        len: data.len(),
    })
}

/// Vertex array object: records attribute bindings and the element buffer.
pub struct VertexArray<B: GlBackend> {
    gl: Rc<B>,
    raw: B::VertexArray,
}

impl<B: GlBackend> VertexArray<B> {
    pub fn new(gl: Rc<B>) -> GeometryResult<Self> {
        let raw = gl.create_vertex_array().map_err(GeometryError::Gpu)?;
        Ok(Self { gl, raw })
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.raw));
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(None);
    }
}

impl<B: GlBackend> Drop for VertexArray<B> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.raw);
    }
}

/// Static vertex data, uploaded once at construction.
pub struct VertexBuffer<B: GlBackend> {
    gl: Rc<B>,
    raw: B::Buffer,
    size: i32,
}

impl<B: GlBackend> VertexBuffer<B> {
    /// Creates the buffer, binds it to the array target and uploads `data`.
    /// The buffer is left bound.
    pub fn new(gl: Rc<B>, data: &[u8]) -> GeometryResult<Self> {
        let size = byte_len("vertex data", data)?;
        let raw = gl.create_buffer().map_err(GeometryError::Gpu)?;
        let buffer = Self { gl, raw, size };
        buffer.bind();
        buffer.gl.buffer_data_static(BufferTarget::Array, data);
        Ok(buffer)
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(BufferTarget::Array, Some(self.raw));
    }

    /// Size in bytes.
    pub fn size(&self) -> i32 {
        self.size
    }
}

impl<B: GlBackend> Drop for VertexBuffer<B> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.raw);
    }
}

/// Static `u32` index data.
pub struct IndexBuffer<B: GlBackend> {
    gl: Rc<B>,
    raw: B::Buffer,
    count: i32,
}

impl<B: GlBackend> IndexBuffer<B> {
    /// Creates the buffer, binds it to the element target and uploads
    /// `indices`. Bind a vertex array first: the binding is stored there.
    pub fn new(gl: Rc<B>, indices: &[u32]) -> GeometryResult<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(indices);
        byte_len("index data", bytes)?;
        let count = indices.len() as i32;
        let raw = gl.create_buffer().map_err(GeometryError::Gpu)?;
        let buffer = Self { gl, raw, count };
        buffer.bind();
        buffer.gl.buffer_data_static(BufferTarget::ElementArray, bytes);
        Ok(buffer)
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(BufferTarget::ElementArray, Some(self.raw));
    }

    pub fn count(&self) -> i32 {
        self.count
    }
}

impl<B: GlBackend> Drop for IndexBuffer<B> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.raw);
    }
}
