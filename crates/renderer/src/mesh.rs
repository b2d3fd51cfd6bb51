//! Static indexed triangle mesh.

use std::rc::Rc;

use bytemuck::Pod;

use crate::backend::GlBackend;
use crate::buffer::{IndexBuffer, VertexArray, VertexBuffer, VertexLayout};
use crate::error::GeometryResult;

/// Vertex array + vertex buffer + index buffer, immutable after construction.
///
/// Fields drop in declaration order: indices, vertices, then the array.
pub struct Mesh<B: GlBackend> {
    index_buffer: IndexBuffer<B>,
    vertex_buffer: VertexBuffer<B>,
    vertex_array: VertexArray<B>,
    gl: Rc<B>,
}

impl<B: GlBackend> Mesh<B> {
    /// Upload interleaved `f32` records and `u32` indices.
    ///
    /// `layout` must describe the records exactly; nothing checks it against
    /// the shader that will consume them.
    pub fn new(
        gl: Rc<B>,
        vertices: &[f32],
        indices: &[u32],
        layout: &VertexLayout,
    ) -> GeometryResult<Self> {
        Self::from_bytes(gl, bytemuck::cast_slice(vertices), indices, layout)
    }

    /// Upload typed vertex records.
    pub fn from_vertices<V: Pod>(
        gl: Rc<B>,
        vertices: &[V],
        indices: &[u32],
        layout: &VertexLayout,
    ) -> GeometryResult<Self> {
        Self::from_bytes(gl, bytemuck::cast_slice(vertices), indices, layout)
    }

    fn from_bytes(
        gl: Rc<B>,
        vertex_bytes: &[u8],
        indices: &[u32],
        layout: &VertexLayout,
    ) -> GeometryResult<Self> {
        let vertex_array = VertexArray::new(gl.clone())?;
        vertex_array.bind();

        let vertex_buffer = VertexBuffer::new(gl.clone(), vertex_bytes)?;
        let index_buffer = IndexBuffer::new(gl.clone(), indices)?;
        layout.apply(gl.as_ref());

        vertex_array.unbind();

        log::debug!(
            "Mesh uploaded: {} vertex bytes, {} indices, stride {}",
            vertex_buffer.size(),
            index_buffer.count(),
            layout.stride
        );

        Ok(Self {
            index_buffer,
            vertex_buffer,
            vertex_array,
            gl,
        })
    }

    pub fn index_count(&self) -> i32 {
        self.index_buffer.count()
    }

    /// Size of the vertex data in bytes.
    pub fn vertex_bytes(&self) -> i32 {
        self.vertex_buffer.size()
    }

    /// Bind the vertex array and draw every index as triangles.
    pub fn draw(&self) {
        self.vertex_array.bind();
        self.gl.draw_triangles_u32(self.index_buffer.count());
    }
}
