//! CPU-side interleaved geometry for the demo scenes.

use anyhow::{Result, bail};

/// Interleaved float vertex records plus triangle indices.
///
/// `attributes[i]` is the component count of attribute slot `i`; the
/// vertex record is the concatenation of all slots in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub attributes: Vec<i32>,
}

impl MeshData {
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>, attributes: Vec<i32>) -> Self {
        Self {
            vertices,
            indices,
            attributes,
        }
    }

    /// Floats per vertex record.
    pub fn floats_per_vertex(&self) -> usize {
        self.attributes.iter().map(|&c| c.max(0) as usize).sum()
    }

    pub fn vertex_count(&self) -> usize {
        match self.floats_per_vertex() {
            0 => 0,
            n => self.vertices.len() / n,
        }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    /// Check that records are whole, indices are in range and form triangles.
    pub fn validate(&self) -> Result<()> {
        if !self.is_valid() {
            bail!("Mesh has no vertices or no indices");
        }
        if self.attributes.is_empty() {
            bail!("Mesh has no vertex attributes");
        }
        if let Some(bad) = self.attributes.iter().find(|&&c| !(1..=4).contains(&c)) {
            bail!("Attribute component count {bad} is outside 1..=4");
        }
        let stride = self.floats_per_vertex();
        if self.vertices.len() % stride != 0 {
            bail!(
                "Vertex data length {} is not a multiple of the {}-float record",
                self.vertices.len(),
                stride
            );
        }
        if self.indices.len() % 3 != 0 {
            bail!("Index count {} does not form whole triangles", self.indices.len());
        }
        let count = self.vertex_count();
        if let Some(&idx) = self.indices.iter().find(|&&i| i as usize >= count) {
            bail!("Index {idx} out of range for {count} vertices");
        }
        Ok(())
    }
}

/// Unit quad in the z=0 plane: slot 0 position, slot 1 color.
pub fn colored_quad() -> MeshData {
    #[rustfmt::skip]
    let vertices = vec![
        // pos               // color
        -0.5, -0.5, 0.0,     1.0, 0.0, 0.0, // 0
         0.5, -0.5, 0.0,     0.0, 1.0, 0.0, // 1
         0.5,  0.5, 0.0,     0.0, 0.0, 1.0, // 2
        -0.5,  0.5, 0.0,     1.0, 1.0, 0.0, // 3
    ];
    let indices = vec![0, 1, 2, 2, 3, 0];
    MeshData::new(vertices, indices, vec![3, 3])
}

/// Unit cube with per-face normals: slot 0 position, slot 1 normal, slot 2 color.
pub fn lit_cube() -> MeshData {
    // (normal, color, four corners counter-clockwise seen from outside)
    #[rustfmt::skip]
    let faces: [([f32; 3], [f32; 3], [[f32; 3]; 4]); 6] = [
        ([ 0.0,  0.0,  1.0], [1.0, 0.3, 0.3], [[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]]),
        ([ 0.0,  0.0, -1.0], [0.3, 1.0, 0.3], [[ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5]]),
        ([ 1.0,  0.0,  0.0], [0.3, 0.3, 1.0], [[ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5]]),
        ([-1.0,  0.0,  0.0], [1.0, 1.0, 0.3], [[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]]),
        ([ 0.0,  1.0,  0.0], [1.0, 0.3, 1.0], [[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5]]),
        ([ 0.0, -1.0,  0.0], [0.3, 1.0, 1.0], [[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]]),
    ];

    let mut vertices = Vec::with_capacity(6 * 4 * 9);
    let mut indices = Vec::with_capacity(6 * 6);
    for (face, (normal, color, corners)) in faces.iter().enumerate() {
        for corner in corners {
            vertices.extend_from_slice(corner);
            vertices.extend_from_slice(normal);
            vertices.extend_from_slice(color);
        }
        let base = (face * 4) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    MeshData::new(vertices, indices, vec![3, 3, 3])
}
