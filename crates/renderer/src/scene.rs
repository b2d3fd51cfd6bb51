//! Demo scenes: one shader program and one mesh each.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use asset::mesh::MeshData;
use corelib::{Mat4, Vec3};

use crate::backend::{GlBackend, ShaderStage};
use crate::buffer::VertexLayout;
use crate::error::SceneError;
use crate::mesh::Mesh;
use crate::shader::ShaderProgram;

pub const LIGHT_POSITION: Vec3 = Vec3::new(1.2, 1.0, 2.0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SceneKind {
    /// Colored quad, position + color.
    #[default]
    Quad,
    /// Lit cube, position + normal + color.
    Cube,
}

impl SceneKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "quad" => Some(SceneKind::Quad),
            "cube" => Some(SceneKind::Cube),
            _ => None,
        }
    }

    fn shader_files(self) -> (&'static str, &'static str) {
        match self {
            SceneKind::Quad => ("basic.vert", "basic.frag"),
            SceneKind::Cube => ("lit.vert", "lit.frag"),
        }
    }

    fn mesh_data(self) -> MeshData {
        match self {
            SceneKind::Quad => asset::mesh::colored_quad(),
            SceneKind::Cube => asset::mesh::lit_cube(),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneKind::Quad => f.write_str("quad"),
            SceneKind::Cube => f.write_str("cube"),
        }
    }
}

/// Matrices and values uploaded once per frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameUniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub time: f32,
}

impl FrameUniforms {
    #[inline]
    pub fn mvp(&self) -> Mat4 {
        corelib::mvp(self.projection, self.view, self.model)
    }
}

pub struct DemoScene<B: GlBackend> {
    kind: SceneKind,
    mesh: Mesh<B>,
    shader: ShaderProgram<B>,
}

impl<B: GlBackend> DemoScene<B> {
    /// Compile the scene's shaders from `shader_dir` and upload its mesh.
    pub fn load(gl: Rc<B>, kind: SceneKind, shader_dir: &Path) -> Result<Self, SceneError> {
        let (vert, frag) = kind.shader_files();
        let mut shader = ShaderProgram::new(gl.clone())?;
        shader.attach(ShaderStage::Vertex, shader_dir.join(vert))?;
        shader.attach(ShaderStage::Fragment, shader_dir.join(frag))?;
        shader.link()?;

        let data = kind.mesh_data();
        data.validate()
            .map_err(|e| SceneError::InvalidMesh(format!("{e:#}")))?;
        let layout = VertexLayout::interleaved_f32(&data.attributes);
        let mesh = Mesh::new(gl, &data.vertices, &data.indices, &layout)?;

        log::info!(
            "Scene '{}' ready: {} vertices, {} indices",
            kind,
            data.vertex_count(),
            mesh.index_count()
        );
        Ok(Self { kind, mesh, shader })
    }

    #[inline]
    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    /// Activate the program, upload this frame's uniforms and draw.
    pub fn draw(&self, frame: &FrameUniforms) {
        self.shader.use_program();
        self.shader.set_mat4("uMVP", &frame.mvp());
        self.shader.set_float("uTime", frame.time);
        if self.kind == SceneKind::Cube {
            self.shader.set_mat4("uModel", &frame.model);
            self.shader.set_vec3("uLightPos", LIGHT_POSITION);
            self.shader.set_vec3("uViewPos", frame.camera_position);
        }
        self.mesh.draw();
    }
}
