//! Renderer: thin owning wrappers over OpenGL objects.
//!
//! Every GPU object is owned by exactly one value here and released in its
//! `Drop`. Owners keep an `Rc` to the backend, so none of them can be sent to
//! another thread; they must all be dropped before the window that created
//! the context.

pub mod backend;
pub mod buffer;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod scene;
pub mod shader;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{AttributeKind, BufferTarget, ClearMask, GlBackend, ShaderStage};
pub use buffer::{IndexBuffer, VertexArray, VertexAttribute, VertexBuffer, VertexLayout};
pub use error::{GeometryError, SceneError, ShaderError};
pub use frame::RenderState;
pub use mesh::Mesh;
pub use scene::{DemoScene, FrameUniforms, SceneKind};
pub use shader::ShaderProgram;
