//! Renderer error types.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::backend::ShaderStage;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} shader failed to compile: {log}", stage.name())]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {log}")]
    Link { log: String },
    #[error("shader program is already linked")]
    AlreadyLinked,
    #[error("GPU object creation failed: {0}")]
    Gpu(String),
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("GPU object creation failed: {0}")]
    Gpu(String),
    #[error("{what} of {len} bytes exceeds the GL size range")]
    TooLarge { what: &'static str, len: usize },
}

pub type ShaderResult<T> = Result<T, ShaderError>;
pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("invalid mesh data: {0}")]
    InvalidMesh(String),
}
