//! Asset loading (shader sources) and CPU-side demo geometry.

pub mod mesh;
pub mod shader;
