//! Shader source loading.

use std::{fs, io, path::Path};

/// Read a shader source file as UTF-8 text.
pub fn load_shader_source(path: impl AsRef<Path>) -> io::Result<String> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    log::debug!("Loaded shader source {} ({} bytes)", path.display(), source.len());
    Ok(source)
}
