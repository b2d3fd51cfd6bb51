//! Shader program: attach compiled stages, link once, set uniforms by name.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::backend::{GlBackend, ShaderStage};
use crate::error::{ShaderError, ShaderResult};

pub struct ShaderProgram<B: GlBackend> {
    gl: Rc<B>,
    raw: B::Program,
    linked: bool,
    /// Resolved locations by name; `None` records a name the driver does not know.
    locations: RefCell<HashMap<String, Option<B::UniformLocation>>>,
}

impl<B: GlBackend> ShaderProgram<B> {
    pub fn new(gl: Rc<B>) -> ShaderResult<Self> {
        let raw = gl.create_program().map_err(ShaderError::Gpu)?;
        Ok(Self {
            gl,
            raw,
            linked: false,
            locations: RefCell::new(HashMap::new()),
        })
    }

    /// Read, compile and attach the source at `path`.
    pub fn attach(&mut self, stage: ShaderStage, path: impl AsRef<Path>) -> ShaderResult<()> {
        let path = path.as_ref();
        if self.linked {
            return Err(ShaderError::AlreadyLinked);
        }
        let source = asset::shader::load_shader_source(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.attach_source(stage, &source)?;
        log::debug!("Attached {} shader {}", stage.name(), path.display());
        Ok(())
    }

    /// Compile and attach in-memory source.
    pub fn attach_source(&mut self, stage: ShaderStage, source: &str) -> ShaderResult<()> {
        if self.linked {
            return Err(ShaderError::AlreadyLinked);
        }
        let shader = compile(self.gl.as_ref(), stage, source)?;
        self.gl.attach_shader(self.raw, shader);
        // The program keeps the attached stage alive.
        self.gl.delete_shader(shader);
        Ok(())
    }

    pub fn link(&mut self) -> ShaderResult<()> {
        if self.linked {
            return Err(ShaderError::AlreadyLinked);
        }
        self.gl.link_program(self.raw);
        if !self.gl.program_link_status(self.raw) {
            let log = non_empty_log(self.gl.program_info_log(self.raw), "link failed");
            log::error!("Shader program link failed: {log}");
            return Err(ShaderError::Link { log });
        }
        self.linked = true;
        // Lookups made before linking saw no active uniforms.
        self.locations.get_mut().clear();
        log::info!("Shader program linked");
        Ok(())
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Make this the active program. Only meaningful after `link`.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.raw));
    }

    // Uniform setters: the program must be linked and active. Unknown names
    // resolve to no location and the write is dropped.

    pub fn set_float(&self, name: &str, value: f32) {
        let location = self.location(name);
        self.gl.uniform_f32(location.as_ref(), value);
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) {
        let location = self.location(name);
        self.gl.uniform_vec3(location.as_ref(), &value.to_array());
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        let location = self.location(name);
        self.gl.uniform_mat4(location.as_ref(), &value.to_cols_array());
    }

    fn location(&self, name: &str) -> Option<B::UniformLocation> {
        if let Some(cached) = self.locations.borrow().get(name) {
            return cached.clone();
        }
        let location = self.gl.uniform_location(self.raw, name);
        if location.is_none() {
            log::warn!("Uniform '{name}' is not active in this program; writes are ignored");
        }
        self.locations
            .borrow_mut()
            .insert(name.to_string(), location.clone());
        location
    }
}

impl<B: GlBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.gl.delete_program(self.raw);
    }
}

fn compile<B: GlBackend>(gl: &B, stage: ShaderStage, source: &str) -> ShaderResult<B::Shader> {
    let shader = gl.create_shader(stage).map_err(ShaderError::Gpu)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = non_empty_log(gl.shader_info_log(shader), "compile failed");
        gl.delete_shader(shader);
        log::error!("{} shader compile failed: {log}", stage.name());
        return Err(ShaderError::Compile { stage, log });
    }
    Ok(shader)
}

fn non_empty_log(log: String, fallback: &str) -> String {
    let trimmed = log.trim();
    if trimmed.is_empty() {
        format!("{fallback} (driver returned no log)")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GlCall, RecordingBackend};
    use std::path::PathBuf;

    fn shader_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/shaders")
    }

    fn linked_basic(gl: &Rc<RecordingBackend>) -> ShaderProgram<RecordingBackend> {
        let mut program = ShaderProgram::new(gl.clone()).unwrap();
        program.attach(ShaderStage::Vertex, shader_dir().join("basic.vert")).unwrap();
        program.attach(ShaderStage::Fragment, shader_dir().join("basic.frag")).unwrap();
        program.link().unwrap();
        program
    }

    #[test]
    fn shipped_shaders_link() {
        let gl = Rc::new(RecordingBackend::new());
        let program = linked_basic(&gl);
        assert!(program.is_linked());
        // intermediate stages are released right after attaching
        assert_eq!(gl.count(|c| matches!(c, GlCall::CreateShader(..))), 2);
        assert_eq!(gl.count(|c| matches!(c, GlCall::DeleteShader(_))), 2);
    }

    #[test]
    fn missing_file_is_io_error_and_program_stays_unlinked() {
        let gl = Rc::new(RecordingBackend::new());
        let mut program = ShaderProgram::new(gl.clone()).unwrap();
        let err = program
            .attach(ShaderStage::Vertex, "no/such/shader.vert")
            .unwrap_err();
        match err {
            ShaderError::Io { path, .. } => assert_eq!(path, PathBuf::from("no/such/shader.vert")),
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(!program.is_linked());
        assert_eq!(gl.count(|c| matches!(c, GlCall::CreateShader(..))), 0);
    }

    #[test]
    fn compile_error_carries_driver_log() {
        let gl = Rc::new(RecordingBackend::new());
        let mut program = ShaderProgram::new(gl.clone()).unwrap();
        let err = program
            .attach_source(ShaderStage::Fragment, "#version 330 core\n#error nope\nvoid main() {}")
            .unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.contains("#error"));
            }
            other => panic!("expected Compile, got {other:?}"),
        }
        // the failed stage is released and never attached
        assert_eq!(gl.count(|c| matches!(c, GlCall::DeleteShader(_))), 1);
        assert_eq!(gl.count(|c| matches!(c, GlCall::AttachShader { .. })), 0);
    }

    #[test]
    fn link_without_fragment_stage_fails_with_log() {
        let gl = Rc::new(RecordingBackend::new());
        let mut program = ShaderProgram::new(gl.clone()).unwrap();
        program.attach(ShaderStage::Vertex, shader_dir().join("basic.vert")).unwrap();
        let err = program.link().unwrap_err();
        match err {
            ShaderError::Link { log } => {
                assert!(!log.is_empty());
                assert!(log.contains("fragment"));
            }
            other => panic!("expected Link, got {other:?}"),
        }
        assert!(!program.is_linked());
    }

    #[test]
    fn link_is_once_only() {
        let gl = Rc::new(RecordingBackend::new());
        let mut program = linked_basic(&gl);
        assert!(matches!(program.link(), Err(ShaderError::AlreadyLinked)));
        assert!(matches!(
            program.attach(ShaderStage::Vertex, shader_dir().join("basic.vert")),
            Err(ShaderError::AlreadyLinked)
        ));
    }

    #[test]
    fn mat4_is_uploaded_column_major() {
        let gl = Rc::new(RecordingBackend::new());
        let program = linked_basic(&gl);
        program.use_program();
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        program.set_mat4("uMVP", &m);

        let location = gl
            .calls()
            .iter()
            .find_map(|c| match c {
                GlCall::UniformMat4 { location, .. } => *location,
                _ => None,
            })
            .unwrap();
        let uploaded = gl.last_mat4(location).unwrap();
        assert_eq!(&uploaded[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn vec3_and_float_reach_their_locations() {
        let gl = Rc::new(RecordingBackend::new());
        let mut program = ShaderProgram::new(gl.clone()).unwrap();
        program.attach(ShaderStage::Vertex, shader_dir().join("lit.vert")).unwrap();
        program.attach(ShaderStage::Fragment, shader_dir().join("lit.frag")).unwrap();
        program.link().unwrap();

        program.set_vec3("uLightPos", Vec3::new(1.0, 2.0, 3.0));
        program.set_float("uTime", 0.5);
        let calls = gl.calls();
        assert!(calls.iter().any(|c| matches!(
            c,
            GlCall::UniformVec3 { location: Some(_), value } if *value == [1.0, 2.0, 3.0]
        )));
        assert!(calls.iter().any(|c| matches!(
            c,
            GlCall::UniformF32 { location: Some(_), value } if *value == 0.5
        )));
    }

    // Known footgun: a typo in a uniform name is not an error, the upload
    // silently goes nowhere.
    #[test]
    fn unknown_uniform_is_a_silent_no_op() {
        let gl = Rc::new(RecordingBackend::new());
        let program = linked_basic(&gl);
        program.use_program();
        program.set_float("uTypo", 1.0);
        program.set_float("uTypo", 2.0);

        assert_eq!(
            gl.count(|c| matches!(c, GlCall::UniformF32 { location: None, .. })),
            2
        );
    }

    #[test]
    fn uniform_locations_are_resolved_once() {
        let gl = Rc::new(RecordingBackend::new());
        let program = linked_basic(&gl);
        for _ in 0..5 {
            program.set_float("uTime", 1.0);
            program.set_float("uMissing", 1.0);
        }
        assert_eq!(
            gl.count(|c| matches!(c, GlCall::UniformLocation { name, .. } if name == "uTime")),
            1
        );
        assert_eq!(
            gl.count(|c| matches!(c, GlCall::UniformLocation { name, .. } if name == "uMissing")),
            1
        );
    }

    #[test]
    fn uniform_set_before_link_resolves_after_link() {
        let gl = Rc::new(RecordingBackend::new());
        let mut program = ShaderProgram::new(gl.clone()).unwrap();
        program.attach(ShaderStage::Vertex, shader_dir().join("basic.vert")).unwrap();
        program.attach(ShaderStage::Fragment, shader_dir().join("basic.frag")).unwrap();
        program.set_float("uTime", 1.0);
        program.link().unwrap();
        gl.clear_calls();

        program.use_program();
        program.set_float("uTime", 2.0);
        assert!(gl.calls().iter().any(|c| matches!(
            c,
            GlCall::UniformF32 { location: Some(_), value } if *value == 2.0
        )));
    }

    #[test]
    fn drop_deletes_program() {
        let gl = Rc::new(RecordingBackend::new());
        let program = linked_basic(&gl);
        drop(program);
        assert_eq!(gl.count(|c| matches!(c, GlCall::DeleteProgram(_))), 1);
    }
}
