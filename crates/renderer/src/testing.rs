//! Recording `GlBackend` for tests.
//!
//! Every call is appended to a log. Compilation fails when the source lacks
//! `void main` or contains `#error`; linking fails unless exactly one vertex
//! and one fragment stage were attached. Active uniforms are parsed from the
//! `uniform <type> <name>;` lines of attached sources.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::backend::{AttributeKind, BufferTarget, ClearMask, GlBackend, ShaderStage};

#[derive(Clone, Debug, PartialEq)]
pub enum GlCall {
    CreateShader(u32, ShaderStage),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    UniformLocation { program: u32, name: String },
    UniformF32 { location: Option<u32>, value: f32 },
    UniformVec3 { location: Option<u32>, value: [f32; 3] },
    UniformMat4 { location: Option<u32>, value: [f32; 16] },
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, Option<u32>),
    BufferData { target: BufferTarget, len: usize },
    DeleteBuffer(u32),
    VertexAttribPointer {
        location: u32,
        components: i32,
        kind: AttributeKind,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    DrawTriangles(i32),
    ClearColor([f32; 4]),
    Clear(ClearMask),
    EnableDepthTest,
    Viewport(i32, i32, i32, i32),
}

#[derive(Default)]
struct ShaderState {
    stage: Option<ShaderStage>,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct ProgramState {
    attached: Vec<(ShaderStage, String)>,
    linked: bool,
    log: String,
    uniforms: HashMap<String, u32>,
}

#[derive(Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<GlCall>>,
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<u32, ShaderState>>,
    programs: RefCell<HashMap<u32, ProgramState>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Total indices submitted through `draw_triangles_u32`.
    pub fn drawn_indices(&self) -> i32 {
        self.calls
            .borrow()
            .iter()
            .map(|c| match c {
                GlCall::DrawTriangles(n) => *n,
                _ => 0,
            })
            .sum()
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// The last matrix uploaded to `location`.
    pub fn last_mat4(&self, location: u32) -> Option<[f32; 16]> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            GlCall::UniformMat4 {
                location: Some(l),
                value,
            } if *l == location => Some(*value),
            _ => None,
        })
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn alloc(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

fn parse_uniform_names(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let mut words = line.trim().trim_end_matches(';').split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("uniform"), Some(_ty), Some(name)) => Some(name.to_string()),
            _ => None,
        }
    })
}

impl GlBackend for RecordingBackend {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.alloc();
        self.shaders.borrow_mut().insert(
            id,
            ShaderState {
                stage: Some(stage),
                ..Default::default()
            },
        );
        self.record(GlCall::CreateShader(id, stage));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(state) = self.shaders.borrow_mut().get_mut(&shader) {
            state.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(state) = self.shaders.borrow_mut().get_mut(&shader) {
            if state.source.contains("#error") {
                state.compiled = false;
                state.log = "0:1(1): error: #error directive encountered".to_string();
            } else if !state.source.contains("void main") {
                state.compiled = false;
                state.log = "0:1(1): error: no function with name 'main'".to_string();
            } else {
                state.compiled = true;
                state.log.clear();
            }
        }
        self.record(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.shaders
            .borrow()
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.shaders.borrow_mut().remove(&shader);
        self.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.alloc();
        self.programs.borrow_mut().insert(id, ProgramState::default());
        self.record(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let shaders = self.shaders.borrow();
        if let (Some(state), Some(prog)) = (
            shaders.get(&shader),
            self.programs.borrow_mut().get_mut(&program),
        ) {
            if let Some(stage) = state.stage {
                prog.attached.push((stage, state.source.clone()));
            }
        }
        self.record(GlCall::AttachShader { program, shader });
    }

    fn link_program(&self, program: u32) {
        if let Some(prog) = self.programs.borrow_mut().get_mut(&program) {
            let count = |stage: ShaderStage| prog.attached.iter().filter(|(s, _)| *s == stage).count();
            let (vertex, fragment) = (count(ShaderStage::Vertex), count(ShaderStage::Fragment));
            prog.linked = vertex == 1 && fragment == 1;
            prog.log = match (vertex, fragment) {
                (1, 1) => String::new(),
                (0, _) => "error: program lacks a vertex shader stage".to_string(),
                (_, 0) => "error: program lacks a fragment shader stage".to_string(),
                _ => "error: duplicate shader stages attached".to_string(),
            };
            prog.uniforms.clear();
            if prog.linked {
                let mut names: Vec<String> = prog
                    .attached
                    .iter()
                    .flat_map(|(_, src)| parse_uniform_names(src))
                    .collect();
                names.sort();
                names.dedup();
                for (location, name) in names.into_iter().enumerate() {
                    prog.uniforms.insert(name, location as u32);
                }
            }
        }
        self.record(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.programs
            .borrow()
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.programs.borrow_mut().remove(&program);
        self.record(GlCall::DeleteProgram(program));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.record(GlCall::UniformLocation {
            program,
            name: name.to_string(),
        });
        self.programs
            .borrow()
            .get(&program)
            .and_then(|p| p.uniforms.get(name).copied())
    }

    fn uniform_f32(&self, location: Option<&u32>, value: f32) {
        self.record(GlCall::UniformF32 {
            location: location.copied(),
            value,
        });
    }

    fn uniform_vec3(&self, location: Option<&u32>, value: &[f32; 3]) {
        self.record(GlCall::UniformVec3 {
            location: location.copied(),
            value: *value,
        });
    }

    fn uniform_mat4(&self, location: Option<&u32>, value: &[f32; 16]) {
        self.record(GlCall::UniformMat4 {
            location: location.copied(),
            value: *value,
        });
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.alloc();
        self.record(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.record(GlCall::DeleteVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.alloc();
        self.record(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        self.record(GlCall::BindBuffer(target, buffer));
    }

    fn buffer_data_static(&self, target: BufferTarget, data: &[u8]) {
        self.record(GlCall::BufferData {
            target,
            len: data.len(),
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(GlCall::DeleteBuffer(buffer));
    }

    fn vertex_attrib_pointer(
        &self,
        location: u32,
        components: i32,
        kind: AttributeKind,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(GlCall::VertexAttribPointer {
            location,
            components,
            kind,
            normalized,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(GlCall::EnableVertexAttribArray(location));
    }

    fn draw_triangles_u32(&self, count: i32) {
        self.record(GlCall::DrawTriangles(count));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(GlCall::ClearColor([r, g, b, a]));
    }

    fn clear(&self, mask: ClearMask) {
        self.record(GlCall::Clear(mask));
    }

    fn enable_depth_test(&self) {
        self.record(GlCall::EnableDepthTest);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport(x, y, width, height));
    }
}
