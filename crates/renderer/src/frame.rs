//! Per-frame GPU state: viewport, clear, depth test.

use std::rc::Rc;

use crate::backend::{ClearMask, GlBackend};

pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

pub struct RenderState<B: GlBackend> {
    gl: Rc<B>,
    clear_color: [f32; 4],
    width: u32,
    height: u32,
}

impl<B: GlBackend> RenderState<B> {
    /// Enables depth testing and sets the initial viewport.
    pub fn new(gl: Rc<B>, width: u32, height: u32) -> Self {
        gl.enable_depth_test();
        let mut state = Self {
            gl,
            clear_color: DEFAULT_CLEAR_COLOR,
            width: 0,
            height: 0,
        };
        state.resize(width, height);
        state
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.gl
            .viewport(0, 0, self.width as i32, self.height as i32);
        log::debug!("Viewport set to {}x{}", self.width, self.height);
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Clear color and depth.
    pub fn begin_frame(&self) {
        let [r, g, b, a] = self.clear_color;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(ClearMask::COLOR_DEPTH);
    }
}
