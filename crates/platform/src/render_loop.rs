//! The per-frame loop: time, input, camera, clear, uniforms, draw, present.

use std::time::Duration;

use anyhow::{Context, Result};
use corelib::{CursorTracker, FlyCamera, FpsCounter, FrameClock, FrameTime, Mat4};
use renderer::{DemoScene, FrameUniforms, RenderState};
use winit::keyboard::KeyCode;

use crate::config::RunConfig;
use crate::input::{InputHandler, held_movements};
use crate::window::GlWindow;

/// Camera plus the cursor state feeding it; receives pointer callbacks.
#[derive(Debug, Default)]
pub struct LoopInput {
    pub camera: FlyCamera,
    cursor: CursorTracker,
    pending_resize: Option<(u32, u32)>,
}

impl LoopInput {
    pub fn new(camera: FlyCamera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.pending_resize.take()
    }
}

impl InputHandler for LoopInput {
    fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((dx, dy)) = self.cursor.delta(x, y) {
            self.camera.process_mouse(dx, dy);
        }
    }

    fn cursor_left(&mut self) {
        self.cursor.reset();
    }

    fn scrolled(&mut self, y: f32) {
        self.camera.process_scroll(y);
    }

    fn resized(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width, height));
    }
}

/// Model spins about +Y once every 2π seconds.
pub fn frame_uniforms(camera: &FlyCamera, frame: FrameTime, aspect: f32) -> FrameUniforms {
    FrameUniforms {
        model: Mat4::from_rotation_y(frame.elapsed),
        view: camera.view_matrix(),
        projection: camera.projection_matrix(aspect),
        camera_position: camera.position,
        time: frame.elapsed,
    }
}

/// Open the window, load the configured scene and render until closed.
pub fn run_with_renderer(config: RunConfig) -> Result<()> {
    let mut window = GlWindow::new(&config.window).context("Failed to initialize window")?;
    if config.capture_cursor {
        window.set_cursor_captured(true);
    }

    let gl = window.gl();
    let (width, height) = window.framebuffer_size();
    let mut render_state = RenderState::new(gl.clone(), width, height);
    let scene = DemoScene::load(gl, config.scene, &config.shader_dir).with_context(|| {
        format!(
            "Failed to load scene '{}' from {}",
            config.scene,
            config.shader_dir.display()
        )
    })?;

    let mut input = LoopInput::new(FlyCamera::default());
    let mut clock = FrameClock::new();
    let mut fps = config.show_fps.then(FpsCounter::default);

    while !window.should_close() {
        let frame = clock.tick();
        if let Some(rate) = fps
            .as_mut()
            .and_then(|f| f.record(Duration::from_secs_f32(frame.delta)))
        {
            log::info!("FPS: {rate:.1}");
        }

        if window.is_key_pressed(KeyCode::Escape) {
            window.request_close();
        }
        // Keyboard is polled; mouse deltas already reached the camera while pumping.
        for movement in held_movements(window.keys()) {
            input.camera.process_keyboard(movement, frame.delta);
        }
        if let Some((w, h)) = input.take_resize() {
            render_state.resize(w, h);
        }

        render_state.begin_frame();
        scene.draw(&frame_uniforms(&input.camera, frame, render_state.aspect()));

        window.swap_buffers();
        window.poll_events(&mut input);
    }

    log::info!("Render loop finished.");
    // GPU objects go before the context that owns them.
    drop(scene);
    drop(render_state);
    drop(window);
    Ok(())
}
