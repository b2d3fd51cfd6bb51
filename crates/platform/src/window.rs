//! The single OS window and its current OpenGL context.
//!
//! Only one `GlWindow` may be alive per process: it claims the windowing
//! subsystem on construction and releases it on drop. GPU objects created
//! from `gl()` must be dropped before the window.

use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::config::WindowConfig;
use crate::error::{PlatformError, init_err};
use crate::input::{InputHandler, KeyboardState};

/// Pixels per scroll "line" for touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

static WINDOWING_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Process-wide ownership of the windowing subsystem.
#[derive(Debug)]
pub(crate) struct SubsystemClaim(());

impl SubsystemClaim {
    pub(crate) fn acquire() -> Result<Self, PlatformError> {
        WINDOWING_CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| SubsystemClaim(()))
            .map_err(|_| PlatformError::AlreadyInitialized)
    }
}

impl Drop for SubsystemClaim {
    fn drop(&mut self) {
        WINDOWING_CLAIMED.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct WindowState {
    close_requested: bool,
    keys: KeyboardState,
    pending_resize: Option<PhysicalSize<u32>>,
}

// Fields drop top to bottom: GL handles first, the subsystem claim last.
pub struct GlWindow {
    gl: Rc<glow::Context>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    state: WindowState,
    event_loop: EventLoop<()>,
    _claim: SubsystemClaim,
}

impl GlWindow {
    /// Create the window, make a core-profile context current on this
    /// thread and load GL entry points.
    pub fn new(config: &WindowConfig) -> Result<Self, PlatformError> {
        let claim = SubsystemClaim::acquire()?;
        let event_loop = EventLoop::new().map_err(|e| init_err("event loop", e))?;

        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width.max(1), config.height.max(1)));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(&event_loop, template, pick_config)
            .map_err(|e| init_err("GL display", e))?;
        let window = window
            .ok_or_else(|| PlatformError::Initialization("window was not created".to_string()))?;

        let raw_handle = window
            .window_handle()
            .map(|h| h.as_raw())
            .map_err(|e| init_err("window handle", e))?;
        let gl_display = gl_config.display();

        let (major, minor) = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_handle));
        // SAFETY: the raw window handle belongs to `window`, which outlives the context.
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| init_err(&format!("OpenGL {major}.{minor} core context"), e))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| init_err("surface attributes", e))?;
        // SAFETY: as above, `window` outlives the surface.
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
                .map_err(|e| init_err("window surface", e))?;
        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| init_err("make context current", e))?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            log::warn!("Could not set swap interval {interval:?}: {e}");
        }

        // SAFETY: the context was made current on this thread just above.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };
        let version = gl.version();
        if (version.major, version.minor) < (u32::from(major), u32::from(minor)) {
            return Err(PlatformError::Initialization(format!(
                "OpenGL {major}.{minor} requested but only {}.{} is available",
                version.major, version.minor
            )));
        }

        let size = window.inner_size();
        log::info!(
            "Window created: {}x{} '{}', OpenGL {}.{} {}",
            size.width,
            size.height,
            config.title,
            version.major,
            version.minor,
            version.vendor_info
        );

        Ok(Self {
            gl: Rc::new(gl),
            gl_surface,
            gl_context,
            window,
            state: WindowState::default(),
            event_loop,
            _claim: claim,
        })
    }

    /// The GL function table for this window's context.
    pub fn gl(&self) -> Rc<glow::Context> {
        self.gl.clone()
    }

    #[inline]
    pub fn should_close(&self) -> bool {
        self.state.close_requested
    }

    pub fn request_close(&mut self) {
        self.state.close_requested = true;
    }

    #[inline]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.state.keys.is_pressed(key)
    }

    #[inline]
    pub fn keys(&self) -> &KeyboardState {
        &self.state.keys
    }

    /// Framebuffer size in physical pixels.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Present the back buffer. A failed swap is logged, not returned.
    pub fn swap_buffers(&self) {
        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::warn!("swap_buffers failed: {e}");
        }
    }

    /// Hide the cursor and keep it inside the window, or undo that.
    ///
    /// Mouse-look reads absolute cursor positions, so only confinement is
    /// requested. A locked cursor stops reporting movement.
    pub fn set_cursor_captured(&self, captured: bool) {
        let mode = grab_mode(captured);
        if let Err(e) = self.window.set_cursor_grab(mode) {
            log::warn!("Cursor grab {mode:?} unavailable, mouse-look may leave the window: {e}");
        }
        self.window.set_cursor_visible(!captured);
    }

    /// Process pending OS events without blocking. Key state is recorded
    /// for polling; pointer and resize events go to `handler`.
    pub fn poll_events(&mut self, handler: &mut dyn InputHandler) {
        let mut pump = EventPump {
            window_id: self.window.id(),
            state: &mut self.state,
            handler: &mut *handler,
        };
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut pump);
        if let PumpStatus::Exit(code) = status {
            log::info!("Event loop exited with code {code}");
            self.state.close_requested = true;
        }

        if let Some(size) = self.state.pending_resize.take() {
            if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                self.gl_surface.resize(&self.gl_context, w, h);
                log::debug!("Framebuffer resized: {}x{}", size.width, size.height);
                handler.resized(size.width, size.height);
            }
        }
    }
}

/// Prefer the config with the most MSAA samples. glutin only calls the
/// picker with a non-empty iterator; it returns an error when nothing matches.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    most_samples(configs, |c| c.num_samples()).expect("display offered no GL configs")
}

fn most_samples<T>(configs: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8) -> Option<T> {
    configs.max_by_key(|c| samples(c))
}

fn grab_mode(captured: bool) -> CursorGrabMode {
    if captured {
        CursorGrabMode::Confined
    } else {
        CursorGrabMode::None
    }
}

struct EventPump<'a> {
    window_id: WindowId,
    state: &'a mut WindowState,
    handler: &'a mut dyn InputHandler,
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if id != self.window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested.");
                self.state.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                self.state.pending_resize = Some(size);
            }
            WindowEvent::Focused(false) => {
                self.state.keys.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                self.state.keys.apply(code, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handler.cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.handler.cursor_left();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                };
                self.handler.scrolled(y);
            }
            _ => {}
        }
    }
}
