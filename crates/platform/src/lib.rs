//! Platform layer: the GL window, input plumbing and the render loop.

pub mod config;
pub mod error;
pub mod input;
pub mod render_loop;
pub mod window;

pub use config::{RunConfig, WindowConfig};
pub use error::PlatformError;
pub use input::InputHandler;
pub use render_loop::run_with_renderer;
pub use renderer::SceneKind;
pub use window::GlWindow;
