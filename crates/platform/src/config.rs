//! Runtime configuration for the window and the render loop.

use std::path::PathBuf;

use renderer::SceneKind;

#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Requested OpenGL core-profile version.
    pub gl_version: (u8, u8),
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            title: "Hello OpenGL".to_string(),
            gl_version: (3, 3),
            vsync: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub window: WindowConfig,
    pub scene: SceneKind,
    pub shader_dir: PathBuf,
    pub show_fps: bool,
    /// Hide and confine the cursor for mouse-look.
    pub capture_cursor: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            scene: SceneKind::default(),
            shader_dir: PathBuf::from("assets/shaders"),
            show_fps: false,
            capture_cursor: true,
        }
    }
}
