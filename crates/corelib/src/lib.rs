//! Core types: math re-exports, fly camera, cursor tracking, frame timing.

pub use glam::{Mat4, Vec3, Vec4, vec3};

pub mod camera;
pub mod input;
pub mod time;

pub use camera::{CameraMovement, FlyCamera};
pub use input::CursorTracker;
pub use time::{FpsCounter, FrameClock, FrameTime};

/// Model-view-projection product in the order shaders expect.
#[inline]
pub fn mvp(projection: Mat4, view: Mat4, model: Mat4) -> Mat4 {
    projection * view * model
}
