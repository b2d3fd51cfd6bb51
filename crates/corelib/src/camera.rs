use crate::{Mat4, Vec3};

/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT_DEG: f32 = 89.0;
pub const ZOOM_MIN_DEG: f32 = 1.0;
pub const ZOOM_MAX_DEG: f32 = 45.0;

pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Direction requested by a movement key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-fly camera driven by yaw/pitch (degrees).
///
/// `front`, `right` and `up` are derived from `yaw`, `pitch` and `world_up`
/// and are only ever written by `update_vectors`.
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,

    yaw: f32,
    pitch: f32,

    pub speed: f32,
    pub sensitivity: f32,
    zoom: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            speed: 5.0,
            sensitivity: 0.1,
            zoom: ZOOM_MAX_DEG,
        };
        camera.update_vectors();
        camera
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Look-at from `position` towards `position + front`.
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// OpenGL-style projection (z in [-1, 1]) using the current zoom.
    #[inline]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect.max(1e-6), Z_NEAR, Z_FAR)
    }

    /// Move along the front/right basis by `speed * dt`.
    /// Call once per held key; simultaneous keys simply accumulate.
    pub fn process_keyboard(&mut self, movement: CameraMovement, dt: f32) {
        let step = self.speed * dt;
        match movement {
            CameraMovement::Forward => self.position += self.front * step,
            CameraMovement::Backward => self.position -= self.front * step,
            CameraMovement::Left => self.position -= self.right * step,
            CameraMovement::Right => self.position += self.right * step,
        }
    }

    /// Apply a cursor delta in pixels. `y_offset` is positive when looking up.
    pub fn process_mouse(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.sensitivity;
        self.pitch = (self.pitch + y_offset * self.sensitivity)
            .clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        self.update_vectors();
    }

    /// Scroll zoom: positive `y_offset` narrows the field of view.
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_MIN_DEG, ZOOM_MAX_DEG);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());

        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FlyCamera {
    /// Camera at (0, 0, 3) looking down -Z.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, -90.0, 0.0)
    }
}
