//! Keyboard state and the cursor/scroll callback seam.

use std::collections::HashSet;

use corelib::CameraMovement;
use winit::keyboard::KeyCode;

/// Receives pointer and resize notifications while events are pumped.
pub trait InputHandler {
    /// Raw cursor position in physical pixels, origin top-left.
    fn cursor_moved(&mut self, x: f64, y: f64);
    fn cursor_left(&mut self) {}
    /// Vertical scroll in lines; positive away from the user.
    fn scrolled(&mut self, _y: f32) {}
    fn resized(&mut self, _width: u32, _height: u32) {}
}

/// Keys held down right now, for polling.
#[derive(Debug, Default)]
pub struct KeyboardState {
    down: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn apply(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    #[inline]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    /// Forget held keys, e.g. on focus loss so nothing sticks.
    pub fn clear(&mut self) {
        self.down.clear();
    }
}

/// Movement keys polled each frame.
pub const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 8] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
    (KeyCode::ArrowUp, CameraMovement::Forward),
    (KeyCode::ArrowDown, CameraMovement::Backward),
    (KeyCode::ArrowLeft, CameraMovement::Left),
    (KeyCode::ArrowRight, CameraMovement::Right),
];

/// Movements requested by the currently held keys, one entry per key.
pub fn held_movements(keys: &KeyboardState) -> impl Iterator<Item = CameraMovement> + '_ {
    MOVEMENT_KEYS
        .iter()
        .filter(|(key, _)| keys.is_pressed(*key))
        .map(|(_, movement)| *movement)
}
