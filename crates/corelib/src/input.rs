//! Cursor tracking for mouse-look.

/// Turns absolute cursor positions into per-event deltas.
///
/// The first position after construction (or `reset`) only primes the
/// tracker, so the camera does not jump to wherever the cursor entered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorTracker {
    last: Option<(f64, f64)>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(dx, dy)` with `dy` positive when the cursor moves up.
    pub fn delta(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let previous = self.last.replace((x, y));
        previous.map(|(last_x, last_y)| ((x - last_x) as f32, (last_y - y) as f32))
    }

    /// Forget the last position, e.g. after the cursor left the window.
    pub fn reset(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn is_primed(&self) -> bool {
        self.last.is_some()
    }
}
