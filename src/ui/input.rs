use crate::scene::camera::CameraInput;
use minifb::{Key, MouseButton, MouseMode, Window};

/// Polls the window each frame and condenses keyboard/mouse state into a
/// [`CameraInput`]. Mouse look is active while the left button is held;
/// the drag anchor resets on release so the view never jumps.
pub struct CameraController {
    last_mouse_pos: Option<(f32, f32)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            last_mouse_pos: None,
        }
    }

    pub fn poll(&mut self, window: &Window) -> CameraInput {
        let mut input = CameraInput {
            forward: window.is_key_down(Key::W),
            backward: window.is_key_down(Key::S),
            left: window.is_key_down(Key::A),
            right: window.is_key_down(Key::D),
            up: window.is_key_down(Key::Space),
            down: window.is_key_down(Key::LeftShift),
            look: None,
        };

        if window.get_mouse_down(MouseButton::Left) {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) {
                if let Some((last_x, last_y)) = self.last_mouse_pos {
                    input.look = Some((x - last_x, y - last_y));
                }
                self.last_mouse_pos = Some((x, y));
            }
        } else {
            self.last_mouse_pos = None;
        }

        input
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
