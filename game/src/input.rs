use macroquad::prelude::*;
use shared::{InputFrame, SkillKind, Vec2};

use crate::render::Camera;

/// Reduces raw keyboard and mouse state to the normalized per-frame input
/// record the session consumes. Casts are edge-triggered (one per press),
/// the movement vector is normalized, and the pointer is converted to
/// world coordinates through the camera.
pub struct InputCapture {
    lock_on: bool,
    drag_origin: Option<(f32, f32)>,
}

impl InputCapture {
    pub fn new() -> Self {
        Self {
            lock_on: false,
            drag_origin: None,
        }
    }

    pub fn lock_on(&self) -> bool {
        self.lock_on
    }

    pub fn update(&mut self, camera: &Camera) -> InputFrame {
        let right = is_key_down(KeyCode::D) || is_key_down(KeyCode::Right);
        let left = is_key_down(KeyCode::A) || is_key_down(KeyCode::Left);
        let down = is_key_down(KeyCode::S) || is_key_down(KeyCode::Down);
        let up = is_key_down(KeyCode::W) || is_key_down(KeyCode::Up);
        let movement = Vec2::dir(
            (right as i32 - left as i32) as f32,
            (down as i32 - up as i32) as f32,
        );

        if is_key_pressed(KeyCode::Tab) {
            self.lock_on = !self.lock_on;
        }

        let cast = if is_key_pressed(KeyCode::Space) {
            Some(SkillKind::A)
        } else if is_key_pressed(KeyCode::Q) {
            Some(SkillKind::Q)
        } else if is_key_pressed(KeyCode::E) {
            Some(SkillKind::E)
        } else {
            None
        };

        // holding the right button supplies an explicit aim vector from the
        // press point to the current pointer
        let (px, py) = mouse_position();
        if is_mouse_button_pressed(MouseButton::Right) {
            self.drag_origin = Some((px, py));
        }
        if is_mouse_button_released(MouseButton::Right) {
            self.drag_origin = None;
        }
        let drag = self
            .drag_origin
            .map(|(ox, oy)| Vec2::new(px - ox, py - oy));

        InputFrame {
            mx: movement.x,
            mz: movement.z,
            cast,
            drag,
            lock_on: self.lock_on,
            pointer: camera.to_world(px, py),
        }
    }
}

impl Default for InputCapture {
    fn default() -> Self {
        Self::new()
    }
}
