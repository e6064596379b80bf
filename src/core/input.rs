//! Per-frame input state consumed by the selection and height-edit tools

use crate::core::types::{Mat4, Vec3};
use crate::math::Ray;

/// Keyboard modifier state sampled for the current frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true };
}

/// Tracks a single mouse button across frames and derives
/// pressed/released transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    down: bool,
    just_pressed: bool,
    just_released: bool,
}

impl ButtonState {
    /// Create a released button
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the raw held state for this frame
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.down;
        self.just_released = !down && self.down;
        self.down = down;
    }

    /// Check if the button is held this frame
    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Check if the button went down this frame
    pub fn just_pressed(&self) -> bool {
        self.just_pressed
    }

    /// Check if the button went up this frame
    pub fn just_released(&self) -> bool {
        self.just_released
    }
}

/// Everything the editor shell hands to the core for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    /// World-space ray under the mouse cursor
    pub mouse_ray: Ray,
    /// Modifier keys
    pub modifiers: Modifiers,
    /// Left mouse button
    pub button: ButtonState,
    /// Whether the map viewport has the mouse
    pub hovered: bool,
    /// Camera view matrix, used to orient drag planes
    pub view: Mat4,
    /// Distance from camera to its target, used to lift overlay geometry
    pub camera_distance: f32,
}

impl FrameInput {
    /// Create input for a hovered viewport with no buttons or modifiers held
    pub fn new(mouse_ray: Ray, view: Mat4) -> Self {
        Self {
            mouse_ray,
            modifiers: Modifiers::NONE,
            button: ButtonState::new(),
            hovered: true,
            view,
            camera_distance: 100.0,
        }
    }

    /// Set modifiers (builder pattern)
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set button state (builder pattern)
    pub fn with_button(mut self, button: ButtonState) -> Self {
        self.button = button;
        self
    }

    /// Camera forward axis expressed through the view matrix.
    ///
    /// This is the view-space image of world +Z, the vector the drag plane
    /// is built from.
    pub fn view_axis(&self) -> Vec3 {
        self.view.transform_vector3(Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_transitions() {
        let mut button = ButtonState::new();
        assert!(!button.is_down());

        button.update(true);
        assert!(button.is_down());
        assert!(button.just_pressed());
        assert!(!button.just_released());

        button.update(true);
        assert!(button.is_down());
        assert!(!button.just_pressed());

        button.update(false);
        assert!(!button.is_down());
        assert!(button.just_released());

        button.update(false);
        assert!(!button.just_released());
    }

    #[test]
    fn test_view_axis_identity() {
        let input = FrameInput::new(Ray::new(Vec3::ZERO, Vec3::NEG_Y), Mat4::IDENTITY);
        assert_eq!(input.view_axis(), Vec3::Z);
    }
}
