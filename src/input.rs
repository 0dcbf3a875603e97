//! Keyboard and mouse mapping onto the focus input events.
//!
//! `InputMappingPlugin` reads Bevy's input resources once per frame in
//! [`FocusSystems::Input`] and triggers [`MoveInput`], [`LookInput`],
//! [`ToggleFocus`] and [`CycleFocusTarget`]. Hosts with their own input
//! layer can skip this plugin and trigger the events directly.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

use crate::constants::SCROLL_PIXELS_PER_STEP;
use crate::plugin::{CycleFocusTarget, FocusSystems, LookInput, MoveInput, ToggleFocus};

/// Directional key states for character movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "This struct represents the pressed state of exactly four directional keys."
)]
pub struct MoveKeys {
    /// Whether a "forward" key (W or `ArrowUp`) is pressed.
    pub forward: bool,
    /// Whether a "back" key (S or `ArrowDown`) is pressed.
    pub back: bool,
    /// Whether a "left" key (A or `ArrowLeft`) is pressed.
    pub left: bool,
    /// Whether a "right" key (D or `ArrowRight`) is pressed.
    pub right: bool,
}

/// Computes a normalized movement axis from the given key states.
///
/// Returns `Vec2::ZERO` if no movement keys are pressed or opposing keys
/// cancel. Diagonals are normalized so they are no faster than a single
/// direction.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec2;
/// use soulslike::input::{compute_move_axis, MoveKeys};
///
/// let axis = compute_move_axis(MoveKeys { forward: true, ..Default::default() });
/// assert_eq!(axis, Vec2::Y);
///
/// let diagonal = compute_move_axis(MoveKeys { forward: true, right: true, ..Default::default() });
/// assert!((diagonal.length() - 1.0).abs() < 0.001);
/// ```
#[must_use]
pub fn compute_move_axis(keys: MoveKeys) -> Vec2 {
    /// Maps a negative/positive key pair to an axis value.
    const fn axis(neg: bool, pos: bool) -> f32 {
        match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    let raw = Vec2::new(axis(keys.left, keys.right), axis(keys.back, keys.forward));
    raw.normalize_or_zero()
}

/// Turns wheel deltas into discrete target steps.
///
/// Line-unit wheels report one notch per frame and map straight through.
/// Pixel-unit devices such as touchpads stream small deltas for the whole
/// gesture; those are summed and released one step per
/// [`SCROLL_PIXELS_PER_STEP`] of travel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSteps {
    pending_pixels: f32,
}

impl ScrollSteps {
    /// Feeds one frame of vertical scroll and returns the step to emit,
    /// if any.
    pub const fn feed(&mut self, unit: MouseScrollUnit, delta: f32) -> Option<f32> {
        if delta == 0.0 || !delta.is_finite() {
            return None;
        }
        match unit {
            MouseScrollUnit::Line => {
                self.pending_pixels = 0.0;
                Some(delta)
            }
            MouseScrollUnit::Pixel => {
                if self.pending_pixels * delta < 0.0 {
                    self.pending_pixels = 0.0;
                }
                self.pending_pixels += delta;
                if self.pending_pixels.abs() < SCROLL_PIXELS_PER_STEP {
                    return None;
                }
                let step = self.pending_pixels.signum();
                self.pending_pixels -= step * SCROLL_PIXELS_PER_STEP;
                Some(step)
            }
        }
    }
}

/// Reads the keyboard and mouse and triggers the matching focus events.
///
/// WASD or the arrow keys move, mouse motion looks, `Tab` or the middle
/// mouse button toggles focus and the wheel cycles targets.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn map_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut wheel: Local<ScrollSteps>,
    mut commands: Commands,
) {
    let keys = MoveKeys {
        forward: keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp),
        back: keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown),
        left: keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft),
        right: keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight),
    };
    let axis = compute_move_axis(keys);
    if axis != Vec2::ZERO {
        commands.trigger(MoveInput { axis });
    }

    if motion.delta != Vec2::ZERO {
        commands.trigger(LookInput {
            delta: motion.delta,
        });
    }

    if keyboard.just_pressed(KeyCode::Tab) || mouse.just_pressed(MouseButton::Middle) {
        commands.trigger(ToggleFocus);
    }

    if let Some(step) = wheel.feed(scroll.unit, scroll.delta.y) {
        commands.trigger(CycleFocusTarget { scroll: step });
    }
}

/// Plugin mapping device input onto the focus events.
///
/// Requires Bevy's `InputPlugin`.
#[derive(Debug, Default)]
pub struct InputMappingPlugin;

impl Plugin for InputMappingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, map_input_system.in_set(FocusSystems::Input));
    }
}
