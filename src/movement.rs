//! Camera-relative movement and free look.
//!
//! Movement input is interpreted in the heading of the controller's aim, so
//! "forward" always walks away from the camera. How the character's body
//! turns depends on the [`OrientationMode`] chosen by the focus controller.

use glam::{Vec2, Vec3};

use crate::focus::OrientationMode;
use crate::rotation::{wrap_angle, ViewRotation};
use crate::settings::CharacterSettings;

/// World-space walking direction for a movement `axis`.
///
/// `axis.y` walks along the aim heading and `axis.x` strafes right. The
/// result is horizontal and no longer than one.
///
/// # Examples
///
/// ```
/// use glam::{Vec2, Vec3};
/// use soulslike::movement::movement_direction;
/// use soulslike::rotation::ViewRotation;
///
/// let forward = movement_direction(ViewRotation::IDENTITY, Vec2::Y);
/// assert!((forward - Vec3::NEG_Z).length() < 1e-6);
/// ```
#[must_use]
pub fn movement_direction(aim: ViewRotation, axis: Vec2) -> Vec3 {
    if axis == Vec2::ZERO || !axis.is_finite() {
        return Vec3::ZERO;
    }
    let forward = aim.yaw_only().forward();
    let right = forward.cross(Vec3::Y);
    (forward * axis.y + right * axis.x).clamp_length_max(1.0)
}

/// Applies free-look input to the aim.
///
/// Positive `delta.x` turns right and positive `delta.y` looks down, as with
/// screen-space mouse motion. Pitch is clamped to the configured limit.
/// Returns `false` without touching `aim` when look input is suppressed.
pub fn apply_look(
    aim: &mut ViewRotation,
    delta: Vec2,
    settings: &CharacterSettings,
    accepts_look: bool,
) -> bool {
    if !accepts_look || delta == Vec2::ZERO || !delta.is_finite() {
        return false;
    }
    let limit = settings.pitch_limit_radians();
    aim.yaw = wrap_angle(aim.yaw - delta.x * settings.look_sensitivity);
    aim.pitch = (aim.pitch - delta.y * settings.look_sensitivity).clamp(-limit, limit);
    true
}

/// Turns `current_yaw` towards `direction` by at most `max_step` radians.
///
/// Directions without a horizontal component leave the yaw unchanged.
#[must_use]
pub fn face_direction(current_yaw: f32, direction: Vec3, max_step: f32) -> f32 {
    if direction.x.hypot(direction.z) <= f32::EPSILON {
        return current_yaw;
    }
    let desired = (-direction.x).atan2(-direction.z);
    let step = wrap_angle(desired - current_yaw).clamp(-max_step, max_step);
    wrap_angle(current_yaw + step)
}

/// Body yaw for this frame under `mode`.
///
/// [`OrientationMode::FaceControllerYaw`] copies the aim heading outright;
/// [`OrientationMode::FaceMovement`] turns towards `direction` at the
/// limited rate.
#[must_use]
pub fn facing_yaw(
    mode: OrientationMode,
    current_yaw: f32,
    aim: ViewRotation,
    direction: Vec3,
    max_step: f32,
) -> f32 {
    match mode {
        OrientationMode::FaceControllerYaw => wrap_angle(aim.yaw),
        OrientationMode::FaceMovement => face_direction(current_yaw, direction, max_step),
    }
}
