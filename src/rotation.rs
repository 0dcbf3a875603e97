//! View orientation maths.
//!
//! [`ViewRotation`] is the yaw/pitch/roll triple used for the controller's
//! aim. The world is Y-up and a zero rotation looks down `-Z`, matching
//! Bevy's camera convention. All angles are radians.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Quat, Vec3};

/// Controller aim orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewRotation {
    /// Rotation about the world up axis. Positive turns left.
    pub yaw: f32,
    /// Elevation above the horizon. Positive looks up.
    pub pitch: f32,
    /// Rotation about the view axis.
    pub roll: f32,
}

impl ViewRotation {
    /// Looks down `-Z` with no elevation or roll.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a rotation from its three angles.
    #[must_use]
    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Unit vector the rotation looks along.
    ///
    /// # Examples
    ///
    /// ```
    /// use soulslike::rotation::ViewRotation;
    ///
    /// let forward = ViewRotation::IDENTITY.forward();
    /// assert!((forward.z + 1.0).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn forward(self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Drops pitch and roll, keeping only the heading.
    #[must_use]
    pub const fn yaw_only(self) -> Self {
        Self::new(self.yaw, 0.0, 0.0)
    }

    /// Rotation that looks from `from` towards `to` with zero roll.
    ///
    /// Returns [`ViewRotation::IDENTITY`] when the points coincide. Looking
    /// straight up or down yields a zero yaw.
    #[must_use]
    pub fn look_at(from: Vec3, to: Vec3) -> Self {
        let Some(direction) = (to - from).try_normalize() else {
            return Self::IDENTITY;
        };
        let horizontal = direction.x.hypot(direction.z);
        let pitch = direction.y.atan2(horizontal);
        let yaw = if horizontal > f32::EPSILON {
            (-direction.x).atan2(-direction.z)
        } else {
            0.0
        };
        Self::new(yaw, pitch, 0.0)
    }

    /// Wraps every axis into `(-PI, PI]`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(wrap_angle(self.yaw), wrap_angle(self.pitch), wrap_angle(self.roll))
    }

    /// Shortest signed per-axis difference from `self` to `target`.
    #[must_use]
    pub fn delta_to(self, target: Self) -> Self {
        Self::new(
            wrap_angle(target.yaw - self.yaw),
            wrap_angle(target.pitch - self.pitch),
            wrap_angle(target.roll - self.roll),
        )
    }

    /// Largest per-axis angle between the two rotations.
    #[must_use]
    pub fn angular_distance(self, other: Self) -> f32 {
        let delta = self.delta_to(other);
        delta.yaw.abs().max(delta.pitch.abs()).max(delta.roll.abs())
    }

    /// Frame-rate independent smoothing towards `target`.
    ///
    /// Each axis moves along its shortest arc by
    /// `1 - exp(-speed * delta_seconds)` of the remaining difference. A
    /// non-positive `speed` snaps to the target; a non-positive
    /// `delta_seconds` leaves the rotation unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use soulslike::rotation::ViewRotation;
    ///
    /// let current = ViewRotation::IDENTITY;
    /// let target = ViewRotation::new(1.0, 0.0, 0.0);
    /// let next = current.interp_to(target, 0.1, 10.0);
    /// assert!(next.yaw > 0.0 && next.yaw < 1.0);
    /// ```
    #[must_use]
    pub fn interp_to(self, target: Self, delta_seconds: f32, speed: f32) -> Self {
        if delta_seconds <= 0.0 {
            return self;
        }
        if speed <= 0.0 {
            return target.normalized();
        }

        let alpha = smoothing_alpha(speed, delta_seconds);
        let delta = self.delta_to(target);
        Self::new(
            self.yaw + delta.yaw * alpha,
            self.pitch + delta.pitch * alpha,
            self.roll + delta.roll * alpha,
        )
        .normalized()
    }

    /// Equivalent quaternion (yaw, then pitch, then roll).
    #[must_use]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }
}

/// Wraps an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Blend factor for exponential smoothing over `delta_seconds`.
#[must_use]
pub fn smoothing_alpha(speed: f32, delta_seconds: f32) -> f32 {
    1.0 - (-speed * delta_seconds).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    #[rstest]
    #[case::ahead(Vec3::new(0.0, 0.0, -10.0))]
    #[case::left(Vec3::new(-10.0, 0.0, 0.0))]
    #[case::behind_above(Vec3::new(3.0, 4.0, 12.0))]
    #[case::below(Vec3::new(1.0, -7.0, -2.0))]
    fn look_at_points_forward_at_target(#[case] target: Vec3) {
        let origin = Vec3::new(5.0, 1.0, -2.0);
        let rotation = ViewRotation::look_at(origin, origin + target);
        let expected = target.normalize();
        let forward = rotation.forward();
        assert_relative_eq!(forward.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(forward.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(forward.z, expected.z, epsilon = 1e-5);
        assert_relative_eq!(rotation.roll, 0.0);
    }

    #[test]
    fn look_at_same_point_is_identity() {
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(ViewRotation::look_at(point, point), ViewRotation::IDENTITY);
    }

    #[test]
    fn look_straight_up_has_zero_yaw() {
        let rotation = ViewRotation::look_at(Vec3::ZERO, Vec3::Y * 5.0);
        assert_relative_eq!(rotation.pitch, FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(rotation.yaw, 0.0);
    }

    #[test]
    fn quaternion_matches_forward() {
        let rotation = ViewRotation::new(0.7, -0.3, 0.0);
        let by_quat = rotation.to_quat() * Vec3::NEG_Z;
        let forward = rotation.forward();
        assert!((by_quat - forward).length() < 1e-5, "{by_quat:?} vs {forward:?}");
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(PI, PI)]
    #[case(-PI, PI)]
    #[case(TAU + 0.5, 0.5)]
    #[case(-TAU - 0.5, -0.5)]
    fn wrap_angle_lands_in_half_open_range(#[case] angle: f32, #[case] expected: f32) {
        assert_relative_eq!(wrap_angle(angle), expected, epsilon = 1e-5);
    }

    #[test]
    fn interp_takes_the_short_way_round() {
        let current = ViewRotation::new(PI - 0.1, 0.0, 0.0);
        let target = ViewRotation::new(-PI + 0.1, 0.0, 0.0);
        let next = current.interp_to(target, 1.0, 50.0);
        // Crossing the seam: the result sits near +/-PI, never near zero.
        assert!(next.yaw.abs() > PI - 0.11, "went the long way: {next:?}");
    }

    #[test]
    fn interp_with_zero_delta_keeps_current() {
        let current = ViewRotation::new(0.2, 0.1, 0.0);
        let target = ViewRotation::new(1.0, 0.5, 0.0);
        assert_eq!(current.interp_to(target, 0.0, 10.0), current);
    }

    #[test]
    fn interp_with_zero_speed_snaps() {
        let current = ViewRotation::IDENTITY;
        let target = ViewRotation::new(1.0, 0.5, 0.0);
        let snapped = current.interp_to(target, 0.016, 0.0);
        assert_relative_eq!(snapped.yaw, target.yaw);
        assert_relative_eq!(snapped.pitch, target.pitch);
        assert_relative_eq!(snapped.roll, target.roll);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::small(1.0)]
    #[case::negative(-2.5)]
    #[case::upper_bound(PI)]
    fn wrap_leaves_in_range_angles_untouched(#[case] angle: f32) {
        assert_eq!(wrap_angle(angle).to_bits(), angle.to_bits());
    }

    #[test]
    fn interp_is_frame_rate_independent() {
        let start = ViewRotation::IDENTITY;
        let target = ViewRotation::new(1.2, -0.4, 0.0);

        let single = start.interp_to(target, 0.1, 10.0);
        let mut split = start;
        for _ in 0..10 {
            split = split.interp_to(target, 0.01, 10.0);
        }

        assert_relative_eq!(single.yaw, split.yaw, epsilon = 1e-4);
        assert_relative_eq!(single.pitch, split.pitch, epsilon = 1e-4);
    }

    #[test]
    fn smoothing_alpha_is_a_fraction() {
        let alpha = smoothing_alpha(10.0, 1.0 / 60.0);
        assert!(alpha > 0.0 && alpha < 1.0);
        assert_relative_eq!(smoothing_alpha(10.0, 0.0), 0.0);
    }
}
