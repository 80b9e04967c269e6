//! Orbital camera trajectory around a fixed target.
//!
//! The camera moves on a circle of radius `R` in the XZ plane, centered on
//! [`OrbitParameters::origin`], with a small vertical bob of amplitude `A`
//! following `cos θ`. The up vector is rolled about the viewing axis by
//! `A·cos θ / R` radians to counter the bob.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera_state::CameraPose;

/// Fixed description of the orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitParameters {
    /// Look-at target, constant for every angle.
    pub center: Vec3,
    /// Center of the orbit circle. Offset from `center` so the circle is
    /// displaced from the look-at point.
    pub origin: Vec3,
    /// Orbit radius.
    pub radius: f32,
    /// Amplitude of the vertical bob.
    pub inclination_amplitude: f32,
    /// Angular step between captures, in degrees.
    pub step_degrees: u32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Default for OrbitParameters {
    fn default() -> Self {
        Self {
            center: Vec3::new(-4.0, -5.0, 5.0),
            origin: Vec3::new(-4.0, -9.0, 5.0),
            radius: 100.0,
            inclination_amplitude: 1.0,
            step_degrees: 10,
            fov_y: 0.2,
        }
    }
}

impl OrbitParameters {
    /// Camera position at `angle_degrees`.
    #[must_use]
    pub fn position_at(&self, angle_degrees: f32) -> Vec3 {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        self.origin
            + Vec3::new(
                self.radius * cos,
                -self.inclination_amplitude * cos,
                self.radius * sin,
            )
    }

    /// Roll applied to the up vector at `angle_degrees`, in radians.
    ///
    /// Depends on the angle only through `cos θ`.
    #[must_use]
    pub fn tilt_at(&self, angle_degrees: f32) -> f32 {
        self.inclination_amplitude * angle_degrees.to_radians().cos() / self.radius
    }

    /// Full camera pose at `angle_degrees`.
    ///
    /// Pure and deterministic. The angle is used as given; callers enumerate
    /// angles in `0..360`.
    #[must_use]
    pub fn pose_at(&self, angle_degrees: f32) -> CameraPose {
        let position = self.position_at(angle_degrees);
        let target = self.center;
        let base_up = Vec3::NEG_Y;

        let axis = (target - position).normalize_or_zero();
        let up = if axis == Vec3::ZERO {
            base_up
        } else {
            (Quat::from_axis_angle(axis, self.tilt_at(angle_degrees)) * base_up).normalize()
        };

        CameraPose {
            position,
            target,
            up,
            fov_y: self.fov_y,
        }
    }

    /// Capture angles: `0, step, 2·step, …` strictly below 360.
    pub fn angles(&self) -> impl Iterator<Item = u32> {
        (0..360).step_by(self.step_degrees.max(1) as usize)
    }

    /// Number of capture angles.
    #[must_use]
    pub fn angle_count(&self) -> usize {
        self.angles().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_default_orbit_has_36_angles() {
        let orbit = OrbitParameters::default();
        let angles: Vec<u32> = orbit.angles().collect();
        assert_eq!(angles.len(), 36);
        assert_eq!(angles.first(), Some(&0));
        assert_eq!(angles.last(), Some(&350));
    }

    #[test]
    fn test_positions_match_closed_form() {
        let orbit = OrbitParameters::default();
        for angle in orbit.angles() {
            let theta = (angle as f32).to_radians();
            let expected = Vec3::new(
                -4.0 + 100.0 * theta.cos(),
                -9.0 - theta.cos(),
                5.0 + 100.0 * theta.sin(),
            );
            let pose = orbit.pose_at(angle as f32);
            assert!(
                pose.position.abs_diff_eq(expected, EPS),
                "angle {angle}: {:?} != {expected:?}",
                pose.position
            );
            assert_eq!(pose.target, orbit.center);
            assert_eq!(pose.fov_y, orbit.fov_y);
        }
    }

    #[test]
    fn test_up_at_quarter_turn_is_untilted() {
        // cos(90°) = 0, so no roll
        let orbit = OrbitParameters::default();
        let pose = orbit.pose_at(90.0);
        assert!(pose.up.abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn test_up_rotation_angle_equals_tilt() {
        let orbit = OrbitParameters::default();
        for angle in orbit.angles() {
            let pose = orbit.pose_at(angle as f32);
            let rolled = pose.up.angle_between(Vec3::NEG_Y);
            let tilt = orbit.tilt_at(angle as f32).abs();
            // The base up is nearly perpendicular to the viewing axis, so the
            // roll angle is seen almost unchanged between the two vectors.
            assert!((rolled - tilt).abs() < 1e-3, "angle {angle}");
        }
    }

    #[test]
    fn test_tilt_symmetry() {
        let orbit = OrbitParameters::default();
        for angle in orbit.angles() {
            let a = angle as f32;
            assert!((orbit.tilt_at(a) - orbit.tilt_at(360.0 - a)).abs() < 1e-6);
            assert!((orbit.tilt_at(a) + orbit.tilt_at(180.0 - a)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_custom_step() {
        let orbit = OrbitParameters {
            step_degrees: 45,
            ..OrbitParameters::default()
        };
        let angles: Vec<u32> = orbit.angles().collect();
        assert_eq!(angles, vec![0, 45, 90, 135, 180, 225, 270, 315]);
        assert_eq!(orbit.angle_count(), 8);
    }

    proptest! {
        #[test]
        fn prop_up_is_unit(angle in -720.0f32..720.0) {
            let pose = OrbitParameters::default().pose_at(angle);
            prop_assert!((pose.up.length() - 1.0).abs() < 1e-4);
        }

        #[test]
        fn prop_horizontal_distance_is_radius(angle in 0.0f32..360.0) {
            let orbit = OrbitParameters::default();
            let offset = orbit.pose_at(angle).position - orbit.origin;
            let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
            prop_assert!((horizontal - orbit.radius).abs() < 1e-2);
        }

        #[test]
        fn prop_pose_is_deterministic(angle in 0.0f32..360.0) {
            let orbit = OrbitParameters::default();
            prop_assert_eq!(orbit.pose_at(angle), orbit.pose_at(angle));
        }
    }
}
