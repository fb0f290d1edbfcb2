//! Spatial frames and transform interpolation.
//!
//! The photo animator works in the local space of a parent group that the
//! user may be spinning. The conversions here are pure functions of the
//! parent's world pose, kept separate from any scene graph so they can be
//! tested on their own: a world-space target converted with
//! [`ParentFrame::world_to_local_point`] stays glued to the camera no matter
//! how the parent rotates underneath it.

use glam::{Mat3, Quat, Vec3};

/// Default vertical field of view (radians) when the camera does not report
/// one; matches the usual perspective-camera default of 50 degrees.
pub const DEFAULT_FOV_Y: f32 = 50.0 * std::f32::consts::PI / 180.0;

/// Position, orientation and uniform scale of one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Move every component toward `target`: linear for position and scale,
    /// spherical for rotation. `s` is clamped to [0, 1].
    pub fn lerp_to(&mut self, target: &Transform, s: f32) {
        let s = s.clamp(0.0, 1.0);
        self.position = self.position.lerp(target.position, s);
        self.scale += (target.scale - self.scale) * s;
        self.rotation = self.rotation.slerp(target.rotation, s);
    }

    /// Angular distance to another transform's rotation, in radians.
    pub fn angle_to(&self, target: &Transform) -> f32 {
        self.rotation.angle_between(target.rotation)
    }

    /// Positional distance to another transform.
    pub fn distance_to(&self, target: &Transform) -> f32 {
        self.position.distance(target.position)
    }
}

/// World pose of the (possibly spinning) group that owns the photo items.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParentFrame {
    pub position: Vec3,
    pub rotation: Quat,
}

impl ParentFrame {
    /// Express a world-space point in this frame's local coordinates.
    #[inline]
    pub fn world_to_local_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// Express a local-space point in world coordinates.
    #[inline]
    pub fn local_to_world_point(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.position
    }

    /// Convert a desired world-space orientation into this frame's local
    /// space: `local = parent_world_inverse * world`.
    #[inline]
    pub fn world_to_local_rotation(&self, world: Quat) -> Quat {
        self.rotation.inverse() * world
    }
}

/// What the core needs to know about the viewing camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians; `None` falls back to
    /// [`DEFAULT_FOV_Y`] when the zoomed scale is computed.
    pub fov_y: Option<f32>,
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 18.0),
            rotation: Quat::IDENTITY,
            fov_y: None,
        }
    }
}

impl CameraFrame {
    /// The camera's forward direction (looking down its local -Z).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// World point `dist` units straight ahead of the camera.
    #[inline]
    pub fn point_ahead(&self, dist: f32) -> Vec3 {
        self.position + self.forward() * dist
    }

    /// The vertical field of view, defaulted when unreported.
    #[inline]
    pub fn fov_or_default(&self) -> f32 {
        match self.fov_y {
            Some(f) if f.is_finite() && f > 0.0 => f,
            _ => DEFAULT_FOV_Y,
        }
    }

    /// Visible world height at `dist` units ahead: `2 * d * tan(fov / 2)`.
    #[inline]
    pub fn frustum_height_at(&self, dist: f32) -> f32 {
        2.0 * dist * (self.fov_or_default() / 2.0).tan()
    }
}

/// Rotation whose local +Z axis points from `eye` toward `target`.
///
/// Falls back to identity when the two coincide or line up with `up`.
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let forward = target - eye;
    if forward.length_squared() < 1e-10 {
        return Quat::IDENTITY;
    }
    let forward = forward.normalize();
    let right = up.cross(forward);
    if right.length_squared() < 1e-10 {
        // Degenerate up vector; pick any perpendicular basis.
        let alt = if forward.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let right = alt.cross(forward).normalize();
        let adjusted_up = forward.cross(right);
        return Quat::from_mat3(&Mat3::from_cols(right, adjusted_up, forward));
    }
    let right = right.normalize();
    let adjusted_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, adjusted_up, forward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-5
    }

    #[test]
    fn test_world_local_roundtrip() {
        let frame = ParentFrame {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(1.1) * Quat::from_rotation_x(0.4),
        };
        let world = Vec3::new(-4.0, 5.0, 0.5);
        let local = frame.world_to_local_point(world);
        assert!(approx(frame.local_to_world_point(local), world));
    }

    #[test]
    fn test_world_target_stays_fixed_under_parent_spin() {
        // The core promise: converting a fixed world target into a spinning
        // parent's local space and back always lands on the same world point.
        let world_target = Vec3::new(0.0, 1.0, 5.0);
        for i in 0..16 {
            let frame = ParentFrame {
                position: Vec3::ZERO,
                rotation: Quat::from_rotation_y(i as f32 * PI / 8.0),
            };
            let local = frame.world_to_local_point(world_target);
            assert!(approx(frame.local_to_world_point(local), world_target));
        }
    }

    #[test]
    fn test_local_rotation_composes_back_to_world() {
        let frame = ParentFrame {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_y(0.7),
        };
        let world_q = Quat::from_rotation_x(0.3) * Quat::from_rotation_z(1.2);
        let local_q = frame.world_to_local_rotation(world_q);
        let recomposed = frame.rotation * local_q;
        assert!(recomposed.angle_between(world_q) < 1e-5);
    }

    #[test]
    fn test_look_rotation_points_z_at_target() {
        let q = look_rotation(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::Y);
        assert!(approx(q * Vec3::Z, Vec3::X));
    }

    #[test]
    fn test_look_rotation_degenerate_cases() {
        assert_eq!(look_rotation(Vec3::ONE, Vec3::ONE, Vec3::Y), Quat::IDENTITY);
        // Up parallel to the view direction still yields a unit rotation.
        let q = look_rotation(Vec3::ZERO, Vec3::Y * 2.0, Vec3::Y);
        assert!(approx(q * Vec3::Z, Vec3::Y));
    }

    #[test]
    fn test_camera_forward_and_ahead() {
        let cam = CameraFrame {
            position: Vec3::new(0.0, 0.0, 10.0),
            rotation: Quat::IDENTITY,
            fov_y: None,
        };
        assert!(approx(cam.forward(), Vec3::NEG_Z));
        assert!(approx(cam.point_ahead(5.0), Vec3::new(0.0, 0.0, 5.0)));

        let turned = CameraFrame {
            rotation: Quat::from_rotation_y(FRAC_PI_2),
            ..cam
        };
        assert!(approx(turned.forward(), Vec3::NEG_X));
    }

    #[test]
    fn test_fov_fallback() {
        let cam = CameraFrame {
            fov_y: None,
            ..Default::default()
        };
        assert_eq!(cam.fov_or_default(), DEFAULT_FOV_Y);
        let bad = CameraFrame {
            fov_y: Some(f32::NAN),
            ..Default::default()
        };
        assert_eq!(bad.fov_or_default(), DEFAULT_FOV_Y);
        let good = CameraFrame {
            fov_y: Some(1.0),
            ..Default::default()
        };
        assert_eq!(good.fov_or_default(), 1.0);
    }

    #[test]
    fn test_transform_lerp_converges() {
        let mut t = Transform::default();
        let target = Transform {
            position: Vec3::splat(4.0),
            rotation: Quat::from_rotation_y(1.0),
            scale: 3.0,
        };
        for _ in 0..200 {
            t.lerp_to(&target, 0.1);
        }
        assert!(t.distance_to(&target) < 1e-3);
        assert!(t.angle_to(&target) < 1e-3);
        assert!((t.scale - 3.0).abs() < 1e-3);
    }
}
