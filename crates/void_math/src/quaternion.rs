//! Unit quaternion rotations

use crate::vector::Vec3;
use core::ops::Mul;

/// Rotation in 3D, stored as a unit quaternion
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis` (normalized here)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        let axis = axis.normalize() * sin;
        Self::new(axis.x, axis.y, axis.z, cos)
    }

    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::X, angle)
    }

    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::Y, angle)
    }

    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::Z, angle)
    }

    /// Shortest-arc rotation taking direction `from` onto direction `to`
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let from = from.normalize();
        let to = to.normalize();
        let cos = from.dot(to);

        if cos > 0.99999 {
            return Self::IDENTITY;
        }
        if cos < -0.99999 {
            // antiparallel: half turn about any perpendicular
            return Self::from_axis_angle(from.any_orthonormal(), core::f32::consts::PI);
        }

        let axis = from.cross(to);
        let w = 1.0 + cos;
        Self::new(axis.x, axis.y, axis.z, w).normalize()
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit length; a degenerate quaternion becomes the identity
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len <= 0.0 {
            return Self::IDENTITY;
        }
        Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
    }

    /// Inverse rotation of a unit quaternion
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Angle (radians) of the rotation taking `self` onto `other`
    pub fn angle_between(self, other: Self) -> f32 {
        let d = self.normalize().dot(other.normalize()).abs().min(1.0);
        2.0 * d.acos()
    }

    /// Rotate a vector
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Same rotation, compared within `eps` (q and -q are equal)
    pub fn abs_diff_eq(self, other: Self, eps: f32) -> bool {
        1.0 - self.normalize().dot(other.normalize()).abs() <= eps
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Hamilton product: `a * b` applies `b` first, then `a`
impl Mul for Quat {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.rotate(v)
    }
}
