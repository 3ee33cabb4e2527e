//! Oriented frames: an origin plus a rotation
//!
//! A `Frame3` is the unit of rigid positioning used by the snapping code.
//! Frames nest: `parent.from_frame(local)` lifts a frame expressed relative to
//! `parent` into the space `parent` itself lives in, and `to_frame` undoes it.

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// Origin and orientation in some coordinate space
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame3 {
    pub origin: Vec3,
    pub rotation: Quat,
}

impl Frame3 {
    /// Identity frame
    pub const IDENTITY: Self = Self {
        origin: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    pub const fn new(origin: Vec3, rotation: Quat) -> Self {
        Self { origin, rotation }
    }

    #[inline]
    pub fn from_origin(origin: Vec3) -> Self {
        Self::new(origin, Quat::IDENTITY)
    }

    /// Frame at `origin` whose axis `axis_index` points along `direction`
    pub fn from_axis(origin: Vec3, direction: Vec3, axis_index: usize) -> Self {
        Self::new(
            origin,
            Quat::from_rotation_arc(Vec3::axis(axis_index), direction),
        )
    }

    #[inline]
    pub fn x(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    #[inline]
    pub fn y(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    #[inline]
    pub fn z(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    #[inline]
    pub fn axis(&self, index: usize) -> Vec3 {
        self.rotation * Vec3::axis(index)
    }

    #[inline]
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn translated(mut self, delta: Vec3) -> Self {
        self.origin = self.origin + delta;
        self
    }

    /// Apply `q` as a rotation in the parent space; the origin stays put
    #[inline]
    pub fn rotated(mut self, q: Quat) -> Self {
        self.rotation = (q * self.rotation).normalize();
        self
    }

    /// Rotate about one of this frame's own axes (radians)
    pub fn rotated_about_axis(mut self, angle: f32, axis_index: usize) -> Self {
        let q = Quat::from_axis_angle(Vec3::axis(axis_index), angle);
        self.rotation = (self.rotation * q).normalize();
        self
    }

    #[inline]
    pub fn from_frame_point(&self, p: Vec3) -> Vec3 {
        self.origin + self.rotation * p
    }

    #[inline]
    pub fn to_frame_point(&self, p: Vec3) -> Vec3 {
        self.rotation.conjugate() * (p - self.origin)
    }

    #[inline]
    pub fn from_frame_vector(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }

    #[inline]
    pub fn to_frame_vector(&self, v: Vec3) -> Vec3 {
        self.rotation.conjugate() * v
    }

    /// Interpret `local` as expressed relative to `self`; return it in `self`'s parent space
    pub fn from_frame(&self, local: &Frame3) -> Frame3 {
        Frame3::new(
            self.from_frame_point(local.origin),
            (self.rotation * local.rotation).normalize(),
        )
    }

    /// Express `f` (in `self`'s parent space) relative to `self`
    pub fn to_frame(&self, f: &Frame3) -> Frame3 {
        let inv = self.rotation.conjugate();
        Frame3::new(
            inv * (f.origin - self.origin),
            (inv * f.rotation).normalize(),
        )
    }

    /// Rotate `source` by the least angle so its axes coincide with a signed
    /// permutation of `target`'s axes. The origin of `source` is kept.
    pub fn solve_min_rotation(source: &Frame3, target: &Frame3) -> Frame3 {
        // best-aligned (source axis, target axis) pair
        let mut best_i = 0;
        let mut best_j = 0;
        let mut max_abs = -1.0_f32;
        let mut sign = 1.0_f32;
        for i in 0..3 {
            for j in 0..3 {
                let d = source.axis(i).dot(target.axis(j));
                if d.abs() > max_abs {
                    max_abs = d.abs();
                    sign = if d < 0.0 { -1.0 } else { 1.0 };
                    best_i = i;
                    best_j = j;
                }
            }
        }
        let first = source.rotated(Quat::from_rotation_arc(
            source.axis(best_i),
            target.axis(best_j) * sign,
        ));

        // spin about the now-aligned axis to line up a second one
        let next = first.axis((best_i + 1) % 3);
        let mut best_k = (best_j + 1) % 3;
        let mut max_abs = -1.0_f32;
        let mut sign = 1.0_f32;
        for k in (0..3).filter(|&k| k != best_j) {
            let d = next.dot(target.axis(k));
            if d.abs() > max_abs {
                max_abs = d.abs();
                sign = if d < 0.0 { -1.0 } else { 1.0 };
                best_k = k;
            }
        }
        let second = first.rotated(Quat::from_rotation_arc(next, target.axis(best_k) * sign));

        Frame3::new(source.origin, second.rotation)
    }

    /// Same origin and orientation within `eps`
    pub fn abs_diff_eq(&self, other: &Frame3, eps: f32) -> bool {
        self.origin.abs_diff_eq(other.origin, eps) && self.rotation.abs_diff_eq(other.rotation, eps)
    }
}

impl Default for Frame3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
