//! 3D rays
//!
//! Rays come from the mouse cursor, a touch point, or a tracked spatial
//! controller. They are tested against snap features in world space.

use crate::frame::Frame3;
use crate::vector::Vec3;

/// Half-line with a unit direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Always unit length when built through [`Ray::new`]
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray starting at `eye` and passing through `target`
    #[inline]
    pub fn through(eye: Vec3, target: Vec3) -> Self {
        Self::new(eye, target - eye)
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray parameter of the point closest to `point`, clamped to the half-line
    #[inline]
    pub fn project(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction).max(0.0)
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        self.at(self.project(point))
    }

    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        point.distance(self.closest_point(point))
    }

    /// Re-express the ray relative to `frame`
    pub fn to_frame(&self, frame: &Frame3) -> Self {
        Self::new(frame.to_frame_point(self.origin), frame.to_frame_vector(self.direction))
    }

    /// Lift a ray expressed relative to `frame` into the frame's parent space
    pub fn from_frame(&self, frame: &Frame3) -> Self {
        Self::new(frame.from_frame_point(self.origin), frame.from_frame_vector(self.direction))
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > 1e-10 && self.origin.is_finite()
    }
}
