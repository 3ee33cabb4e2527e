//! # void_math - Frame Math for Snapping
//!
//! Small, dependency-free 3D primitives for direct-manipulation tools:
//! vectors, quaternions, oriented frames, rays and the handful of
//! intersection tests the snapping engine needs.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod vector;
pub mod quaternion;
pub mod frame;
pub mod ray;
pub mod intersect;

pub use vector::*;
pub use quaternion::*;
pub use frame::*;
pub use ray::*;
pub use intersect::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

pub mod prelude {
    pub use crate::vector::Vec3;
    pub use crate::quaternion::Quat;
    pub use crate::frame::Frame3;
    pub use crate::ray::Ray;
    pub use crate::intersect::{ray_sphere_at, ray_segment_closest, RaySegmentHit};
    pub use crate::{radians, degrees};
}
