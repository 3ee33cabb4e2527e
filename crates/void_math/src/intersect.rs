//! Intersection and closest-approach tests used by snap hit testing
//!
//! - Ray / sphere (snap points are hit through a small view-scaled sphere)
//! - Ray / segment closest approach (snap segments are hit within a tube)

use crate::ray::Ray;
use crate::vector::Vec3;

/// Ray-Sphere intersection with center and radius
///
/// Returns the nearest positive ray parameter, or `None` on a miss. A ray
/// starting inside the sphere reports the exit point.
pub fn ray_sphere_at(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Closest approach between a ray and a segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySegmentHit {
    /// Squared distance between the two closest points
    pub distance_squared: f32,
    /// Ray parameter of the closest point on the ray (>= 0)
    pub ray_t: f32,
    /// Closest point on the segment
    pub segment_point: Vec3,
}

/// Closest approach between `ray` and the segment `center ± extent * direction`
///
/// `direction` must be unit length. The objective is convex over
/// `t >= 0, |u| <= extent`, so the minimum is either the unconstrained
/// line-line solution or lies on one of the three constraint edges.
pub fn ray_segment_closest(ray: &Ray, center: Vec3, direction: Vec3, extent: f32) -> RaySegmentHit {
    let w = ray.origin - center;
    let b = ray.direction.dot(direction);
    let d = ray.direction.dot(w);
    let e = direction.dot(w);

    let eval = |t: f32, u: f32| {
        let p = ray.at(t);
        let q = center + direction * u;
        RaySegmentHit {
            distance_squared: p.distance_squared(q),
            ray_t: t,
            segment_point: q,
        }
    };

    let mut best: Option<RaySegmentHit> = None;
    let mut consider = |hit: RaySegmentHit| {
        if best.map_or(true, |b| hit.distance_squared < b.distance_squared) {
            best = Some(hit);
        }
    };

    let denom = 1.0 - b * b;
    if denom > 1e-8 {
        let t = (b * e - d) / denom;
        let u = (e - b * d) / denom;
        if t >= 0.0 && u.abs() <= extent {
            consider(eval(t, u));
        }
    }

    // ray origin edge (t = 0)
    consider(eval(0.0, e.clamp(-extent, extent)));

    // segment endpoints (u = ±extent)
    for u in [-extent, extent] {
        let t = ray.project(center + direction * u);
        consider(eval(t, u));
    }

    best.unwrap_or_else(|| eval(0.0, 0.0))
}
