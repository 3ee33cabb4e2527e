//! Snap features and query results
//!
//! Features are stored in their source object's local space. Their scene
//! and world placement is read from the scene on demand, so a feature stays
//! valid while its source moves; only a change of shape requires
//! regeneration.

use core::fmt;

use void_math::{ray_segment_closest, ray_sphere_at, Frame3, Ray, RaySegmentHit, Vec3};
use void_scene::{ObjectId, Scene};

use crate::id::FeatureId;

/// Priority of generated shape points
pub const STANDARD_PRIORITY: i32 = 999;

/// Priority of pivot points; lower wins ties
pub const PIVOT_PRIORITY: i32 = 10;

/// Identity comparison for hysteresis
///
/// Two values are the same when they refer to the same underlying target,
/// regardless of where that target currently is.
pub trait SnapCompare {
    fn is_same(&self, other: &Self) -> bool;
}

/// Oriented snap point attached to a source object
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPoint {
    id: FeatureId,
    source: ObjectId,
    /// Frame in the source object's local space
    frame: Frame3,
    priority: i32,
    is_surface: bool,
    enabled: bool,
}

impl SnapPoint {
    pub fn new(id: FeatureId, source: ObjectId, frame: Frame3) -> Self {
        Self {
            id,
            source,
            frame,
            priority: STANDARD_PRIORITY,
            is_surface: true,
            enabled: true,
        }
    }

    /// Origin-like point that is not on the visible boundary
    pub fn non_surface(mut self) -> Self {
        self.is_surface = false;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[inline]
    pub fn id(&self) -> FeatureId {
        self.id
    }

    #[inline]
    pub fn source(&self) -> ObjectId {
        self.source
    }

    #[inline]
    pub fn frame_local(&self) -> Frame3 {
        self.frame
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[inline]
    pub fn is_surface(&self) -> bool {
        self.is_surface
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Re-express the point relative to another object, keeping its id
    pub(crate) fn reparented(mut self, source: ObjectId, frame: Frame3) -> Self {
        self.source = source;
        self.frame = frame;
        self
    }

    pub fn frame_s(&self, scene: &Scene) -> Frame3 {
        scene.object_to_scene(self.source, &self.frame)
    }

    pub fn frame_w(&self, scene: &Scene) -> Frame3 {
        scene.to_world_frame(&self.frame_s(scene))
    }

    /// World radius of the hit sphere, constant on screen
    pub fn hit_radius_w(&self, scene: &Scene, visual_degrees: f32) -> f32 {
        let center = self.frame_w(scene).origin;
        scene.radius_for_visual_angle(center, visual_degrees)
    }

    /// Ray parameter where a world ray enters the point's hit sphere
    pub fn find_ray_intersection(&self, scene: &Scene, ray_w: &Ray, visual_degrees: f32) -> Option<f32> {
        let center = self.frame_w(scene).origin;
        ray_sphere_at(ray_w, center, self.hit_radius_w(scene, visual_degrees))
    }
}

/// Line segment attached to a source object
///
/// The center frame's Z axis is the segment direction; `extent` is the
/// half-length. Both are in the source object's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapSegment {
    id: FeatureId,
    source: ObjectId,
    center: Frame3,
    extent: f32,
    enabled: bool,
}

impl SnapSegment {
    pub fn new(id: FeatureId, source: ObjectId, center: Frame3, extent: f32) -> Self {
        Self {
            id,
            source,
            center,
            extent,
            enabled: true,
        }
    }

    #[inline]
    pub fn id(&self) -> FeatureId {
        self.id
    }

    #[inline]
    pub fn source(&self) -> ObjectId {
        self.source
    }

    #[inline]
    pub fn center_local(&self) -> Frame3 {
        self.center
    }

    #[inline]
    pub fn extent_local(&self) -> f32 {
        self.extent
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn reparented(mut self, source: ObjectId, center: Frame3, extent: f32) -> Self {
        self.source = source;
        self.center = center;
        self.extent = extent;
        self
    }

    pub fn center_s(&self, scene: &Scene) -> Frame3 {
        scene.object_to_scene(self.source, &self.center)
    }

    pub fn extent_s(&self, scene: &Scene) -> f32 {
        scene.object_to_scene_dimension(self.source, self.extent)
    }

    pub fn start_s(&self, scene: &Scene) -> Vec3 {
        let c = self.center_s(scene);
        c.origin + c.z() * self.extent_s(scene)
    }

    pub fn end_s(&self, scene: &Scene) -> Vec3 {
        let c = self.center_s(scene);
        c.origin - c.z() * self.extent_s(scene)
    }

    pub fn center_w(&self, scene: &Scene) -> Frame3 {
        scene.to_world_frame(&self.center_s(scene))
    }

    pub fn extent_w(&self, scene: &Scene) -> f32 {
        scene.to_world_dimension(self.extent_s(scene))
    }

    /// Closest approach of a world ray, if it passes within twice the
    /// visual-angle width of the segment
    pub fn find_ray_intersection(&self, scene: &Scene, ray_w: &Ray, visual_degrees: f32) -> Option<RaySegmentHit> {
        let center = self.center_w(scene);
        let width = scene.radius_for_visual_angle(center.origin, visual_degrees);
        let threshold = 2.0 * width;

        let hit = ray_segment_closest(ray_w, center.origin, center.z(), self.extent_w(scene));
        if hit.distance_squared < threshold * threshold {
            Some(hit)
        } else {
            None
        }
    }

    /// Frame at a scene-space point on the segment, with the segment's orientation
    pub fn hit_frame_s(&self, scene: &Scene, point_s: Vec3) -> Frame3 {
        Frame3::new(point_s, self.center_s(scene).rotation)
    }
}

/// Kind of feature a result refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    Point,
    Segment,
}

/// Resolved snap target in scene space
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub frame_s: Frame3,
    pub kind: SnapKind,
    pub feature: FeatureId,
    pub source: ObjectId,
}

impl SnapResult {
    pub fn from_point(scene: &Scene, point: &SnapPoint) -> Self {
        Self {
            frame_s: point.frame_s(scene),
            kind: SnapKind::Point,
            feature: point.id(),
            source: point.source(),
        }
    }

    pub fn from_segment(scene: &Scene, segment: &SnapSegment, hit_s: Vec3) -> Self {
        Self {
            frame_s: segment.hit_frame_s(scene, hit_s),
            kind: SnapKind::Segment,
            feature: segment.id(),
            source: segment.source(),
        }
    }
}

impl SnapCompare for SnapResult {
    fn is_same(&self, other: &Self) -> bool {
        self.kind == other.kind && self.feature == other.feature
    }
}

impl fmt::Display for SnapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.kind, self.feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FeatureIdAllocator;
    use void_math::Quat;
    use void_scene::{ObjectKind, PrimitiveShape};

    fn scene_with_cube() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        scene.set_camera_position(Vec3::new(0.0, 0.0, 10.0));
        let cube = scene.add_object(
            "cube",
            ObjectKind::Primitive(PrimitiveShape::cube(1.0)),
            Frame3::from_origin(Vec3::new(2.0, 0.0, 0.0)),
        );
        (scene, cube)
    }

    #[test]
    fn test_point_follows_source() {
        let (mut scene, cube) = scene_with_cube();
        let ids = FeatureIdAllocator::new();
        let point = SnapPoint::new(ids.allocate(), cube, Frame3::from_origin(Vec3::new(0.0, 0.5, 0.0)));
        assert!(point.frame_s(&scene).origin.abs_diff_eq(Vec3::new(2.0, 0.5, 0.0), 1e-6));

        scene.set_placement(cube, Frame3::from_origin(Vec3::new(-1.0, 0.0, 0.0))).unwrap();
        assert!(point.frame_s(&scene).origin.abs_diff_eq(Vec3::new(-1.0, 0.5, 0.0), 1e-6));
    }

    #[test]
    fn test_point_ray_hit() {
        let (scene, cube) = scene_with_cube();
        let ids = FeatureIdAllocator::new();
        let point = SnapPoint::new(ids.allocate(), cube, Frame3::IDENTITY);

        let ray = Ray::through(Vec3::new(2.0, 0.0, 10.0), Vec3::new(2.0, 0.0, 0.0));
        let t = point.find_ray_intersection(&scene, &ray, 2.25).unwrap();
        assert!(t > 9.0 && t < 10.0);
        // ray enters the sphere one hit radius before the center
        assert!((t - (10.0 - point.hit_radius_w(&scene, 2.25))).abs() < 1e-4);

        let miss = Ray::through(Vec3::new(3.0, 0.0, 10.0), Vec3::new(3.0, 0.0, 0.0));
        assert!(point.find_ray_intersection(&scene, &miss, 2.25).is_none());
    }

    #[test]
    fn test_segment_ray_hit_and_frame() {
        let (scene, cube) = scene_with_cube();
        let ids = FeatureIdAllocator::new();
        // along local X, half-length 0.5, on the top front edge
        let center = Frame3::new(Vec3::new(0.0, 0.5, 0.5), Quat::from_rotation_y(core::f32::consts::FRAC_PI_2));
        let segment = SnapSegment::new(ids.allocate(), cube, center, 0.5);

        assert!(segment.start_s(&scene).abs_diff_eq(Vec3::new(2.5, 0.5, 0.5), 1e-5));
        assert!(segment.end_s(&scene).abs_diff_eq(Vec3::new(1.5, 0.5, 0.5), 1e-5));

        let ray = Ray::through(Vec3::new(2.2, 0.5, 10.0), Vec3::new(2.2, 0.5, 0.0));
        let hit = segment.find_ray_intersection(&scene, &ray, 0.5).unwrap();
        assert!(hit.segment_point.abs_diff_eq(Vec3::new(2.2, 0.5, 0.5), 1e-4));

        let frame = segment.hit_frame_s(&scene, hit.segment_point);
        assert!(frame.z().abs_diff_eq(Vec3::X, 1e-5));

        let off = Ray::through(Vec3::new(2.2, 1.5, 10.0), Vec3::new(2.2, 1.5, 0.0));
        assert!(segment.find_ray_intersection(&scene, &off, 0.5).is_none());
    }

    #[test]
    fn test_result_identity() {
        let (scene, cube) = scene_with_cube();
        let ids = FeatureIdAllocator::new();
        let a = SnapPoint::new(ids.allocate(), cube, Frame3::IDENTITY);
        let b = SnapPoint::new(ids.allocate(), cube, Frame3::IDENTITY);

        let ra = SnapResult::from_point(&scene, &a);
        let mut moved = ra.clone();
        moved.frame_s = moved.frame_s.translated(Vec3::Y);
        assert!(ra.is_same(&moved));
        assert!(!ra.is_same(&SnapResult::from_point(&scene, &b)));
    }
}
