//! Snap registry
//!
//! `SnapSet` owns the generators and a per-object cache of generated
//! features, keeps an explicit active set of objects whose features are
//! live, and answers the two snap queries over the live features:
//!
//! - [`SnapSet::find_hit_snap_point`]: nearest feature along a world ray
//! - [`SnapSet::find_nearest_snap_point_s`]: nearest point within a radius
//!
//! The scene is passed to every call that reads object state. The registry
//! never subscribes to the scene; caches are validated by comparing the
//! stamp they were generated at with the object's current subtree timestamp.
//!
//! Queries do not revalidate. Call [`SnapSet::pre_render`] (or
//! [`SnapSet::refresh`]) once per tick before querying.

use std::collections::HashSet;
use std::sync::Arc;

use void_math::{Frame3, Ray};
use void_scene::{ObjectId, Scene};

use crate::cache::FeatureLayer;
use crate::config::SnapConfig;
use crate::elements::{SnapPoint, SnapResult, SnapSegment};
use crate::error::Result;
use crate::generator::{collect_points, collect_segments, standard_generators, SnapGenerator};
use crate::id::FeatureIdAllocator;
use crate::visuals::{NullVisuals, SnapVisuals};

/// Distance bucket used for tie-breaking
#[inline]
pub(crate) fn tie_key(distance: f32, epsilon: f32) -> i64 {
    (distance / epsilon).round() as i64
}

/// Snap feature registry
pub struct SnapSet {
    config: SnapConfig,
    generators: Vec<Box<dyn SnapGenerator>>,
    visuals: Box<dyn SnapVisuals>,
    ids: Arc<FeatureIdAllocator>,
    ignore_set: HashSet<ObjectId>,
    /// Activation order
    active_set: Vec<ObjectId>,
    points: FeatureLayer<SnapPoint>,
    segments: FeatureLayer<SnapSegment>,
}

impl SnapSet {
    /// Registry without generators; only pivots and groups of pivots produce features
    ///
    /// # Panics
    /// Panics if `config` fails [`SnapConfig::validate`].
    pub fn new(config: SnapConfig) -> Self {
        config.assert_valid("SnapSet");
        Self::with_valid_config(config)
    }

    /// [`new`](Self::new) that reports an invalid config instead of panicking
    pub fn try_new(config: SnapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: SnapConfig) -> Self {
        Self {
            config,
            generators: Vec::new(),
            visuals: Box::new(NullVisuals),
            ids: FeatureIdAllocator::shared(),
            ignore_set: HashSet::new(),
            active_set: Vec::new(),
            points: FeatureLayer::default(),
            segments: FeatureLayer::default(),
        }
    }

    /// Registry with the primitive and curve generators
    ///
    /// # Panics
    /// Panics if `config` fails [`SnapConfig::validate`].
    pub fn create_standard(config: SnapConfig) -> Self {
        let mut set = Self::new(config);
        set.generators = standard_generators();
        set
    }

    pub fn with_visuals(mut self, visuals: Box<dyn SnapVisuals>) -> Self {
        self.visuals = visuals;
        self
    }

    /// Use a dedicated id allocator instead of the process-wide one
    pub fn with_id_allocator(mut self, ids: Arc<FeatureIdAllocator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn add_generator(&mut self, generator: Box<dyn SnapGenerator>) {
        log::debug!("SnapSet: added generator {}", generator.name());
        self.generators.push(generator);
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Feature classes
    // ------------------------------------------------------------------

    pub fn points_enabled(&self) -> bool {
        self.config.enable_points
    }

    pub fn segments_enabled(&self) -> bool {
        self.config.enable_segments
    }

    /// Toggle snap points; active objects are relinked or unlinked to match
    pub fn set_points_enabled(&mut self, scene: &Scene, enabled: bool) {
        if self.config.enable_points == enabled {
            return;
        }
        self.config.enable_points = enabled;
        for id in self.active_set.clone() {
            if enabled {
                self.ensure_points(scene, id);
                self.points.link(id, self.visuals.as_mut());
            } else {
                self.points.unlink(id, self.visuals.as_mut());
            }
        }
    }

    /// Toggle snap segments; active objects are relinked or unlinked to match
    pub fn set_segments_enabled(&mut self, scene: &Scene, enabled: bool) {
        if self.config.enable_segments == enabled {
            return;
        }
        self.config.enable_segments = enabled;
        for id in self.active_set.clone() {
            if enabled {
                self.ensure_segments(scene, id);
                self.segments.link(id, self.visuals.as_mut());
            } else {
                self.segments.unlink(id, self.visuals.as_mut());
            }
        }
    }

    // ------------------------------------------------------------------
    // Caches
    // ------------------------------------------------------------------

    /// Cached points of `id`, without generating
    pub fn cached_points(&self, id: ObjectId) -> Option<&[SnapPoint]> {
        if !self.config.enable_points {
            return None;
        }
        self.points.cached(id)
    }

    /// Cached segments of `id`, without generating
    pub fn cached_segments(&self, id: ObjectId) -> Option<&[SnapSegment]> {
        if !self.config.enable_segments {
            return None;
        }
        self.segments.cached(id)
    }

    /// Points of `id`, regenerated if the cache is missing or stale
    ///
    /// # Panics
    /// Panics if `id` is not in `scene`.
    pub fn find_or_cache_points(&mut self, scene: &Scene, id: ObjectId) -> Option<&[SnapPoint]> {
        if !self.config.enable_points {
            return None;
        }
        self.ensure_points(scene, id);
        self.points.cached(id)
    }

    /// Segments of `id`, regenerated if the cache is missing or stale
    ///
    /// # Panics
    /// Panics if `id` is not in `scene`.
    pub fn find_or_cache_segments(&mut self, scene: &Scene, id: ObjectId) -> Option<&[SnapSegment]> {
        if !self.config.enable_segments {
            return None;
        }
        self.ensure_segments(scene, id);
        self.segments.cached(id)
    }

    /// Returns true when the points were (re)generated
    fn ensure_points(&mut self, scene: &Scene, id: ObjectId) -> bool {
        assert!(scene.contains(id), "SnapSet: {} is not registered in the scene", id);
        let stamp = scene.subtree_timestamp(id);
        if self.points.is_fresh(id, stamp) {
            return false;
        }

        let points = collect_points(&self.generators, scene, id, &self.ids);
        if self.config.build_geometry {
            for p in &points {
                self.visuals.build_point(p.id(), p.frame_w(scene), p.is_surface());
            }
        }
        log::debug!("SnapSet: cached {} point(s) for {} at stamp {}", points.len(), id, stamp);
        self.points.replace(id, stamp, points, self.visuals.as_mut());
        true
    }

    fn ensure_segments(&mut self, scene: &Scene, id: ObjectId) -> bool {
        assert!(scene.contains(id), "SnapSet: {} is not registered in the scene", id);
        let stamp = scene.subtree_timestamp(id);
        if self.segments.is_fresh(id, stamp) {
            return false;
        }

        let segments = collect_segments(&self.generators, scene, id, &self.ids);
        if self.config.build_geometry {
            for s in &segments {
                self.visuals.build_segment(s.id(), s.center_w(scene), s.extent_w(scene));
            }
        }
        log::debug!("SnapSet: cached {} segment(s) for {} at stamp {}", segments.len(), id, stamp);
        self.segments.replace(id, stamp, segments, self.visuals.as_mut());
        true
    }

    /// Revalidate every active object's caches against the scene
    ///
    /// Returns the number of caches that were regenerated.
    pub fn refresh(&mut self, scene: &Scene) -> usize {
        let mut regenerated = 0;
        for id in self.active_set.clone() {
            if self.config.enable_points && self.ensure_points(scene, id) {
                regenerated += 1;
            }
            if self.config.enable_segments && self.ensure_segments(scene, id) {
                regenerated += 1;
            }
        }
        if regenerated > 0 {
            log::trace!("SnapSet: refreshed {} cache(s)", regenerated);
        }
        regenerated
    }

    /// Drop every cached feature of `id`, e.g. after it was deleted from the scene
    pub fn evict(&mut self, id: ObjectId) {
        self.deactivate(id);
        let n = self.points.destroy(id, self.visuals.as_mut()) + self.segments.destroy(id, self.visuals.as_mut());
        if n > 0 {
            log::debug!("SnapSet: evicted {} feature(s) of {}", n, id);
        }
    }

    // ------------------------------------------------------------------
    // Ignore set
    // ------------------------------------------------------------------

    /// Exclude `id` from snapping; an active object is deactivated
    pub fn ignore(&mut self, id: ObjectId) {
        if self.ignore_set.insert(id) {
            self.deactivate(id);
        }
    }

    pub fn unignore(&mut self, id: ObjectId) {
        self.ignore_set.remove(&id);
    }

    pub fn is_ignored(&self, id: ObjectId) -> bool {
        self.ignore_set.contains(&id)
    }

    // ------------------------------------------------------------------
    // Active set
    // ------------------------------------------------------------------

    pub fn is_active(&self, id: ObjectId) -> bool {
        self.active_set.contains(&id)
    }

    pub fn active_objects(&self) -> &[ObjectId] {
        &self.active_set
    }

    /// Make `id`'s features live. No-op for ignored or already active objects.
    ///
    /// # Panics
    /// Panics if `id` is not in `scene`.
    pub fn add_to_active(&mut self, scene: &Scene, id: ObjectId) {
        if self.is_ignored(id) || self.is_active(id) {
            return;
        }
        if self.config.enable_points {
            self.ensure_points(scene, id);
            self.points.link(id, self.visuals.as_mut());
        }
        if self.config.enable_segments {
            self.ensure_segments(scene, id);
            self.segments.link(id, self.visuals.as_mut());
        }
        self.active_set.push(id);
        log::debug!("SnapSet: activated {}", id);
    }

    pub fn add_all_to_active(&mut self, scene: &Scene, ids: impl IntoIterator<Item = ObjectId>) {
        for id in ids {
            self.add_to_active(scene, id);
        }
    }

    /// Take `id`'s features out of the live lists, keeping its cache.
    /// No-op for ignored or inactive objects.
    pub fn remove_from_active(&mut self, id: ObjectId) {
        if self.is_ignored(id) {
            return;
        }
        self.deactivate(id);
    }

    pub fn remove_all_from_active(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        for id in ids {
            self.remove_from_active(id);
        }
    }

    pub fn clear_active(&mut self) {
        while let Some(&id) = self.active_set.last() {
            self.deactivate(id);
        }
    }

    fn deactivate(&mut self, id: ObjectId) {
        let Some(index) = self.active_set.iter().position(|&a| a == id) else {
            return;
        };
        self.points.unlink(id, self.visuals.as_mut());
        self.segments.unlink(id, self.visuals.as_mut());
        self.active_set.remove(index);
        log::debug!("SnapSet: deactivated {}", id);
    }

    /// Live snap points, in activation order
    pub fn live_points(&self) -> impl Iterator<Item = &SnapPoint> + '_ {
        self.points.live()
    }

    /// Live snap segments, in activation order
    pub fn live_segments(&self) -> impl Iterator<Item = &SnapSegment> + '_ {
        self.segments.live()
    }

    // ------------------------------------------------------------------
    // Drag helpers
    // ------------------------------------------------------------------

    /// Prepare for dragging `dragged`: ignore it, activate `candidates` and
    /// every pivot in the scene
    pub fn begin_drag(&mut self, scene: &Scene, dragged: ObjectId, candidates: impl IntoIterator<Item = ObjectId>) {
        self.ignore(dragged);
        self.add_all_to_active(scene, candidates);
        let pivots = scene.find(|o| o.kind.is_pivot());
        self.add_all_to_active(scene, pivots);
        log::debug!("SnapSet: drag of {} started with {} active object(s)", dragged, self.active_set.len());
    }

    pub fn end_drag(&mut self, dragged: ObjectId) {
        self.unignore(dragged);
        self.clear_active();
        log::debug!("SnapSet: drag of {} ended", dragged);
    }

    // ------------------------------------------------------------------
    // Per-frame
    // ------------------------------------------------------------------

    /// Revalidate caches, then hand every live feature's world placement and
    /// visual radius to the visuals
    pub fn pre_render(&mut self, scene: &Scene) {
        self.refresh(scene);

        let point_degrees = self.config.point_visual_degrees;
        let segment_degrees = self.config.segment_visual_degrees;
        for p in self.points.live() {
            let frame_w = p.frame_w(scene);
            let radius = scene.radius_for_visual_angle(frame_w.origin, point_degrees);
            self.visuals.pre_render(p.id(), frame_w, radius);
        }
        for s in self.segments.live() {
            let center_w = s.center_w(scene);
            let width = scene.radius_for_visual_angle(center_w.origin, segment_degrees);
            self.visuals.pre_render(s.id(), center_w, width);
        }
    }

    /// Deactivate everything and destroy all cached features; optionally
    /// release the generators too
    pub fn disconnect(&mut self, destroy_generators: bool) {
        self.clear_active();
        let n = self.points.clear(self.visuals.as_mut()) + self.segments.clear(self.visuals.as_mut());
        if destroy_generators {
            for mut generator in self.generators.drain(..) {
                generator.release();
            }
        }
        log::debug!("SnapSet: disconnected, {} feature(s) destroyed", n);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Nearest live feature along a world-space ray
    ///
    /// Points tie-break on `(distance bucket, priority, id)`. A segment wins
    /// only if its distance bucket is strictly closer than the best point's.
    /// The result frame is in scene space.
    pub fn find_hit_snap_point(&self, scene: &Scene, ray_w: &Ray) -> Option<SnapResult> {
        let eps = self.config.tie_epsilon;

        let best_point = self
            .points
            .live()
            .filter(|p| p.is_enabled())
            .filter_map(|p| {
                p.find_ray_intersection(scene, ray_w, self.config.point_visual_degrees)
                    .map(|t| (p, t))
            })
            .min_by_key(|(p, t)| (tie_key(*t, eps), p.priority(), p.id()));

        let best_segment = self
            .segments
            .live()
            .filter(|s| s.is_enabled())
            .filter_map(|s| {
                s.find_ray_intersection(scene, ray_w, self.config.segment_visual_degrees)
                    .map(|hit| (s, hit))
            })
            .min_by_key(|(s, hit)| (tie_key(hit.ray_t, eps), s.id()));

        let segment_result = |(s, hit): (&SnapSegment, void_math::RaySegmentHit)| {
            SnapResult::from_segment(scene, s, scene.to_scene_point(hit.segment_point))
        };

        match (best_point, best_segment) {
            (Some((_, t)), Some(seg)) if tie_key(seg.1.ray_t, eps) < tie_key(t, eps) => Some(segment_result(seg)),
            (Some((p, _)), _) => Some(SnapResult::from_point(scene, p)),
            (None, Some(seg)) => Some(segment_result(seg)),
            (None, None) => None,
        }
    }

    /// Nearest live point to a scene-space frame's origin, within `max_radius_s`
    ///
    /// A negative or NaN radius matches nothing.
    pub fn find_nearest_snap_point_s(&self, scene: &Scene, frame_s: &Frame3, max_radius_s: f32) -> Option<SnapResult> {
        if max_radius_s.is_nan() || max_radius_s < 0.0 {
            return None;
        }
        let eps = self.config.tie_epsilon;
        let radius_sq = max_radius_s * max_radius_s;

        self.points
            .live()
            .filter(|p| p.is_enabled())
            .filter_map(|p| {
                let d2 = frame_s.origin.distance_squared(p.frame_s(scene).origin);
                (d2 <= radius_sq).then_some((p, d2.sqrt()))
            })
            .min_by_key(|(p, d)| (tie_key(*d, eps), p.priority(), p.id()))
            .map(|(p, _)| SnapResult::from_point(scene, p))
    }

    /// World-space variant of [`find_nearest_snap_point_s`](Self::find_nearest_snap_point_s)
    pub fn find_nearest_snap_point_w(&self, scene: &Scene, frame_w: &Frame3, max_radius_w: f32) -> Option<SnapResult> {
        let frame_s = scene.to_scene_frame(frame_w);
        let radius_s = scene.to_scene_dimension(max_radius_w);
        self.find_nearest_snap_point_s(scene, &frame_s, radius_s)
    }
}

impl std::fmt::Debug for SnapSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapSet")
            .field("generators", &self.generators.len())
            .field("active", &self.active_set)
            .field("ignored", &self.ignore_set)
            .field("live_points", &self.points.live_len())
            .field("live_segments", &self.segments.live_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{SnapKind, PIVOT_PRIORITY};
    use crate::visuals::{RecordingVisuals, VisualEvent};
    use void_math::Vec3;
    use void_scene::{ObjectKind, PrimitiveShape};

    fn cube_at(scene: &mut Scene, at: Vec3) -> ObjectId {
        scene.add_object("cube", ObjectKind::Primitive(PrimitiveShape::cube(1.0)), Frame3::from_origin(at))
    }

    fn registry() -> SnapSet {
        SnapSet::create_standard(SnapConfig::default())
            .with_id_allocator(Arc::new(FeatureIdAllocator::new()))
    }

    #[test]
    fn test_tie_key_buckets() {
        assert_eq!(tie_key(1.0, 1e-4), tie_key(1.00001, 1e-4));
        assert!(tie_key(1.0, 1e-4) < tie_key(1.001, 1e-4));
    }

    #[test]
    fn test_empty_registry_returns_none() {
        let scene = Scene::new();
        let snaps = registry();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(snaps.find_hit_snap_point(&scene, &ray).is_none());
        assert!(snaps.find_nearest_snap_point_s(&scene, &Frame3::IDENTITY, 100.0).is_none());
    }

    #[test]
    fn test_add_remove_is_idempotent() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let mut snaps = registry();

        snaps.add_to_active(&scene, a);
        snaps.add_to_active(&scene, a);
        assert_eq!(snaps.live_points().count(), 15);

        snaps.remove_from_active(a);
        snaps.remove_from_active(a);
        assert_eq!(snaps.live_points().count(), 0);
        assert!(snaps.cached_points(a).is_some());
    }

    #[test]
    fn test_ignored_objects_never_activate() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let mut snaps = registry();
        snaps.ignore(a);
        snaps.add_to_active(&scene, a);
        assert!(!snaps.is_active(a));

        snaps.unignore(a);
        snaps.add_to_active(&scene, a);
        assert!(snaps.is_active(a));

        // ignoring an active object takes it out
        snaps.ignore(a);
        assert!(!snaps.is_active(a));
        assert_eq!(snaps.live_points().count(), 0);
    }

    #[test]
    fn test_nearest_respects_radius() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let mut snaps = registry();
        snaps.add_to_active(&scene, a);

        let probe = Frame3::from_origin(Vec3::new(0.0, 0.8, 0.0));
        assert!(snaps.find_nearest_snap_point_s(&scene, &probe, 0.2).is_none());

        let hit = snaps.find_nearest_snap_point_s(&scene, &probe, 0.35).unwrap();
        assert_eq!(hit.source, a);
        assert!(hit.frame_s.origin.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));
    }

    #[test]
    fn test_negative_radius_matches_nothing() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let mut snaps = registry();
        snaps.add_to_active(&scene, a);

        let probe = Frame3::from_origin(Vec3::new(0.0, 0.6, 0.0));
        assert!(snaps.find_nearest_snap_point_s(&scene, &probe, -0.5).is_none());
        assert!(snaps.find_nearest_snap_point_s(&scene, &probe, f32::NAN).is_none());
        assert!(snaps.find_nearest_snap_point_w(&scene, &probe, -0.5).is_none());
        assert!(snaps.find_nearest_snap_point_s(&scene, &probe, 0.5).is_some());
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let err = SnapSet::try_new(SnapConfig::default().with_tie_epsilon(0.0)).unwrap_err();
        assert!(matches!(err, crate::error::SnapError::InvalidConfig(_)));
        assert!(SnapSet::try_new(SnapConfig::default()).is_ok());
    }

    #[test]
    #[should_panic(expected = "tie_epsilon must be positive")]
    fn test_new_panics_on_invalid_config() {
        let _ = SnapSet::create_standard(SnapConfig::default().with_tie_epsilon(0.0));
    }

    #[test]
    fn test_closer_point_beats_priority() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let pivot = scene.add_object("pivot", ObjectKind::Pivot, Frame3::from_origin(Vec3::new(0.0, 0.9, 0.0)));
        let mut snaps = registry();
        snaps.add_all_to_active(&scene, [a, pivot]);

        let probe = Frame3::from_origin(Vec3::new(0.0, 0.55, 0.0));
        let hit = snaps.find_nearest_snap_point_s(&scene, &probe, 1.0).unwrap();
        assert_eq!(hit.source, a);
    }

    #[test]
    fn test_pivot_wins_tie() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let pivot = scene.add_object("pivot", ObjectKind::Pivot, Frame3::from_origin(Vec3::new(0.0, 0.5, 0.0)));
        let mut snaps = registry();
        // cube first so iteration order would favor it
        snaps.add_to_active(&scene, a);
        snaps.add_to_active(&scene, pivot);

        let probe = Frame3::from_origin(Vec3::new(0.0, 0.6, 0.0));
        for _ in 0..3 {
            let hit = snaps.find_nearest_snap_point_s(&scene, &probe, 0.5).unwrap();
            assert_eq!(hit.source, pivot);
        }
        let point = snaps.cached_points(pivot).unwrap()[0].clone();
        assert_eq!(point.priority(), PIVOT_PRIORITY);
    }

    #[test]
    fn test_ray_hit_prefers_nearer() {
        let mut scene = Scene::new();
        scene.set_camera_position(Vec3::new(0.0, 0.0, 10.0));
        let a = cube_at(&mut scene, Vec3::ZERO);
        let mut snaps = registry();
        snaps.add_to_active(&scene, a);

        // straight down the Z axis passes the +Z face, the center and the -Z face
        let ray = Ray::through(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let hit = snaps.find_hit_snap_point(&scene, &ray).unwrap();
        assert_eq!(hit.kind, SnapKind::Point);
        assert!(hit.frame_s.origin.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-6));
    }

    #[test]
    fn test_segments_gated_by_toggle() {
        let mut scene = Scene::new();
        scene.set_camera_position(Vec3::new(0.0, 0.0, 10.0));
        let a = cube_at(&mut scene, Vec3::ZERO);
        let mut snaps = registry();
        snaps.add_to_active(&scene, a);
        assert_eq!(snaps.live_segments().count(), 0);
        assert!(snaps.cached_segments(a).is_none());

        snaps.set_segments_enabled(&scene, true);
        assert_eq!(snaps.live_segments().count(), 12);

        // ray along the top front edge's midpoint, away from any point
        let ray = Ray::through(Vec3::new(0.25, 0.5, 10.0), Vec3::new(0.25, 0.5, 0.5));
        let hit = snaps.find_hit_snap_point(&scene, &ray).unwrap();
        assert_eq!(hit.kind, SnapKind::Segment);
        assert!(hit.frame_s.origin.abs_diff_eq(Vec3::new(0.25, 0.5, 0.5), 1e-3));

        snaps.set_segments_enabled(&scene, false);
        assert_eq!(snaps.live_segments().count(), 0);
        assert!(snaps.find_hit_snap_point(&scene, &ray).is_none());
    }

    #[test]
    fn test_stale_cache_regenerates_on_refresh() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let b = cube_at(&mut scene, Vec3::new(3.0, 0.0, 0.0));
        let mut snaps = registry();
        snaps.add_all_to_active(&scene, [a, b]);
        let a_ids: Vec<_> = snaps.cached_points(a).unwrap().iter().map(|p| p.id()).collect();
        let b_ids: Vec<_> = snaps.cached_points(b).unwrap().iter().map(|p| p.id()).collect();

        scene
            .set_kind(a, ObjectKind::Primitive(PrimitiveShape::Sphere { radius: 0.5 }))
            .unwrap();
        assert_eq!(snaps.refresh(&scene), 1);

        let new_a: Vec<_> = snaps.cached_points(a).unwrap().iter().map(|p| p.id()).collect();
        let new_b: Vec<_> = snaps.cached_points(b).unwrap().iter().map(|p| p.id()).collect();
        assert_eq!(new_a.len(), 7);
        assert!(new_a.iter().all(|id| !a_ids.contains(id)));
        assert_eq!(new_b, b_ids);
        assert_eq!(snaps.live_points().count(), 7 + 15);
    }

    #[test]
    fn test_drag_helpers() {
        let mut scene = Scene::new();
        let dragged = cube_at(&mut scene, Vec3::ZERO);
        let other = cube_at(&mut scene, Vec3::X * 3.0);
        let pivot = scene.add_object("pivot", ObjectKind::Pivot, Frame3::IDENTITY);
        let mut snaps = registry();

        snaps.begin_drag(&scene, dragged, [dragged, other]);
        assert!(snaps.is_ignored(dragged));
        assert!(!snaps.is_active(dragged));
        assert!(snaps.is_active(other));
        assert!(snaps.is_active(pivot));

        snaps.end_drag(dragged);
        assert!(!snaps.is_ignored(dragged));
        assert!(snaps.active_objects().is_empty());
    }

    #[test]
    fn test_visual_hooks() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, Vec3::ZERO);
        let visuals = RecordingVisuals::new();
        let mut snaps = SnapSet::create_standard(SnapConfig::default().with_build_geometry(true))
            .with_visuals(Box::new(visuals.clone()));

        snaps.add_to_active(&scene, a);
        assert_eq!(visuals.count(|e| matches!(e, VisualEvent::BuildPoint { .. })), 15);
        assert_eq!(visuals.count(|e| matches!(e, VisualEvent::SetEnabled { enabled: true, .. })), 15);

        snaps.pre_render(&scene);
        assert_eq!(visuals.count(|e| matches!(e, VisualEvent::PreRender { .. })), 15);

        snaps.remove_from_active(a);
        assert_eq!(visuals.count(|e| matches!(e, VisualEvent::SetEnabled { enabled: false, .. })), 15);

        snaps.disconnect(true);
        assert_eq!(visuals.count(|e| matches!(e, VisualEvent::Destroy { .. })), 15);
        assert_eq!(snaps.generator_count(), 0);
        assert!(snaps.cached_points(a).is_none());
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn test_unknown_object_panics() {
        let scene = Scene::new();
        let mut snaps = registry();
        snaps.add_to_active(&scene, ObjectId(77));
    }
}
