//! Snap feature generators
//!
//! A generator turns a scene object's shape parameters into snap points and
//! segments in the object's local space. Generators never look at an
//! object's placement, so their output stays valid while the object moves.
//!
//! Pivots and groups are structural rather than shapes and are handled here
//! directly: a pivot is a single high-priority point at its own frame, and a
//! group collects its children's features re-expressed in the group's local
//! space.

mod curve;
mod primitive;

pub use curve::CurveSnapGenerator;
pub use primitive::PrimitiveSnapGenerator;

use void_math::Frame3;
use void_scene::{ObjectId, ObjectKind, Scene, SceneObject};

use crate::elements::{SnapPoint, SnapSegment, PIVOT_PRIORITY};
use crate::id::FeatureIdAllocator;

/// Produces snap features for the object categories it understands
pub trait SnapGenerator: Send {
    /// Name for logging
    fn name(&self) -> &'static str;

    fn can_generate(&self, object: &SceneObject) -> bool;

    /// Points in `object`'s local space
    fn generate_points(&self, object: &SceneObject, ids: &FeatureIdAllocator) -> Vec<SnapPoint>;

    /// Segments in `object`'s local space
    fn generate_segments(&self, object: &SceneObject, ids: &FeatureIdAllocator) -> Vec<SnapSegment>;

    /// Release anything the generator allocated. Called at most once by the
    /// registry, but must tolerate repeated calls.
    fn release(&mut self) {}
}

/// The generators every registry starts with
pub fn standard_generators() -> Vec<Box<dyn SnapGenerator>> {
    vec![
        Box::new(PrimitiveSnapGenerator::new()),
        Box::new(CurveSnapGenerator::new()),
    ]
}

/// All snap points of `id`, in `id`'s local space
///
/// Generators are tried in order and their results concatenated.
///
/// # Panics
/// Panics if `id` (or one of its descendants) is not in `scene`.
pub fn collect_points(
    generators: &[Box<dyn SnapGenerator>],
    scene: &Scene,
    id: ObjectId,
    ids: &FeatureIdAllocator,
) -> Vec<SnapPoint> {
    let object = scene.get(id);
    match &object.kind {
        ObjectKind::Pivot => {
            vec![SnapPoint::new(ids.allocate(), id, Frame3::IDENTITY).with_priority(PIVOT_PRIORITY)]
        }
        ObjectKind::Group => object
            .children
            .iter()
            .flat_map(|&child_id| {
                let child = scene.get(child_id);
                collect_points(generators, scene, child_id, ids)
                    .into_iter()
                    .map(move |p| {
                        let frame = child_to_parent(child, &p.frame_local());
                        p.reparented(id, frame)
                    })
            })
            .collect(),
        _ => generators
            .iter()
            .filter(|g| g.can_generate(object))
            .flat_map(|g| g.generate_points(object, ids))
            .collect(),
    }
}

/// All snap segments of `id`, in `id`'s local space
///
/// # Panics
/// Panics if `id` (or one of its descendants) is not in `scene`.
pub fn collect_segments(
    generators: &[Box<dyn SnapGenerator>],
    scene: &Scene,
    id: ObjectId,
    ids: &FeatureIdAllocator,
) -> Vec<SnapSegment> {
    let object = scene.get(id);
    match &object.kind {
        ObjectKind::Pivot => Vec::new(),
        ObjectKind::Group => object
            .children
            .iter()
            .flat_map(|&child_id| {
                let child = scene.get(child_id);
                collect_segments(generators, scene, child_id, ids)
                    .into_iter()
                    .map(move |s| {
                        let center = child_to_parent(child, &s.center_local());
                        let extent = s.extent_local() * child.scale;
                        s.reparented(id, center, extent)
                    })
            })
            .collect(),
        _ => generators
            .iter()
            .filter(|g| g.can_generate(object))
            .flat_map(|g| g.generate_segments(object, ids))
            .collect(),
    }
}

/// Re-express a frame from `child`'s local space in its parent's local space
fn child_to_parent(child: &SceneObject, local: &Frame3) -> Frame3 {
    Frame3::new(
        child.placement.from_frame_point(local.origin * child.scale),
        (child.placement.rotation * local.rotation).normalize(),
    )
}

/// Outward frames at `±half` along each local axis, in the order
/// +Y, -Y, +X, -X, +Z, -Z. Each frame's Y axis points away from the center.
pub(crate) fn outward_frames(half_x: f32, half_y: f32, half_z: f32) -> [Frame3; 6] {
    use void_math::{radians, Vec3};

    let f = Frame3::IDENTITY;
    [
        f.translated(Vec3::Y * half_y),
        f.translated(Vec3::NEG_Y * half_y).rotated_about_axis(radians(180.0), 0),
        f.translated(Vec3::X * half_x).rotated_about_axis(radians(-90.0), 2),
        f.translated(Vec3::NEG_X * half_x).rotated_about_axis(radians(90.0), 2),
        f.translated(Vec3::Z * half_z).rotated_about_axis(radians(90.0), 0),
        f.translated(Vec3::NEG_Z * half_z).rotated_about_axis(radians(-90.0), 0),
    ]
}
