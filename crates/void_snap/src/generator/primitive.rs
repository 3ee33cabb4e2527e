//! Snap features of parametric primitives

use void_math::{radians, Frame3, Vec3};
use void_scene::{ObjectKind, PrimitiveShape, SceneObject};

use super::{outward_frames, SnapGenerator};
use crate::elements::{SnapPoint, SnapSegment};
use crate::id::FeatureIdAllocator;

/// Box, cylinder and sphere features
///
/// - box: center, six face centers, eight corners; twelve edge segments
/// - cylinder: center, two cap centers, four side points
/// - sphere: center, six axis points on the surface
///
/// Face, cap and side frames have their Y axis along the outward normal.
#[derive(Debug, Default)]
pub struct PrimitiveSnapGenerator;

impl PrimitiveSnapGenerator {
    pub fn new() -> Self {
        Self
    }

    fn shape_points(shape: &PrimitiveShape) -> Vec<(Frame3, bool)> {
        match *shape {
            PrimitiveShape::Box { width, height, depth } => {
                let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
                let mut v = Vec::with_capacity(15);
                v.push((Frame3::IDENTITY, false));
                v.extend(outward_frames(hx, hy, hz).into_iter().map(|f| (f, true)));
                for z in [-hz, hz] {
                    for (x, y) in [(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)] {
                        v.push((Frame3::from_origin(Vec3::new(x, y, z)), true));
                    }
                }
                v
            }
            PrimitiveShape::Cylinder { radius, height } => {
                let mut v = Vec::with_capacity(7);
                v.push((Frame3::IDENTITY, false));
                v.extend(outward_frames(radius, height * 0.5, radius).into_iter().map(|f| (f, true)));
                v
            }
            PrimitiveShape::Sphere { radius } => {
                let mut v = Vec::with_capacity(7);
                v.push((Frame3::IDENTITY, false));
                v.extend(outward_frames(radius, radius, radius).into_iter().map(|f| (f, true)));
                v
            }
        }
    }

    /// Twelve box edges as (center, half-length), Z along the edge
    fn box_edges(width: f32, height: f32, depth: f32) -> Vec<(Frame3, f32)> {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let along_z = Frame3::IDENTITY;
        let along_x = Frame3::IDENTITY.rotated_about_axis(radians(90.0), 1);
        let along_y = Frame3::IDENTITY.rotated_about_axis(radians(90.0), 0);

        let mut v = Vec::with_capacity(12);
        for (a, b) in corners {
            v.push((along_z.translated(Vec3::new(a * hx, b * hy, 0.0)), hz));
        }
        for (a, b) in corners {
            v.push((along_x.translated(Vec3::new(0.0, a * hy, b * hz)), hx));
        }
        for (a, b) in corners {
            v.push((along_y.translated(Vec3::new(a * hx, 0.0, b * hz)), hy));
        }
        v
    }
}

impl SnapGenerator for PrimitiveSnapGenerator {
    fn name(&self) -> &'static str {
        "PrimitiveSnapGenerator"
    }

    fn can_generate(&self, object: &SceneObject) -> bool {
        matches!(object.kind, ObjectKind::Primitive(_))
    }

    fn generate_points(&self, object: &SceneObject, ids: &FeatureIdAllocator) -> Vec<SnapPoint> {
        let ObjectKind::Primitive(shape) = &object.kind else {
            return Vec::new();
        };
        Self::shape_points(shape)
            .into_iter()
            .map(|(frame, is_surface)| {
                let point = SnapPoint::new(ids.allocate(), object.id, frame);
                if is_surface {
                    point
                } else {
                    point.non_surface()
                }
            })
            .collect()
    }

    fn generate_segments(&self, object: &SceneObject, ids: &FeatureIdAllocator) -> Vec<SnapSegment> {
        match object.kind {
            ObjectKind::Primitive(PrimitiveShape::Box { width, height, depth }) => Self::box_edges(width, height, depth)
                .into_iter()
                .map(|(center, extent)| SnapSegment::new(ids.allocate(), object.id, center, extent))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_scene::{ObjectId, Scene};

    fn add(scene: &mut Scene, shape: PrimitiveShape) -> ObjectId {
        scene.add_object(shape.name(), ObjectKind::Primitive(shape), Frame3::IDENTITY)
    }

    #[test]
    fn test_box_points() {
        let mut scene = Scene::new();
        let id = add(&mut scene, PrimitiveShape::Box { width: 2.0, height: 4.0, depth: 6.0 });
        let ids = FeatureIdAllocator::new();
        let points = PrimitiveSnapGenerator::new().generate_points(scene.get(id), &ids);

        assert_eq!(points.len(), 15);
        assert!(!points[0].is_surface());
        assert!(points[1..].iter().all(|p| p.is_surface()));

        let top = points[1].frame_local();
        assert!(top.origin.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
        assert!(top.y().abs_diff_eq(Vec3::Y, 1e-6));

        let right = points[3].frame_local();
        assert!(right.origin.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!(right.y().abs_diff_eq(Vec3::X, 1e-5));

        // corners sit on the box extents
        for corner in &points[7..] {
            let o = corner.frame_local().origin;
            assert_eq!((o.x.abs(), o.y.abs(), o.z.abs()), (1.0, 2.0, 3.0));
        }

        // ids are unique and increasing
        for pair in points.windows(2) {
            assert!(pair[0].id() < pair[1].id());
        }
    }

    #[test]
    fn test_box_edges() {
        let mut scene = Scene::new();
        let id = add(&mut scene, PrimitiveShape::Box { width: 2.0, height: 4.0, depth: 6.0 });
        let ids = FeatureIdAllocator::new();
        let segments = PrimitiveSnapGenerator::new().generate_segments(scene.get(id), &ids);
        assert_eq!(segments.len(), 12);

        let mut per_axis = [0usize; 3];
        for s in &segments {
            let dir = s.center_local().z();
            let axis = (0..3)
                .find(|&i| dir.dot(Vec3::axis(i)).abs() > 0.999)
                .expect("edge not axis-aligned");
            per_axis[axis] += 1;
            let expected = [1.0, 2.0, 3.0][axis];
            assert!((s.extent_local() - expected).abs() < 1e-6);

            // endpoints are box corners
            for end in [s.start_s(&scene), s.end_s(&scene)] {
                assert!((end.x.abs() - 1.0).abs() < 1e-5);
                assert!((end.y.abs() - 2.0).abs() < 1e-5);
                assert!((end.z.abs() - 3.0).abs() < 1e-5);
            }
        }
        assert_eq!(per_axis, [4, 4, 4]);
    }

    #[test]
    fn test_cylinder_and_sphere() {
        let mut scene = Scene::new();
        let cyl = add(&mut scene, PrimitiveShape::Cylinder { radius: 0.5, height: 2.0 });
        let sph = add(&mut scene, PrimitiveShape::Sphere { radius: 1.5 });
        let ids = FeatureIdAllocator::new();
        let generator = PrimitiveSnapGenerator::new();

        let cyl_points = generator.generate_points(scene.get(cyl), &ids);
        assert_eq!(cyl_points.len(), 7);
        assert!(cyl_points[1].frame_local().origin.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
        assert!(cyl_points[5].frame_local().origin.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-6));
        assert!(generator.generate_segments(scene.get(cyl), &ids).is_empty());

        let sph_points = generator.generate_points(scene.get(sph), &ids);
        assert_eq!(sph_points.len(), 7);
        for p in &sph_points[1..] {
            assert!((p.frame_local().origin.length() - 1.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rejects_other_kinds() {
        let mut scene = Scene::new();
        let pivot = scene.add_object("pivot", ObjectKind::Pivot, Frame3::IDENTITY);
        let generator = PrimitiveSnapGenerator::new();
        assert!(!generator.can_generate(scene.get(pivot)));
        assert!(generator.generate_points(scene.get(pivot), &FeatureIdAllocator::new()).is_empty());
    }
}
