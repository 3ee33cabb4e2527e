//! Snap features of poly-curves

use void_math::Frame3;
use void_scene::{ObjectKind, SceneObject};

use super::SnapGenerator;
use crate::elements::{SnapPoint, SnapSegment};
use crate::id::FeatureIdAllocator;

/// Curve endpoints
///
/// The start point's Y axis points back against the first tangent and the
/// end point's along the last, so both face out of the curve.
#[derive(Debug, Default)]
pub struct CurveSnapGenerator;

impl CurveSnapGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SnapGenerator for CurveSnapGenerator {
    fn name(&self) -> &'static str {
        "CurveSnapGenerator"
    }

    fn can_generate(&self, object: &SceneObject) -> bool {
        matches!(object.kind, ObjectKind::Curve(_))
    }

    fn generate_points(&self, object: &SceneObject, ids: &FeatureIdAllocator) -> Vec<SnapPoint> {
        let ObjectKind::Curve(curve) = &object.kind else {
            return Vec::new();
        };
        let (Some(start), Some(end)) = (curve.start(), curve.end()) else {
            log::warn!("CurveSnapGenerator: {} '{}' has no vertices", object.id, object.name);
            return Vec::new();
        };
        if curve.vertex_count() < 2 {
            log::warn!("CurveSnapGenerator: {} '{}' has a single vertex", object.id, object.name);
            return Vec::new();
        }

        let last = curve.vertex_count() - 1;
        let start_frame = Frame3::from_axis(start, -curve.tangent(0), 1);
        let end_frame = Frame3::from_axis(end, curve.tangent(last), 1);
        vec![
            SnapPoint::new(ids.allocate(), object.id, start_frame),
            SnapPoint::new(ids.allocate(), object.id, end_frame),
        ]
    }

    fn generate_segments(&self, _object: &SceneObject, _ids: &FeatureIdAllocator) -> Vec<SnapSegment> {
        Vec::new()
    }
}
