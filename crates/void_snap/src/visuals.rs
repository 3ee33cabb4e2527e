//! Visualization hooks
//!
//! The engine never renders. It tells a [`SnapVisuals`] implementation when
//! a marker for a feature should exist, be shown or hidden, follow its
//! feature, or go away. All frames handed out are in world space.

use std::sync::Arc;

use parking_lot::Mutex;
use void_math::{Frame3, Vec3};

use crate::id::FeatureId;

/// Marker lifecycle callbacks
pub trait SnapVisuals: Send {
    /// A point marker is needed
    fn build_point(&mut self, id: FeatureId, frame_w: Frame3, is_surface: bool);

    /// A segment marker is needed, `extent_w` is the half-length along the frame's Z
    fn build_segment(&mut self, id: FeatureId, center_w: Frame3, extent_w: f32);

    /// Show or hide a marker
    fn set_enabled(&mut self, id: FeatureId, enabled: bool);

    /// Per-frame placement; `radius_w` keeps the marker at a constant visual size
    fn pre_render(&mut self, id: FeatureId, frame_w: Frame3, radius_w: f32);

    /// The feature is gone
    fn destroy(&mut self, id: FeatureId);
}

/// Discards every call
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisuals;

impl SnapVisuals for NullVisuals {
    fn build_point(&mut self, _id: FeatureId, _frame_w: Frame3, _is_surface: bool) {}
    fn build_segment(&mut self, _id: FeatureId, _center_w: Frame3, _extent_w: f32) {}
    fn set_enabled(&mut self, _id: FeatureId, _enabled: bool) {}
    fn pre_render(&mut self, _id: FeatureId, _frame_w: Frame3, _radius_w: f32) {}
    fn destroy(&mut self, _id: FeatureId) {}
}

/// A recorded hook call
#[derive(Debug, Clone, PartialEq)]
pub enum VisualEvent {
    BuildPoint { id: FeatureId, origin_w: Vec3, is_surface: bool },
    BuildSegment { id: FeatureId, origin_w: Vec3, extent_w: f32 },
    SetEnabled { id: FeatureId, enabled: bool },
    PreRender { id: FeatureId, origin_w: Vec3, radius_w: f32 },
    Destroy { id: FeatureId },
}

/// Records every hook call; clones share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingVisuals {
    events: Arc<Mutex<Vec<VisualEvent>>>,
}

impl RecordingVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log
    pub fn events(&self) -> Vec<VisualEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn count(&self, mut predicate: impl FnMut(&VisualEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: VisualEvent) {
        self.events.lock().push(event);
    }
}

impl SnapVisuals for RecordingVisuals {
    fn build_point(&mut self, id: FeatureId, frame_w: Frame3, is_surface: bool) {
        self.push(VisualEvent::BuildPoint { id, origin_w: frame_w.origin, is_surface });
    }

    fn build_segment(&mut self, id: FeatureId, center_w: Frame3, extent_w: f32) {
        self.push(VisualEvent::BuildSegment { id, origin_w: center_w.origin, extent_w });
    }

    fn set_enabled(&mut self, id: FeatureId, enabled: bool) {
        self.push(VisualEvent::SetEnabled { id, enabled });
    }

    fn pre_render(&mut self, id: FeatureId, frame_w: Frame3, radius_w: f32) {
        self.push(VisualEvent::PreRender { id, origin_w: frame_w.origin, radius_w });
    }

    fn destroy(&mut self, id: FeatureId) {
        self.push(VisualEvent::Destroy { id });
    }
}
