//! Per-drag snap solver
//!
//! Built when a drag starts on a target object. The target's own snap
//! points become probe frames, frozen in the target's local space. Every
//! frame the solver places the probes at the proposed (unsnapped) frame,
//! asks the registry for the nearest point to each, runs the best pairing
//! through a [`SnapStateMachine`], and, while snapped, returns a corrected
//! frame that puts the matching probe exactly on the target point.

use void_math::Frame3;
use void_scene::{ObjectId, Scene};

use crate::clock::SnapClock;
use crate::config::SnapConfig;
use crate::elements::SnapResult;
use crate::generator::{collect_points, standard_generators};
use crate::id::{FeatureId, FeatureIdAllocator};
use crate::snap_set::SnapSet;
use crate::state_machine::SnapStateMachine;
use crate::visuals::SnapVisuals;

/// Probe indicator size relative to the point hit size
const INDICATOR_SCALE: f32 = 0.75;

/// Drag-time snap solver for one target object
pub struct DynamicSnapSolver {
    target: ObjectId,
    /// Probe frames in the target's scene-scaled local space
    probes_l: Vec<Frame3>,
    snap_state: SnapStateMachine<SnapResult, Frame3>,
    snap_visual_degrees: f32,
    snap_orientation: bool,
    snap_frame_s: Frame3,
    clock: Box<dyn SnapClock>,
    indicators: Option<(Box<dyn SnapVisuals>, Vec<FeatureId>)>,
    disconnected: bool,
}

impl DynamicSnapSolver {
    /// Solver for dragging `target`
    ///
    /// # Panics
    /// Panics if `target` is not in `scene` or `config` fails [`SnapConfig::validate`].
    pub fn new(scene: &Scene, target: ObjectId, config: &SnapConfig, clock: Box<dyn SnapClock>) -> Self {
        config.assert_valid("DynamicSnapSolver");
        assert!(scene.contains(target), "DynamicSnapSolver: {} is not registered in the scene", target);

        let target_s = scene.scene_frame(target);
        let ids = FeatureIdAllocator::new();
        let probes_l: Vec<Frame3> = collect_points(&standard_generators(), scene, target, &ids)
            .iter()
            .map(|p| target_s.to_frame(&p.frame_s(scene)))
            .collect();

        if probes_l.is_empty() {
            log::warn!("DynamicSnapSolver: {} has no snap probes", target);
        }
        log::debug!("DynamicSnapSolver: created for {} with {} probe(s)", target, probes_l.len());

        Self {
            target,
            probes_l,
            snap_state: SnapStateMachine::new(config.snap_delay),
            snap_visual_degrees: config.snap_visual_degrees,
            snap_orientation: config.snap_orientation,
            snap_frame_s: target_s,
            clock,
            indicators: None,
            disconnected: false,
        }
    }

    /// Show a marker at every probe through `visuals`
    pub fn with_indicators(mut self, scene: &Scene, mut visuals: Box<dyn SnapVisuals>, point_visual_degrees: f32) -> Self {
        let ids = FeatureIdAllocator::shared();
        let target_s = scene.scene_frame(self.target);
        let handles = self
            .probes_l
            .iter()
            .map(|probe| {
                let id = ids.allocate();
                let frame_w = scene.to_world_frame(&target_s.from_frame(probe));
                visuals.build_point(id, frame_w, true);
                let radius = scene.radius_for_visual_angle(frame_w.origin, point_visual_degrees) * INDICATOR_SCALE;
                visuals.pre_render(id, frame_w, radius);
                id
            })
            .collect();
        self.indicators = Some((visuals, handles));
        self
    }

    #[inline]
    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn probe_frames(&self) -> &[Frame3] {
        &self.probes_l
    }

    pub fn snap_orientation(&self) -> bool {
        self.snap_orientation
    }

    pub fn set_snap_orientation(&mut self, enabled: bool) {
        self.snap_orientation = enabled;
    }

    pub fn snap_visual_degrees(&self) -> f32 {
        self.snap_visual_degrees
    }

    pub fn set_snap_visual_degrees(&mut self, degrees: f32) {
        self.snap_visual_degrees = degrees;
    }

    /// Last snapped frame in scene space
    pub fn snap_frame_s(&self) -> Frame3 {
        self.snap_frame_s
    }

    pub fn is_snapped(&self) -> bool {
        self.snap_state.is_snapped()
    }

    /// Target currently snapped to
    pub fn active_snap(&self) -> Option<&SnapResult> {
        self.snap_state.active_target()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Snapped world frame for `proposed_w`, or `proposed_w` itself when not snapped
    ///
    /// # Panics
    /// Panics if called after [`disconnect`](Self::disconnect).
    pub fn update_snap_w(&mut self, scene: &Scene, proposed_w: &Frame3, snaps: &SnapSet) -> Frame3 {
        assert!(
            !self.disconnected,
            "DynamicSnapSolver: update_snap_w called after disconnect for {}",
            self.target
        );

        let radius_w = scene.radius_for_visual_angle(proposed_w.origin, self.snap_visual_degrees);
        let radius_s = scene.to_scene_dimension(radius_w);
        let source_s = scene.to_scene_frame(proposed_w);

        // nearest over all probes; registry priority only breaks ties within a probe
        let mut best: Option<(SnapResult, Frame3)> = None;
        let mut nearest = f32::MAX;
        for probe_l in &self.probes_l {
            let probe_s = source_s.from_frame(probe_l);
            if let Some(snap) = snaps.find_nearest_snap_point_s(scene, &probe_s, radius_s) {
                let d = snap.frame_s.origin.distance(probe_s.origin);
                if d < nearest {
                    nearest = d;
                    best = Some((snap, *probe_l));
                }
            }
        }

        let now = self.clock.now();
        if self.snap_state.update_state(best, now) {
            log::trace!(
                "DynamicSnapSolver: {} {}",
                self.target,
                match self.snap_state.active_target() {
                    Some(snap) => format!("snapped to {}", snap),
                    None => "released".to_string(),
                }
            );
        }

        let (Some(snap), Some(probe_l)) = (self.snap_state.active_target(), self.snap_state.active_data()) else {
            return *proposed_w;
        };

        self.snap_frame_s = if self.snap_orientation {
            let aligned_s = Frame3::solve_min_rotation(&source_s, &snap.frame_s);
            let probe_s = aligned_s.from_frame(probe_l);
            aligned_s.translated(snap.frame_s.origin - probe_s.origin)
        } else {
            let probe_s = source_s.from_frame(probe_l);
            source_s.translated(snap.frame_s.origin - probe_s.origin)
        };
        scene.to_world_frame(&self.snap_frame_s)
    }

    /// Release probe indicators. The registry is left untouched.
    pub fn disconnect(&mut self) {
        if self.disconnected {
            return;
        }
        if let Some((mut visuals, handles)) = self.indicators.take() {
            for id in handles {
                visuals.destroy(id);
            }
        }
        self.snap_state.reset();
        self.disconnected = true;
        log::debug!("DynamicSnapSolver: disconnected from {}", self.target);
    }
}

impl std::fmt::Debug for DynamicSnapSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicSnapSolver")
            .field("target", &self.target)
            .field("probes", &self.probes_l.len())
            .field("snap_orientation", &self.snap_orientation)
            .field("state", &self.snap_state.state())
            .field("disconnected", &self.disconnected)
            .finish()
    }
}
