//! Snapping configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};

/// Snap registry and solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Seconds a new candidate must persist before it is adopted
    pub snap_delay: f64,

    /// Visual angle (degrees) of the solver's catch radius
    pub snap_visual_degrees: f32,

    /// Visual angle (degrees) of a point's ray-hit sphere
    pub point_visual_degrees: f32,

    /// Visual angle (degrees) of a segment's ray-hit width
    pub segment_visual_degrees: f32,

    /// Distances closer than this count as a tie
    pub tie_epsilon: f32,

    /// Cache and query snap points
    pub enable_points: bool,

    /// Cache and query snap segments
    pub enable_segments: bool,

    /// Align orientation as well as position when snapped
    pub snap_orientation: bool,

    /// Build visual markers for cached features
    pub build_geometry: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_delay: 0.2,
            snap_visual_degrees: 2.0,
            point_visual_degrees: 2.25,
            segment_visual_degrees: 0.5,
            tie_epsilon: 1e-4,
            enable_points: true,
            enable_segments: false,
            snap_orientation: true,
            build_geometry: false,
        }
    }
}

impl SnapConfig {
    /// Immediate switching between targets, for scripted placement
    pub fn immediate() -> Self {
        Self {
            snap_delay: 0.0,
            ..Default::default()
        }
    }

    /// Points and edges, position only
    pub fn with_edges() -> Self {
        Self {
            enable_segments: true,
            snap_orientation: false,
            ..Default::default()
        }
    }

    /// Set the stability delay
    pub fn with_snap_delay(mut self, seconds: f64) -> Self {
        self.snap_delay = seconds;
        self
    }

    /// Set the solver catch angle
    pub fn with_snap_visual_degrees(mut self, degrees: f32) -> Self {
        self.snap_visual_degrees = degrees;
        self
    }

    pub fn with_point_visual_degrees(mut self, degrees: f32) -> Self {
        self.point_visual_degrees = degrees;
        self
    }

    pub fn with_segment_visual_degrees(mut self, degrees: f32) -> Self {
        self.segment_visual_degrees = degrees;
        self
    }

    pub fn with_tie_epsilon(mut self, epsilon: f32) -> Self {
        self.tie_epsilon = epsilon;
        self
    }

    /// Toggle the two feature classes
    pub fn with_features(mut self, points: bool, segments: bool) -> Self {
        self.enable_points = points;
        self.enable_segments = segments;
        self
    }

    pub fn with_snap_orientation(mut self, enabled: bool) -> Self {
        self.snap_orientation = enabled;
        self
    }

    pub fn with_build_geometry(mut self, enabled: bool) -> Self {
        self.build_geometry = enabled;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.snap_delay.is_finite() || self.snap_delay < 0.0 {
            return Err(SnapError::InvalidConfig(format!(
                "snap_delay must be a non-negative number of seconds, got {}",
                self.snap_delay
            )));
        }
        let angles = [
            ("snap_visual_degrees", self.snap_visual_degrees),
            ("point_visual_degrees", self.point_visual_degrees),
            ("segment_visual_degrees", self.segment_visual_degrees),
        ];
        for (name, value) in angles {
            if !value.is_finite() || value <= 0.0 || value >= 180.0 {
                return Err(SnapError::InvalidConfig(format!(
                    "{} must be in (0, 180), got {}",
                    name, value
                )));
            }
        }
        if !self.tie_epsilon.is_finite() || self.tie_epsilon <= 0.0 {
            return Err(SnapError::InvalidConfig(format!(
                "tie_epsilon must be positive, got {}",
                self.tie_epsilon
            )));
        }
        Ok(())
    }

    /// Panic with the validation message when the config is out of range
    pub(crate) fn assert_valid(&self, owner: &str) {
        if let Err(e) = self.validate() {
            panic!("{}: {}", owner, e);
        }
    }
}
