//! Void Snap - Interactive Snapping Engine
//!
//! While the user drags an object, the engine proposes a corrected frame
//! that aligns it with landmarks on other objects: centers, face centers,
//! corners, curve endpoints, pivots and edges.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────────────────┐   ┌──────────────────┐
//! │ Generators │──▶│ SnapSet                  │──▶│ DynamicSnapSolver│
//! │ (per kind) │   │  caches  ▸ live lists    │   │  probes          │
//! └────────────┘   │  active / ignore sets    │   │  SnapStateMachine│
//!                  │  ray + radius queries    │   └────────┬─────────┘
//!                  └──────────────────────────┘            ▼
//!                                                 corrected world frame
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_snap::prelude::*;
//!
//! let config = SnapConfig::default();
//! let mut snaps = SnapSet::create_standard(config.clone());
//! snaps.begin_drag(&scene, dragged, scene.ids());
//!
//! let mut solver = DynamicSnapSolver::new(&scene, dragged, &config, Box::new(MonotonicClock::new()));
//! // every frame
//! snaps.pre_render(&scene);
//! let frame_w = solver.update_snap_w(&scene, &proposed_w, &snaps);
//!
//! // on release
//! solver.disconnect();
//! snaps.end_drag(dragged);
//! ```

mod cache;
pub mod clock;
pub mod config;
pub mod elements;
pub mod error;
pub mod generator;
pub mod id;
pub mod snap_set;
pub mod solver;
pub mod state_machine;
pub mod visuals;

pub use clock::{ManualClock, MonotonicClock, SnapClock};
pub use config::SnapConfig;
pub use elements::{SnapCompare, SnapKind, SnapPoint, SnapResult, SnapSegment, PIVOT_PRIORITY, STANDARD_PRIORITY};
pub use error::{Result, SnapError};
pub use generator::{CurveSnapGenerator, PrimitiveSnapGenerator, SnapGenerator};
pub use id::{FeatureId, FeatureIdAllocator};
pub use snap_set::SnapSet;
pub use solver::DynamicSnapSolver;
pub use state_machine::{SnapState, SnapStateMachine};
pub use visuals::{NullVisuals, RecordingVisuals, SnapVisuals, VisualEvent};

pub mod prelude {
    //! Common imports for snapping
    pub use crate::clock::{ManualClock, MonotonicClock, SnapClock};
    pub use crate::config::SnapConfig;
    pub use crate::elements::{SnapCompare, SnapKind, SnapResult};
    pub use crate::error::{Result, SnapError};
    pub use crate::generator::SnapGenerator;
    pub use crate::id::{FeatureId, FeatureIdAllocator};
    pub use crate::snap_set::SnapSet;
    pub use crate::solver::DynamicSnapSolver;
    pub use crate::state_machine::{SnapState, SnapStateMachine};
    pub use crate::visuals::{NullVisuals, SnapVisuals};
    pub use void_scene::prelude::*;
}
