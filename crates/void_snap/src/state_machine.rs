//! Snap stability state machine
//!
//! Damps per-frame snap target noise: a new best candidate (or the loss of
//! one) must persist for `snap_delay` seconds before it replaces the active
//! target. While a change is pending the previous active target stays in
//! effect.
//!
//! Usage:
//! 1. construct on drag start
//! 2. each frame, find the best candidate (or none)
//! 3. call [`SnapStateMachine::update_state`] with it and the current time
//! 4. if [`SnapStateMachine::is_snapped`], snap to the active target

use crate::elements::SnapCompare;

/// Default stability delay in seconds
pub const DEFAULT_SNAP_DELAY: f64 = 0.2;

/// Stability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapState {
    NoSnap,
    PendingChange,
    Snapped,
}

/// Debouncer over candidates of type `T` carrying a payload `D`
#[derive(Debug, Clone)]
pub struct SnapStateMachine<T, D = ()> {
    snap_delay: f64,
    state: SnapState,
    active: Option<(T, D)>,
    pending: Option<(T, D)>,
    pending_since: f64,
}

impl<T: SnapCompare, D> Default for SnapStateMachine<T, D> {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_DELAY)
    }
}

impl<T: SnapCompare, D> SnapStateMachine<T, D> {
    pub fn new(snap_delay: f64) -> Self {
        Self {
            snap_delay,
            state: SnapState::NoSnap,
            active: None,
            pending: None,
            pending_since: 0.0,
        }
    }

    #[inline]
    pub fn state(&self) -> SnapState {
        self.state
    }

    #[inline]
    pub fn snap_delay(&self) -> f64 {
        self.snap_delay
    }

    pub fn set_snap_delay(&mut self, seconds: f64) {
        self.snap_delay = seconds;
    }

    /// There is an active target to snap to
    #[inline]
    pub fn is_snapped(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_target(&self) -> Option<&T> {
        self.active.as_ref().map(|(t, _)| t)
    }

    pub fn active_data(&self) -> Option<&D> {
        self.active.as_ref().map(|(_, d)| d)
    }

    pub fn pending_target(&self) -> Option<&T> {
        self.pending.as_ref().map(|(t, _)| t)
    }

    /// Back to `NoSnap`, dropping active and pending targets
    pub fn reset(&mut self) {
        self.state = SnapState::NoSnap;
        self.active = None;
        self.pending = None;
    }

    /// Feed this frame's best candidate, observed at `now` seconds
    ///
    /// Returns true when the state or the active target changed.
    pub fn update_state(&mut self, candidate: Option<(T, D)>, now: f64) -> bool {
        let changed = match candidate {
            Some(hit) => self.on_hit(hit, now),
            None => self.on_miss(now),
        };
        if changed {
            log::trace!("SnapStateMachine: now {:?} at {:.3}s", self.state, now);
        }
        changed
    }

    fn on_hit(&mut self, hit: (T, D), now: f64) -> bool {
        match self.state {
            SnapState::NoSnap => {
                self.begin_pending(Some(hit), now);
                true
            }
            SnapState::Snapped => {
                let same = self.active.as_ref().map_or(false, |(a, _)| a.is_same(&hit.0));
                if same {
                    // same target, possibly moved
                    self.active = Some(hit);
                } else {
                    self.begin_pending(Some(hit), now);
                }
                true
            }
            SnapState::PendingChange => {
                let same = self.pending.as_ref().map_or(false, |(p, _)| p.is_same(&hit.0));
                if !same {
                    self.pending = Some(hit);
                    self.pending_since = now;
                    return false;
                }
                self.pending = Some(hit);
                if now - self.pending_since >= self.snap_delay {
                    self.state = SnapState::Snapped;
                    self.active = self.pending.take();
                    return true;
                }
                false
            }
        }
    }

    fn on_miss(&mut self, now: f64) -> bool {
        match self.state {
            SnapState::NoSnap => false,
            SnapState::Snapped => {
                self.begin_pending(None, now);
                true
            }
            SnapState::PendingChange => {
                if self.pending.is_some() {
                    self.pending = None;
                    self.pending_since = now;
                    false
                } else if now - self.pending_since >= self.snap_delay {
                    self.state = SnapState::NoSnap;
                    self.active = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn begin_pending(&mut self, pending: Option<(T, D)>, now: f64) {
        self.state = SnapState::PendingChange;
        self.pending = pending;
        self.pending_since = now;
    }
}

impl<T: SnapCompare> SnapStateMachine<T, ()> {
    /// [`update_state`](Self::update_state) without a payload
    pub fn update(&mut self, candidate: Option<T>, now: f64) -> bool {
        self.update_state(candidate.map(|c| (c, ())), now)
    }
}
