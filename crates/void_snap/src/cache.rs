//! Per-object feature caches and the live query list built from them

use std::collections::HashMap;

use void_scene::ObjectId;

use crate::elements::{SnapPoint, SnapSegment};
use crate::id::FeatureId;
use crate::visuals::SnapVisuals;

/// What the cache needs from a feature
pub(crate) trait Feature {
    fn feature_id(&self) -> FeatureId;
    fn set_live(&mut self, enabled: bool);
}

impl Feature for SnapPoint {
    fn feature_id(&self) -> FeatureId {
        self.id()
    }

    fn set_live(&mut self, enabled: bool) {
        self.set_enabled(enabled);
    }
}

impl Feature for SnapSegment {
    fn feature_id(&self) -> FeatureId {
        self.id()
    }

    fn set_live(&mut self, enabled: bool) {
        self.set_enabled(enabled);
    }
}

/// Features generated for one object, stamped with the object's timestamp
/// at generation
#[derive(Debug)]
struct CachedFeatures<T> {
    timestamp: u64,
    features: Vec<T>,
}

/// Position of a live feature inside its owner's cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FeatureKey {
    owner: ObjectId,
    slot: usize,
}

/// One feature class: per-object caches plus the live list queries scan
///
/// The live list holds exactly the features of linked owners, each once.
#[derive(Debug)]
pub(crate) struct FeatureLayer<T> {
    cache: HashMap<ObjectId, CachedFeatures<T>>,
    live: Vec<FeatureKey>,
}

impl<T> Default for FeatureLayer<T> {
    fn default() -> Self {
        Self {
            cache: HashMap::new(),
            live: Vec::new(),
        }
    }
}

impl<T: Feature> FeatureLayer<T> {
    pub fn cached(&self, owner: ObjectId) -> Option<&[T]> {
        self.cache.get(&owner).map(|c| c.features.as_slice())
    }

    /// Cache entry exists and was generated at `timestamp`
    pub fn is_fresh(&self, owner: ObjectId, timestamp: u64) -> bool {
        self.cache.get(&owner).map_or(false, |c| c.timestamp == timestamp)
    }

    pub fn is_linked(&self, owner: ObjectId) -> bool {
        self.live.iter().any(|k| k.owner == owner)
    }

    /// Put `owner`'s cached features into the live list
    pub fn link(&mut self, owner: ObjectId, visuals: &mut dyn SnapVisuals) {
        if self.is_linked(owner) {
            return;
        }
        let Some(entry) = self.cache.get_mut(&owner) else {
            return;
        };
        for (slot, feature) in entry.features.iter_mut().enumerate() {
            feature.set_live(true);
            visuals.set_enabled(feature.feature_id(), true);
            self.live.push(FeatureKey { owner, slot });
        }
    }

    /// Take `owner`'s features out of the live list; the cache is kept
    pub fn unlink(&mut self, owner: ObjectId, visuals: &mut dyn SnapVisuals) {
        if !self.is_linked(owner) {
            return;
        }
        self.live.retain(|k| k.owner != owner);
        if let Some(entry) = self.cache.get_mut(&owner) {
            for feature in entry.features.iter_mut() {
                feature.set_live(false);
                visuals.set_enabled(feature.feature_id(), false);
            }
        }
    }

    /// Drop `owner`'s cache entry, unlinking it first
    ///
    /// Returns the number of destroyed features.
    pub fn destroy(&mut self, owner: ObjectId, visuals: &mut dyn SnapVisuals) -> usize {
        self.live.retain(|k| k.owner != owner);
        match self.cache.remove(&owner) {
            Some(entry) => {
                for feature in &entry.features {
                    visuals.destroy(feature.feature_id());
                }
                entry.features.len()
            }
            None => 0,
        }
    }

    /// Replace `owner`'s features, keeping it linked if it was
    pub fn replace(&mut self, owner: ObjectId, timestamp: u64, mut features: Vec<T>, visuals: &mut dyn SnapVisuals) {
        let was_linked = self.is_linked(owner);
        self.destroy(owner, visuals);
        for feature in features.iter_mut() {
            feature.set_live(false);
        }
        self.cache.insert(owner, CachedFeatures { timestamp, features });
        if was_linked {
            self.link(owner, visuals);
        }
    }

    /// Destroy everything
    pub fn clear(&mut self, visuals: &mut dyn SnapVisuals) -> usize {
        let owners: Vec<ObjectId> = self.cache.keys().copied().collect();
        owners.into_iter().map(|owner| self.destroy(owner, visuals)).sum()
    }

    /// Live features in link order
    pub fn live(&self) -> impl Iterator<Item = &T> + '_ {
        self.live
            .iter()
            .filter_map(move |k| self.cache.get(&k.owner).and_then(|c| c.features.get(k.slot)))
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FeatureIdAllocator;
    use crate::visuals::{NullVisuals, RecordingVisuals, VisualEvent};
    use void_math::Frame3;

    fn points(ids: &FeatureIdAllocator, owner: ObjectId, n: usize) -> Vec<SnapPoint> {
        (0..n).map(|_| SnapPoint::new(ids.allocate(), owner, Frame3::IDENTITY)).collect()
    }

    #[test]
    fn test_link_is_idempotent() {
        let ids = FeatureIdAllocator::new();
        let mut layer = FeatureLayer::default();
        let mut visuals = NullVisuals;
        let a = ObjectId(1);
        layer.replace(a, 1, points(&ids, a, 3), &mut visuals);

        layer.link(a, &mut visuals);
        layer.link(a, &mut visuals);
        assert_eq!(layer.live_len(), 3);

        layer.unlink(a, &mut visuals);
        assert_eq!(layer.live_len(), 0);
        assert_eq!(layer.cached(a).map(|c| c.len()), Some(3));
        assert!(layer.cached(a).unwrap().iter().all(|p| !p.is_enabled()));
    }

    #[test]
    fn test_replace_keeps_link_state() {
        let ids = FeatureIdAllocator::new();
        let mut layer = FeatureLayer::default();
        let mut visuals = RecordingVisuals::new();
        let a = ObjectId(1);
        let b = ObjectId(2);
        layer.replace(a, 1, points(&ids, a, 2), &mut visuals);
        layer.replace(b, 1, points(&ids, b, 2), &mut visuals);
        layer.link(a, &mut visuals);
        layer.link(b, &mut visuals);

        layer.replace(a, 2, points(&ids, a, 4), &mut visuals);
        assert!(layer.is_fresh(a, 2));
        assert_eq!(layer.live_len(), 6);
        assert_eq!(layer.live().filter(|p| p.source() == a).count(), 4);
        assert_eq!(visuals.count(|e| matches!(e, VisualEvent::Destroy { .. })), 2);
    }

    #[test]
    fn test_clear_destroys_all() {
        let ids = FeatureIdAllocator::new();
        let mut layer = FeatureLayer::default();
        let mut visuals = NullVisuals;
        layer.replace(ObjectId(1), 1, points(&ids, ObjectId(1), 2), &mut visuals);
        layer.replace(ObjectId(2), 1, points(&ids, ObjectId(2), 5), &mut visuals);
        layer.link(ObjectId(2), &mut visuals);

        assert_eq!(layer.clear(&mut visuals), 7);
        assert_eq!(layer.live_len(), 0);
        assert!(layer.cached(ObjectId(1)).is_none());
        assert!(layer.cached(ObjectId(2)).is_none());
    }
}
