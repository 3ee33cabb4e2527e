//! Scene storage, hierarchy and coordinate spaces.
//!
//! Three spaces matter to snapping:
//! - **object** space: an object's own local frame, scaled by its uniform scale
//! - **scene** space: relative to the scene root, before any viewer transform
//! - **world** space: scene space mapped through the root frame and the scene scale
//!
//! Every mutation stamps the touched object with the next value of a
//! scene-wide counter, so timestamps only ever grow.

use std::collections::HashMap;

use void_math::{radians, Frame3, Vec3};

use crate::error::{Result, SceneError};
use crate::object::{ObjectId, ObjectKind, SceneObject};

/// In-memory scene graph.
#[derive(Clone, Debug)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    /// Insertion order, for deterministic iteration
    order: Vec<ObjectId>,
    next_object_id: u32,
    modification_counter: u64,
    /// Scene root placed in world space
    root: Frame3,
    /// World units per scene unit
    scene_scale: f32,
    camera_position: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
            next_object_id: 1,
            modification_counter: 0,
            root: Frame3::IDENTITY,
            scene_scale: 1.0,
            camera_position: Vec3::new(0.0, 0.0, 10.0),
        }
    }

    fn next_stamp(&mut self) -> u64 {
        self.modification_counter += 1;
        self.modification_counter
    }

    fn touch(&mut self, id: ObjectId) {
        let stamp = self.next_stamp();
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.timestamp = stamp;
        }
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Add a root-level object.
    pub fn add_object(&mut self, name: impl Into<String>, kind: ObjectKind, placement: Frame3) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        let stamp = self.next_stamp();
        let name = name.into();
        log::debug!("Scene: added {} '{}' ({})", id, name, kind.name());
        self.objects.insert(id, SceneObject::new(id, name, kind, placement, stamp));
        self.order.push(id);
        id
    }

    /// Add a group and attach `children` to it in order.
    pub fn add_group(&mut self, name: impl Into<String>, placement: Frame3, children: &[ObjectId]) -> Result<ObjectId> {
        if let Some(missing) = children.iter().find(|c| !self.contains(**c)) {
            return Err(SceneError::UnknownObject(*missing));
        }
        let group = self.add_object(name, ObjectKind::Group, placement);
        for &child in children {
            self.add_child(group, child)?;
        }
        Ok(group)
    }

    /// Attach `child` under `group`, detaching it from any previous parent.
    ///
    /// The child's placement is kept and is from now on read relative to `group`.
    pub fn add_child(&mut self, group: ObjectId, child: ObjectId) -> Result<()> {
        let group_obj = self.objects.get(&group).ok_or(SceneError::UnknownObject(group))?;
        if !group_obj.kind.is_group() {
            return Err(SceneError::NotAGroup(group));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownObject(child));
        }
        if child == group || self.ancestors(group).contains(&child) {
            return Err(SceneError::CycleDetected { group, child });
        }

        self.detach(child);
        if let Some(g) = self.objects.get_mut(&group) {
            g.children.push(child);
        }
        if let Some(c) = self.objects.get_mut(&child) {
            c.parent = Some(group);
        }
        self.touch(group);
        self.touch(child);
        Ok(())
    }

    fn detach(&mut self, child: ObjectId) {
        let parent = self.objects.get(&child).and_then(|c| c.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.objects.get_mut(&parent) {
                p.children.retain(|&c| c != child);
            }
            if let Some(c) = self.objects.get_mut(&child) {
                c.parent = None;
            }
            self.touch(parent);
        }
    }

    /// Remove an object and, recursively, its children.
    ///
    /// Returns the removed ids, parent first.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Vec<ObjectId>> {
        if !self.contains(id) {
            return Err(SceneError::UnknownObject(id));
        }
        self.detach(id);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(obj) = self.objects.remove(&next) {
                stack.extend(obj.children.iter().rev().copied());
                removed.push(next);
            }
        }
        self.order.retain(|o| !removed.contains(o));
        log::debug!("Scene: removed {} object(s) starting at {}", removed.len(), id);
        Ok(removed)
    }

    pub fn set_placement(&mut self, id: ObjectId, placement: Frame3) -> Result<()> {
        let obj = self.objects.get_mut(&id).ok_or(SceneError::UnknownObject(id))?;
        obj.placement = placement;
        self.touch(id);
        Ok(())
    }

    pub fn set_scale(&mut self, id: ObjectId, scale: f32) -> Result<()> {
        let obj = self.objects.get_mut(&id).ok_or(SceneError::UnknownObject(id))?;
        obj.scale = scale;
        self.touch(id);
        Ok(())
    }

    pub fn set_kind(&mut self, id: ObjectId, kind: ObjectKind) -> Result<()> {
        let obj = self.objects.get_mut(&id).ok_or(SceneError::UnknownObject(id))?;
        if !obj.children.is_empty() && !kind.is_group() {
            return Err(SceneError::HasChildren(id));
        }
        obj.kind = kind;
        self.touch(id);
        Ok(())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Object by id.
    ///
    /// # Panics
    /// Panics if `id` is not part of the scene; callers hold ids they
    /// got from this scene, so a miss is a lifecycle bug.
    pub fn get(&self, id: ObjectId) -> &SceneObject {
        match self.objects.get(&id) {
            Some(obj) => obj,
            None => panic!("{} is not registered in the scene", id),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All object ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.order.iter().copied()
    }

    /// Ids of objects matching `predicate`, in insertion order.
    pub fn find(&self, mut predicate: impl FnMut(&SceneObject) -> bool) -> Vec<ObjectId> {
        self.order
            .iter()
            .filter(|id| self.objects.get(*id).map_or(false, &mut predicate))
            .copied()
            .collect()
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.objects.get(&id).map_or(&[], |o| o.children.as_slice())
    }

    /// Parent chain, nearest first.
    pub fn ancestors(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut cur = self.objects.get(&id).and_then(|o| o.parent);
        while let Some(p) = cur {
            chain.push(p);
            cur = self.objects.get(&p).and_then(|o| o.parent);
        }
        chain
    }

    // ------------------------------------------------------------------
    // Timestamps
    // ------------------------------------------------------------------

    /// Modification stamp of a single object.
    pub fn timestamp(&self, id: ObjectId) -> u64 {
        self.get(id).timestamp
    }

    /// Latest stamp over an object and all of its descendants.
    pub fn subtree_timestamp(&self, id: ObjectId) -> u64 {
        let obj = self.get(id);
        obj.children
            .iter()
            .map(|&c| self.subtree_timestamp(c))
            .fold(obj.timestamp, u64::max)
    }

    // ------------------------------------------------------------------
    // Object <-> scene
    // ------------------------------------------------------------------

    /// Object frame in scene space, through the parent chain.
    pub fn scene_frame(&self, id: ObjectId) -> Frame3 {
        let obj = self.get(id);
        match obj.parent {
            None => obj.placement,
            Some(parent) => self.object_to_scene(parent, &obj.placement),
        }
    }

    /// Accumulated uniform scale from the scene root down to `id`.
    pub fn scene_scale_of(&self, id: ObjectId) -> f32 {
        let obj = self.get(id);
        match obj.parent {
            None => obj.scale,
            Some(parent) => obj.scale * self.scene_scale_of(parent),
        }
    }

    /// Map a frame given in `id`'s local space into scene space.
    pub fn object_to_scene(&self, id: ObjectId, local: &Frame3) -> Frame3 {
        let frame = self.scene_frame(id);
        let scale = self.scene_scale_of(id);
        Frame3::new(
            frame.from_frame_point(local.origin * scale),
            (frame.rotation * local.rotation).normalize(),
        )
    }

    pub fn object_to_scene_point(&self, id: ObjectId, p: Vec3) -> Vec3 {
        self.scene_frame(id).from_frame_point(p * self.scene_scale_of(id))
    }

    pub fn object_to_scene_dimension(&self, id: ObjectId, d: f32) -> f32 {
        d * self.scene_scale_of(id)
    }

    // ------------------------------------------------------------------
    // Scene <-> world
    // ------------------------------------------------------------------

    pub fn scene_scale(&self) -> f32 {
        self.scene_scale
    }

    pub fn set_scene_scale(&mut self, scale: f32) {
        self.scene_scale = scale;
    }

    pub fn root_frame(&self) -> Frame3 {
        self.root
    }

    pub fn set_root_frame(&mut self, root: Frame3) {
        self.root = root;
    }

    pub fn to_world_point(&self, p: Vec3) -> Vec3 {
        self.root.from_frame_point(p * self.scene_scale)
    }

    pub fn to_scene_point(&self, p: Vec3) -> Vec3 {
        self.root.to_frame_point(p) / self.scene_scale
    }

    pub fn to_world_frame(&self, f: &Frame3) -> Frame3 {
        Frame3::new(
            self.to_world_point(f.origin),
            (self.root.rotation * f.rotation).normalize(),
        )
    }

    pub fn to_scene_frame(&self, f: &Frame3) -> Frame3 {
        Frame3::new(
            self.to_scene_point(f.origin),
            (self.root.rotation.conjugate() * f.rotation).normalize(),
        )
    }

    pub fn to_world_dimension(&self, d: f32) -> f32 {
        d * self.scene_scale
    }

    pub fn to_scene_dimension(&self, d: f32) -> f32 {
        d / self.scene_scale
    }

    // ------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn set_camera_position(&mut self, position: Vec3) {
        self.camera_position = position;
    }

    /// World radius of a sphere at `point` that subtends `degrees` from the camera.
    pub fn radius_for_visual_angle(&self, point: Vec3, degrees: f32) -> f32 {
        let distance = point.distance(self.camera_position);
        distance * (radians(degrees) * 0.5).tan()
    }
}
