//! Void Scene - Scene Graph for Snapping
//!
//! The scene collaborator the snapping engine reads from: objects with a
//! closed set of kinds, a group hierarchy, per-object modification
//! timestamps, and conversions between object, scene and world space.
//!
//! # Example
//!
//! ```ignore
//! use void_scene::prelude::*;
//!
//! let mut scene = Scene::new();
//! let cube = scene.add_object(
//!     "cube",
//!     ObjectKind::Primitive(PrimitiveShape::cube(1.0)),
//!     Frame3::IDENTITY,
//! );
//! let top = scene.object_to_scene_point(cube, Vec3::new(0.0, 0.5, 0.0));
//! ```

pub mod error;
pub mod object;
pub mod scene;

pub use error::{Result, SceneError};
pub use object::{ObjectId, ObjectKind, PolyCurve, PrimitiveShape, SceneObject};
pub use scene::Scene;

pub mod prelude {
    //! Common imports for scene access
    pub use crate::error::{Result, SceneError};
    pub use crate::object::{ObjectId, ObjectKind, PolyCurve, PrimitiveShape, SceneObject};
    pub use crate::scene::Scene;
    pub use void_math::prelude::*;
}
