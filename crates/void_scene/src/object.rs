//! Scene objects and their categories

use void_math::{Frame3, Vec3};

/// Scene object identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

/// Parametric primitive shapes, dimensions in object-local units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrimitiveShape {
    Box { width: f32, height: f32, depth: f32 },
    /// Axis along local Y
    Cylinder { radius: f32, height: f32 },
    Sphere { radius: f32 },
}

impl PrimitiveShape {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveShape::Box { .. } => "Box",
            PrimitiveShape::Cylinder { .. } => "Cylinder",
            PrimitiveShape::Sphere { .. } => "Sphere",
        }
    }

    /// Axis-aligned cube
    pub fn cube(size: f32) -> Self {
        PrimitiveShape::Box { width: size, height: size, depth: size }
    }
}

/// Polyline curve through local-space vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyCurve {
    vertices: Vec<Vec3>,
}

impl PolyCurve {
    pub fn new(vertices: impl Into<Vec<Vec3>>) -> Self {
        Self { vertices: vertices.into() }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn start(&self) -> Option<Vec3> {
        self.vertices.first().copied()
    }

    pub fn end(&self) -> Option<Vec3> {
        self.vertices.last().copied()
    }

    /// Unit tangent at vertex `i`.
    ///
    /// Forward difference at the first vertex, backward difference at the
    /// last, central difference in between. Zero for degenerate curves.
    pub fn tangent(&self, i: usize) -> Vec3 {
        let n = self.vertices.len();
        if n < 2 || i >= n {
            return Vec3::ZERO;
        }
        let (a, b) = if i == 0 {
            (0, 1)
        } else if i == n - 1 {
            (n - 2, n - 1)
        } else {
            (i - 1, i + 1)
        };
        (self.vertices[b] - self.vertices[a]).normalize_or_zero()
    }
}

/// Closed set of object categories the snapping engine understands.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    Primitive(PrimitiveShape),
    Curve(PolyCurve),
    /// Container; children are listed on the owning [`SceneObject`]
    Group,
    /// Bare positioned frame
    Pivot,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Primitive(shape) => shape.name(),
            ObjectKind::Curve(_) => "Curve",
            ObjectKind::Group => "Group",
            ObjectKind::Pivot => "Pivot",
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ObjectKind::Group)
    }

    pub fn is_pivot(&self) -> bool {
        matches!(self, ObjectKind::Pivot)
    }
}

/// A scene object with its placement in the hierarchy.
#[derive(Clone, Debug)]
pub struct SceneObject {
    /// Unique identifier
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Shape category
    pub kind: ObjectKind,
    /// Frame relative to the parent group (or the scene root)
    pub placement: Frame3,
    /// Uniform scale applied to the object's local geometry
    pub scale: f32,
    /// Parent group
    pub parent: Option<ObjectId>,
    /// Ordered children (groups only)
    pub children: Vec<ObjectId>,
    /// Modification stamp, strictly increasing on every change
    pub timestamp: u64,
}

impl SceneObject {
    pub(crate) fn new(id: ObjectId, name: String, kind: ObjectKind, placement: Frame3, timestamp: u64) -> Self {
        Self {
            id,
            name,
            kind,
            placement,
            scale: 1.0,
            parent: None,
            children: Vec::new(),
            timestamp,
        }
    }
}
