//! Scene object data types.
//!
//! Transforms are stored as plain arrays and composed into [`Mat4`] on
//! demand, so scene descriptions stay trivially serialisable.

use std::fmt;

use crate::math::{mat4_from_scale_rotation_translation, quat_from_array, Mat4, Vec3};

/// Stable handle of an object inside one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Object transform decomposed into translation, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    /// Translation [x, y, z].
    pub translation: [f64; 3],
    /// Rotation quaternion [x, y, z, w].
    pub rotation: [f64; 4],
    /// Scale [x, y, z].
    pub scale: [f64; 3],
}

impl NodeTransform {
    /// Identity transform: no translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Returns this transform with a different translation.
    #[must_use]
    pub const fn with_translation(mut self, translation: [f64; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Returns this transform with a different rotation.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: [f64; 4]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns this transform with a different scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Compose into a 4x4 matrix (`T * R * S`).
    pub fn to_matrix(&self) -> Mat4 {
        mat4_from_scale_rotation_translation(
            Vec3::from(self.scale),
            quat_from_array(self.rotation),
            Vec3::from(self.translation),
        )
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// How an object instances its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstanceType {
    /// No instancing.
    #[default]
    None,
    /// One copy of each child per vertex of this object's mesh.
    Verts,
    /// One copy of each child per face of this object's mesh.
    Faces,
}

impl InstanceType {
    /// True for vertex and face duplication. Children of such objects are
    /// emitted through their parent's instance expansion only.
    pub fn duplicates(self) -> bool {
        matches!(self, Self::Verts | Self::Faces)
    }

    /// Parse an instance type name (`none`, `verts`, `faces`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "verts" | "vertices" => Some(Self::Verts),
            "faces" => Some(Self::Faces),
            _ => None,
        }
    }
}

/// What the exporter needs to know about an object before evaluating it.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub name: String,
    pub parent: Option<ObjectId>,
    pub instance_type: InstanceType,
    pub selected: bool,
}

/// One renderable occurrence of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectInstance {
    /// Object whose mesh is evaluated for this occurrence.
    pub object: ObjectId,
    /// World-space transform.
    pub transform: Mat4,
    /// False for the object itself, true for instancer-generated copies.
    pub is_instance: bool,
}

impl ObjectInstance {
    /// The object itself at its world transform.
    pub fn primary(object: ObjectId, transform: Mat4) -> Self {
        Self {
            object,
            transform,
            is_instance: false,
        }
    }

    /// An instancer-generated copy.
    pub fn duplicate(object: ObjectId, transform: Mat4) -> Self {
        Self {
            object,
            transform,
            is_instance: true,
        }
    }
}
