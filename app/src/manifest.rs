//! RON scene manifests.
//!
//! A manifest lists objects with their mesh source, transform, parenting,
//! instancing and modifiers. [`build_scene`] turns it into a
//! [`MemoryScene`] the exporter can walk.
//!
//! ```ron
//! (
//!     objects: [
//!         (name: "floor", mesh: Some(Plane(size: 10.0, subdivisions: 4))),
//!         (
//!             name: "crate",
//!             mesh: Some(Cube(size: 1.0)),
//!             translation: (0.0, 0.0, 0.5),
//!             colors: [Solid(color: (0.8, 0.6, 0.2, 1.0))],
//!             resources: ["textures/crate.png"],
//!         ),
//!     ],
//! )
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use worldclient_core::math::Axis;
use worldclient_core::mesh::generators::{
    generate_cube, generate_plane, generate_points, generate_quad, generate_sphere,
};
use worldclient_core::mesh::{ColorLayer, EvaluatedMesh};
use worldclient_core::scene::{
    InstanceType, MemoryObject, MemoryScene, Modifier, NodeTransform, ObjectId,
};

/// Errors raised while loading or resolving a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("object '{object}' names unknown parent '{parent}'")]
    UnknownParent { object: String, parent: String },

    #[error("object name '{0}' is used more than once")]
    DuplicateName(String),
}

// ============================================================================
// Manifest types
// ============================================================================

/// Top-level manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub objects: Vec<ObjectManifest>,
}

/// One scene object.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectManifest {
    pub name: String,
    /// Objects without a mesh are exported as nothing (empties).
    #[serde(default)]
    pub mesh: Option<MeshSource>,
    #[serde(default)]
    pub translation: [f64; 3],
    /// Quaternion `(x, y, z, w)`.
    #[serde(default = "identity_rotation")]
    pub rotation: [f64; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    /// Name of the parent object.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub instance_type: InstanceKind,
    #[serde(default = "default_selected")]
    pub selected: bool,
    #[serde(default)]
    pub modifiers: Vec<ModifierManifest>,
    #[serde(default)]
    pub colors: Vec<ColorManifest>,
    /// Files referenced by the object (textures and the like).
    #[serde(default)]
    pub resources: Vec<PathBuf>,
}

fn identity_rotation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_selected() -> bool {
    true
}

/// Where an object's base mesh comes from.
#[derive(Debug, Clone, Deserialize)]
pub enum MeshSource {
    Cube { size: f64 },
    Quad { half_width: f64, half_height: f64 },
    Plane { size: f64, subdivisions: u32 },
    Sphere { radius: f64, segments: u32, rings: u32 },
    /// Loose vertices with no faces; useful as a vertex instancer.
    Points(Vec<[f64; 3]>),
    Inline {
        positions: Vec<[f64; 3]>,
        faces: Vec<Vec<u32>>,
    },
}

impl MeshSource {
    fn build(&self) -> EvaluatedMesh {
        match self {
            Self::Cube { size } => generate_cube(*size),
            Self::Quad {
                half_width,
                half_height,
            } => generate_quad(*half_width, *half_height),
            Self::Plane { size, subdivisions } => generate_plane(*size, *subdivisions),
            Self::Sphere {
                radius,
                segments,
                rings,
            } => generate_sphere(*radius, *segments, *rings),
            Self::Points(points) => generate_points(points),
            Self::Inline { positions, faces } => EvaluatedMesh::new()
                .with_positions(positions.clone())
                .with_faces(faces.iter().map(Vec::as_slice)),
        }
    }
}

/// Instancing mode of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum InstanceKind {
    #[default]
    None,
    Verts,
    Faces,
}

impl From<InstanceKind> for InstanceType {
    fn from(kind: InstanceKind) -> Self {
        match kind {
            InstanceKind::None => InstanceType::None,
            InstanceKind::Verts => InstanceType::Verts,
            InstanceKind::Faces => InstanceType::Faces,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MirrorAxis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Deserialize)]
pub enum ModifierManifest {
    Translate([f64; 3]),
    Mirror(MirrorAxis),
}

impl From<&ModifierManifest> for Modifier {
    fn from(manifest: &ModifierManifest) -> Self {
        match *manifest {
            ModifierManifest::Translate(offset) => Modifier::Translate(offset),
            ModifierManifest::Mirror(MirrorAxis::X) => Modifier::Mirror(Axis::X),
            ModifierManifest::Mirror(MirrorAxis::Y) => Modifier::Mirror(Axis::Y),
            ModifierManifest::Mirror(MirrorAxis::Z) => Modifier::Mirror(Axis::Z),
        }
    }
}

/// Vertex-colour layer.
#[derive(Debug, Clone, Deserialize)]
pub enum ColorManifest {
    /// One colour on every face corner.
    Solid {
        #[serde(default)]
        name: Option<String>,
        color: [f64; 4],
    },
    /// One colour per face corner, in face order.
    PerLoop {
        #[serde(default)]
        name: Option<String>,
        colors: Vec<[f64; 4]>,
    },
}

impl ColorManifest {
    fn build(&self, loop_count: usize) -> ColorLayer {
        let (name, layer) = match self {
            Self::Solid { name, color } => (name, ColorLayer::solid(*color, loop_count)),
            Self::PerLoop { name, colors } => (name, ColorLayer::new(colors.clone())),
        };
        match name {
            Some(name) => layer.with_name(name.clone()),
            None => layer,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Parse a manifest from RON text.
pub fn from_str(text: &str) -> Result<SceneManifest, ManifestError> {
    Ok(ron::from_str(text)?)
}

/// Load a manifest file.
pub fn load(path: &Path) -> Result<SceneManifest, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_str(&text)
}

/// Build an in-memory scene from a manifest.
///
/// Objects keep manifest order, so the object at manifest index `i` gets
/// `ObjectId(i)` and parents may be listed after their children.
pub fn build_scene(manifest: &SceneManifest) -> Result<MemoryScene, ManifestError> {
    let mut ids = HashMap::with_capacity(manifest.objects.len());
    for (index, object) in manifest.objects.iter().enumerate() {
        if ids.insert(object.name.as_str(), ObjectId(index)).is_some() {
            return Err(ManifestError::DuplicateName(object.name.clone()));
        }
    }

    let mut scene = MemoryScene::new();
    for object in &manifest.objects {
        let transform = NodeTransform::IDENTITY
            .with_translation(object.translation)
            .with_rotation(object.rotation)
            .with_scale(object.scale);

        let mut built = MemoryObject::new(object.name.clone())
            .with_transform(transform)
            .with_instance_type(object.instance_type.into())
            .with_selected(object.selected);

        if let Some(parent) = &object.parent {
            let id = ids.get(parent.as_str()).ok_or_else(|| ManifestError::UnknownParent {
                object: object.name.clone(),
                parent: parent.clone(),
            })?;
            built = built.with_parent(*id);
        }

        if let Some(source) = &object.mesh {
            let mut mesh = source.build();
            let loops = mesh.loop_count();
            for color in &object.colors {
                mesh = mesh.with_color_layer(color.build(loops));
            }
            built = built.with_mesh(mesh);
        } else if !object.colors.is_empty() {
            log::warn!("object '{}' has colours but no mesh", object.name);
        }

        for modifier in &object.modifiers {
            built = built.with_modifier(modifier.into());
        }
        for resource in &object.resources {
            built = built.with_resource(resource.clone());
        }

        scene.add(built);
    }

    log::debug!("Built scene with {} objects", scene.len());
    Ok(scene)
}
