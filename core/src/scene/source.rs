//! Host scene capability interface.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use crate::error::{InstanceGraphError, MeshEvalError};
use crate::math::Mat4;
use crate::mesh::EvaluatedMesh;

use super::{ObjectId, ObjectInfo, ObjectInstance};

/// Everything the exporter asks of the application that owns the scene.
///
/// The exporter never touches a scene graph directly. It enumerates objects,
/// asks for their transforms and instance lists, and has meshes evaluated
/// one at a time. Every mesh returned by [`evaluate_mesh`](Self::evaluate_mesh)
/// is handed back through [`release_mesh`](Self::release_mesh) before the
/// next one is requested.
pub trait SceneSource {
    /// Objects in export order.
    ///
    /// This includes children of instancers; the exporter skips those itself.
    fn top_level_objects(&self) -> Vec<ObjectId>;

    /// Describe an object, or `None` if the id is unknown.
    fn object_info(&self, object: ObjectId) -> Option<ObjectInfo>;

    /// World-space transform of an object.
    fn world_transform(&self, object: ObjectId) -> Result<Mat4, InstanceGraphError>;

    /// The object itself followed by every copy its instancer settings
    /// generate, each with its own world transform.
    fn expand_instances(
        &self,
        object: ObjectId,
    ) -> Result<Vec<ObjectInstance>, InstanceGraphError>;

    /// Evaluate an object to a concrete mesh.
    ///
    /// `Ok(None)` means the object has no geometry (an empty, a camera...).
    fn evaluate_mesh(
        &self,
        object: ObjectId,
        apply_modifiers: bool,
    ) -> Result<Option<EvaluatedMesh>, MeshEvalError>;

    /// Give an evaluated mesh back.
    fn release_mesh(&self, object: ObjectId, mesh: EvaluatedMesh) {
        let _ = object;
        drop(mesh);
    }

    /// External files (textures and the like) the object refers to.
    fn resource_paths(&self, object: ObjectId) -> Vec<PathBuf> {
        let _ = object;
        Vec::new()
    }
}

/// An evaluated mesh that is released back to its scene when dropped.
pub struct MeshGuard<'a, S: SceneSource + ?Sized> {
    source: &'a S,
    object: ObjectId,
    mesh: EvaluatedMesh,
}

impl<'a, S: SceneSource + ?Sized> MeshGuard<'a, S> {
    pub fn new(source: &'a S, object: ObjectId, mesh: EvaluatedMesh) -> Self {
        Self {
            source,
            object,
            mesh,
        }
    }

    /// Object the mesh was evaluated from.
    pub fn object(&self) -> ObjectId {
        self.object
    }
}

impl<S: SceneSource + ?Sized> Deref for MeshGuard<'_, S> {
    type Target = EvaluatedMesh;

    fn deref(&self) -> &EvaluatedMesh {
        &self.mesh
    }
}

impl<S: SceneSource + ?Sized> DerefMut for MeshGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut EvaluatedMesh {
        &mut self.mesh
    }
}

impl<S: SceneSource + ?Sized> Drop for MeshGuard<'_, S> {
    fn drop(&mut self) {
        let mesh = std::mem::take(&mut self.mesh);
        self.source.release_mesh(self.object, mesh);
    }
}
