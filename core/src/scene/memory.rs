//! In-memory [`SceneSource`] implementation.
//!
//! Used by tests and by the command-line front end, which builds one from a
//! scene manifest. It also counts mesh evaluations and releases, so callers
//! can check that the exporter never holds more than one mesh at a time.

use std::cell::Cell;
use std::path::PathBuf;

use crate::error::{InstanceGraphError, MeshEvalError};
use crate::math::{mat4_from_translation, Mat4, Vec3};
use crate::mesh::EvaluatedMesh;

use super::{
    InstanceType, Modifier, NodeTransform, ObjectId, ObjectInfo, ObjectInstance, SceneSource,
};

/// One object of a [`MemoryScene`].
#[derive(Debug, Clone, Default)]
pub struct MemoryObject {
    name: String,
    mesh: Option<EvaluatedMesh>,
    transform: NodeTransform,
    parent: Option<ObjectId>,
    instance_type: InstanceType,
    selected: bool,
    modifiers: Vec<Modifier>,
    resources: Vec<PathBuf>,
}

impl MemoryObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: EvaluatedMesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Transform relative to the parent (or world when there is none).
    #[must_use]
    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_instance_type(mut self, instance_type: InstanceType) -> Self {
        self.instance_type = instance_type;
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn with_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources.push(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> Option<&EvaluatedMesh> {
        self.mesh.as_ref()
    }

    pub fn transform(&self) -> &NodeTransform {
        &self.transform
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Base mesh with or without the modifier stack, not validated.
    fn build_mesh(&self, apply_modifiers: bool) -> Option<EvaluatedMesh> {
        let mut mesh = self.mesh.clone()?;
        if apply_modifiers {
            for modifier in &self.modifiers {
                modifier.apply(&mut mesh);
            }
        }
        Some(mesh)
    }
}

/// A scene held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryScene {
    objects: Vec<MemoryObject>,
    live_meshes: Cell<usize>,
    peak_live_meshes: Cell<usize>,
    evaluations: Cell<usize>,
    releases: Cell<usize>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its id. Ids follow insertion order.
    pub fn add(&mut self, object: MemoryObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Option<&MemoryObject> {
        self.objects.get(id.0)
    }

    /// Mutable access, e.g. to reparent after insertion.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut MemoryObject> {
        self.objects.get_mut(id.0)
    }

    /// Look an object up by name.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|o| o.name == name)
            .map(ObjectId)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Direct children of an object, in insertion order.
    pub fn children(&self, parent: ObjectId) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.parent == Some(parent))
            .map(|(i, _)| ObjectId(i))
    }

    /// Meshes evaluated and not yet released.
    pub fn live_meshes(&self) -> usize {
        self.live_meshes.get()
    }

    /// Highest number of meshes alive at the same time.
    pub fn peak_live_meshes(&self) -> usize {
        self.peak_live_meshes.get()
    }

    /// Successful mesh evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    /// Meshes handed back so far.
    pub fn releases(&self) -> usize {
        self.releases.get()
    }

    fn get(&self, id: ObjectId) -> Result<&MemoryObject, InstanceGraphError> {
        self.object(id).ok_or(InstanceGraphError::MissingObject(id))
    }

    /// Points an instancer places copies at, in its local space.
    fn instance_points(&self, object: &MemoryObject) -> Vec<[f64; 3]> {
        let Some(mesh) = object.build_mesh(true) else {
            return Vec::new();
        };
        match object.instance_type {
            InstanceType::None => Vec::new(),
            InstanceType::Verts => mesh.positions().to_vec(),
            InstanceType::Faces => mesh
                .polygons()
                .iter()
                .filter(|p| p.loop_total > 0)
                .map(|p| {
                    let sum = mesh
                        .polygon_corners(p)
                        .filter_map(|(v, _)| mesh.positions().get(v as usize))
                        .fold(Vec3::zeros(), |acc, &q| acc + Vec3::from(q));
                    let c = sum / p.loop_total as f64;
                    [c.x, c.y, c.z]
                })
                .collect(),
        }
    }
}

impl SceneSource for MemoryScene {
    fn top_level_objects(&self) -> Vec<ObjectId> {
        (0..self.objects.len()).map(ObjectId).collect()
    }

    fn object_info(&self, object: ObjectId) -> Option<ObjectInfo> {
        self.object(object).map(|o| ObjectInfo {
            name: o.name.clone(),
            parent: o.parent,
            instance_type: o.instance_type,
            selected: o.selected,
        })
    }

    fn world_transform(&self, object: ObjectId) -> Result<Mat4, InstanceGraphError> {
        let mut world = self.get(object)?.transform.to_matrix();
        let mut current = object;
        let mut depth = 0;

        while let Some(parent) = self.get(current)?.parent {
            depth += 1;
            if depth > self.objects.len() {
                return Err(InstanceGraphError::Cycle { object });
            }
            let parent_object = self.object(parent).ok_or(InstanceGraphError::MissingParent {
                object: current,
                parent,
            })?;
            world = parent_object.transform.to_matrix() * world;
            current = parent;
        }

        Ok(world)
    }

    /// Expansion is one level deep: children of an instancer are placed at
    /// each of its points, but a child that is itself an instancer does not
    /// expand further.
    ///
    /// Instance points always come from the instancer's mesh with its
    /// modifiers applied, whatever `apply_modifiers` the export uses, the
    /// same way a host instances on its evaluated geometry.
    fn expand_instances(
        &self,
        object: ObjectId,
    ) -> Result<Vec<ObjectInstance>, InstanceGraphError> {
        let world = self.world_transform(object)?;
        let mut instances = vec![ObjectInstance::primary(object, world)];

        let source = self.get(object)?;
        if !source.instance_type.duplicates() {
            return Ok(instances);
        }

        let points = self.instance_points(source);
        for child in self.children(object) {
            let local = self.get(child)?.transform.to_matrix();
            for point in &points {
                let at = mat4_from_translation(Vec3::from(*point));
                instances.push(ObjectInstance::duplicate(child, world * at * local));
            }
        }

        log::trace!(
            "{} expands to {} instances",
            source.name,
            instances.len()
        );
        Ok(instances)
    }

    fn evaluate_mesh(
        &self,
        object: ObjectId,
        apply_modifiers: bool,
    ) -> Result<Option<EvaluatedMesh>, MeshEvalError> {
        let source = self
            .object(object)
            .ok_or(MeshEvalError::UnknownObject(object))?;
        let Some(mesh) = source.build_mesh(apply_modifiers) else {
            return Ok(None);
        };
        mesh.validate()
            .map_err(|reason| MeshEvalError::InvalidGeometry { object, reason })?;

        self.evaluations.set(self.evaluations.get() + 1);
        let live = self.live_meshes.get() + 1;
        self.live_meshes.set(live);
        self.peak_live_meshes.set(self.peak_live_meshes.get().max(live));
        Ok(Some(mesh))
    }

    fn release_mesh(&self, _object: ObjectId, mesh: EvaluatedMesh) {
        self.live_meshes.set(self.live_meshes.get().saturating_sub(1));
        self.releases.set(self.releases.get() + 1);
        drop(mesh);
    }

    fn resource_paths(&self, object: ObjectId) -> Vec<PathBuf> {
        self.object(object)
            .map(|o| o.resources.clone())
            .unwrap_or_default()
    }
}
