//! Geometry flattening: one evaluated mesh to WC1 streams.

use crate::math::Mat4;
use crate::mesh::{ColorLayer, EvaluatedMesh};
use crate::options::ExportOptions;
use crate::wc1::{ObjectFlags, ObjectHeader};

/// Streams of one object, ready to be written.
///
/// Borrowed from the mesh it was flattened from; indices are local to that
/// mesh and still need the global offset.
#[derive(Debug, Clone, Copy)]
pub struct FlattenedGeometry<'a> {
    mesh: &'a EvaluatedMesh,
    flags: ObjectFlags,
    mirrored: bool,
}

impl<'a> FlattenedGeometry<'a> {
    /// True when there are no vertices and no faces; nothing is written.
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    pub fn vertex_count(&self) -> u64 {
        self.mesh.vertex_count() as u64
    }

    /// One index per face-loop.
    pub fn index_count(&self) -> u64 {
        self.mesh.loop_count() as u64
    }

    pub fn flags(&self) -> ObjectFlags {
        self.flags
    }

    /// Whether the transform had a negative determinant.
    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    /// Header values for this object.
    pub fn header(&self) -> ObjectHeader {
        ObjectHeader {
            vertex_count: self.vertex_count(),
            index_count: self.index_count(),
            flags: self.flags,
        }
    }

    /// Transformed positions with Y negated, in vertex order.
    pub fn vertices(&self) -> impl Iterator<Item = [f64; 3]> + 'a {
        self.mesh.positions().iter().map(|&[x, y, z]| [x, -y, z])
    }

    /// Colour layers to write; empty unless the colour flag is set.
    pub fn color_layers(&self) -> &'a [ColorLayer] {
        if self.flags.contains(ObjectFlags::HAS_VERTEX_COLORS) {
            self.mesh.color_layers()
        } else {
            &[]
        }
    }

    /// Local vertex index of every corner, polygon by polygon in winding order.
    pub fn local_indices(&self) -> impl Iterator<Item = u32> + 'a {
        let mesh = self.mesh;
        mesh.polygons()
            .iter()
            .flat_map(move |p| mesh.polygon_corners(p).map(|(vertex, _)| vertex))
    }
}

/// Prepare a mesh for writing.
///
/// Triangulates first (when enabled), then transforms by `global * world`,
/// then reverses winding if that transform mirrors.
pub fn flatten<'a>(
    mesh: &'a mut EvaluatedMesh,
    global: &Mat4,
    world: &Mat4,
    options: &ExportOptions,
) -> FlattenedGeometry<'a> {
    if options.triangulate() {
        mesh.triangulate();
    }

    let matrix = global * world;
    mesh.transform(&matrix);

    let mirrored = matrix.determinant() < 0.0;
    if mirrored {
        mesh.flip_normals();
    }

    let mut flags = ObjectFlags::empty();
    if options.include_vertex_colors() && !mesh.color_layers().is_empty() {
        flags |= ObjectFlags::HAS_VERTEX_COLORS;
    }

    FlattenedGeometry {
        mesh,
        flags,
        mirrored,
    }
}
