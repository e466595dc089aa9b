//! Modifiers understood by [`MemoryScene`](super::MemoryScene).

use crate::math::{mat4_from_scale, mat4_from_translation, Axis, Vec3};
use crate::mesh::EvaluatedMesh;

/// A deformation applied to an object's base mesh during evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    /// Offset every vertex.
    Translate([f64; 3]),
    /// Append a copy of the mesh reflected across the plane normal to the
    /// axis. The copy's winding is reversed so it keeps facing outward.
    Mirror(Axis),
}

impl Modifier {
    /// Apply to a mesh in place.
    pub fn apply(&self, mesh: &mut EvaluatedMesh) {
        match *self {
            Self::Translate(offset) => mesh.transform(&mat4_from_translation(Vec3::from(offset))),
            Self::Mirror(axis) => {
                let mut scale = Vec3::new(1.0, 1.0, 1.0);
                scale[axis.index()] = -1.0;
                let mut mirrored = mesh.clone();
                mirrored.transform(&mat4_from_scale(scale));
                mirrored.flip_normals();
                mesh.append(&mirrored);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generators::generate_quad;

    #[test]
    fn translate_moves_vertices() {
        let mut mesh = generate_quad(1.0, 1.0);
        Modifier::Translate([0.0, 0.0, 5.0]).apply(&mut mesh);
        assert!(mesh.positions().iter().all(|p| (p[2] - 5.0).abs() < 1e-12));
    }

    #[test]
    fn mirror_doubles_geometry() {
        let mut mesh = generate_quad(1.0, 1.0);
        Modifier::Translate([2.0, 0.0, 0.0]).apply(&mut mesh);
        Modifier::Mirror(Axis::X).apply(&mut mesh);

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.polygon_count(), 2);
        assert!(mesh.validate().is_ok());
        assert!(mesh.positions()[4..].iter().all(|p| p[0] < 0.0));
        // The copy's loops run the other way round.
        let first: Vec<u32> = mesh.loops()[..4].to_vec();
        let mut second: Vec<u32> = mesh.loops()[4..].iter().map(|v| v - 4).collect();
        second.reverse();
        assert_eq!(first, second);
    }
}
