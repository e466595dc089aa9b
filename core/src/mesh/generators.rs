//! Mesh generators for common shapes.
//!
//! These generators produce [`EvaluatedMesh`] values with outward-facing,
//! counter-clockwise winding. They back the CLI scene manifest and the
//! test suite.

use std::f64::consts::PI;

use super::data::EvaluatedMesh;

/// Generate an axis-aligned cube centred at the origin.
///
/// 8 shared vertices and 6 quad faces (24 loops).
pub fn generate_cube(size: f64) -> EvaluatedMesh {
    let h = size * 0.5;
    let positions = vec![
        [-h, -h, -h],
        [h, -h, -h],
        [h, h, -h],
        [-h, h, -h],
        [-h, -h, h],
        [h, -h, h],
        [h, h, h],
        [-h, h, h],
    ];
    let faces: [[u32; 4]; 6] = [
        [0, 3, 2, 1], // -Z
        [4, 5, 6, 7], // +Z
        [0, 1, 5, 4], // -Y
        [2, 3, 7, 6], // +Y
        [0, 4, 7, 3], // -X
        [1, 2, 6, 5], // +X
    ];

    EvaluatedMesh::new()
        .with_positions(positions)
        .with_faces(faces)
        .with_label("cube")
}

/// Generate a single quad on the XY plane, facing +Z.
///
/// # Arguments
///
/// * `half_width` - Half the width of the quad along the X axis
/// * `half_height` - Half the height of the quad along the Y axis
pub fn generate_quad(half_width: f64, half_height: f64) -> EvaluatedMesh {
    EvaluatedMesh::new()
        .with_positions(vec![
            [-half_width, -half_height, 0.0],
            [half_width, -half_height, 0.0],
            [half_width, half_height, 0.0],
            [-half_width, half_height, 0.0],
        ])
        .with_faces([[0u32, 1, 2, 3]])
        .with_label("quad")
}

/// Generate a subdivided square grid on the XY plane, facing +Z.
///
/// `subdivisions` cells per side; `(subdivisions + 1)^2` vertices.
pub fn generate_plane(size: f64, subdivisions: u32) -> EvaluatedMesh {
    let cells = subdivisions.max(1);
    let step = size / cells as f64;
    let origin = -size * 0.5;

    let mut positions = Vec::with_capacity(((cells + 1) * (cells + 1)) as usize);
    for row in 0..=cells {
        for col in 0..=cells {
            positions.push([
                origin + col as f64 * step,
                origin + row as f64 * step,
                0.0,
            ]);
        }
    }

    let mut mesh = EvaluatedMesh::new().with_positions(positions);
    for row in 0..cells {
        for col in 0..cells {
            let a = row * (cells + 1) + col;
            let b = a + 1;
            let d = a + cells + 1;
            let c = d + 1;
            mesh.push_face(&[a, b, c, d]);
        }
    }
    mesh.with_label("plane")
}

/// Generate a UV sphere.
///
/// Vertices follow a `(rings + 1) x (segments + 1)` grid (the seam column
/// is duplicated). The two pole rings are closed with triangles, every other
/// band uses quads.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments (around the equator)
/// * `rings` - Number of latitudinal rings (from pole to pole)
pub fn generate_sphere(radius: f64, segments: u32, rings: u32) -> EvaluatedMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut positions = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);

    for ring in 0..=rings {
        let theta = ring as f64 * PI / rings as f64;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for segment in 0..=segments {
            let phi = segment as f64 * 2.0 * PI / segments as f64;
            let (sin_phi, cos_phi) = phi.sin_cos();
            // Z-up: ring 0 is the north pole.
            positions.push([
                sin_theta * cos_phi * radius,
                sin_theta * sin_phi * radius,
                cos_theta * radius,
            ]);
        }
    }

    let mut mesh = EvaluatedMesh::new().with_positions(positions);
    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            if ring == 0 {
                mesh.push_face(&[current, next, next + 1]);
            } else if ring == rings - 1 {
                mesh.push_face(&[current, next, current + 1]);
            } else {
                mesh.push_face(&[current, next, next + 1, current + 1]);
            }
        }
    }
    mesh.with_label("sphere")
}

/// Generate a vertex-only mesh (no faces), e.g. as a vertex-instancing
/// emitter.
pub fn generate_points(points: &[[f64; 3]]) -> EvaluatedMesh {
    EvaluatedMesh::new()
        .with_positions(points.to_vec())
        .with_label("points")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    /// Newell normal of a polygon's corners.
    fn face_normal(mesh: &EvaluatedMesh, poly: usize) -> Vec3 {
        let p = &mesh.polygons()[poly];
        let pts: Vec<Vec3> = mesh.loops()[p.loop_range()]
            .iter()
            .map(|&v| Vec3::from(mesh.positions()[v as usize]))
            .collect();
        let mut n = Vec3::zeros();
        for (i, a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            n += a.cross(&b);
        }
        n
    }

    fn centroid(mesh: &EvaluatedMesh, poly: usize) -> Vec3 {
        let p = &mesh.polygons()[poly];
        let sum: Vec3 = mesh.loops()[p.loop_range()]
            .iter()
            .map(|&v| Vec3::from(mesh.positions()[v as usize]))
            .sum();
        sum / p.loop_total as f64
    }

    #[test]
    fn test_generate_cube() {
        let mesh = generate_cube(2.0);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.polygon_count(), 6);
        assert_eq!(mesh.loop_count(), 24);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let mesh = generate_cube(2.0);
        for poly in 0..mesh.polygon_count() {
            let n = face_normal(&mesh, poly);
            assert!(n.dot(&centroid(&mesh, poly)) > 0.0, "face {poly} points inward");
        }
    }

    #[test]
    fn test_cube_triangulates_to_twelve_triangles() {
        let mut mesh = generate_cube(1.0);
        mesh.triangulate();
        assert_eq!(mesh.polygon_count(), 12);
        assert_eq!(mesh.loop_count(), 36);
        for poly in 0..mesh.polygon_count() {
            assert!(face_normal(&mesh, poly).dot(&centroid(&mesh, poly)) > 0.0);
        }
    }

    #[test]
    fn test_generate_quad() {
        let mesh = generate_quad(0.5, 0.5);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.loop_count(), 4);
        assert!(face_normal(&mesh, 0).z > 0.0);
    }

    #[test]
    fn test_generate_plane() {
        let mesh = generate_plane(2.0, 3);
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.polygon_count(), 9);
        assert!(mesh.validate().is_ok());
        for poly in 0..mesh.polygon_count() {
            assert!(face_normal(&mesh, poly).z > 0.0);
        }
    }

    #[test]
    fn test_generate_sphere() {
        let mesh = generate_sphere(1.0, 8, 4);
        // (rings+1) * (segments+1) = 5 * 9 = 45 vertices
        assert_eq!(mesh.vertex_count(), 45);
        assert_eq!(mesh.polygon_count(), 32);
        // two triangle caps (16 * 3) + two quad bands (16 * 4)
        assert_eq!(mesh.loop_count(), 112);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_sphere_faces_point_outward() {
        let mesh = generate_sphere(1.0, 8, 4);
        for poly in 0..mesh.polygon_count() {
            let n = face_normal(&mesh, poly);
            assert!(n.dot(&centroid(&mesh, poly)) > 0.0, "face {poly} points inward");
        }
    }

    #[test]
    fn test_generate_points() {
        let mesh = generate_points(&[[0.0; 3], [1.0, 0.0, 0.0]]);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.polygon_count(), 0);
        assert!(!mesh.is_empty());
    }
}
