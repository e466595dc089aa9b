//! CPU-side mesh types and generators.
//!
//! - [`EvaluatedMesh`] - Positions, face-loops, polygons and per-loop colours
//! - [`Polygon`] / [`ColorLayer`] - Building blocks of an evaluated mesh
//! - [`triangulate_polygon`] - Polygon tessellation used by
//!   [`EvaluatedMesh::triangulate`]
//! - Generators for common shapes (cube, quad, plane, sphere, point cloud)

mod data;
pub mod generators;
mod triangulate;

pub use data::{ColorLayer, EvaluatedMesh, Polygon, MAX_MESH_ELEMENTS};
pub use triangulate::triangulate_polygon;
