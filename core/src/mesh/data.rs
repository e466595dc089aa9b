//! Evaluated mesh data structures.
//!
//! This module provides:
//! - [`Polygon`] - A contiguous run of face-loops forming one face
//! - [`ColorLayer`] - Per-loop RGBA colours
//! - [`EvaluatedMesh`] - The concrete polygon soup of one scene object

use crate::math::{transform_point, Mat4};

use super::triangulate::triangulate_polygon;

/// A single face, expressed as a range into the mesh's loop array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Polygon {
    /// Index of the first loop of this polygon.
    pub loop_start: u32,
    /// Number of loops (corners) in this polygon.
    pub loop_total: u32,
}

impl Polygon {
    /// Loop indices belonging to this polygon, in winding order.
    pub fn loop_range(&self) -> std::ops::Range<usize> {
        let start = self.loop_start as usize;
        start..start + self.loop_total as usize
    }
}

/// A vertex-colour layer: one RGBA quad per face-loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLayer {
    /// Layer name, if any.
    pub name: Option<String>,
    /// One colour per face-loop, in loop order.
    pub colors: Vec<[f64; 4]>,
}

impl ColorLayer {
    /// Create a new layer from per-loop colours.
    pub fn new(colors: Vec<[f64; 4]>) -> Self {
        Self { name: None, colors }
    }

    /// Create a layer where every loop carries the same colour.
    pub fn solid(color: [f64; 4], loop_count: usize) -> Self {
        Self::new(vec![color; loop_count])
    }

    /// Set the layer name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Largest vertex or loop count an [`EvaluatedMesh`] can index.
pub const MAX_MESH_ELEMENTS: usize = u32::MAX as usize;

/// Concrete polygon soup of a scene object after modifier evaluation.
///
/// Topology follows the usual loop model: `loops` stores one vertex index per
/// face corner, and each [`Polygon`] is a contiguous range of loops. Colour
/// layers are indexed by loop, not by vertex, so a shared vertex may carry
/// different colours on different faces.
///
/// Vertex and loop indices are `u32`, so a mesh holds at most
/// [`MAX_MESH_ELEMENTS`] vertices and as many loops. Builders do not check
/// the limit; [`validate`](Self::validate) rejects meshes that exceed it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluatedMesh {
    positions: Vec<[f64; 3]>,
    loops: Vec<u32>,
    polygons: Vec<Polygon>,
    color_layers: Vec<ColorLayer>,
    label: Option<String>,
}

impl EvaluatedMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertex positions.
    #[must_use]
    pub fn with_positions(mut self, positions: Vec<[f64; 3]>) -> Self {
        self.positions = positions;
        self
    }

    /// Set the faces, each given as vertex indices in winding order.
    ///
    /// Replaces any existing loops and polygons.
    #[must_use]
    pub fn with_faces<F>(mut self, faces: impl IntoIterator<Item = F>) -> Self
    where
        F: AsRef<[u32]>,
    {
        self.loops.clear();
        self.polygons.clear();
        for face in faces {
            self.push_face(face.as_ref());
        }
        self
    }

    /// Add a colour layer.
    #[must_use]
    pub fn with_color_layer(mut self, layer: ColorLayer) -> Self {
        self.color_layers.push(layer);
        self
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Append one face given as vertex indices in winding order.
    ///
    /// Loop offsets wrap past [`MAX_MESH_ELEMENTS`]; the wrapped polygon then
    /// fails [`validate`](Self::validate) as non-contiguous.
    pub fn push_face(&mut self, vertices: &[u32]) {
        let loop_start = self.loops.len() as u32;
        self.loops.extend_from_slice(vertices);
        self.polygons.push(Polygon {
            loop_start,
            loop_total: vertices.len() as u32,
        });
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    /// Vertex index of every face-loop.
    pub fn loops(&self) -> &[u32] {
        &self.loops
    }

    /// Polygons.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Colour layers.
    pub fn color_layers(&self) -> &[ColorLayer] {
        &self.color_layers
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of face-loops.
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// Number of polygons.
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// `(vertex index, loop index)` pairs of a polygon, in winding order.
    pub fn polygon_corners(&self, polygon: &Polygon) -> impl Iterator<Item = (u32, u32)> + '_ {
        polygon
            .loop_range()
            .map(move |l| (self.loops[l], l as u32))
    }

    /// True when the mesh has neither vertices nor faces.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.polygons.is_empty()
    }

    /// True when every polygon is a triangle.
    pub fn is_triangulated(&self) -> bool {
        self.polygons.iter().all(|p| p.loop_total == 3)
    }

    /// Check internal consistency.
    ///
    /// Returns a human-readable reason for the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let vertex_count = self.positions.len();
        let loop_count = self.loops.len();

        if vertex_count > MAX_MESH_ELEMENTS || loop_count > MAX_MESH_ELEMENTS {
            return Err(format!(
                "{vertex_count} vertices and {loop_count} loops exceed the u32 index range"
            ));
        }

        for (i, p) in self.positions.iter().enumerate() {
            if p.iter().any(|c| !c.is_finite()) {
                return Err(format!("vertex {i} has a non-finite coordinate"));
            }
        }

        for (i, &v) in self.loops.iter().enumerate() {
            if v as usize >= vertex_count {
                return Err(format!(
                    "loop {i} references vertex {v}, mesh has {vertex_count}"
                ));
            }
        }

        let mut expected_start = 0usize;
        for (i, poly) in self.polygons.iter().enumerate() {
            if poly.loop_total < 3 {
                return Err(format!(
                    "polygon {i} has {} corners, need at least 3",
                    poly.loop_total
                ));
            }
            if poly.loop_start as usize != expected_start {
                return Err(format!("polygon {i} loop range is not contiguous"));
            }
            expected_start += poly.loop_total as usize;
        }
        if expected_start != loop_count {
            return Err(format!(
                "polygons cover {expected_start} loops, mesh has {loop_count}"
            ));
        }

        for (i, layer) in self.color_layers.iter().enumerate() {
            if layer.colors.len() != loop_count {
                return Err(format!(
                    "colour layer {i} has {} entries, mesh has {loop_count} loops",
                    layer.colors.len()
                ));
            }
        }

        Ok(())
    }

    /// Transform every vertex position by `matrix`.
    pub fn transform(&mut self, matrix: &Mat4) {
        for p in &mut self.positions {
            *p = transform_point(matrix, *p);
        }
    }

    /// Reverse the winding of every polygon.
    ///
    /// Loop-indexed data (colour layers) is reordered together with the
    /// loops so every corner keeps its colour.
    pub fn flip_normals(&mut self) {
        for poly in &self.polygons {
            let range = poly.loop_range();
            self.loops[range.clone()].reverse();
            for layer in &mut self.color_layers {
                layer.colors[range.clone()].reverse();
            }
        }
    }

    /// Split every polygon with more than three corners into triangles.
    ///
    /// Triangles keep the winding of the polygon they came from. Colour
    /// layers are rebuilt so each new loop carries the colour of the corner
    /// it was cut from.
    pub fn triangulate(&mut self) {
        if self.is_triangulated() {
            return;
        }

        let mut loops = Vec::with_capacity(self.loops.len() * 2);
        let mut polygons = Vec::with_capacity(self.polygons.len() * 2);
        let mut source_loops: Vec<usize> = Vec::with_capacity(self.loops.len() * 2);

        let mut corner_points = Vec::new();
        for poly in &self.polygons {
            let range = poly.loop_range();
            corner_points.clear();
            corner_points.extend(
                self.loops[range.clone()]
                    .iter()
                    .map(|&v| self.positions[v as usize]),
            );

            for tri in triangulate_polygon(&corner_points) {
                polygons.push(Polygon {
                    loop_start: loops.len() as u32,
                    loop_total: 3,
                });
                for corner in tri {
                    let source = range.start + corner;
                    loops.push(self.loops[source]);
                    source_loops.push(source);
                }
            }
        }

        for layer in &mut self.color_layers {
            layer.colors = source_loops.iter().map(|&l| layer.colors[l]).collect();
        }
        self.loops = loops;
        self.polygons = polygons;
    }

    /// Append another mesh's geometry to this one.
    ///
    /// Colour layers are concatenated by position; when the layer counts
    /// differ, the extra layers are padded with opaque white.
    pub fn append(&mut self, other: &EvaluatedMesh) {
        let vertex_offset = self.positions.len() as u32;
        let loop_offset = self.loops.len() as u32;
        let own_loops = self.loops.len();

        self.positions.extend_from_slice(&other.positions);
        self.loops
            .extend(other.loops.iter().map(|&v| v + vertex_offset));
        self.polygons.extend(other.polygons.iter().map(|p| Polygon {
            loop_start: p.loop_start + loop_offset,
            loop_total: p.loop_total,
        }));

        let layer_count = self.color_layers.len().max(other.color_layers.len());
        while self.color_layers.len() < layer_count {
            self.color_layers
                .push(ColorLayer::solid([1.0, 1.0, 1.0, 1.0], own_loops));
        }
        for (i, layer) in self.color_layers.iter_mut().enumerate() {
            match other.color_layers.get(i) {
                Some(theirs) => layer.colors.extend_from_slice(&theirs.colors),
                None => layer
                    .colors
                    .extend(std::iter::repeat([1.0, 1.0, 1.0, 1.0]).take(other.loops.len())),
            }
        }
    }
}
