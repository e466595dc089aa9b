//! Export configuration.
//!
//! [`ExportOptions`] is built once per export invocation and never changes
//! while the export runs. Every option is enumerated here, including the ones
//! the WC1 encoder does not act on (normals, UVs, materials, animation); those
//! are carried so front ends have a single place to put them.

use crate::error::ExportError;
use crate::math::{axis_conversion, mat4_from_uniform_scale, Axis, Mat4};
use crate::paths::PathMode;

/// Smallest accepted global scale.
pub const MIN_GLOBAL_SCALE: f64 = 0.01;
/// Largest accepted global scale.
pub const MAX_GLOBAL_SCALE: f64 = 1000.0;

/// Immutable set of export options.
///
/// # Example
///
/// ```
/// use worldclient_core::math::Axis;
/// use worldclient_core::ExportOptions;
///
/// let options = ExportOptions::new()
///     .with_triangulate(true)
///     .with_global_scale(0.5)
///     .with_axes(Axis::NegZ, Axis::Y);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    triangulate: bool,
    apply_modifiers: bool,
    include_vertex_colors: bool,
    include_normals: bool,
    include_uvs: bool,
    include_materials: bool,
    selection_only: bool,
    global_scale: f64,
    axis_forward: Axis,
    axis_up: Axis,
    export_animation: bool,
    path_mode: PathMode,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            triangulate: false,
            apply_modifiers: true,
            include_vertex_colors: true,
            include_normals: false,
            include_uvs: true,
            include_materials: true,
            selection_only: false,
            global_scale: 1.0,
            axis_forward: crate::math::SOURCE_FORWARD,
            axis_up: crate::math::SOURCE_UP,
            export_animation: false,
            path_mode: PathMode::Auto,
        }
    }
}

impl ExportOptions {
    /// Default options: no triangulation, modifiers applied, vertex colours
    /// included, identity axis remap, scale 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert every polygon to triangles before transforming.
    #[must_use]
    pub fn with_triangulate(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }

    /// Evaluate objects with their modifier stack.
    #[must_use]
    pub fn with_apply_modifiers(mut self, apply: bool) -> Self {
        self.apply_modifiers = apply;
        self
    }

    /// Write vertex-colour layers.
    #[must_use]
    pub fn with_vertex_colors(mut self, include: bool) -> Self {
        self.include_vertex_colors = include;
        self
    }

    /// Request normals. Not part of the WC1 layout.
    #[must_use]
    pub fn with_normals(mut self, include: bool) -> Self {
        self.include_normals = include;
        self
    }

    /// Request UVs. Not part of the WC1 layout.
    #[must_use]
    pub fn with_uvs(mut self, include: bool) -> Self {
        self.include_uvs = include;
        self
    }

    /// Request materials. Not part of the WC1 layout; referenced resource
    /// paths are still collected into the copy set.
    #[must_use]
    pub fn with_materials(mut self, include: bool) -> Self {
        self.include_materials = include;
        self
    }

    /// Only walk selected top-level objects.
    #[must_use]
    pub fn with_selection_only(mut self, selection_only: bool) -> Self {
        self.selection_only = selection_only;
        self
    }

    /// Uniform scale applied on top of the axis remap.
    #[must_use]
    pub fn with_global_scale(mut self, scale: f64) -> Self {
        self.global_scale = scale;
        self
    }

    /// Target forward and up axes.
    #[must_use]
    pub fn with_axes(mut self, forward: Axis, up: Axis) -> Self {
        self.axis_forward = forward;
        self.axis_up = up;
        self
    }

    /// Mark the invocation as part of an animation sequence.
    #[must_use]
    pub fn with_animation(mut self, export_animation: bool) -> Self {
        self.export_animation = export_animation;
        self
    }

    /// How referenced resource paths are handled.
    #[must_use]
    pub fn with_path_mode(mut self, mode: PathMode) -> Self {
        self.path_mode = mode;
        self
    }

    /// Triangulate before export.
    pub fn triangulate(&self) -> bool {
        self.triangulate
    }

    /// Apply modifiers when evaluating meshes.
    pub fn apply_modifiers(&self) -> bool {
        self.apply_modifiers
    }

    /// Write vertex colours.
    pub fn include_vertex_colors(&self) -> bool {
        self.include_vertex_colors
    }

    /// Normals requested.
    pub fn include_normals(&self) -> bool {
        self.include_normals
    }

    /// UVs requested.
    pub fn include_uvs(&self) -> bool {
        self.include_uvs
    }

    /// Materials requested.
    pub fn include_materials(&self) -> bool {
        self.include_materials
    }

    /// Only selected objects.
    pub fn selection_only(&self) -> bool {
        self.selection_only
    }

    /// Global scale.
    pub fn global_scale(&self) -> f64 {
        self.global_scale
    }

    /// Target forward axis.
    pub fn axis_forward(&self) -> Axis {
        self.axis_forward
    }

    /// Target up axis.
    pub fn axis_up(&self) -> Axis {
        self.axis_up
    }

    /// Animation export flag.
    pub fn export_animation(&self) -> bool {
        self.export_animation
    }

    /// Resource path handling.
    pub fn path_mode(&self) -> PathMode {
        self.path_mode
    }

    /// Axis remap matrix (rotation only).
    pub fn axis_remap(&self) -> Result<Mat4, ExportError> {
        axis_conversion(self.axis_forward, self.axis_up).ok_or_else(|| {
            ExportError::InvalidOptions(format!(
                "forward {} and up {} share an axis",
                self.axis_forward, self.axis_up
            ))
        })
    }

    /// Combined global matrix: `scale(global_scale) * axis_remap`.
    pub fn global_matrix(&self) -> Result<Mat4, ExportError> {
        Ok(mat4_from_uniform_scale(self.global_scale) * self.axis_remap()?)
    }

    /// Check the options before an export starts.
    pub fn validate(&self) -> Result<(), ExportError> {
        if !self.global_scale.is_finite()
            || !(MIN_GLOBAL_SCALE..=MAX_GLOBAL_SCALE).contains(&self.global_scale)
        {
            return Err(ExportError::InvalidOptions(format!(
                "global scale {} outside {MIN_GLOBAL_SCALE}..={MAX_GLOBAL_SCALE}",
                self.global_scale
            )));
        }
        self.axis_remap()?;
        Ok(())
    }
}
