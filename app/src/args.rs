//! Command line arguments.
//!
//! Uses clap for CLI parsing with:
//! - Help text (`--help`)
//! - Validation and clear error messages
//! - Warnings for options the WC1 format cannot carry

use std::path::PathBuf;

use clap::Parser;
use worldclient_core::math::Axis;
use worldclient_core::paths::PathMode;
use worldclient_core::ExportOptions;

// ============================================================================
// CLI enums (clap value names)
// ============================================================================

/// Axis selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliAxis {
    X,
    Y,
    Z,
    #[value(name = "-x")]
    NegX,
    #[value(name = "-y")]
    NegY,
    #[value(name = "-z")]
    NegZ,
}

impl From<CliAxis> for Axis {
    fn from(cli: CliAxis) -> Self {
        match cli {
            CliAxis::X => Axis::X,
            CliAxis::Y => Axis::Y,
            CliAxis::Z => Axis::Z,
            CliAxis::NegX => Axis::NegX,
            CliAxis::NegY => Axis::NegY,
            CliAxis::NegZ => Axis::NegZ,
        }
    }
}

/// Resource path handling for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliPathMode {
    /// Relative when below the output directory, absolute otherwise.
    #[default]
    Auto,
    Absolute,
    Relative,
    /// Keep paths exactly as the manifest lists them.
    Match,
    /// File names only.
    Strip,
    /// Copy referenced files next to the output.
    Copy,
}

impl From<CliPathMode> for PathMode {
    fn from(cli: CliPathMode) -> Self {
        match cli {
            CliPathMode::Auto => PathMode::Auto,
            CliPathMode::Absolute => PathMode::Absolute,
            CliPathMode::Relative => PathMode::Relative,
            CliPathMode::Match => PathMode::Match,
            CliPathMode::Strip => PathMode::Strip,
            CliPathMode::Copy => PathMode::Copy,
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// WC1 export arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wc1-export",
    about = "Export a RON scene manifest to a WC1 binary mesh file",
    long_about = "Reads a RON scene manifest, evaluates every object and writes one WC1 \
        document.\n\n\
        EXAMPLES:\n\
          # Triangulated export with the default -Z forward / Y up conversion\n\
          wc1-export scene.ron -o scene.wc1 --triangulate\n\
        \n\
          # Keep the source axes and only export selected objects\n\
          wc1-export scene.ron -o out.wc1 --axis-forward y --axis-up z --selection-only",
    version
)]
pub struct ExportArgs {
    /// Scene manifest (RON).
    pub scene: PathBuf,

    /// Output WC1 file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Split every polygon into triangles before export.
    #[arg(long)]
    pub triangulate: bool,

    /// Export base meshes without their modifier stack.
    #[arg(long)]
    pub no_modifiers: bool,

    /// Leave vertex-colour layers out.
    #[arg(long)]
    pub no_vertex_colors: bool,

    /// Request normals (not stored by WC1).
    #[arg(long)]
    pub normals: bool,

    /// Only export objects marked `selected` in the manifest.
    #[arg(long)]
    pub selection_only: bool,

    /// Uniform scale applied after axis conversion.
    #[arg(long, default_value_t = 1.0)]
    pub global_scale: f64,

    /// Forward axis of the output.
    #[arg(long, value_enum, default_value = "-z", allow_hyphen_values = true)]
    pub axis_forward: CliAxis,

    /// Up axis of the output.
    #[arg(long, value_enum, default_value = "y", allow_hyphen_values = true)]
    pub axis_up: CliAxis,

    /// How referenced resource paths are handled.
    #[arg(long, value_enum, default_value = "auto")]
    pub path_mode: CliPathMode,

    /// Mark this run as one frame of an animation export.
    #[arg(long)]
    pub animation: bool,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ExportArgs {
    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Build export options, warning about flags that cannot take effect.
    pub fn export_options(&self) -> ExportOptions {
        if self.normals {
            log::warn!("--normals has no effect: the WC1 format does not store normals");
        }
        if self.animation {
            log::warn!(
                "--animation only tags this run; frames are exported by invoking \
                wc1-export once per frame"
            );
        }

        ExportOptions::new()
            .with_triangulate(self.triangulate)
            .with_apply_modifiers(!self.no_modifiers)
            .with_vertex_colors(!self.no_vertex_colors)
            .with_normals(self.normals)
            .with_selection_only(self.selection_only)
            .with_global_scale(self.global_scale)
            .with_axes(self.axis_forward.into(), self.axis_up.into())
            .with_path_mode(self.path_mode.into())
            .with_animation(self.animation)
    }
}
