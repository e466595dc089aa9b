//! # WorldClient Export
//!
//! Command line front end for the WC1 encoder. Loads a RON scene manifest,
//! builds an in-memory scene from it and writes one WC1 document.
//!
//! - [`ExportArgs`] - Command line arguments
//! - [`manifest`] - RON scene manifest format
//! - [`run`] - Load, export and copy resources

mod args;
pub mod manifest;

use std::path::Path;

pub use args::{CliAxis, CliPathMode, ExportArgs};
pub use manifest::{ManifestError, SceneManifest};

use worldclient_core::paths::FsPathCopier;
use worldclient_core::{ExportError, ExportSummary};

/// App library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors surfaced by the command line tool.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Run one export as described by `args`.
///
/// Resource paths in the manifest are resolved against the manifest's
/// directory.
pub fn run(args: &ExportArgs) -> Result<ExportSummary, AppError> {
    log::info!("WorldClient Export v{} (core v{})", VERSION, worldclient_core::VERSION);

    let options = args.export_options();
    let manifest = manifest::load(&args.scene)?;
    let scene = manifest::build_scene(&manifest)?;

    let source_dir = args.scene.parent().unwrap_or_else(|| Path::new("."));
    let mut copier = FsPathCopier::new(options.path_mode(), source_dir);

    let summary = worldclient_core::save(&scene, &args.output, &options, &mut copier, None)?;
    if copier.copied() > 0 {
        log::info!("Copied {} referenced files", copier.copied());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsString;

    fn parse(scene: &Path, output: &Path, extra: &[&str]) -> ExportArgs {
        let mut argv: Vec<OsString> =
            vec!["wc1-export".into(), scene.into(), "-o".into(), output.into()];
        argv.extend(extra.iter().map(OsString::from));
        ExportArgs::try_parse_from(argv).unwrap()
    }

    const SCENE: &str = r#"(
        objects: [
            (name: "a", mesh: Some(Cube(size: 1.0)), resources: ["wood.png"]),
            (
                name: "b",
                mesh: Some(Quad(half_width: 1.0, half_height: 1.0)),
                translation: (3.0, 0.0, 0.0),
            ),
            (name: "empty"),
        ],
    )"#;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn run_writes_document_and_copies_resources() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let scene_path = src.path().join("scene.ron");
        std::fs::write(&scene_path, SCENE).unwrap();
        std::fs::write(src.path().join("wood.png"), b"wood").unwrap();
        let output = dst.path().join("scene.wc1");

        let args = parse(&scene_path, &output, &["--triangulate", "--path-mode", "copy"]);

        let summary = run(&args).unwrap();
        assert_eq!(summary.objects_written, 2);
        // Cube: 8 vertices, 36 indices. Quad: 4 vertices, 6 indices.
        assert_eq!(summary.vertices_written, 12);
        assert_eq!(summary.indices_written, 42);

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(bytes.len() as u64, summary.bytes_written);
        assert_eq!(u64::from_le_bytes(bytes[..8].try_into().unwrap()), 2);
        assert_eq!(std::fs::read(dst.path().join("wood.png")).unwrap(), b"wood");
    }

    #[test]
    fn run_reports_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let args = parse(&dir.path().join("missing.ron"), &dir.path().join("out.wc1"), &[]);

        assert!(matches!(run(&args), Err(AppError::Manifest(ManifestError::Io { .. }))));
        assert!(!dir.path().join("out.wc1").exists());
    }

    #[test]
    fn run_rejects_invalid_scale() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.ron");
        std::fs::write(&scene_path, SCENE).unwrap();
        let args = parse(&scene_path, &dir.path().join("out.wc1"), &["--global-scale", "5000"]);

        assert!(matches!(
            run(&args),
            Err(AppError::Export(ExportError::InvalidOptions(_)))
        ));
    }
}
