//! WC1 export.
//!
//! Walks a [`SceneSource`] in order and writes one object record per
//! non-empty mesh instance. Indices are made global with a running
//! [`GlobalIndexAllocator`]; headers are written as placeholders and
//! backpatched through [`Wc1Writer`](crate::wc1::Wc1Writer).
//!
//! # Failure model
//!
//! Problems with single objects (evaluation failures, broken parent links,
//! empty meshes) are logged, recorded in [`ExportSummary::skipped`] and the
//! export continues. I/O failures abort the export. Because the file header
//! is patched after every completed object, a document cut short by an I/O
//! failure still describes every object finished before it; the record that
//! was being written keeps an all-zero header.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use worldclient_core::export::write_scene;
//! use worldclient_core::mesh::generators::generate_cube;
//! use worldclient_core::scene::{MemoryObject, MemoryScene};
//! use worldclient_core::ExportOptions;
//!
//! let mut scene = MemoryScene::new();
//! scene.add(MemoryObject::new("cube").with_mesh(generate_cube(1.0)));
//!
//! let options = ExportOptions::new().with_triangulate(true);
//! let (summary, out) = write_scene(&scene, &options, Cursor::new(Vec::new()), None).unwrap();
//! assert_eq!(summary.objects_written, 1);
//! assert_eq!(out.get_ref().len() as u64, summary.bytes_written);
//! ```

mod allocator;
mod driver;
mod flatten;
mod summary;

pub use allocator::GlobalIndexAllocator;
pub use flatten::{flatten, FlattenedGeometry};
pub use summary::{ExportSummary, SkipReason, SkippedObject};

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use crate::cancel::CancellationToken;
use crate::error::ExportError;
use crate::options::ExportOptions;
use crate::paths::PathCopier;
use crate::scene::SceneSource;

/// Write one WC1 document to a seekable stream.
///
/// Returns the summary and the stream. Pass `&mut stream` to keep access to
/// the stream when the export fails.
pub fn write_scene<S, W>(
    source: &S,
    options: &ExportOptions,
    out: W,
    cancel: Option<&CancellationToken>,
) -> Result<(ExportSummary, W), ExportError>
where
    S: SceneSource + ?Sized,
    W: Write + Seek,
{
    let mut ctx = driver::ExportContext::new(source, options, out, cancel)?;
    ctx.write_objects()?;
    ctx.finish()
}

/// Export to a file, then hand the collected resource paths to `copier`.
///
/// The file is created (or truncated) only after the options validate. A
/// failing copier is logged and does not fail the export; the document is
/// complete by then.
pub fn save<S>(
    source: &S,
    path: &Path,
    options: &ExportOptions,
    copier: &mut dyn PathCopier,
    cancel: Option<&CancellationToken>,
) -> Result<ExportSummary, ExportError>
where
    S: SceneSource + ?Sized,
{
    options.validate()?;
    log::info!("WC1 export path: {}", path.display());

    let file = File::create(path).map_err(|source| ExportError::Io { offset: 0, source })?;
    let (mut summary, _) = write_scene(source, options, BufWriter::new(file), cancel)?;

    if !summary.copy_set.is_empty() {
        match copier.copy_paths(&summary.copy_set, path) {
            Ok(references) => summary.resource_references = references,
            Err(err) => log::warn!("copying referenced resources failed: {err}"),
        }
    }

    Ok(summary)
}
