//! External resource references (textures and the like).
//!
//! The exporter only collects the paths objects refer to; deciding how those
//! references are written and whether files are copied belongs to a
//! [`PathCopier`], which runs once after the WC1 document is complete.

use std::io;
use std::path::{Path, PathBuf};

/// How referenced resource paths are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathMode {
    /// Relative when the file lives below the output directory, absolute otherwise.
    #[default]
    Auto,
    /// Always absolute.
    Absolute,
    /// Relative to the output directory where possible.
    Relative,
    /// Keep the path exactly as the scene reported it.
    Match,
    /// File name only.
    Strip,
    /// Copy the file next to the output and reference it by file name.
    Copy,
}

impl PathMode {
    /// Parse a mode name (`auto`, `absolute`, `relative`, `match`, `strip`, `copy`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "absolute" => Some(Self::Absolute),
            "relative" => Some(Self::Relative),
            "match" => Some(Self::Match),
            "strip" => Some(Self::Strip),
            "copy" => Some(Self::Copy),
            _ => None,
        }
    }
}

/// Resolve how a resource reference should read from the output's point of view.
///
/// `source_dir` anchors relative scene paths; `output_dir` is the directory
/// the WC1 file is written to.
pub fn reference_path(
    path: &Path,
    source_dir: &Path,
    output_dir: &Path,
    mode: PathMode,
) -> PathBuf {
    let absolute = source_dir.join(path);
    let file_name = || {
        path.file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf())
    };

    match mode {
        PathMode::Match => path.to_path_buf(),
        PathMode::Absolute => absolute,
        PathMode::Strip | PathMode::Copy => file_name(),
        PathMode::Relative | PathMode::Auto => match absolute.strip_prefix(output_dir) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => absolute,
        },
    }
}

/// Collaborator that handles the accumulated copy set after export.
pub trait PathCopier {
    /// Process every referenced path once the document has been written.
    ///
    /// Returns the references as they should be recorded for `output`.
    fn copy_paths(&mut self, paths: &[PathBuf], output: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Path copier that does nothing and reports the paths unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPathCopier;

impl PathCopier for NoopPathCopier {
    fn copy_paths(&mut self, paths: &[PathBuf], _output: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(paths.to_vec())
    }
}

/// Filesystem-backed path copier.
#[derive(Debug, Clone)]
pub struct FsPathCopier {
    mode: PathMode,
    source_dir: PathBuf,
    copied: usize,
}

impl FsPathCopier {
    /// Create a copier; relative scene paths are resolved against `source_dir`.
    pub fn new(mode: PathMode, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            source_dir: source_dir.into(),
            copied: 0,
        }
    }

    /// Number of files copied so far.
    pub fn copied(&self) -> usize {
        self.copied
    }
}

impl PathCopier for FsPathCopier {
    fn copy_paths(&mut self, paths: &[PathBuf], output: &Path) -> io::Result<Vec<PathBuf>> {
        let output_dir = output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut references = Vec::with_capacity(paths.len());

        for path in paths {
            let reference = reference_path(path, &self.source_dir, &output_dir, self.mode);

            if self.mode == PathMode::Copy {
                let src = self.source_dir.join(path);
                let dst = output_dir.join(&reference);
                if src == dst {
                    log::debug!("{} is already next to the output", src.display());
                } else if !src.is_file() {
                    log::warn!("cannot copy missing resource {}", src.display());
                } else {
                    std::fs::copy(&src, &dst)?;
                    self.copied += 1;
                    log::debug!("copied {} -> {}", src.display(), dst.display());
                }
            }

            references.push(reference);
        }

        Ok(references)
    }
}
