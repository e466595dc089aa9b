//! What an export invocation did.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::{InstanceGraphError, MeshEvalError};
use crate::scene::ObjectId;

/// Why an object produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The object is emitted through its parent's instance expansion.
    #[error("instanced by its parent {parent}")]
    DupliChild { parent: ObjectId },
    /// No vertices and no faces.
    #[error("empty mesh")]
    Empty,
    #[error(transparent)]
    MeshEvaluation(#[from] MeshEvalError),
    #[error(transparent)]
    InvalidInstanceGraph(#[from] InstanceGraphError),
}

impl SkipReason {
    /// Skips that are part of normal operation rather than a problem with
    /// the scene.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::DupliChild { .. } | Self::Empty)
    }
}

/// An object (or instance) that was left out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedObject {
    pub object: ObjectId,
    pub name: String,
    pub reason: SkipReason,
}

/// Outcome of one export invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Object records in the document; equals the file header count.
    pub objects_written: u64,
    pub vertices_written: u64,
    pub indices_written: u64,
    /// Total document size.
    pub bytes_written: u64,
    pub skipped: Vec<SkippedObject>,
    /// Resource paths referenced by written objects, first occurrence order.
    pub copy_set: Vec<PathBuf>,
    /// References as recorded by the path copier, when one ran.
    pub resource_references: Vec<PathBuf>,
    /// Export stopped early on request.
    pub cancelled: bool,
}

impl ExportSummary {
    /// Skips that point at a problem in the scene.
    pub fn problems(&self) -> impl Iterator<Item = &SkippedObject> {
        self.skipped.iter().filter(|s| !s.reason.is_expected())
    }

    pub(super) fn add_resource(&mut self, path: PathBuf) {
        if !self.copy_set.contains(&path) {
            self.copy_set.push(path);
        }
    }
}
