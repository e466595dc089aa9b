//! Error types for WC1 export.
//!
//! Only [`ExportError`] aborts an export. [`MeshEvalError`] and
//! [`InstanceGraphError`] are reported per object and the export carries on
//! with the next one.

use std::io;

use thiserror::Error;

use crate::scene::ObjectId;

/// Fatal export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A write, seek or flush on the output stream failed.
    #[error("I/O error at byte offset {offset}: {source}")]
    Io {
        /// Stream offset at which the failing operation started.
        offset: u64,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The writer failed earlier and its stream position is no longer known.
    #[error("writer is unusable after an earlier failure at byte offset {offset}")]
    Poisoned {
        /// Offset of the original failure.
        offset: u64,
    },
    /// A patch carried more values than were reserved.
    #[error("patch at byte offset {offset} has {got} fields, only {reserved} were reserved")]
    PatchOverflow {
        /// Offset of the reservation.
        offset: u64,
        /// Number of reserved fields.
        reserved: usize,
        /// Number of values supplied.
        got: usize,
    },
    /// The export options are unusable.
    #[error("invalid export options: {0}")]
    InvalidOptions(String),
}

impl ExportError {
    /// Byte offset associated with the failure, if any.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::Io { offset, .. }
            | Self::Poisoned { offset }
            | Self::PatchOverflow { offset, .. } => Some(*offset),
            Self::InvalidOptions(_) => None,
        }
    }
}

/// The scene could not produce a mesh for an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshEvalError {
    /// The object's geometry is malformed.
    #[error("object {object}: invalid geometry: {reason}")]
    InvalidGeometry {
        /// Offending object.
        object: ObjectId,
        /// What is wrong with it.
        reason: String,
    },
    /// The object id does not exist in the scene.
    #[error("object {0} does not exist")]
    UnknownObject(ObjectId),
}

/// The object/instance hierarchy is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceGraphError {
    /// The object id does not exist in the scene.
    #[error("object {0} does not exist")]
    MissingObject(ObjectId),
    /// An object names a parent that does not exist.
    #[error("object {object} references missing parent {parent}")]
    MissingParent {
        /// Child object.
        object: ObjectId,
        /// Parent id that could not be resolved.
        parent: ObjectId,
    },
    /// Following parent links from an object leads back to itself.
    #[error("object {object} is part of a parent cycle")]
    Cycle {
        /// Object where the walk started.
        object: ObjectId,
    },
}
