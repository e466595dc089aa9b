//! # WorldClient Core
//!
//! WC1 binary mesh encoder. Walks a host scene through the [`SceneSource`]
//! capability interface, flattens every mesh instance into position, colour
//! and index streams, and writes them as one little-endian WC1 document with
//! backpatched headers.
//!
//! - [`export`] - Export driver, flattener and global index allocation
//! - [`wc1`] - Format constants and the reserve/patch stream writer
//! - [`scene`] - Scene capability interface and an in-memory implementation
//! - [`mesh`] - Evaluated meshes, triangulation and shape generators
//! - [`options`] - Immutable export configuration

pub mod cancel;
pub mod error;
pub mod export;
pub mod math;
pub mod mesh;
pub mod options;
pub mod paths;
pub mod scene;
pub mod wc1;

pub use cancel::CancellationToken;
pub use error::{ExportError, InstanceGraphError, MeshEvalError};
pub use export::{save, write_scene, ExportSummary, SkipReason, SkippedObject};
pub use options::ExportOptions;
pub use scene::SceneSource;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
