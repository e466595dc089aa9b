//! Scene access for the exporter.
//!
//! - [`SceneSource`] - Capability interface the host application implements
//! - [`MeshGuard`] - Evaluated mesh released back to its scene on drop
//! - [`ObjectId`] / [`ObjectInfo`] / [`ObjectInstance`] - Object handles and descriptions
//! - [`InstanceType`] - Vertex/face duplication classification
//! - [`NodeTransform`] - TRS transform using plain arrays
//! - [`MemoryScene`] / [`MemoryObject`] - In-memory scene with [`Modifier`] support

mod memory;
mod modifier;
mod source;
mod types;

pub use memory::{MemoryObject, MemoryScene};
pub use modifier::Modifier;
pub use source::{MeshGuard, SceneSource};
pub use types::{InstanceType, NodeTransform, ObjectId, ObjectInfo, ObjectInstance};
