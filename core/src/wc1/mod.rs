//! WC1 binary container.
//!
//! All fields are 8 bytes wide and little-endian, with no padding:
//!
//! ```text
//! FileHeader:     u64 objectCount
//! ObjectRecord[objectCount]:
//!   ObjectHeader: u64 vertexCount, u64 indexCount, u64 flags
//!   Vertices:     vertexCount x (f64 x, f64 -y, f64 z)
//!   ColorLayers:  per layer, per face-loop: f64 r, g, b, a
//!   Indices:      indexCount x u64 global vertex index
//! ```
//!
//! Headers are written as zero placeholders and backpatched by [`Wc1Writer`]
//! once the counts are known. A reader must treat an object header that is
//! still all zeros as a truncated record.

mod writer;

pub use writer::{Reservation, Wc1Writer};

use bitflags::bitflags;

/// Size in bytes of one field.
pub const FIELD_SIZE: u64 = 8;

/// Size in bytes of the file header.
pub const FILE_HEADER_SIZE: u64 = FIELD_SIZE;

/// Number of `u64` fields in an object header.
pub const OBJECT_HEADER_FIELDS: usize = 3;

/// Size in bytes of one object header.
pub const OBJECT_HEADER_SIZE: u64 = OBJECT_HEADER_FIELDS as u64 * FIELD_SIZE;

bitflags! {
    /// Per-object feature flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u64 {
        /// A vertex-colour block follows the vertices.
        const HAS_VERTEX_COLORS = 1 << 0;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Counts written into an object header once its payload is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectHeader {
    pub vertex_count: u64,
    pub index_count: u64,
    pub flags: ObjectFlags,
}

impl ObjectHeader {
    /// Header fields in on-disk order.
    pub fn fields(&self) -> [u64; OBJECT_HEADER_FIELDS] {
        [self.vertex_count, self.index_count, self.flags.bits()]
    }

    /// Byte length of the payload described by this header, given the number
    /// of colour layers written.
    pub fn payload_len(&self, color_layers: usize, loop_count: u64) -> u64 {
        let vertices = self.vertex_count * 3 * FIELD_SIZE;
        let colors = if self.flags.contains(ObjectFlags::HAS_VERTEX_COLORS) {
            color_layers as u64 * loop_count * 4 * FIELD_SIZE
        } else {
            0
        };
        vertices + colors + self.index_count * FIELD_SIZE
    }
}
