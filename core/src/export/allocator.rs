//! Global vertex index allocation.

/// Running vertex offset shared by every object of one WC1 document.
///
/// Indices written for an object are its local indices plus the offset that
/// was current when the object began. The offset only moves forward, by the
/// vertex count of each object actually written, so the order in which
/// objects are encoded determines every global index after them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlobalIndexAllocator {
    offset: u64,
}

impl GlobalIndexAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset applied to the object currently being written.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Map a local vertex index to the global vertex space.
    pub fn allocate(&self, local: u32) -> u64 {
        self.offset + u64::from(local)
    }

    /// Move past an object's vertices once they have been written.
    pub fn advance(&mut self, vertex_count: u64) {
        self.offset += vertex_count;
    }
}
