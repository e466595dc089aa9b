//! Shared helpers for the export integration tests.
//!
//! The library only writes WC1; the decoder here exists so tests can check
//! documents field by field.

#![allow(dead_code)]

use std::io::{self, Cursor, Seek, SeekFrom, Write};

use worldclient_core::export::write_scene;
use worldclient_core::{ExportOptions, ExportSummary, SceneSource};

// ============================================================================
// Decoder
// ============================================================================

/// One object record read back from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedObject {
    /// Byte offset of the object header.
    pub offset: usize,
    pub vertex_count: u64,
    pub index_count: u64,
    pub flags: u64,
    pub vertices: Vec<[f64; 3]>,
    /// Per layer, one RGBA per index entry.
    pub color_layers: Vec<Vec<[f64; 4]>>,
    pub indices: Vec<u64>,
}

impl DecodedObject {
    pub fn has_colors(&self) -> bool {
        self.flags & 1 != 0
    }

    /// Header still holds the placeholder zeros.
    pub fn is_placeholder(&self) -> bool {
        self.vertex_count == 0 && self.index_count == 0 && self.flags == 0
    }
}

/// A document read back from bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedDocument {
    pub object_count: u64,
    pub objects: Vec<DecodedObject>,
    /// Bytes left after the last complete record.
    pub trailing: usize,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn u64(&mut self) -> Option<u64> {
        let field = self.bytes.get(self.pos..self.pos + 8)?;
        self.pos += 8;
        Some(u64::from_le_bytes(field.try_into().unwrap()))
    }

    fn f64(&mut self) -> Option<f64> {
        self.u64().map(f64::from_bits)
    }
}

/// Read complete object records until the bytes run out.
///
/// `color_layers` is the number of colour layers of every flagged object;
/// the format does not store it.
pub fn decode(bytes: &[u8], color_layers: usize) -> DecodedDocument {
    let mut r = Reader { bytes, pos: 0 };
    let object_count = r.u64().expect("file header");
    let mut objects = Vec::new();

    loop {
        let start = r.pos;
        match read_object(&mut r, color_layers) {
            Some(object) if !object.is_placeholder() => objects.push(object),
            _ => {
                r.pos = start;
                break;
            }
        }
    }

    DecodedDocument {
        object_count,
        objects,
        trailing: r.remaining(),
    }
}

fn read_object(r: &mut Reader<'_>, color_layers: usize) -> Option<DecodedObject> {
    let offset = r.pos;
    let vertex_count = r.u64()?;
    let index_count = r.u64()?;
    let flags = r.u64()?;

    let mut vertices = Vec::with_capacity(vertex_count as usize);
    for _ in 0..vertex_count {
        vertices.push([r.f64()?, r.f64()?, r.f64()?]);
    }

    let mut layers = Vec::new();
    if flags & 1 != 0 {
        for _ in 0..color_layers {
            let mut colors = Vec::with_capacity(index_count as usize);
            for _ in 0..index_count {
                colors.push([r.f64()?, r.f64()?, r.f64()?, r.f64()?]);
            }
            layers.push(colors);
        }
    }

    let mut indices = Vec::with_capacity(index_count as usize);
    for _ in 0..index_count {
        indices.push(r.u64()?);
    }

    Some(DecodedObject {
        offset,
        vertex_count,
        index_count,
        flags,
        vertices,
        color_layers: layers,
        indices,
    })
}

/// Export to memory and return the summary with the raw bytes.
pub fn export_bytes<S: SceneSource + ?Sized>(
    scene: &S,
    options: &ExportOptions,
) -> (ExportSummary, Vec<u8>) {
    let (summary, out) =
        write_scene(scene, options, Cursor::new(Vec::new()), None).expect("export should succeed");
    (summary, out.into_inner())
}

/// Check the count invariants every successful export must satisfy.
pub fn assert_consistent(doc: &DecodedDocument) {
    assert_eq!(doc.trailing, 0, "bytes after the last record");
    assert_eq!(doc.object_count as usize, doc.objects.len());
    for object in &doc.objects {
        assert_eq!(object.vertices.len() as u64, object.vertex_count);
        assert_eq!(object.indices.len() as u64, object.index_count);
    }
}

/// Check that every index lies in its object's slice of the global vertex space.
pub fn assert_global_indices(doc: &DecodedDocument) {
    let mut base = 0u64;
    for (i, object) in doc.objects.iter().enumerate() {
        let end = base + object.vertex_count;
        for &index in &object.indices {
            assert!(
                (base..end).contains(&index),
                "object {i}: index {index} outside {base}..{end}"
            );
        }
        base = end;
    }
}

pub fn u64_at(bytes: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(bytes[offset..offset + 8].try_into().unwrap())
}

// ============================================================================
// Failing stream
// ============================================================================

/// In-memory stream that fails every write reaching past `limit` bytes,
/// like a disk filling up.
#[derive(Debug)]
pub struct FailingWriter {
    inner: Cursor<Vec<u8>>,
    limit: u64,
}

impl FailingWriter {
    pub fn new(limit: u64) -> Self {
        Self {
            inner: Cursor::new(Vec::new()),
            limit,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.inner.position() + buf.len() as u64 > self.limit {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "no space left"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FailingWriter {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
