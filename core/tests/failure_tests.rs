//! Failure, cancellation and resource tests for the WC1 exporter.

mod common;

use std::cell::Cell;
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::PathBuf;

use common::{assert_consistent, decode, u64_at, FailingWriter};
use worldclient_core::error::{InstanceGraphError, MeshEvalError};
use worldclient_core::math::Mat4;
use worldclient_core::mesh::generators::generate_cube;
use worldclient_core::mesh::EvaluatedMesh;
use worldclient_core::paths::{FsPathCopier, NoopPathCopier, PathMode};
use worldclient_core::scene::{
    MemoryObject, MemoryScene, NodeTransform, ObjectId, ObjectInfo, ObjectInstance, SceneSource,
};
use worldclient_core::{save, write_scene, CancellationToken, ExportError, ExportOptions};

fn cubes(count: usize) -> MemoryScene {
    let mut scene = MemoryScene::new();
    for i in 0..count {
        scene.add(
            MemoryObject::new(format!("cube{i}"))
                .with_mesh(generate_cube(1.0))
                .with_transform(
                    NodeTransform::IDENTITY.with_translation([i as f64 * 2.0, 0.0, 0.0]),
                ),
        );
    }
    scene
}

/// Size of one triangulated unit cube record: header, 8 vertices, 36 indices.
const CUBE_RECORD: usize = 24 + 8 * 24 + 36 * 8;

// ============================================================================
// Truncation
// ============================================================================

#[test]
fn write_failure_mid_object_leaves_completed_prefix() {
    let scene = cubes(2);
    let options = ExportOptions::new().with_triangulate(true);

    // Room for the file header, the first record, the second header and
    // two and two thirds vertices of the second record.
    let second = 8 + CUBE_RECORD;
    let limit = second + 24 + 2 * 24 + 16;
    let mut out = FailingWriter::new(limit as u64);

    let err = write_scene(&scene, &options, &mut out, None).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }), "{err}");
    assert_eq!(err.offset(), Some(limit as u64));

    let bytes = out.bytes();
    assert_eq!(bytes.len(), limit);
    // The header counts the first object only; the second one is truncated
    // and its header still holds placeholder zeros.
    assert_eq!(u64_at(bytes, 0), 1);
    assert_eq!(u64_at(bytes, second), 0);
    assert_eq!(u64_at(bytes, second + 8), 0);
    assert_eq!(u64_at(bytes, second + 16), 0);

    let doc = decode(bytes, 0);
    assert_eq!(doc.object_count, 1);
    assert_eq!(doc.objects.len(), 1);
    assert_eq!(doc.objects[0].index_count, 36);
    assert_eq!(doc.trailing, limit - second);
}

#[test]
fn write_failure_in_first_object_leaves_zero_count() {
    let scene = cubes(3);
    let mut out = FailingWriter::new(8 + 24 + 40);

    let err = write_scene(&scene, &ExportOptions::new(), &mut out, None).unwrap_err();
    assert_eq!(err.offset(), Some(8 + 24 + 40));
    assert_eq!(u64_at(out.bytes(), 0), 0);
    assert_eq!(decode(out.bytes(), 0).objects.len(), 0);
}

#[test]
fn write_failure_stops_the_pass() {
    let scene = cubes(4);
    let mut out = FailingWriter::new((8 + CUBE_RECORD + 10) as u64);

    let result = write_scene(
        &scene,
        &ExportOptions::new().with_triangulate(true),
        &mut out,
        None,
    );
    assert!(result.is_err());
    // Meshes are handed back even though the export failed part way.
    assert_eq!(scene.live_meshes(), 0);
    assert_eq!(scene.evaluations(), 2);
    assert_eq!(scene.releases(), 2);
}

#[test]
fn failed_header_reservation_reports_offset() {
    let scene = cubes(1);
    let mut out = FailingWriter::new(4);
    let err = write_scene(&scene, &ExportOptions::new(), &mut out, None).unwrap_err();
    assert_eq!(err.offset(), Some(0));
    assert!(out.bytes().is_empty());
}

/// Stream whose first 8 bytes can only be written once, so every later
/// rewrite of the file header fails.
#[derive(Debug, Default)]
struct SealedHeader {
    inner: Cursor<Vec<u8>>,
}

impl Write for SealedHeader {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let sealed = !self.inner.get_ref().is_empty();
        if sealed && self.inner.position() < 8 {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "header is sealed"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for SealedHeader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn failed_file_header_patch_stops_after_first_object() {
    let scene = cubes(3);
    let mut out = SealedHeader::default();

    let err = write_scene(
        &scene,
        &ExportOptions::new().with_triangulate(true),
        &mut out,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::Io { offset: 0, .. }), "{err}");

    assert_eq!(scene.evaluations(), 1);
    assert_eq!(scene.live_meshes(), 0);

    // The first record is complete; the count never got past zero.
    let bytes = out.inner.get_ref();
    assert_eq!(bytes.len(), 8 + CUBE_RECORD);
    assert_eq!(u64_at(bytes, 0), 0);
    assert_eq!(u64_at(bytes, 8), 8);
    assert_eq!(u64_at(bytes, 16), 36);
}

// ============================================================================
// Cancellation
// ============================================================================

/// Scene wrapper that raises a cancellation token after a number of mesh
/// evaluations, standing in for a user pressing stop mid-export.
struct CancelAfter<'a> {
    scene: &'a MemoryScene,
    token: CancellationToken,
    after: usize,
    calls: Cell<usize>,
}

impl SceneSource for CancelAfter<'_> {
    fn top_level_objects(&self) -> Vec<ObjectId> {
        self.scene.top_level_objects()
    }

    fn object_info(&self, object: ObjectId) -> Option<ObjectInfo> {
        self.scene.object_info(object)
    }

    fn world_transform(&self, object: ObjectId) -> Result<Mat4, InstanceGraphError> {
        self.scene.world_transform(object)
    }

    fn expand_instances(
        &self,
        object: ObjectId,
    ) -> Result<Vec<ObjectInstance>, InstanceGraphError> {
        self.scene.expand_instances(object)
    }

    fn evaluate_mesh(
        &self,
        object: ObjectId,
        apply_modifiers: bool,
    ) -> Result<Option<EvaluatedMesh>, MeshEvalError> {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);
        if calls == self.after {
            self.token.cancel();
        }
        self.scene.evaluate_mesh(object, apply_modifiers)
    }

    fn release_mesh(&self, object: ObjectId, mesh: EvaluatedMesh) {
        self.scene.release_mesh(object, mesh);
    }
}

#[test]
fn cancellation_keeps_written_objects_valid() {
    let scene = cubes(5);
    let token = CancellationToken::new();
    let source = CancelAfter {
        scene: &scene,
        token: token.clone(),
        after: 2,
        calls: Cell::new(0),
    };

    let options = ExportOptions::new().with_triangulate(true);
    let (summary, out) =
        write_scene(&source, &options, Cursor::new(Vec::new()), Some(&token)).unwrap();

    // The object being evaluated when stop was requested still completes.
    assert!(summary.cancelled);
    assert_eq!(summary.objects_written, 2);
    let doc = decode(out.get_ref(), 0);
    assert_consistent(&doc);
    assert_eq!(doc.object_count, 2);
    assert_eq!(scene.live_meshes(), 0);
}

#[test]
fn cancelled_before_start_writes_empty_document() {
    let scene = cubes(3);
    let token = CancellationToken::new();
    token.cancel();

    let (summary, out) =
        write_scene(&scene, &ExportOptions::new(), Cursor::new(Vec::new()), Some(&token)).unwrap();
    assert!(summary.cancelled);
    assert_eq!(out.into_inner(), vec![0u8; 8]);
    assert_eq!(scene.evaluations(), 0);
}

#[test]
fn uncancelled_token_changes_nothing() {
    let scene = cubes(3);
    let token = CancellationToken::new();
    let (with_token, a) =
        write_scene(&scene, &ExportOptions::new(), Cursor::new(Vec::new()), Some(&token)).unwrap();
    let (without, b) =
        write_scene(&scene, &ExportOptions::new(), Cursor::new(Vec::new()), None).unwrap();
    assert!(!with_token.cancelled);
    assert_eq!(with_token, without);
    assert_eq!(a.into_inner(), b.into_inner());
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn one_mesh_alive_at_a_time() {
    let mut scene = cubes(10);
    scene.add(MemoryObject::new("empty").with_mesh(EvaluatedMesh::new()));

    write_scene(&scene, &ExportOptions::new(), Cursor::new(Vec::new()), None).unwrap();
    assert_eq!(scene.peak_live_meshes(), 1);
    assert_eq!(scene.live_meshes(), 0);
    assert_eq!(scene.evaluations(), 11);
    assert_eq!(scene.releases(), 11);
}

#[test]
fn invalid_options_write_nothing() {
    let scene = cubes(1);
    let mut out = Cursor::new(Vec::new());
    let options = ExportOptions::new().with_global_scale(0.0);

    let err = write_scene(&scene, &options, &mut out, None).unwrap_err();
    assert!(matches!(err, ExportError::InvalidOptions(_)));
    assert!(out.get_ref().is_empty());
    assert_eq!(scene.evaluations(), 0);
}

// ============================================================================
// save()
// ============================================================================

#[test]
fn save_writes_file_and_copies_resources() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    std::fs::write(src.path().join("brick.png"), b"brick").unwrap();

    let mut scene = MemoryScene::new();
    scene.add(
        MemoryObject::new("wall")
            .with_mesh(generate_cube(1.0))
            .with_resource("brick.png"),
    );
    scene.add(
        MemoryObject::new("wall2")
            .with_mesh(generate_cube(1.0))
            .with_resource("brick.png"),
    );

    let path = dst.path().join("scene.wc1");
    let mut copier = FsPathCopier::new(PathMode::Copy, src.path());
    let options = ExportOptions::new().with_triangulate(true);
    let summary = save(&scene, &path, &options, &mut copier, None).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len() as u64, summary.bytes_written);
    let doc = decode(&bytes, 0);
    assert_consistent(&doc);
    assert_eq!(doc.object_count, 2);

    assert_eq!(summary.copy_set, vec![PathBuf::from("brick.png")]);
    assert_eq!(summary.resource_references, vec![PathBuf::from("brick.png")]);
    assert_eq!(copier.copied(), 1);
    assert_eq!(std::fs::read(dst.path().join("brick.png")).unwrap(), b"brick");
}

#[test]
fn save_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.wc1");
    std::fs::write(&path, vec![0xFFu8; 4096]).unwrap();

    let summary = save(&cubes(1), &path, &ExportOptions::new(), &mut NoopPathCopier, None).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), summary.bytes_written);
}

#[test]
fn save_with_invalid_options_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.wc1");
    let options = ExportOptions::new().with_axes(
        worldclient_core::math::Axis::Z,
        worldclient_core::math::Axis::NegZ,
    );

    let err = save(&cubes(1), &path, &options, &mut NoopPathCopier, None).unwrap_err();
    assert!(matches!(err, ExportError::InvalidOptions(_)));
    assert!(!path.exists());
}

#[test]
fn save_into_missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("scene.wc1");
    let err = save(&cubes(1), &path, &ExportOptions::new(), &mut NoopPathCopier, None).unwrap_err();
    assert!(matches!(err, ExportError::Io { offset: 0, .. }));
}
