//! Export driver: walks the scene and sequences writer calls.

use std::io::{Seek, Write};

use crate::cancel::CancellationToken;
use crate::error::{ExportError, InstanceGraphError};
use crate::math::Mat4;
use crate::options::ExportOptions;
use crate::scene::{MeshGuard, ObjectId, ObjectInfo, ObjectInstance, SceneSource};
use crate::wc1::{Reservation, Wc1Writer, OBJECT_HEADER_FIELDS};

use super::allocator::GlobalIndexAllocator;
use super::flatten::flatten;
use super::summary::{ExportSummary, SkipReason, SkippedObject};

// ---------------------------------------------------------------------------
// Export context
// ---------------------------------------------------------------------------

pub(super) struct ExportContext<'a, S: SceneSource + ?Sized, W: Write + Seek> {
    source: &'a S,
    options: &'a ExportOptions,
    cancel: Option<&'a CancellationToken>,
    global: Mat4,
    writer: Wc1Writer<W>,
    allocator: GlobalIndexAllocator,
    file_header: Reservation,
    summary: ExportSummary,
}

impl<'a, S: SceneSource + ?Sized, W: Write + Seek> ExportContext<'a, S, W> {
    /// Validate options and write the file header placeholder.
    pub(super) fn new(
        source: &'a S,
        options: &'a ExportOptions,
        out: W,
        cancel: Option<&'a CancellationToken>,
    ) -> Result<Self, ExportError> {
        options.validate()?;
        let global = options.global_matrix()?;
        log_ignored_options(options);

        let mut writer = Wc1Writer::new(out)?;
        let file_header = writer.reserve(1)?;

        Ok(Self {
            source,
            options,
            cancel,
            global,
            writer,
            allocator: GlobalIndexAllocator::new(),
            file_header,
            summary: ExportSummary::default(),
        })
    }

    // -- Step 1: Walk top-level objects ------------------------------------

    pub(super) fn write_objects(&mut self) -> Result<(), ExportError> {
        let objects = self.source.top_level_objects();
        let total = objects.len();

        'objects: for (i, object) in objects.into_iter().enumerate() {
            let Some(info) = self.source.object_info(object) else {
                self.skip(object, InstanceGraphError::MissingObject(object).into());
                continue;
            };

            if self.options.selection_only() && !info.selected {
                log::trace!("[{}/{}] {} not selected", i + 1, total, info.name);
                continue;
            }

            if let Some(parent) = self.instancing_parent(&info) {
                self.skip(object, SkipReason::DupliChild { parent });
                continue;
            }

            let instances = match self.source.expand_instances(object) {
                Ok(instances) => instances,
                Err(err) => {
                    self.skip(object, err.into());
                    continue;
                }
            };

            log::debug!(
                "[{}/{}] {} ({} instances)",
                i + 1,
                total,
                info.name,
                instances.len()
            );

            for instance in &instances {
                if self.is_cancelled() {
                    break 'objects;
                }
                self.write_instance(instance)?;
            }
        }

        Ok(())
    }

    // -- Step 2: One record per instance ----------------------------------

    fn write_instance(&mut self, instance: &ObjectInstance) -> Result<(), ExportError> {
        let source = self.source;
        let object = instance.object;

        let mesh = match source.evaluate_mesh(object, self.options.apply_modifiers()) {
            Ok(Some(mesh)) => mesh,
            Ok(None) => {
                self.skip(object, SkipReason::Empty);
                return Ok(());
            }
            Err(err) => {
                self.skip(object, err.into());
                return Ok(());
            }
        };
        let mut mesh = MeshGuard::new(source, object, mesh);

        let geometry = flatten(&mut mesh, &self.global, &instance.transform, self.options);
        if geometry.is_empty() {
            self.skip(object, SkipReason::Empty);
            return Ok(());
        }

        let header = geometry.header();
        let record = self.writer.reserve(OBJECT_HEADER_FIELDS)?;

        for vertex in geometry.vertices() {
            self.writer.write_vertex(vertex)?;
        }
        for layer in geometry.color_layers() {
            for &color in &layer.colors {
                self.writer.write_color(color)?;
            }
        }
        for local in geometry.local_indices() {
            self.writer.write_u64(self.allocator.allocate(local))?;
        }

        self.writer.patch(&record, &header.fields())?;
        self.allocator.advance(header.vertex_count);

        self.summary.objects_written += 1;
        self.summary.vertices_written += header.vertex_count;
        self.summary.indices_written += header.index_count;
        self.writer
            .patch(&self.file_header, &[self.summary.objects_written])?;

        log::trace!(
            "wrote {} at {}: {} vertices, {} indices, flags {:?}{}",
            object,
            record.offset(),
            header.vertex_count,
            header.index_count,
            header.flags,
            if geometry.mirrored() { ", mirrored" } else { "" }
        );

        for path in source.resource_paths(object) {
            self.summary.add_resource(path);
        }

        Ok(())
    }

    // -- Step 3: Final header and flush -----------------------------------

    pub(super) fn finish(mut self) -> Result<(ExportSummary, W), ExportError> {
        self.writer
            .patch(&self.file_header, &[self.summary.objects_written])?;
        self.writer.flush()?;
        self.summary.bytes_written = self.writer.position();

        let summary = self.summary;
        if summary.cancelled {
            log::warn!(
                "WC1 export cancelled after {} objects",
                summary.objects_written
            );
        }
        log::info!(
            "WC1 export finished: {} objects, {} vertices, {} indices, {} skipped",
            summary.objects_written,
            summary.vertices_written,
            summary.indices_written,
            summary.skipped.len()
        );

        Ok((summary, self.writer.into_inner()))
    }

    // -- Helpers -----------------------------------------------------------

    /// The parent that emits this object through vertex/face duplication.
    fn instancing_parent(&self, info: &ObjectInfo) -> Option<ObjectId> {
        let parent = info.parent?;
        let parent_info = self.source.object_info(parent)?;
        parent_info.instance_type.duplicates().then_some(parent)
    }

    fn is_cancelled(&mut self) -> bool {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            self.summary.cancelled = true;
        }
        self.summary.cancelled
    }

    fn skip(&mut self, object: ObjectId, reason: SkipReason) {
        let name = self
            .source
            .object_info(object)
            .map(|info| info.name)
            .unwrap_or_else(|| object.to_string());

        if reason.is_expected() {
            log::debug!("skipping {name}: {reason}");
        } else {
            log::warn!("skipping {name}: {reason}");
        }

        self.summary.skipped.push(SkippedObject {
            object,
            name,
            reason,
        });
    }
}

fn log_ignored_options(options: &ExportOptions) {
    let ignored = [
        ("normals", options.include_normals()),
        ("UVs", options.include_uvs()),
        ("materials", options.include_materials()),
        ("animation", options.export_animation()),
    ];
    for (what, requested) in ignored {
        if requested {
            log::debug!("{what} requested; WC1 does not store them");
        }
    }
}
