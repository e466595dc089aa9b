//! Reserve/backpatch stream writer.

use std::io::{self, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::ExportError;

use super::FIELD_SIZE;

/// Placeholder fields written by [`Wc1Writer::reserve`].
///
/// Only the writer that created it can fill it in, through
/// [`Wc1Writer::patch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    offset: u64,
    fields: usize,
}

impl Reservation {
    /// Byte offset of the first reserved field.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of reserved `u64` fields.
    pub fn fields(&self) -> usize {
        self.fields
    }
}

/// Append-only little-endian writer with seek-back patching.
///
/// The writer owns the current append offset. Any failed write, seek or
/// flush poisons it: the stream position is no longer trustworthy, so every
/// later call returns [`ExportError::Poisoned`] instead of writing at an
/// unknown offset.
pub struct Wc1Writer<W: Write + Seek> {
    inner: W,
    position: u64,
    failed_at: Option<u64>,
}

impl<W: Write + Seek> Wc1Writer<W> {
    /// Wrap a stream. Writing starts at the stream's current position.
    pub fn new(mut inner: W) -> Result<Self, ExportError> {
        let position = inner
            .stream_position()
            .map_err(|source| ExportError::Io { offset: 0, source })?;
        Ok(Self {
            inner,
            position,
            failed_at: None,
        })
    }

    /// Current append offset.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether an earlier operation failed.
    pub fn is_poisoned(&self) -> bool {
        self.failed_at.is_some()
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), ExportError> {
        self.append(|w| w.write_u64::<LittleEndian>(value))
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), ExportError> {
        self.append(|w| w.write_f64::<LittleEndian>(value))
    }

    /// Write one position as three consecutive `f64`.
    pub fn write_vertex(&mut self, v: [f64; 3]) -> Result<(), ExportError> {
        v.iter().try_for_each(|&c| self.write_f64(c))
    }

    /// Write one RGBA colour as four consecutive `f64`.
    pub fn write_color(&mut self, c: [f64; 4]) -> Result<(), ExportError> {
        c.iter().try_for_each(|&x| self.write_f64(x))
    }

    /// Write `fields` zero `u64` placeholders and return where they start.
    pub fn reserve(&mut self, fields: usize) -> Result<Reservation, ExportError> {
        let offset = self.position;
        for _ in 0..fields {
            self.write_u64(0)?;
        }
        Ok(Reservation { offset, fields })
    }

    /// Overwrite a reservation with known values, then restore the append
    /// offset.
    ///
    /// Fewer values than reserved fields leaves the tail at zero. On failure
    /// the writer is poisoned and the error carries the offset of the failing
    /// operation.
    pub fn patch(&mut self, reservation: &Reservation, values: &[u64]) -> Result<(), ExportError> {
        self.check()?;
        if values.len() > reservation.fields {
            return Err(ExportError::PatchOverflow {
                offset: reservation.offset,
                reserved: reservation.fields,
                got: values.len(),
            });
        }

        let resume = self.position;
        self.seek_to(reservation.offset)?;
        let mut at = reservation.offset;
        for &value in values {
            if let Err(source) = self.inner.write_u64::<LittleEndian>(value) {
                return Err(self.fail(at, source));
            }
            at += FIELD_SIZE;
        }
        self.seek_to(resume)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<(), ExportError> {
        self.check()?;
        if let Err(source) = self.inner.flush() {
            return Err(self.fail(self.position, source));
        }
        Ok(())
    }

    /// Give the stream back.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn append(&mut self, op: impl FnOnce(&mut W) -> io::Result<()>) -> Result<(), ExportError> {
        self.check()?;
        match op(&mut self.inner) {
            Ok(()) => {
                self.position += FIELD_SIZE;
                Ok(())
            }
            Err(source) => Err(self.fail(self.position, source)),
        }
    }

    fn seek_to(&mut self, offset: u64) -> Result<(), ExportError> {
        match self.inner.seek(SeekFrom::Start(offset)) {
            Ok(got) if got == offset => Ok(()),
            Ok(got) => {
                let source = io::Error::new(
                    io::ErrorKind::Other,
                    format!("seek to {offset} landed at {got}"),
                );
                Err(self.fail(offset, source))
            }
            Err(source) => Err(self.fail(offset, source)),
        }
    }

    fn check(&self) -> Result<(), ExportError> {
        match self.failed_at {
            Some(offset) => Err(ExportError::Poisoned { offset }),
            None => Ok(()),
        }
    }

    fn fail(&mut self, offset: u64, source: io::Error) -> ExportError {
        log::error!("WC1 write failed at byte offset {offset}: {source}");
        self.failed_at = Some(offset);
        ExportError::Io { offset, source }
    }
}

impl<W: Write + Seek> std::fmt::Debug for Wc1Writer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wc1Writer")
            .field("position", &self.position)
            .field("failed_at", &self.failed_at)
            .finish_non_exhaustive()
    }
}
