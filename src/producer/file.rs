//! [`ByteProducer`] over a single file opened for reading.
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, instrument, trace, warn};

use super::ByteProducer;
use crate::error::{Status, StreamError};

/// Reads a file starting at a byte offset.
///
/// The file size is measured once at construction and every bound check uses that cached value,
/// so bytes appended to the file while it is being read are never observed.
///
/// Construction never fails. If the file cannot be opened or the offset cannot be reached, the
/// producer starts out failed. A failed producer is inert: it reports `eos()`, no bytes
/// available, and reads nothing. [`position`](FileByteProducer::position) still reports where the
/// cursor was left.
#[derive(Debug)]
pub struct FileByteProducer {
    file: Option<File>,
    size: u64,
    status: Status,
}

impl FileByteProducer {
    /// Opens `path` and positions the read cursor at `offset`.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), offset = offset))]
    pub fn new(path: impl AsRef<Path>, offset: u64) -> Self {
        let mut file = match File::open(path.as_ref()) {
            Ok(file) => file,
            Err(e) => {
                warn!("error opening file: {e}");
                return Self {
                    file: None,
                    size: 0,
                    status: Err(StreamError::from_io(&e, "error opening file")),
                };
            }
        };

        let size = match file.seek(SeekFrom::End(0)) {
            Ok(size) => size,
            Err(e) => {
                warn!("error measuring file: {e}");
                return Self {
                    file: Some(file),
                    size: 0,
                    status: Err(StreamError::from_io(&e, "error measuring file")),
                };
            }
        };

        let status = if offset > size {
            warn!(size, "offset is past the end of the file");
            Err(StreamError::io(
                io::ErrorKind::InvalidInput,
                format!("offset {offset} is past the end of the file ({size} bytes)"),
            ))
        } else {
            file.seek(SeekFrom::Start(offset))
                .map(|_| ())
                .map_err(|e| StreamError::from_io(&e, "error seeking to offset"))
        };
        debug!(size, good = status.is_ok(), "file opened");

        Self {
            file: Some(file),
            size,
            status,
        }
    }

    /// Size of the file in bytes, measured when the producer was created.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if the file was opened.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Current cursor position, or `None` if the file is not open or the position cannot be
    /// queried.
    pub fn position(&self) -> Option<u64> {
        self.cursor()?.ok()
    }

    fn cursor(&self) -> Option<io::Result<u64>> {
        let mut file = self.file.as_ref()?;
        Some(file.stream_position())
    }

    fn fail(&mut self, error: &io::Error, context: &str) {
        warn!("{context}: {error}");
        self.status = Err(StreamError::from_io(error, context));
    }

    // Position for operations that move the cursor; `None` if they must be skipped.
    fn usable_position(&mut self) -> Option<u64> {
        if self.status.is_err() {
            return None;
        }
        match self.cursor()? {
            Ok(position) => Some(position),
            Err(e) => {
                self.fail(&e, "error querying file position");
                None
            }
        }
    }
}

impl ByteProducer for FileByteProducer {
    fn good(&self) -> bool {
        self.status.is_ok()
    }

    fn status(&self) -> Status {
        self.status.clone()
    }

    fn eos(&mut self) -> bool {
        match self.usable_position() {
            Some(position) => position >= self.size,
            None => true,
        }
    }

    fn avail(&mut self) -> u64 {
        match self.usable_position() {
            Some(position) => self.size.saturating_sub(position),
            None => 0,
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        let Some(position) = self.usable_position() else {
            return 0;
        };
        let remaining = self.size.saturating_sub(position);
        let len = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        if len == 0 {
            return 0;
        }

        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        let result = loop {
            match file.read(&mut buf[..len]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match result {
            Ok(read) => {
                trace!(requested = buf.len(), read, position, "read from file");
                read
            }
            Err(e) => {
                self.fail(&e, "error reading file");
                0
            }
        }
    }

    #[instrument(skip(self))]
    fn skip(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        let Some(position) = self.usable_position() else {
            return 0;
        };
        let count = n.min(self.size.saturating_sub(position));
        if count == 0 {
            return 0;
        }

        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        match file.seek(SeekFrom::Start(position + count)) {
            Ok(_) => {
                trace!(count, "skipped");
                count
            }
            Err(e) => {
                self.fail(&e, "error seeking forward");
                0
            }
        }
    }

    #[instrument(skip(self))]
    fn putback(&mut self, n: u64) {
        if n == 0 {
            return;
        }
        let Some(position) = self.usable_position() else {
            return;
        };
        if n > position {
            debug!(position, "putback before start of file");
            self.status = Err(StreamError::PutbackFailed);
            return;
        }

        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = file.seek(SeekFrom::Start(position - n)) {
            self.fail(&e, "error seeking backward");
        }
    }
}
