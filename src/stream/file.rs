//! [`InputStream`] reading from a file, resumable through a [`FileInputStreamFactory`].
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{InputStream, ProducerStream};
use crate::error::Status;
use crate::factory::file::FileInputStreamFactory;
use crate::factory::InputStreamFactory;
use crate::filter::InputFilter;
use crate::producer::file::FileByteProducer;

/// Stream over a file, starting at a byte offset.
///
/// [`tell`](InputStream::tell) reports the absolute file position, so a stream created at offset
/// 10 that read 50 bytes is at position 60. As long as no filter is installed,
/// [`new_factory`](InputStream::new_factory) captures the path and that position.
///
/// ```no_run
/// use resumable_stream::{FileInputStream, InputStream};
///
/// let mut stream = FileInputStream::new("data.bin", 10);
/// let mut header = [0; 50];
/// stream.read(&mut header);
///
/// let factory = stream.new_factory().expect("no filter installed");
/// let resumed = factory.create();
/// assert_eq!(stream.tell(), resumed.tell());
/// ```
#[derive(Debug)]
pub struct FileInputStream {
    stream: ProducerStream<FileByteProducer>,
    path: PathBuf,
}

impl FileInputStream {
    /// Opens `path` at `offset`. Failures are reported through [`status`](InputStream::status).
    pub fn new(path: impl Into<PathBuf>, offset: u64) -> Self {
        let path = path.into();
        let producer = FileByteProducer::new(&path, offset);
        Self {
            stream: ProducerStream::starting_at(producer, offset),
            path,
        }
    }

    /// Path of the file being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file producer, unless a filter has been installed on top of it.
    pub fn producer(&self) -> Option<&FileByteProducer> {
        self.stream.own_producer()
    }
}

impl InputStream for FileInputStream {
    fn good(&self) -> bool {
        self.stream.good()
    }

    fn status(&self) -> Status {
        self.stream.status()
    }

    fn eos(&mut self) -> bool {
        self.stream.eos()
    }

    fn avail(&mut self) -> u64 {
        self.stream.avail()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.stream.read(buf)
    }

    fn skip(&mut self, n: u64) -> u64 {
        self.stream.skip(n)
    }

    fn tell(&self) -> u64 {
        self.stream.tell()
    }

    fn mark(&mut self) {
        self.stream.mark()
    }

    fn putback(&mut self) {
        self.stream.putback()
    }

    fn install_filter(&mut self, filter: Box<dyn InputFilter>) -> Status {
        self.stream.install_filter(filter)
    }

    fn has_filter(&self) -> bool {
        self.stream.has_filter()
    }

    fn new_factory(&self) -> Option<Box<dyn InputStreamFactory>> {
        if self.stream.own_producer().is_none() {
            debug!(path = %self.path.display(), "filter installed, stream cannot be resumed");
            return None;
        }
        Some(Box::new(FileInputStreamFactory::new(
            self.path.clone(),
            self.tell(),
        )))
    }
}
