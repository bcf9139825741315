//! [`InputStreamFactory`] that recreates [`FileInputStream`]s from a path and an offset.
use std::path::{Path, PathBuf};

use tracing::debug;

use super::InputStreamFactory;
use crate::stream::file::FileInputStream;
use crate::stream::InputStream;

/// Creates [`FileInputStream`]s for a fixed path and offset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileInputStreamFactory {
    path: PathBuf,
    offset: u64,
}

impl FileInputStreamFactory {
    /// Captures `path` and `offset`. The file is not touched until
    /// [`create`](InputStreamFactory::create) is called.
    pub fn new(path: impl Into<PathBuf>, offset: u64) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// Path the created streams read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Offset the created streams start at.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl InputStreamFactory for FileInputStreamFactory {
    fn create(&self) -> Box<dyn InputStream> {
        debug!(path = %self.path.display(), offset = self.offset, "creating file stream");
        Box::new(FileInputStream::new(self.path.clone(), self.offset))
    }

    fn clone_box(&self) -> Box<dyn InputStreamFactory> {
        Box::new(self.clone())
    }
}
