//! Shared ownership of temporary files.
//!
//! A [`TempFileHandle`] owns a file on disk that is deleted as soon as the last clone of the
//! handle is dropped. Every [`TempFileInputStreamFactory`] holds one such clone, so the file stays
//! around for as long as any factory could still create a stream from it.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(feature = "temp-file")]
use std::io;

#[cfg(feature = "temp-file")]
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::InputStreamFactory;
use crate::stream::file::FileInputStream;
use crate::stream::InputStream;
#[cfg(feature = "temp-file")]
use crate::WrapIoResult;

#[derive(Debug)]
struct TempFile {
    path: PathBuf,
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "temp file deleted"),
            Err(e) => warn!(path = %self.path.display(), "error deleting temp file: {e}"),
        }
    }
}

/// Reference-counted owner of a temporary file.
///
/// Cloning the handle adds a reference and dropping a clone releases one. The reference count
/// is atomic, so clones may be created and dropped on any thread; the file is deleted exactly
/// once, right after the last reference is released.
#[derive(Clone, Debug)]
pub struct TempFileHandle {
    inner: Arc<TempFile>,
}

impl TempFileHandle {
    /// Takes ownership of the file at `path`. The returned handle is the first reference.
    pub fn new_instance(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(path = %path.display(), "taking ownership of temp file");
        Self {
            inner: Arc::new(TempFile { path }),
        }
    }

    /// Takes ownership of a [`NamedTempFile`]. The file is closed and its own cleanup is
    /// disabled; from now on it is deleted when the last handle is dropped.
    #[cfg(feature = "temp-file")]
    pub fn adopt(file: NamedTempFile) -> io::Result<Self> {
        let path = file
            .into_temp_path()
            .keep()
            .map_err(io::Error::from)
            .wrap_err("error adopting temp file")?;
        Ok(Self::new_instance(path))
    }

    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Number of live references, including this one.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Creates a stream reading the temporary file from the start.
    pub fn create(&self) -> FileInputStream {
        FileInputStream::new(self.inner.path.clone(), 0)
    }
}

/// Creates streams over a temporary file while keeping it alive.
#[derive(Clone, Debug)]
pub struct TempFileInputStreamFactory {
    handle: TempFileHandle,
}

impl TempFileInputStreamFactory {
    /// Creates a factory holding its own reference to `handle`.
    pub fn new(handle: &TempFileHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    /// The shared handle.
    pub fn handle(&self) -> &TempFileHandle {
        &self.handle
    }
}

impl InputStreamFactory for TempFileInputStreamFactory {
    fn create(&self) -> Box<dyn InputStream> {
        Box::new(self.handle.create())
    }

    fn clone_box(&self) -> Box<dyn InputStreamFactory> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn temp_file(dir: &tempfile::TempDir, name: &str, len: usize) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, vec![9; len]).unwrap();
        path
    }

    #[test]
    fn last_release_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "shared.tmp", 16);

        let handle = TempFileHandle::new_instance(&path);
        assert_eq!(1, handle.ref_count());
        let first = TempFileInputStreamFactory::new(&handle);
        let second = TempFileInputStreamFactory::new(&handle);
        assert_eq!(3, handle.ref_count());

        drop(handle);
        assert!(path.exists());
        drop(first);
        assert!(path.exists());
        assert_eq!(1, second.handle().ref_count());

        let mut stream = second.create();
        assert_eq!(16, stream.avail());
        let mut buf = [0; 4];
        assert_eq!(4, stream.read(&mut buf));
        assert_eq!([9; 4], buf);
        drop(stream);

        drop(second);
        assert!(!path.exists());
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    fn factory_clone_takes_a_reference(#[case] clones: usize) {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "cloned.tmp", 1);
        let factory = TempFileInputStreamFactory::new(&TempFileHandle::new_instance(&path));
        assert_eq!(1, factory.handle().ref_count());

        let copies: Vec<_> = (0..clones).map(|_| factory.clone_box()).collect();
        assert_eq!(1 + clones, factory.handle().ref_count());
        drop(copies);
        assert_eq!(1, factory.handle().ref_count());
        drop(factory);
        assert!(!path.exists());
    }

    #[test]
    fn streams_start_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "zero.tmp", 32);
        let handle = TempFileHandle::new_instance(&path);
        let mut stream = handle.create();
        assert_eq!(0, stream.tell());
        assert_eq!(32, stream.avail());
    }

    #[test]
    fn missing_file_is_tolerated_on_release() {
        let dir = tempfile::tempdir().unwrap();
        let handle = TempFileHandle::new_instance(dir.path().join("never-created.tmp"));
        assert!(!handle.create().good());
        drop(handle);
    }

    #[cfg(feature = "temp-file")]
    #[test]
    fn adopted_file_follows_ref_count() {
        use std::io::Write;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"adopted").unwrap();
        let path = file.path().to_path_buf();

        let handle = TempFileHandle::adopt(file).unwrap();
        assert_eq!(path, handle.path());
        let factory = TempFileInputStreamFactory::new(&handle);
        drop(handle);
        assert!(path.exists());
        assert_eq!(7, factory.create().avail());
        drop(factory);
        assert!(!path.exists());
    }
}
