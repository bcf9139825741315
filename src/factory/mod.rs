//! Deferred stream construction.
//!
//! An [`InputStreamFactory`] captures what is needed to build a stream and builds it when
//! asked, possibly much later and on another thread. Factories are cheap to clone and may outlive
//! the stream they were derived from.
//!
//! Creating a stream never fails: if the backing file has disappeared in the meantime, the
//! returned stream reports it through its status.
use std::fmt::Debug;

use crate::stream::InputStream;

pub mod file;
pub mod temp;

/// Creates [`InputStream`]s on demand.
pub trait InputStreamFactory: Debug + Send + Sync {
    /// Creates a new, independent stream.
    fn create(&self) -> Box<dyn InputStream>;

    /// Returns a copy of this factory.
    fn clone_box(&self) -> Box<dyn InputStreamFactory>;
}

impl Clone for Box<dyn InputStreamFactory> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
