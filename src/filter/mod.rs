//! Filters that transform the bytes of a stream.
//!
//! A filter is installed on an [`InputStream`](crate::stream::InputStream) and from then on
//! sits between the stream and the producer it was created with. Since the filter's internal
//! state cannot be described by a file name and an offset, a filtered stream refuses to hand out
//! factories.

use crate::producer::ByteProducer;

#[cfg(feature = "deflate")]
pub mod inflate;

/// A byte transformation that can be placed on top of a [`ByteProducer`].
pub trait InputFilter: Send {
    /// Consumes the filter and returns a producer that yields the transformed bytes of
    /// `upstream`.
    fn attach(self: Box<Self>, upstream: Box<dyn ByteProducer>) -> Box<dyn ByteProducer>;
}
