//! Streams handed to decoders.
//!
//! An [`InputStream`] reads from a *current* producer: either the producer the stream was
//! created with, or a filter wrapped around it. Besides forwarding reads, the stream tracks the
//! absolute read position ([`tell`](InputStream::tell)) and a mark that can be rewound to, and it
//! can describe itself as an [`InputStreamFactory`] so that reading can resume later.

use std::io::{self, Read};
use std::mem;

use educe::Educe;
use tracing::{debug, trace};

use crate::error::{Status, StreamError};
use crate::factory::InputStreamFactory;
use crate::filter::InputFilter;
use crate::producer::ByteProducer;

pub mod file;

/// Consumer-facing byte stream.
pub trait InputStream: Send {
    /// Returns `true` if the current producer is in the normal state.
    fn good(&self) -> bool;

    /// Returns the status of the current producer.
    fn status(&self) -> Status;

    /// Returns `true` once no further bytes can be read.
    fn eos(&mut self) -> bool;

    /// Number of bytes that can still be read from the current producer.
    fn avail(&mut self) -> u64;

    /// Reads up to `buf.len()` bytes and returns how many were transferred.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Skips up to `n` bytes and returns how many were skipped.
    fn skip(&mut self, n: u64) -> u64;

    /// Current read position.
    fn tell(&self) -> u64;

    /// Remembers the current read position for a later [`putback`](InputStream::putback).
    fn mark(&mut self);

    /// Rewinds to the position of the last [`mark`](InputStream::mark). If the producer cannot
    /// rewind that far the stream fails and [`tell`](InputStream::tell) keeps reporting the
    /// position it stopped at.
    fn putback(&mut self);

    /// Places `filter` between the stream and its producer. Only one filter can be installed.
    fn install_filter(&mut self, filter: Box<dyn InputFilter>) -> Status;

    /// Returns `true` if a filter is installed, meaning the stream no longer reads directly
    /// from its own producer.
    fn has_filter(&self) -> bool;

    /// Returns a factory that recreates this stream at its current position, or `None` if the
    /// stream cannot be reconstructed.
    fn new_factory(&self) -> Option<Box<dyn InputStreamFactory>> {
        None
    }
}

impl<S: InputStream + ?Sized> InputStream for Box<S> {
    fn good(&self) -> bool {
        (**self).good()
    }

    fn status(&self) -> Status {
        (**self).status()
    }

    fn eos(&mut self) -> bool {
        (**self).eos()
    }

    fn avail(&mut self) -> u64 {
        (**self).avail()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        (**self).read(buf)
    }

    fn skip(&mut self, n: u64) -> u64 {
        (**self).skip(n)
    }

    fn tell(&self) -> u64 {
        (**self).tell()
    }

    fn mark(&mut self) {
        (**self).mark()
    }

    fn putback(&mut self) {
        (**self).putback()
    }

    fn install_filter(&mut self, filter: Box<dyn InputFilter>) -> Status {
        (**self).install_filter(filter)
    }

    fn has_filter(&self) -> bool {
        (**self).has_filter()
    }

    fn new_factory(&self) -> Option<Box<dyn InputStreamFactory>> {
        (**self).new_factory()
    }
}

enum Current<P> {
    Own(P),
    Filtered(Box<dyn ByteProducer>),
    // Only observable if attaching a filter panicked.
    Detached,
}

/// [`InputStream`] over a producer of type `P`, with an optional filter on top.
///
/// While no filter is installed the stream's own producer is the current one and can be
/// inspected through [`own_producer`](ProducerStream::own_producer). Installing a filter moves
/// the producer into it; from then on the stream only reads through the filter.
#[derive(Educe)]
#[educe(Debug)]
pub struct ProducerStream<P> {
    #[educe(Debug = false)]
    current: Current<P>,
    tell: u64,
    mark: u64,
}

impl<P: ByteProducer + 'static> ProducerStream<P> {
    /// Creates a stream positioned at 0.
    pub fn new(producer: P) -> Self {
        Self::starting_at(producer, 0)
    }

    /// Creates a stream whose producer is already positioned at `position`.
    pub fn starting_at(producer: P, position: u64) -> Self {
        Self {
            current: Current::Own(producer),
            tell: position,
            mark: position,
        }
    }

    /// Returns the stream's own producer if it is the current one.
    pub fn own_producer(&self) -> Option<&P> {
        match &self.current {
            Current::Own(producer) => Some(producer),
            _ => None,
        }
    }

    fn producer(&mut self) -> Option<&mut dyn ByteProducer> {
        match &mut self.current {
            Current::Own(producer) => Some(producer),
            Current::Filtered(filter) => Some(filter.as_mut()),
            Current::Detached => None,
        }
    }

    fn producer_ref(&self) -> Option<&dyn ByteProducer> {
        match &self.current {
            Current::Own(producer) => Some(producer),
            Current::Filtered(filter) => Some(filter.as_ref()),
            Current::Detached => None,
        }
    }
}

impl<P: ByteProducer + 'static> InputStream for ProducerStream<P> {
    fn good(&self) -> bool {
        self.producer_ref().is_some_and(|p| p.good())
    }

    fn status(&self) -> Status {
        match self.producer_ref() {
            Some(producer) => producer.status(),
            None => Err(StreamError::io(
                io::ErrorKind::Other,
                "stream lost its producer",
            )),
        }
    }

    fn eos(&mut self) -> bool {
        self.producer().map_or(true, |p| p.eos())
    }

    fn avail(&mut self) -> u64 {
        self.producer().map_or(0, |p| p.avail())
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let read = self.producer().map_or(0, |p| p.read(buf));
        self.tell += read as u64;
        read
    }

    fn skip(&mut self, n: u64) -> u64 {
        let skipped = self.producer().map_or(0, |p| p.skip(n));
        self.tell += skipped;
        skipped
    }

    fn tell(&self) -> u64 {
        self.tell
    }

    fn mark(&mut self) {
        trace!(position = self.tell, "mark");
        self.mark = self.tell;
    }

    fn putback(&mut self) {
        let count = self.tell - self.mark;
        let Some(producer) = self.producer() else {
            return;
        };
        producer.putback(count);
        if producer.good() {
            trace!(count, position = self.mark, "putback to mark");
            self.tell = self.mark;
        } else {
            debug!(count, position = self.tell, "putback to mark failed");
        }
    }

    fn install_filter(&mut self, filter: Box<dyn InputFilter>) -> Status {
        let own = match mem::replace(&mut self.current, Current::Detached) {
            Current::Own(producer) => producer,
            other => {
                self.current = other;
                debug!("refusing to install a second filter");
                return Err(StreamError::FilterAlreadyInstalled);
            }
        };
        debug!(position = self.tell, "installing filter");
        self.current = Current::Filtered(filter.attach(Box::new(own)));
        Ok(())
    }

    fn has_filter(&self) -> bool {
        !matches!(self.current, Current::Own(_))
    }
}

/// Adapts an [`InputStream`] to [`std::io::Read`]. A stream that left the normal state reports
/// its status as an [`io::Error`].
#[derive(Debug)]
pub struct Reader<S> {
    inner: S,
}

impl<S: InputStream> Reader<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Returns a reference to the wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the wrapped stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwraps the stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: InputStream> Read for Reader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.status()?;
        if buf.is_empty() {
            return Ok(0);
        }
        let read = self.inner.read(buf);
        if read == 0 {
            self.inner.status()?;
        }
        Ok(read)
    }
}
