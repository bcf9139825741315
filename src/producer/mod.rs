//! Pull-based byte sources.
//!
//! A [`ByteProducer`] is the leaf abstraction every stream reads from. The only concrete
//! producer shipped here is [`FileByteProducer`](file::FileByteProducer); filters installed on a
//! stream are producers too, wrapping the one they read from.

use crate::error::Status;

pub mod file;

/// A pull-based source of bytes with a queryable status.
///
/// Implementations must keep the following contract:
/// * once [`good`](ByteProducer::good) returns `false` the producer is inert, whatever the cause
///   of the failure: [`eos`](ByteProducer::eos) returns `true`, [`avail`](ByteProducer::avail)
///   returns 0, and `read`, `skip` and `putback` do nothing, so a `while !eos()` loop over `read`
///   always terminates;
/// * [`read`](ByteProducer::read) and [`skip`](ByteProducer::skip) never move past the end of
///   the source and never report more bytes than they transferred;
/// * [`putback`](ByteProducer::putback) of more bytes than were consumed sets
///   [`StreamError::PutbackFailed`](crate::StreamError::PutbackFailed) and leaves the underlying
///   position untouched.
pub trait ByteProducer: Send {
    /// Returns `true` if the producer is in the normal state.
    fn good(&self) -> bool;

    /// Returns the current status.
    fn status(&self) -> Status;

    /// Returns `true` once no further bytes can be read.
    fn eos(&mut self) -> bool;

    /// Number of bytes that can still be read.
    fn avail(&mut self) -> u64;

    /// Reads up to `buf.len()` bytes and returns how many were transferred. Returning fewer than
    /// requested is not an error.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Skips up to `n` bytes and returns how many were skipped.
    fn skip(&mut self, n: u64) -> u64;

    /// Moves the read position back by `n` bytes.
    fn putback(&mut self, n: u64);
}

impl<P: ByteProducer + ?Sized> ByteProducer for Box<P> {
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

    fn putback(&mut self, n: u64) {
        (**self).putback(n)
    }
}
