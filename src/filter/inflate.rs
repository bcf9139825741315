//! Filter that decompresses DEFLATE data pulled from the upstream producer.
use flate2::{Decompress, FlushDecompress};
use tracing::{debug, trace, warn};

use super::InputFilter;
use crate::error::{Status, StreamError};
use crate::producer::ByteProducer;
use crate::settings::InflateSettings;

/// Decompresses a raw DEFLATE stream (or a zlib stream, see
/// [`InflateSettings::zlib_header`]).
///
/// The producer it turns into delivers decompressed bytes. [`avail`](ByteProducer::avail) only
/// counts bytes that are already decompressed, so it may be lower than what is left in the
/// stream. At least [`InflateSettings::putback_capacity`] delivered bytes can be put back; a
/// putback reaching past the retained bytes fails and leaves the producer inert.
#[derive(Clone, Debug, Default)]
pub struct InflateFilter {
    settings: InflateSettings,
}

impl InflateFilter {
    /// Creates a new [`InflateFilter`].
    pub fn new(settings: InflateSettings) -> Self {
        Self { settings }
    }
}

impl InputFilter for InflateFilter {
    fn attach(self: Box<Self>, upstream: Box<dyn ByteProducer>) -> Box<dyn ByteProducer> {
        Box::new(InflateProducer::new(upstream, self.settings))
    }
}

struct InflateProducer {
    upstream: Box<dyn ByteProducer>,
    decompress: Decompress,
    settings: InflateSettings,
    input: Vec<u8>,
    input_pos: usize,
    // Decompressed bytes; everything before `delivered` was handed out and is kept for putback.
    output: Vec<u8>,
    delivered: usize,
    finished: bool,
    status: Status,
}

impl InflateProducer {
    fn new(upstream: Box<dyn ByteProducer>, settings: InflateSettings) -> Self {
        Self {
            upstream,
            decompress: Decompress::new(settings.zlib_header),
            input: Vec::with_capacity(settings.input_chunk_size),
            input_pos: 0,
            output: Vec::new(),
            delivered: 0,
            finished: false,
            status: Ok(()),
            settings,
        }
    }

    fn buffered(&self) -> usize {
        self.output.len() - self.delivered
    }

    fn fail(&mut self, error: StreamError) {
        warn!("inflate filter failed: {error}");
        self.status = Err(error);
    }

    fn discard_history(&mut self) {
        let capacity = self.settings.putback_capacity;
        if self.delivered > capacity {
            let excess = self.delivered - capacity;
            self.output.drain(..excess);
            self.delivered -= excess;
        }
    }

    // Returns false when no further progress can be made right now.
    fn fill(&mut self) -> bool {
        if self.finished || self.status.is_err() {
            return false;
        }
        self.discard_history();

        loop {
            if self.input_pos == self.input.len() && !self.refill_input() {
                return false;
            }

            let total_in = self.decompress.total_in();
            let before = self.output.len();
            self.output.reserve(self.settings.input_chunk_size);
            let result = self.decompress.decompress_vec(
                &self.input[self.input_pos..],
                &mut self.output,
                FlushDecompress::None,
            );
            let unread = self.input.len() - self.input_pos;
            let consumed = usize::try_from(self.decompress.total_in() - total_in)
                .map_or(unread, |consumed| consumed.min(unread));
            let produced = self.output.len() - before;
            self.input_pos += consumed;
            trace!(consumed, produced, "inflated chunk");

            match result {
                Ok(flate2::Status::StreamEnd) => {
                    debug!(total_out = self.decompress.total_out(), "compressed stream ended");
                    self.finished = true;
                    return true;
                }
                Ok(_) if produced > 0 => return true,
                Ok(_) if consumed == 0 => {
                    self.fail(StreamError::Inflate("decompression stalled".into()));
                    return false;
                }
                Ok(_) => {}
                Err(e) => {
                    self.fail(StreamError::Inflate(e.to_string()));
                    return false;
                }
            }
        }
    }

    fn refill_input(&mut self) -> bool {
        self.input.resize(self.settings.input_chunk_size, 0);
        let read = self.upstream.read(&mut self.input);
        self.input.truncate(read);
        self.input_pos = 0;
        if read > 0 {
            return true;
        }

        if let Err(e) = self.upstream.status() {
            self.fail(e);
        } else if self.upstream.eos() {
            self.fail(StreamError::Inflate(
                "input ended before the compressed stream was complete".into(),
            ));
        }
        false
    }

    fn take(&mut self, max: usize) -> usize {
        let count = self.buffered().min(max);
        self.delivered += count;
        count
    }
}

impl ByteProducer for InflateProducer {
    fn good(&self) -> bool {
        self.status.is_ok()
    }

    fn status(&self) -> Status {
        self.status.clone()
    }

    fn eos(&mut self) -> bool {
        if self.status.is_err() {
            return true;
        }
        if self.buffered() == 0 {
            self.fill();
        }
        self.status.is_err() || (self.buffered() == 0 && self.finished)
    }

    fn avail(&mut self) -> u64 {
        if self.status.is_err() {
            return 0;
        }
        if self.buffered() == 0 {
            self.fill();
        }
        if self.status.is_err() {
            return 0;
        }
        self.buffered() as u64
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        if self.status.is_err() {
            return 0;
        }
        let mut copied = 0;
        while copied < buf.len() {
            let start = self.delivered;
            let count = self.take(buf.len() - copied);
            buf[copied..copied + count].copy_from_slice(&self.output[start..start + count]);
            copied += count;
            if copied == buf.len() || !self.fill() {
                break;
            }
        }
        copied
    }

    fn skip(&mut self, n: u64) -> u64 {
        if self.status.is_err() {
            return 0;
        }
        let mut skipped = 0;
        while skipped < n {
            let remaining = usize::try_from(n - skipped).unwrap_or(usize::MAX);
            skipped += self.take(remaining) as u64;
            if skipped == n || !self.fill() {
                break;
            }
        }
        skipped
    }

    fn putback(&mut self, n: u64) {
        if self.status.is_err() || n == 0 {
            return;
        }
        match usize::try_from(n) {
            Ok(n) if n <= self.delivered => self.delivered -= n,
            _ => {
                debug!(n, retained = self.delivered, "putback beyond retained bytes");
                self.status = Err(StreamError::PutbackFailed);
            }
        }
    }
}
