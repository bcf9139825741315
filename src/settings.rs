use std::num::NonZeroUsize;

/// Settings for an [`InflateFilter`](crate::filter::inflate::InflateFilter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InflateSettings {
    pub(crate) input_chunk_size: usize,
    pub(crate) putback_capacity: usize,
    pub(crate) zlib_header: bool,
}

impl Default for InflateSettings {
    fn default() -> Self {
        Self {
            input_chunk_size: 4096,
            putback_capacity: 1024,
            zlib_header: false,
        }
    }
}

impl InflateSettings {
    /// Maximum number of compressed bytes pulled from the upstream producer at once. The same
    /// amount is reserved for decompressed output on every decompression step.
    ///
    /// The default value is 4096.
    #[must_use]
    pub fn input_chunk_size(self, input_chunk_size: NonZeroUsize) -> Self {
        Self {
            input_chunk_size: input_chunk_size.get(),
            ..self
        }
    }

    /// Minimum number of already delivered bytes kept around so they can be put back. More may
    /// be retained while they belong to the chunk being read; a putback past what is retained
    /// fails.
    ///
    /// The default value is 1024.
    #[must_use]
    pub fn putback_capacity(self, putback_capacity: usize) -> Self {
        Self {
            putback_capacity,
            ..self
        }
    }

    /// Expect a zlib header and trailer around the compressed data instead of a raw DEFLATE
    /// stream.
    ///
    /// The default value is `false`.
    #[must_use]
    pub fn zlib_header(self, zlib_header: bool) -> Self {
        Self {
            zlib_header,
            ..self
        }
    }

    /// Retrieves the configured input chunk size
    pub const fn get_input_chunk_size(&self) -> usize {
        self.input_chunk_size
    }

    /// Retrieves the configured putback capacity
    pub const fn get_putback_capacity(&self) -> usize {
        self.putback_capacity
    }

    /// Retrieves whether a zlib header is expected
    pub const fn get_zlib_header(&self) -> bool {
        self.zlib_header
    }
}
