#![deny(missing_docs)]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]

#[cfg(feature = "temp-file")]
use std::io;

pub use error::{ConditionTag, Severity, Status, StreamError, MODULE_ID};
pub use factory::file::FileInputStreamFactory;
pub use factory::temp::{TempFileHandle, TempFileInputStreamFactory};
pub use factory::InputStreamFactory;
#[cfg(feature = "deflate")]
pub use filter::inflate::InflateFilter;
pub use filter::InputFilter;
pub use producer::file::FileByteProducer;
pub use producer::ByteProducer;
pub use settings::*;
pub use stream::file::FileInputStream;
pub use stream::{InputStream, ProducerStream, Reader};

pub mod error;
pub mod factory;
pub mod filter;
pub mod producer;
mod settings;
pub mod stream;

#[cfg(feature = "temp-file")]
pub(crate) trait WrapIoResult {
    fn wrap_err(self, msg: &str) -> Self;
}

#[cfg(feature = "temp-file")]
impl<T> WrapIoResult for io::Result<T> {
    fn wrap_err(self, msg: &str) -> Self {
        if let Err(e) = self {
            Err(io::Error::new(e.kind(), format!("{msg}: {e}")))
        } else {
            self
        }
    }
}
