//! Character sources and sinks.
//!
//! The parser and writer never touch bytes directly; they speak to these
//! seams. A [`CharSource`] fills a caller-provided `char` buffer and
//! reports how many it produced (0 meaning end of stream); a [`CharSink`]
//! accepts decoded text and flushes on demand. [`ReadCharSource`] and
//! [`WriteCharSink`] adapt any `std::io` stream, decoding and encoding
//! UTF-8 with multi-byte sequences carried across refills. The async twins
//! live in [`async_chars`] behind the `async` feature and check a
//! cancellation token before every underlying I/O call.

mod chars;

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod async_chars;

pub use chars::{ReadCharSource, WriteCharSink};

use crate::error::CsvResult;

/// A blocking stream of characters.
pub trait CharSource {
    /// Fills `out` with decoded characters, returning how many were
    /// produced. Returns 0 only at end of stream.
    fn read(&mut self, out: &mut [char]) -> CsvResult<usize>;
}

/// A blocking sink for characters.
pub trait CharSink {
    /// Accepts a run of characters. The sink may buffer.
    fn write(&mut self, chars: &str) -> CsvResult<()>;

    /// Drains any buffered characters to the underlying stream.
    fn flush(&mut self) -> CsvResult<()>;
}
