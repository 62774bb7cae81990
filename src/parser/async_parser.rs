use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::error::CsvResult;
use crate::io::async_chars::{AsyncCharSource, AsyncReadCharSource};
use crate::options::CsvOptions;

use super::machine::{Outcome, ParserCore};
use super::row::Row;

/// Cooperative twin of [`CsvParser`](super::CsvParser).
///
/// Shares the blocking parser's transition table; only the chunk refill
/// suspends, and the cancellation token is checked before each refill.
pub struct CsvAsyncParser<S> {
    core: ParserCore,
    source: S,
    chunk: Vec<char>,
    pos: usize,
    len: usize,
    done: bool,
}

impl<R: AsyncRead + Unpin> CsvAsyncParser<AsyncReadCharSource<R>> {
    /// Builds a parser decoding UTF-8 from any [`AsyncRead`].
    pub fn from_reader(reader: R, options: CsvOptions) -> Self {
        let source = AsyncReadCharSource::new(reader, options.byte_buffer_size());
        CsvAsyncParser::new(source, options)
    }
}

impl<S: AsyncCharSource> CsvAsyncParser<S> {
    /// Builds a parser over an already-decoded character source.
    pub fn new(source: S, options: CsvOptions) -> Self {
        let chunk = vec!['\0'; options.char_buffer_size()];
        Self {
            core: ParserCore::new(options),
            source,
            chunk,
            pos: 0,
            len: 0,
            done: false,
        }
    }

    /// Advances to the next row. Returns `false` at end of stream.
    pub async fn read(&mut self, cancel: &CancellationToken) -> CsvResult<bool> {
        if self.done {
            return Ok(false);
        }
        loop {
            if self.pos == self.len {
                let n = self.source.read(&mut self.chunk, cancel).await?;
                if n == 0 {
                    let got = self.core.finish()?;
                    if !got {
                        self.done = true;
                    }
                    return Ok(got);
                }
                self.pos = 0;
                self.len = n;
            }
            let consumed = self.core.consume(&self.chunk[self.pos..self.len]);
            self.pos += consumed.n;
            match consumed.outcome {
                Outcome::RowReady => return Ok(true),
                Outcome::Failed(err) => return Err(err),
                Outcome::NeedMore => {}
            }
        }
    }

    /// The row produced by the last successful [`CsvAsyncParser::read`].
    pub fn row(&self) -> Row<'_> {
        self.core.row()
    }

    /// The first line terminator observed in the input.
    pub fn detected_newline(&self) -> Option<&'static str> {
        self.core.detected_newline()
    }

    /// Current 1-based physical line.
    pub fn line_number(&self) -> u64 {
        self.core.line_number()
    }

    /// The options this parser was built with.
    pub fn options(&self) -> &CsvOptions {
        self.core.options()
    }
}
