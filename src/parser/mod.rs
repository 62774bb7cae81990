//! The character-level tokenizer.
//!
//! [`CsvParser`] turns a [`CharSource`] into logical rows without
//! materializing the input: one pooled row buffer is reused for every row,
//! and [`Row`] views borrow it. The state transitions live in an I/O-free
//! core shared with the async driver, so the blocking path never awaits
//! and the async path suspends only to refill its chunk.
//!
//! # Examples
//!
//! ```
//! use csvflow::{CsvOptions, CsvParser};
//!
//! let options = CsvOptions::builder().has_header(false).build().unwrap();
//! let mut parser = CsvParser::from_reader("a,\"b,c\"\n1,2\n".as_bytes(), options);
//!
//! assert!(parser.read().unwrap());
//! let row = parser.row();
//! assert_eq!(row.field(1), Some("b,c"));
//!
//! assert!(parser.read().unwrap());
//! assert_eq!(parser.row().field(0), Some("1"));
//! assert!(!parser.read().unwrap());
//! ```

mod buffer;
mod machine;
mod row;

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
mod async_parser;

#[cfg(feature = "async")]
pub use async_parser::CsvAsyncParser;
pub use row::{FieldToken, Row};

pub(crate) use machine::{Outcome, ParserCore};

use std::io::Read;

use crate::error::CsvResult;
use crate::io::{CharSource, ReadCharSource};
use crate::options::CsvOptions;

/// Blocking row parser over any [`CharSource`].
pub struct CsvParser<S> {
    core: ParserCore,
    source: S,
    chunk: Vec<char>,
    pos: usize,
    len: usize,
    done: bool,
}

impl<R: Read> CsvParser<ReadCharSource<R>> {
    /// Builds a parser decoding UTF-8 from any [`Read`].
    pub fn from_reader(reader: R, options: CsvOptions) -> Self {
        let source = ReadCharSource::new(reader, options.byte_buffer_size());
        CsvParser::new(source, options)
    }
}

impl<S: CharSource> CsvParser<S> {
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
    ///
    /// In strict mode a bad-data error leaves the parser positioned at the
    /// start of the next physical row, so calling `read` again skips past
    /// the offending input.
    pub fn read(&mut self) -> CsvResult<bool> {
        if self.done {
            return Ok(false);
        }
        loop {
            if self.pos == self.len {
                let n = self.source.read(&mut self.chunk)?;
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

    /// The row produced by the last successful [`CsvParser::read`].
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
