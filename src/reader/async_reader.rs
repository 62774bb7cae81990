use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::error::{CsvError, CsvResult};
use crate::io::async_chars::{AsyncCharSource, AsyncReadCharSource};
use crate::map::{ColumnMap, CsvRecord};
use crate::options::CsvOptions;
use crate::parser::{CsvAsyncParser, Row};

use super::{Header, ReaderState, RowMap};

/// Builder for [`CsvAsyncReader`].
#[derive(Default)]
pub struct CsvAsyncReaderBuilder {
    options: Option<CsvOptions>,
}

impl CsvAsyncReaderBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `options` for the reader.
    pub fn options(mut self, options: CsvOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Builds a reader over any [`AsyncRead`].
    pub fn from_reader<R: AsyncRead + Unpin>(
        self,
        reader: R,
    ) -> CsvAsyncReader<AsyncReadCharSource<R>> {
        let options = self.options.unwrap_or_default();
        let source = AsyncReadCharSource::new(reader, options.byte_buffer_size());
        CsvAsyncReader::new(source, options)
    }

    /// Builds a reader over a file.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] when the file cannot be opened.
    pub async fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> CsvResult<CsvAsyncReader<AsyncReadCharSource<File>>> {
        let file = File::open(path).await?;
        Ok(self.from_reader(file))
    }
}

/// Cooperative twin of [`CsvReader`](super::CsvReader).
///
/// Row-advancing calls take a [`CancellationToken`] checked before each
/// chunk refill; [`CsvAsyncReader::get_record`] and the field accessors
/// operate on the already-buffered row and never suspend.
pub struct CsvAsyncReader<S> {
    parser: CsvAsyncParser<S>,
    state: ReaderState,
}

impl<S: AsyncCharSource> CsvAsyncReader<S> {
    /// Builds a reader over an already-decoded character source.
    pub fn new(source: S, options: CsvOptions) -> Self {
        Self {
            parser: CsvAsyncParser::new(source, options),
            state: ReaderState::new(),
        }
    }

    /// Advances to the next data row, consuming the header first when the
    /// options call for one. Returns `false` at end of stream.
    pub async fn read(&mut self, cancel: &CancellationToken) -> CsvResult<bool> {
        self.ensure_header(cancel).await?;
        let advanced = match self.parser.read(cancel).await {
            Ok(advanced) => advanced,
            Err(err) => {
                self.state.clear_row();
                return Err(err);
            }
        };
        if !advanced {
            self.state.clear_row();
            return Ok(false);
        }
        let row = self.parser.row();
        self.state.admit_row(&row, self.parser.options())?;
        Ok(true)
    }

    /// Advances and returns the next row view, or `None` at end of
    /// stream.
    pub async fn try_read_row(
        &mut self,
        cancel: &CancellationToken,
    ) -> CsvResult<Option<Row<'_>>> {
        if self.read(cancel).await? {
            Ok(Some(
                self.parser.row().with_row_index(self.state.current_index()),
            ))
        } else {
            Ok(None)
        }
    }

    /// Advances and returns the next row as an ordered name→value
    /// dictionary, or `None` at end of stream.
    pub async fn try_read_dictionary(
        &mut self,
        cancel: &CancellationToken,
    ) -> CsvResult<Option<RowMap>> {
        if !self.read(cancel).await? {
            return Ok(None);
        }
        let count = self.parser.row().field_count();
        self.state.ensure_synth_names(count);
        let row = self.parser.row();
        Ok(Some(self.state.dictionary(&row)))
    }

    /// Materializes a typed record from the last-read row. Never
    /// suspends.
    pub fn get_record<T: CsvRecord + Default>(&self) -> CsvResult<T> {
        if !self.state.has_row() {
            return Err(CsvError::Argument(
                "get_record called before a successful read".to_string(),
            ));
        }
        let row = self.parser.row();
        self.state.record(&row, self.parser.options())
    }

    /// The `i`-th field of the last-read row as a borrowed slice.
    pub fn get_field_span(&self, i: usize) -> Option<&str> {
        if !self.state.has_row() {
            return None;
        }
        self.parser.row().field(i)
    }

    /// The `i`-th field of the last-read row as an owned string.
    pub fn get_field(&self, i: usize) -> Option<String> {
        self.get_field_span(i).map(str::to_string)
    }

    /// The header, reading it from the input if it has not been consumed
    /// yet.
    pub async fn headers(&mut self, cancel: &CancellationToken) -> CsvResult<Option<&Header>> {
        self.ensure_header(cancel).await?;
        Ok(self.state.header())
    }

    /// Installs `map` for `T` on this reader, overriding the type's own
    /// [`CsvRecord::column_map`] declaration.
    pub fn register_map<T: CsvRecord>(&self, map: ColumnMap<T>) {
        self.state.registry().register(map);
    }

    /// The first line terminator observed in the input.
    pub fn detected_newline(&self) -> Option<&'static str> {
        self.parser.detected_newline()
    }

    /// The options this reader was built with.
    pub fn options(&self) -> &CsvOptions {
        self.parser.options()
    }

    async fn ensure_header(&mut self, cancel: &CancellationToken) -> CsvResult<()> {
        if self.state.header_done() {
            return Ok(());
        }
        self.state.mark_header_done();
        if !self.parser.options().has_header() {
            return Ok(());
        }
        if self.parser.read(cancel).await? {
            let row = self.parser.row();
            self.state.capture_header(&row, self.parser.options());
        }
        Ok(())
    }
}
