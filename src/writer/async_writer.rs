use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

use crate::convert::{self, ConvertContext, ToField};
use crate::error::{CsvError, CsvResult};
use crate::io::async_chars::{AsyncCharSink, AsyncWriteCharSink};
use crate::map::{ColumnMap, CsvRecord, MapRegistry};
use crate::options::CsvOptions;

use super::{needs_quoting, platform_newline};

/// Builder for [`CsvAsyncWriter`].
#[derive(Default)]
pub struct CsvAsyncWriterBuilder {
    options: Option<CsvOptions>,
}

impl CsvAsyncWriterBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `options` for the writer.
    pub fn options(mut self, options: CsvOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Builds a writer over any [`AsyncWrite`].
    pub fn from_writer<W: AsyncWrite + Unpin>(self, writer: W) -> CsvAsyncWriter<W> {
        let options = self.options.unwrap_or_default();
        CsvAsyncWriter::new(writer, options)
    }

    /// Builds a writer over a file, truncating it.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] when the file cannot be created.
    pub async fn from_path<P: AsRef<Path>>(self, path: P) -> CsvResult<CsvAsyncWriter<File>> {
        let file = File::create(path).await?;
        Ok(self.from_writer(file))
    }
}

/// Cooperative twin of [`CsvWriter`](super::CsvWriter).
///
/// Suspends only when the buffered sink drains to the underlying stream;
/// the cancellation token is checked before each such flush. Unlike the
/// blocking writer there is no flush-on-drop: call
/// [`CsvAsyncWriter::flush`] (or [`CsvAsyncWriter::into_inner`]) before
/// dropping, or buffered output is lost.
pub struct CsvAsyncWriter<W> {
    sink: AsyncWriteCharSink<W>,
    options: CsvOptions,
    registry: MapRegistry,
    terminator: String,
    at_first_field: bool,
    field_index: usize,
    row_index: u64,
}

impl<W: AsyncWrite + Unpin> CsvAsyncWriter<W> {
    /// Builds a writer with the given options.
    pub fn new(writer: W, options: CsvOptions) -> Self {
        let terminator = options
            .newline()
            .unwrap_or_else(|| platform_newline())
            .to_string();
        let sink = AsyncWriteCharSink::new(writer, options.byte_buffer_size());
        Self {
            sink,
            options,
            registry: MapRegistry::new(),
            terminator,
            at_first_field: true,
            field_index: 0,
            row_index: 0,
        }
    }

    /// Writes one raw field, quoting and escaping as needed.
    pub async fn write_field(&mut self, field: &str, cancel: &CancellationToken) -> CsvResult<()> {
        self.begin_field(cancel).await?;
        if needs_quoting(field, self.options.delimiter(), self.options.quote()) {
            self.write_quoted(field, cancel).await?;
        } else {
            self.sink.write(field, cancel).await?;
        }
        self.field_index += 1;
        Ok(())
    }

    /// Formats a typed value through the converter chain and writes it as
    /// one field.
    pub async fn write_value<V: ToField + 'static>(
        &mut self,
        value: &V,
        cancel: &CancellationToken,
    ) -> CsvResult<()> {
        let ctx = ConvertContext {
            culture: self.options.culture(),
            row_index: self.row_index,
            field_index: self.field_index,
            column_name: None,
        };
        let text = convert::format_field(value, &ctx, self.options.converters())
            .map_err(CsvError::Argument)?;
        self.write_field(&text, cancel).await
    }

    /// Writes each non-ignored mapping's name as a field, then terminates
    /// the record.
    pub async fn write_header<T: CsvRecord>(&mut self, cancel: &CancellationToken) -> CsvResult<()> {
        let map = self.registry.get_or_create::<T>();
        for mapping in map.mappings() {
            if mapping.is_ignored() {
                continue;
            }
            self.write_field(mapping.name(), cancel).await?;
        }
        self.next_record(cancel).await
    }

    /// Projects `record` through its column map, writes each non-ignored
    /// member, then terminates the record.
    pub async fn write_record<T: CsvRecord>(
        &mut self,
        record: &T,
        cancel: &CancellationToken,
    ) -> CsvResult<()> {
        let map = self.registry.get_or_create::<T>();
        for mapping in map.mappings() {
            if mapping.is_ignored() {
                continue;
            }
            let ctx = ConvertContext {
                culture: self.options.culture(),
                row_index: self.row_index,
                field_index: self.field_index,
                column_name: Some(mapping.name()),
            };
            let text = mapping
                .format_from(record, &ctx, self.options.converters())
                .map_err(CsvError::Argument)?;
            self.write_field(&text, cancel).await?;
        }
        self.next_record(cancel).await
    }

    /// Terminates the current record and resets the field position.
    pub async fn next_record(&mut self, cancel: &CancellationToken) -> CsvResult<()> {
        self.sink.write(&self.terminator, cancel).await?;
        self.at_first_field = true;
        self.field_index = 0;
        self.row_index += 1;
        Ok(())
    }

    /// Drains buffered output to the underlying stream.
    pub async fn flush(&mut self, cancel: &CancellationToken) -> CsvResult<()> {
        self.sink.flush(cancel).await
    }

    /// Flushes and returns the underlying writer.
    pub async fn into_inner(self, cancel: &CancellationToken) -> CsvResult<W> {
        self.sink.into_inner(cancel).await
    }

    /// Installs `map` for `T` on this writer, overriding the type's own
    /// [`CsvRecord::column_map`] declaration.
    pub fn register_map<T: CsvRecord>(&self, map: ColumnMap<T>) {
        self.registry.register(map);
    }

    /// The options this writer was built with.
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    async fn begin_field(&mut self, cancel: &CancellationToken) -> CsvResult<()> {
        if self.at_first_field {
            self.at_first_field = false;
            Ok(())
        } else {
            self.write_char(self.options.delimiter(), cancel).await
        }
    }

    async fn write_quoted(&mut self, field: &str, cancel: &CancellationToken) -> CsvResult<()> {
        let quote = self.options.quote();
        let escape = self.options.escape();
        self.write_char(quote, cancel).await?;
        let mut rest = field;
        while let Some(pos) = rest.find(quote) {
            let (before, after) = rest.split_at(pos);
            self.sink.write(before, cancel).await?;
            self.write_char(escape, cancel).await?;
            self.write_char(quote, cancel).await?;
            rest = &after[quote.len_utf8()..];
        }
        self.sink.write(rest, cancel).await?;
        self.write_char(quote, cancel).await
    }

    async fn write_char(&mut self, c: char, cancel: &CancellationToken) -> CsvResult<()> {
        let mut scratch = [0u8; 4];
        let encoded: &str = c.encode_utf8(&mut scratch);
        self.sink.write(encoded, cancel).await
    }
}
