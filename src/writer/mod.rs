//! Field-by-field emission with quoting and escaping.
//!
//! [`CsvWriter`] writes raw slices ([`CsvWriter::write_field`]), typed
//! values through the converter chain ([`CsvWriter::write_value`]) and
//! whole records projected through their column map
//! ([`CsvWriter::write_record`]). A field is quoted only when it needs to
//! be: when it is non-empty and begins or ends with whitespace, or
//! contains the delimiter, the quote, CR or LF. Quote characters are
//! doubled, or prefixed with the escape character when one is configured.
//!
//! # Examples
//!
//! ```
//! use csvflow::CsvWriterBuilder;
//!
//! let mut writer = CsvWriterBuilder::new().from_writer(Vec::new());
//! writer.write_field("id").unwrap();
//! writer.write_field("name").unwrap();
//! writer.next_record().unwrap();
//! writer.write_value(&1i32).unwrap();
//! writer.write_field("Ada,Lovelace").unwrap();
//! writer.next_record().unwrap();
//! let bytes = writer.into_inner().unwrap();
//! assert_eq!(bytes, b"id,name\n1,\"Ada,Lovelace\"\n");
//! ```

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
mod async_writer;

#[cfg(feature = "async")]
pub use async_writer::{CsvAsyncWriter, CsvAsyncWriterBuilder};

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::convert::{self, ConvertContext, ToField};
use crate::error::{CsvError, CsvResult};
use crate::io::{CharSink, WriteCharSink};
use crate::map::{ColumnMap, CsvRecord, MapRegistry};
use crate::options::CsvOptions;

/// The platform default record terminator, used when the options leave
/// the newline unset.
fn platform_newline() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}

pub(crate) fn needs_quoting(field: &str, delimiter: char, quote: char) -> bool {
    if field.is_empty() {
        return false;
    }
    let starts_ws = field.chars().next().is_some_and(char::is_whitespace);
    let ends_ws = field.chars().next_back().is_some_and(char::is_whitespace);
    starts_ws || ends_ws || field.contains(&[delimiter, quote, '\r', '\n'][..])
}

/// Builder for [`CsvWriter`].
#[derive(Default)]
pub struct CsvWriterBuilder {
    options: Option<CsvOptions>,
}

impl CsvWriterBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `options` for the writer.
    pub fn options(mut self, options: CsvOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Builds a writer over any [`Write`].
    pub fn from_writer<W: Write>(self, writer: W) -> CsvWriter<W> {
        let options = self.options.unwrap_or_default();
        CsvWriter::new(writer, options)
    }

    /// Builds a writer over a file, truncating it.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] when the file cannot be created.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> CsvResult<CsvWriter<File>> {
        let file = File::create(path)?;
        Ok(self.from_writer(file))
    }
}

/// Blocking field/record writer.
///
/// Output is buffered through the pooled sink; call [`CsvWriter::flush`]
/// (or drop the writer) to drain it. Writer-side failures are argument or
/// I/O errors only.
pub struct CsvWriter<W: Write> {
    sink: Option<WriteCharSink<W>>,
    options: CsvOptions,
    registry: MapRegistry,
    terminator: String,
    at_first_field: bool,
    field_index: usize,
    row_index: u64,
}

impl<W: Write> CsvWriter<W> {
    /// Builds a writer with the given options.
    pub fn new(writer: W, options: CsvOptions) -> Self {
        let terminator = options
            .newline()
            .unwrap_or_else(|| platform_newline())
            .to_string();
        let sink = WriteCharSink::new(writer, options.byte_buffer_size());
        debug!("csv writer ready (terminator {:?})", terminator);
        Self {
            sink: Some(sink),
            options,
            registry: MapRegistry::new(),
            terminator,
            at_first_field: true,
            field_index: 0,
            row_index: 0,
        }
    }

    /// Writes one raw field, quoting and escaping as needed. The
    /// delimiter is emitted before the field for every field but the
    /// row's first.
    pub fn write_field(&mut self, field: &str) -> CsvResult<()> {
        self.begin_field()?;
        if needs_quoting(field, self.options.delimiter(), self.options.quote()) {
            self.write_quoted(field)?;
        } else {
            self.sink()?.write(field)?;
        }
        self.field_index += 1;
        Ok(())
    }

    /// Formats a typed value through the converter chain (per-type
    /// converter, then the built-in [`ToField`]) and writes it as one
    /// field.
    pub fn write_value<V: ToField + 'static>(&mut self, value: &V) -> CsvResult<()> {
        let ctx = ConvertContext {
            culture: self.options.culture(),
            row_index: self.row_index,
            field_index: self.field_index,
            column_name: None,
        };
        let text = convert::format_field(value, &ctx, self.options.converters())
            .map_err(CsvError::Argument)?;
        self.write_field(&text)
    }

    /// Writes each non-ignored mapping's name as a field, then terminates
    /// the record.
    pub fn write_header<T: CsvRecord>(&mut self) -> CsvResult<()> {
        let map = self.registry.get_or_create::<T>();
        for mapping in map.mappings() {
            if mapping.is_ignored() {
                continue;
            }
            self.write_field(mapping.name())?;
        }
        self.next_record()
    }

    /// Projects `record` through its column map, writes each non-ignored
    /// member (honoring per-member converters), then terminates the
    /// record.
    pub fn write_record<T: CsvRecord>(&mut self, record: &T) -> CsvResult<()> {
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
            self.write_field(&text)?;
        }
        self.next_record()
    }

    /// Terminates the current record with the configured newline (or the
    /// platform default) and resets the field position.
    pub fn next_record(&mut self) -> CsvResult<()> {
        let sink = self.sink.as_mut().ok_or_else(disposed)?;
        sink.write(&self.terminator)?;
        self.at_first_field = true;
        self.field_index = 0;
        self.row_index += 1;
        Ok(())
    }

    /// Drains buffered output to the underlying writer.
    pub fn flush(&mut self) -> CsvResult<()> {
        self.sink()?.flush()
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> CsvResult<W> {
        let sink = self.sink.take().ok_or_else(disposed)?;
        sink.into_inner()
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

    fn begin_field(&mut self) -> CsvResult<()> {
        if self.at_first_field {
            self.at_first_field = false;
            Ok(())
        } else {
            self.write_char(self.options.delimiter())
        }
    }

    fn write_quoted(&mut self, field: &str) -> CsvResult<()> {
        let quote = self.options.quote();
        let escape = self.options.escape();
        self.write_char(quote)?;
        let mut rest = field;
        while let Some(pos) = rest.find(quote) {
            let (before, after) = rest.split_at(pos);
            self.sink()?.write(before)?;
            self.write_char(escape)?;
            self.write_char(quote)?;
            rest = &after[quote.len_utf8()..];
        }
        self.sink()?.write(rest)?;
        self.write_char(quote)
    }

    fn write_char(&mut self, c: char) -> CsvResult<()> {
        let mut scratch = [0u8; 4];
        let encoded: &str = c.encode_utf8(&mut scratch);
        self.sink()?.write(encoded)
    }

    fn sink(&mut self) -> CsvResult<&mut WriteCharSink<W>> {
        self.sink.as_mut().ok_or_else(disposed)
    }
}

fn disposed() -> CsvError {
    CsvError::Argument("writer has been disposed".to_string())
}

impl<W: Write> Drop for CsvWriter<W> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::Culture;
    use crate::options::Mode;
    use crate::reader::CsvReaderBuilder;

    fn writer() -> CsvWriter<Vec<u8>> {
        let options = CsvOptions::builder().newline("\n").build().unwrap();
        CsvWriterBuilder::new().options(options).from_writer(Vec::new())
    }

    fn output(writer: CsvWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[derive(Default, Debug, PartialEq)]
    struct Car {
        year: u16,
        make: String,
    }

    impl CsvRecord for Car {
        fn column_map() -> ColumnMap<Self> {
            ColumnMap::builder()
                .column("year", |c: &Car| c.year, |c, v| c.year = v)
                .column("make", |c: &Car| c.make.clone(), |c, v| c.make = v)
                .build()
        }
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        let mut w = writer();
        w.write_field("a").unwrap();
        w.write_field("b").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "a,b\n");
    }

    #[test]
    fn delimiter_forces_quoting() {
        let mut w = writer();
        w.write_field("Ada,Lovelace").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "\"Ada,Lovelace\"\n");
    }

    #[test]
    fn quotes_are_doubled() {
        let mut w = writer();
        w.write_field("a \"quote\" b").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "\"a \"\"quote\"\" b\"\n");
    }

    #[test]
    fn distinct_escape_prefixes_quotes() {
        let options = CsvOptions::builder()
            .newline("\n")
            .escape('\\')
            .build()
            .unwrap();
        let mut w = CsvWriterBuilder::new().options(options).from_writer(Vec::new());
        w.write_field("a \"q\"").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "\"a \\\"q\\\"\"\n");
    }

    #[test]
    fn edge_whitespace_forces_quoting() {
        let mut w = writer();
        w.write_field(" a").unwrap();
        w.write_field("b ").unwrap();
        w.write_field("c d").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "\" a\",\"b \",c d\n");
    }

    #[test]
    fn embedded_newline_forces_quoting() {
        let mut w = writer();
        w.write_field("line1\nline2").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "\"line1\nline2\"\n");
    }

    #[test]
    fn empty_fields_stay_bare() {
        let mut w = writer();
        w.write_field("").unwrap();
        w.write_field("").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), ",\n");
    }

    #[test]
    fn typed_values_format_with_culture() {
        let options = CsvOptions::builder()
            .newline("\n")
            .delimiter(';')
            .culture(Culture::fr_fr())
            .build()
            .unwrap();
        let mut w = CsvWriterBuilder::new().options(options).from_writer(Vec::new());
        w.write_value(&12.5f64).unwrap();
        w.write_value(&true).unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "12,5;true\n");
    }

    #[test]
    fn none_writes_empty_field() {
        let mut w = writer();
        w.write_value(&Option::<i32>::None).unwrap();
        w.write_value(&Some(3)).unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), ",3\n");
    }

    #[test]
    fn records_project_through_the_map() {
        let mut w = writer();
        w.write_header::<Car>().unwrap();
        w.write_record(&Car {
            year: 1948,
            make: "Porsche".into(),
        })
        .unwrap();
        assert_eq!(output(w), "year,make\n1948,Porsche\n");
    }

    #[test]
    fn custom_newline_is_used() {
        let options = CsvOptions::builder().newline("\r\n").build().unwrap();
        let mut w = CsvWriterBuilder::new().options(options).from_writer(Vec::new());
        w.write_field("a").unwrap();
        w.next_record().unwrap();
        assert_eq!(output(w), "a\r\n");
    }

    #[test]
    fn written_output_parses_back() {
        let mut w = writer();
        let fields = vec![" padded ", "comma,field", "quo\"te", "multi\nline", "plain"];
        for f in &fields {
            w.write_field(f).unwrap();
        }
        w.next_record().unwrap();
        let text = output(w);

        let options = CsvOptions::builder()
            .has_header(false)
            .mode(Mode::Strict)
            .build()
            .unwrap();
        let mut r = CsvReaderBuilder::new()
            .options(options)
            .from_reader(text.as_bytes());
        assert!(r.read().unwrap());
        let parsed: Vec<_> = (0..fields.len())
            .map(|i| r.get_field(i).unwrap())
            .collect();
        assert_eq!(parsed, fields);
    }
}
