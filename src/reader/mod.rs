//! Row-oriented reading: header capture, column binding and record
//! materialization.
//!
//! [`CsvReader`] owns a parser and a [`MapRegistry`] and exposes four read
//! styles: raw rows ([`CsvReader::try_read_row`]), positional fields
//! ([`CsvReader::read`] + [`CsvReader::get_field_span`]), ordered
//! name→value dictionaries ([`CsvReader::try_read_dictionary`]) and typed
//! records ([`CsvReader::get_record`]). With `has_header` enabled the
//! first logical row is consumed implicitly by the first read.
//!
//! # Examples
//!
//! ```
//! use csvflow::{ColumnMap, CsvOptions, CsvReaderBuilder, CsvRecord};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Car {
//!     year: u16,
//!     make: String,
//! }
//!
//! impl CsvRecord for Car {
//!     fn column_map() -> ColumnMap<Self> {
//!         ColumnMap::builder()
//!             .column("year", |c: &Car| c.year, |c, v| c.year = v)
//!             .column("make", |c: &Car| c.make.clone(), |c, v| c.make = v)
//!             .build()
//!     }
//! }
//!
//! let data = "make,year\nPorsche,1948\n";
//! let mut reader = CsvReaderBuilder::new().from_reader(data.as_bytes());
//! assert!(reader.read().unwrap());
//! let car: Car = reader.get_record().unwrap();
//! assert_eq!(car, Car { year: 1948, make: "Porsche".into() });
//! ```

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
mod async_reader;

#[cfg(feature = "async")]
pub use async_reader::{CsvAsyncReader, CsvAsyncReaderBuilder};

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::convert::ConvertContext;
use crate::error::{CsvError, CsvResult};
use crate::io::{CharSource, ReadCharSource};
use crate::map::{ColumnMap, CsvRecord, MapRegistry};
use crate::options::{BadDataContext, CsvOptions, Mode};
use crate::parser::{CsvParser, Row};

/// The captured header row: ordered names plus a name→index lookup.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl Header {
    fn from_row(row: &Row<'_>) -> Self {
        let names: Vec<String> = row.iter().map(str::to_string).collect();
        let mut lookup = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // First occurrence wins on duplicate headers.
            lookup.entry(name.clone()).or_insert(i);
        }
        Self { names, lookup }
    }

    /// Column names in file order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of the column named `name`, matched exactly.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// An ordered header-name → field-value mapping for one row.
///
/// Columns past the header synthesize `Column<N>` names (1-based).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowMap {
    entries: Vec<(String, String)>,
}

impl RowMap {
    /// The first value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for RowMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Bookkeeping shared by the blocking and async readers: header, column
/// count detection, data-row numbering and record binding.
pub(crate) struct ReaderState {
    registry: MapRegistry,
    header: Option<Header>,
    header_done: bool,
    expected_field_count: Option<usize>,
    rows_returned: u64,
    has_row: bool,
    synth_names: Vec<String>,
}

impl ReaderState {
    pub(crate) fn new() -> Self {
        Self {
            registry: MapRegistry::new(),
            header: None,
            header_done: false,
            expected_field_count: None,
            rows_returned: 0,
            has_row: false,
            synth_names: Vec::new(),
        }
    }

    pub(crate) fn header_done(&self) -> bool {
        self.header_done
    }

    pub(crate) fn mark_header_done(&mut self) {
        self.header_done = true;
    }

    pub(crate) fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub(crate) fn has_row(&self) -> bool {
        self.has_row
    }

    pub(crate) fn clear_row(&mut self) {
        self.has_row = false;
    }

    pub(crate) fn registry(&self) -> &MapRegistry {
        &self.registry
    }

    /// 0-based index of the last admitted data row.
    pub(crate) fn current_index(&self) -> u64 {
        self.rows_returned.saturating_sub(1)
    }

    pub(crate) fn capture_header(&mut self, row: &Row<'_>, options: &CsvOptions) {
        debug!("captured header with {} columns", row.field_count());
        if options.detect_column_count() {
            self.expected_field_count = Some(row.field_count());
        }
        self.header = Some(Header::from_row(row));
    }

    /// Applies column-count detection and claims an index for the row.
    pub(crate) fn admit_row(&mut self, row: &Row<'_>, options: &CsvOptions) -> CsvResult<()> {
        let index = self.rows_returned;
        let count = row.field_count();
        if options.detect_column_count() {
            match self.expected_field_count {
                None => self.expected_field_count = Some(count),
                Some(expected) if count != expected => {
                    let message = format!("Expected {expected} fields, found {count}");
                    match options.mode() {
                        Mode::Strict => {
                            self.rows_returned += 1;
                            self.has_row = false;
                            return Err(CsvError::bad_data(
                                index,
                                row.line_number(),
                                0,
                                message,
                            ));
                        }
                        Mode::Lenient => {
                            warn!(
                                "bad data at row {}, line {}: {}",
                                index,
                                row.line_number(),
                                message
                            );
                            if let Some(handler) = options.bad_data_found() {
                                let context = BadDataContext {
                                    row_index: index,
                                    line_number: row.line_number(),
                                    field_index: 0,
                                    message: &message,
                                    raw_field: row.field(0).unwrap_or(""),
                                };
                                (handler.as_ref())(&context);
                            }
                        }
                    }
                }
                Some(_) => {}
            }
        }
        self.rows_returned += 1;
        self.has_row = true;
        Ok(())
    }

    /// Grows the synthesized `Column<N>` name cache to cover `count`
    /// columns.
    pub(crate) fn ensure_synth_names(&mut self, count: usize) {
        while self.synth_names.len() < count {
            let n = self.synth_names.len();
            self.synth_names.push(format!("Column{}", n + 1));
        }
    }

    /// Builds the ordered dictionary for an admitted row. The synthesized
    /// name cache must already cover the row's width.
    pub(crate) fn dictionary(&self, row: &Row<'_>) -> RowMap {
        let mut entries = Vec::with_capacity(row.field_count());
        for (i, value) in row.iter().enumerate() {
            let name = self
                .header
                .as_ref()
                .and_then(|h| h.names().get(i))
                .cloned()
                .unwrap_or_else(|| self.synth_names[i].clone());
            entries.push((name, value.to_string()));
        }
        RowMap { entries }
    }

    /// Materializes a typed record from an admitted row.
    ///
    /// Each non-ignored mapping binds to a column by explicit index, then
    /// header name, then declaration order. A column missing from the row
    /// raises in strict mode and reads as empty in lenient mode; a
    /// conversion failure raises in strict mode and leaves the member's
    /// default in lenient mode, notifying the bad-data callback.
    pub(crate) fn record<T: CsvRecord + Default>(
        &self,
        row: &Row<'_>,
        options: &CsvOptions,
    ) -> CsvResult<T> {
        let map = self.registry.get_or_create::<T>();
        let row_index = self.current_index();
        let mut record = T::default();
        for (decl_index, mapping) in map.mappings().iter().enumerate() {
            if mapping.is_ignored() {
                continue;
            }
            let column = mapping
                .index()
                .or_else(|| self.header.as_ref().and_then(|h| h.index_of(mapping.name())))
                .unwrap_or(decl_index);
            let ctx = ConvertContext {
                culture: options.culture(),
                row_index,
                field_index: column,
                column_name: Some(mapping.name()),
            };
            let field = match row.field(column) {
                Some(field) => field,
                None => match options.mode() {
                    Mode::Strict => {
                        return Err(CsvError::MissingField {
                            row_index,
                            line_number: row.line_number(),
                            field_index: column,
                            message: format!(
                                "column '{}' is not present in a row of {} fields",
                                mapping.name(),
                                row.field_count()
                            ),
                        });
                    }
                    Mode::Lenient => "",
                },
            };
            if let Err(message) =
                mapping.parse_into(&mut record, field, &ctx, options.converters())
            {
                match options.mode() {
                    Mode::Strict => {
                        return Err(CsvError::Conversion {
                            row_index,
                            line_number: row.line_number(),
                            field_index: column,
                            message,
                        });
                    }
                    Mode::Lenient => {
                        warn!(
                            "conversion failed at row {}, field {}: {}",
                            row_index, column, message
                        );
                        if let Some(handler) = options.bad_data_found() {
                            let context = BadDataContext {
                                row_index,
                                line_number: row.line_number(),
                                field_index: column,
                                message: &message,
                                raw_field: field,
                            };
                            (handler.as_ref())(&context);
                        }
                    }
                }
            }
        }
        Ok(record)
    }
}

/// Builder for [`CsvReader`], in the spirit of the options builder: set
/// the options once, then attach the input.
#[derive(Default)]
pub struct CsvReaderBuilder {
    options: Option<CsvOptions>,
}

impl CsvReaderBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `options` for the reader.
    pub fn options(mut self, options: CsvOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Builds a reader over any [`Read`].
    pub fn from_reader<R: Read>(self, reader: R) -> CsvReader<ReadCharSource<R>> {
        let options = self.options.unwrap_or_default();
        let source = ReadCharSource::new(reader, options.byte_buffer_size());
        CsvReader::new(source, options)
    }

    /// Builds a reader over a file.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Io`] when the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> CsvResult<CsvReader<ReadCharSource<File>>> {
        let file = File::open(path)?;
        Ok(self.from_reader(file))
    }
}

/// Blocking row/record reader.
///
/// Not safe for concurrent use; independent readers are fully parallel. A
/// [`Row`] borrowed from the reader must be dropped before the next
/// row-advancing call.
pub struct CsvReader<S> {
    parser: CsvParser<S>,
    state: ReaderState,
}

impl<S: CharSource> CsvReader<S> {
    /// Builds a reader over an already-decoded character source.
    pub fn new(source: S, options: CsvOptions) -> Self {
        Self {
            parser: CsvParser::new(source, options),
            state: ReaderState::new(),
        }
    }

    /// Advances to the next data row, consuming the header first when the
    /// options call for one. Returns `false` at end of stream.
    pub fn read(&mut self) -> CsvResult<bool> {
        self.ensure_header()?;
        let advanced = match self.parser.read() {
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
    pub fn try_read_row(&mut self) -> CsvResult<Option<Row<'_>>> {
        if self.read()? {
            Ok(Some(
                self.parser.row().with_row_index(self.state.current_index()),
            ))
        } else {
            Ok(None)
        }
    }

    /// Advances and returns the next row as an ordered name→value
    /// dictionary, or `None` at end of stream. Columns beyond the header
    /// get cached `Column<N>` names.
    pub fn try_read_dictionary(&mut self) -> CsvResult<Option<RowMap>> {
        if !self.read()? {
            return Ok(None);
        }
        let count = self.parser.row().field_count();
        self.state.ensure_synth_names(count);
        let row = self.parser.row();
        Ok(Some(self.state.dictionary(&row)))
    }

    /// Materializes a typed record from the last-read row.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Argument`] when no row has been read,
    /// [`CsvError::MissingField`] or [`CsvError::Conversion`] per the
    /// strict-mode binding contract.
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
    /// yet. `None` when the options declare headerless input.
    pub fn headers(&mut self) -> CsvResult<Option<&Header>> {
        self.ensure_header()?;
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

    /// Current 1-based physical line.
    pub fn line_number(&self) -> u64 {
        self.parser.line_number()
    }

    /// The options this reader was built with.
    pub fn options(&self) -> &CsvOptions {
        self.parser.options()
    }

    fn ensure_header(&mut self) -> CsvResult<()> {
        if self.state.header_done() {
            return Ok(());
        }
        self.state.mark_header_done();
        if !self.parser.options().has_header() {
            return Ok(());
        }
        if self.parser.read()? {
            let row = self.parser.row();
            self.state.capture_header(&row, self.parser.options());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Trim;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default, Debug, PartialEq)]
    struct Car {
        year: u16,
        make: String,
        model: String,
    }

    impl CsvRecord for Car {
        fn column_map() -> ColumnMap<Self> {
            ColumnMap::builder()
                .column("year", |c: &Car| c.year, |c, v| c.year = v)
                .column("make", |c: &Car| c.make.clone(), |c, v| c.make = v)
                .column("model", |c: &Car| c.model.clone(), |c, v| c.model = v)
                .build()
        }
    }

    fn reader(data: &str) -> CsvReader<ReadCharSource<&[u8]>> {
        CsvReaderBuilder::new().from_reader(data.as_bytes())
    }

    fn reader_with(
        data: &str,
        options: CsvOptions,
    ) -> CsvReader<ReadCharSource<&[u8]>> {
        CsvReaderBuilder::new()
            .options(options)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn header_is_consumed_by_first_read() {
        let mut r = reader("a,b\n1,2\n");
        assert!(r.read().unwrap());
        assert_eq!(r.get_field_span(0), Some("1"));
        assert_eq!(r.get_field(1), Some("2".to_string()));
        assert!(!r.read().unwrap());
    }

    #[test]
    fn headers_accessor_reads_lazily() {
        let mut r = reader("a,b\n1,2\n");
        let header = r.headers().unwrap().unwrap();
        assert_eq!(header.names(), &["a", "b"]);
        assert_eq!(header.index_of("b"), Some(1));
        assert_eq!(header.index_of("missing"), None);
        assert!(r.read().unwrap());
        assert_eq!(r.get_field_span(0), Some("1"));
    }

    #[test]
    fn row_views_carry_data_row_indices() {
        let mut r = reader("h1,h2\nx,y\nz,w\n");
        let row = r.try_read_row().unwrap().unwrap();
        assert_eq!(row.row_index(), 0);
        assert_eq!(row.line_number(), 2);
        let row = r.try_read_row().unwrap().unwrap();
        assert_eq!(row.row_index(), 1);
        assert!(r.try_read_row().unwrap().is_none());
    }

    #[test]
    fn records_bind_by_header_name() {
        let data = "model,make,year\n356,Porsche,1948\n";
        let mut r = reader(data);
        assert!(r.read().unwrap());
        let car: Car = r.get_record().unwrap();
        assert_eq!(
            car,
            Car {
                year: 1948,
                make: "Porsche".into(),
                model: "356".into()
            }
        );
    }

    #[test]
    fn records_bind_by_declaration_order_without_header() {
        let options = CsvOptions::builder().has_header(false).build().unwrap();
        let mut r = reader_with("1967,Ford,Mustang\n", options);
        assert!(r.read().unwrap());
        let car: Car = r.get_record().unwrap();
        assert_eq!(car.make, "Ford");
        assert_eq!(car.year, 1967);
    }

    #[test]
    fn explicit_index_beats_header_lookup() {
        let map = ColumnMap::builder()
            .column("year", |c: &Car| c.year, |c, v| c.year = v)
            .index(2)
            .column("make", |c: &Car| c.make.clone(), |c, v| c.make = v)
            .index(1)
            .column("model", |c: &Car| c.model.clone(), |c, v| c.model = v)
            .index(0)
            .build();
        let mut r = reader("year,make,model\n356,Porsche,1948\n");
        r.register_map::<Car>(map);
        assert!(r.read().unwrap());
        let car: Car = r.get_record().unwrap();
        assert_eq!(car.year, 1948);
        assert_eq!(car.model, "356");
    }

    #[test]
    fn get_record_before_read_is_an_argument_error() {
        let r = reader("a\n1\n");
        let err = r.get_record::<Car>().unwrap_err();
        assert!(matches!(err, CsvError::Argument(_)));
    }

    #[test]
    fn missing_column_raises_in_strict_mode() {
        let data = "year,make\n1948,Porsche,356\n1967\n";
        let options = CsvOptions::builder().build().unwrap();
        let mut r = reader_with(data, options);
        assert!(r.read().unwrap());
        assert!(r.get_record::<Car>().is_ok());
        assert!(r.read().unwrap());
        let err = r.get_record::<Car>().unwrap_err();
        match err {
            CsvError::MissingField {
                row_index,
                field_index,
                ..
            } => {
                assert_eq!(row_index, 1);
                assert_eq!(field_index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_column_reads_empty_in_lenient_mode() {
        let data = "year,make,model\n1948\n";
        let options = CsvOptions::builder().mode(Mode::Lenient).build().unwrap();
        let mut r = reader_with(data, options);
        assert!(r.read().unwrap());
        let car: Car = r.get_record().unwrap();
        assert_eq!(car.year, 1948);
        assert_eq!(car.make, "");
    }

    #[test]
    fn conversion_failure_raises_in_strict_mode() {
        let mut r = reader("year,make,model\nnot-a-year,Porsche,356\n");
        assert!(r.read().unwrap());
        let err = r.get_record::<Car>().unwrap_err();
        match err {
            CsvError::Conversion {
                row_index,
                field_index,
                message,
                ..
            } => {
                assert_eq!(row_index, 0);
                assert_eq!(field_index, 0);
                assert!(message.contains("not-a-year"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn conversion_failure_leaves_default_in_lenient_mode() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let options = CsvOptions::builder()
            .mode(Mode::Lenient)
            .bad_data_found(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        let mut r = reader_with("year,make,model\nbad,Porsche,356\n", options);
        assert!(r.read().unwrap());
        let car: Car = r.get_record().unwrap();
        assert_eq!(car.year, 0);
        assert_eq!(car.make, "Porsche");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dictionary_uses_header_names_and_synthesized_overflow() {
        let mut r = reader("a,b\n1,2,3\n");
        let dict = r.try_read_dictionary().unwrap().unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get("a"), Some("1"));
        assert_eq!(dict.get("b"), Some("2"));
        assert_eq!(dict.get("Column3"), Some("3"));
        let entries: Vec<_> = dict.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(entries, vec!["a", "b", "Column3"]);
        assert!(r.try_read_dictionary().unwrap().is_none());
    }

    #[test]
    fn column_count_mismatch_raises_in_strict_mode() {
        let options = CsvOptions::builder()
            .detect_column_count(true)
            .build()
            .unwrap();
        let mut r = reader_with("a,b\n1,2\n3\n", options);
        assert!(r.read().unwrap());
        assert_eq!(r.get_field_span(0), Some("1"));
        let err = r.read().unwrap_err();
        match err {
            CsvError::BadData {
                row_index,
                line_number,
                field_index,
                ..
            } => {
                assert_eq!(row_index, 1);
                assert_eq!(line_number, 3);
                assert_eq!(field_index, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn column_count_mismatch_reports_and_yields_in_lenient_mode() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let options = CsvOptions::builder()
            .detect_column_count(true)
            .mode(Mode::Lenient)
            .bad_data_found(move |ctx| {
                seen.fetch_add(1, Ordering::SeqCst);
                assert_eq!(ctx.field_index, 0);
            })
            .build()
            .unwrap();
        let mut r = reader_with("a,b\n1,2\n3\n", options);
        assert!(r.read().unwrap());
        assert!(r.read().unwrap());
        assert_eq!(r.get_field_span(0), Some("3"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blank_lines_skipped_before_header() {
        let options = CsvOptions::builder()
            .ignore_blank_lines(true)
            .build()
            .unwrap();
        let mut r = reader_with("\n\na,b\n1,2\n", options);
        let header = r.headers().unwrap().unwrap();
        assert_eq!(header.names(), &["a", "b"]);
        assert!(r.read().unwrap());
        assert_eq!(r.get_field_span(0), Some("1"));
    }

    #[test]
    fn trimmed_header_names_match_mappings() {
        let options = CsvOptions::builder().trim(Trim::Both).build().unwrap();
        let mut r = reader_with(" year , make , model \n1948,Porsche,356\n", options);
        assert!(r.read().unwrap());
        let car: Car = r.get_record().unwrap();
        assert_eq!(car.year, 1948);
    }

    #[test]
    fn ignored_members_never_bind() {
        let map = ColumnMap::builder()
            .column("year", |c: &Car| c.year, |c, v| c.year = v)
            .column("make", |c: &Car| c.make.clone(), |c, v| c.make = v)
            .ignore()
            .column("model", |c: &Car| c.model.clone(), |c, v| c.model = v)
            .build();
        let mut r = reader("year,make,model\n1948,Porsche,356\n");
        r.register_map::<Car>(map);
        assert!(r.read().unwrap());
        let car: Car = r.get_record().unwrap();
        assert_eq!(car.make, "");
        assert_eq!(car.model, "356");
    }
}
