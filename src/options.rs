//! Immutable codec configuration.

use std::sync::Arc;

use crate::convert::{ConverterRegistry, TypedConverter};
use crate::culture::Culture;
use crate::error::{CsvError, CsvResult};
use crate::pool::MIN_BUFFER_SIZE;

/// Whitespace trimming policy applied while fields are tokenized.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Trim {
    /// Leave fields untouched.
    #[default]
    None,
    /// Drop leading whitespace outside quotes.
    Start,
    /// Drop trailing whitespace from each completed field.
    End,
    /// Both [`Trim::Start`] and [`Trim::End`].
    Both,
}

impl Trim {
    pub(crate) fn trims_start(self) -> bool {
        matches!(self, Trim::Start | Trim::Both)
    }

    pub(crate) fn trims_end(self) -> bool {
        matches!(self, Trim::End | Trim::Both)
    }
}

/// Global error policy: raise on bad data, or report it and keep going.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Mode {
    /// Any bad-data condition aborts the current read with an error.
    #[default]
    Strict,
    /// Bad data is reported through the `bad_data_found` callback and
    /// parsing continues with a per-condition recovery action.
    Lenient,
}

/// Context delivered to the `bad_data_found` callback in lenient mode.
#[derive(Debug)]
pub struct BadDataContext<'a> {
    /// 0-based index of the row being parsed.
    pub row_index: u64,
    /// 1-based physical line number where the condition was observed.
    pub line_number: u64,
    /// 0-based index of the field being parsed.
    pub field_index: usize,
    /// Human-readable description of the condition.
    pub message: &'a str,
    /// The raw field slice accumulated so far.
    pub raw_field: &'a str,
}

/// Callback invoked once per bad-data condition in lenient mode.
pub type BadDataHandler = Arc<dyn Fn(&BadDataContext<'_>) + Send + Sync>;

/// Immutable configuration shared by parsers, readers and writers.
///
/// Built once through [`CsvOptions::builder`], validated in
/// [`CsvOptionsBuilder::build`], then cloned into each instance and never
/// mutated.
///
/// # Examples
///
/// ```
/// use csvflow::{CsvOptions, Trim};
///
/// let options = CsvOptions::builder()
///     .delimiter(';')
///     .trim(Trim::Both)
///     .build()
///     .unwrap();
/// assert_eq!(options.delimiter(), ';');
/// ```
#[derive(Clone)]
pub struct CsvOptions {
    delimiter: char,
    quote: char,
    escape: char,
    has_header: bool,
    newline: Option<String>,
    trim: Trim,
    mode: Mode,
    detect_column_count: bool,
    ignore_blank_lines: bool,
    culture: Culture,
    char_buffer_size: usize,
    byte_buffer_size: usize,
    bad_data_found: Option<BadDataHandler>,
    converters: ConverterRegistry,
}

impl CsvOptions {
    /// Starts a builder with the default configuration: `,` delimiter, `"`
    /// quote doubling as its own escape, header row expected, strict mode,
    /// invariant culture.
    pub fn builder() -> CsvOptionsBuilder {
        CsvOptionsBuilder::new()
    }

    /// The field delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The quoting character.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// The escape character; equal to [`CsvOptions::quote`] unless
    /// configured otherwise.
    pub fn escape(&self) -> char {
        self.escape
    }

    /// Whether the first logical row is a header.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Record terminator used when writing; `None` means the platform
    /// default.
    pub fn newline(&self) -> Option<&str> {
        self.newline.as_deref()
    }

    /// The trimming policy.
    pub fn trim(&self) -> Trim {
        self.trim
    }

    /// The error policy.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the first row fixes the expected field count.
    pub fn detect_column_count(&self) -> bool {
        self.detect_column_count
    }

    /// Whether rows consisting of a single empty field are discarded.
    pub fn ignore_blank_lines(&self) -> bool {
        self.ignore_blank_lines
    }

    /// The locale handle used for numeric and date/time conversion.
    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    /// Capacity hint for character buffer rentals.
    pub fn char_buffer_size(&self) -> usize {
        self.char_buffer_size
    }

    /// Capacity hint for byte buffer rentals.
    pub fn byte_buffer_size(&self) -> usize {
        self.byte_buffer_size
    }

    /// The lenient-mode bad-data callback, if any.
    pub fn bad_data_found(&self) -> Option<&BadDataHandler> {
        self.bad_data_found.as_ref()
    }

    /// The per-type custom converter registry.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }
}

impl std::fmt::Debug for CsvOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvOptions")
            .field("delimiter", &self.delimiter)
            .field("quote", &self.quote)
            .field("escape", &self.escape)
            .field("has_header", &self.has_header)
            .field("newline", &self.newline)
            .field("trim", &self.trim)
            .field("mode", &self.mode)
            .field("detect_column_count", &self.detect_column_count)
            .field("ignore_blank_lines", &self.ignore_blank_lines)
            .field("culture", &self.culture)
            .field("char_buffer_size", &self.char_buffer_size)
            .field("byte_buffer_size", &self.byte_buffer_size)
            .field("bad_data_found", &self.bad_data_found.is_some())
            .finish()
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptionsBuilder::new()
            .build()
            .expect("default options are valid")
    }
}

/// Chainable builder for [`CsvOptions`].
pub struct CsvOptionsBuilder {
    delimiter: char,
    quote: char,
    escape: Option<char>,
    has_header: bool,
    newline: Option<String>,
    trim: Trim,
    mode: Mode,
    detect_column_count: bool,
    ignore_blank_lines: bool,
    culture: Option<Culture>,
    char_buffer_size: usize,
    byte_buffer_size: usize,
    bad_data_found: Option<BadDataHandler>,
    converters: ConverterRegistry,
}

impl Default for CsvOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvOptionsBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            escape: None,
            has_header: true,
            newline: None,
            trim: Trim::None,
            mode: Mode::Strict,
            detect_column_count: false,
            ignore_blank_lines: false,
            culture: None,
            char_buffer_size: 1024,
            byte_buffer_size: 4096,
            bad_data_found: None,
            converters: ConverterRegistry::new(),
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quoting character.
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the escape character. When it differs from the quote, a quote
    /// inside a quoted field is written as `escape` followed by `quote`
    /// instead of a doubled quote.
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Sets whether the first logical row is a header.
    pub fn has_header(mut self, yes: bool) -> Self {
        self.has_header = yes;
        self
    }

    /// Sets the record terminator used when writing. Reading always accepts
    /// `\n`, `\r\n` and `\r`.
    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = Some(newline.into());
        self
    }

    /// Sets the trimming policy.
    pub fn trim(mut self, trim: Trim) -> Self {
        self.trim = trim;
        self
    }

    /// Sets the error policy.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// When enabled, the first row fixes the expected field count and later
    /// rows with a different count are bad data.
    pub fn detect_column_count(mut self, yes: bool) -> Self {
        self.detect_column_count = yes;
        self
    }

    /// When enabled, rows consisting of a single empty field are discarded.
    pub fn ignore_blank_lines(mut self, yes: bool) -> Self {
        self.ignore_blank_lines = yes;
        self
    }

    /// Sets the locale handle used for numeric and date/time conversion.
    pub fn culture(mut self, culture: Culture) -> Self {
        self.culture = Some(culture);
        self
    }

    /// Capacity hint for character buffer rentals. Must be at least 16.
    pub fn char_buffer_size(mut self, size: usize) -> Self {
        self.char_buffer_size = size;
        self
    }

    /// Capacity hint for byte buffer rentals. Must be at least 16.
    pub fn byte_buffer_size(mut self, size: usize) -> Self {
        self.byte_buffer_size = size;
        self
    }

    /// Registers a callback invoked for every bad-data condition in lenient
    /// mode.
    pub fn bad_data_found(
        mut self,
        handler: impl Fn(&BadDataContext<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.bad_data_found = Some(Arc::new(handler));
        self
    }

    /// Registers a custom converter for every field targeting `V`.
    pub fn converter<V: 'static>(mut self, converter: impl TypedConverter<V> + 'static) -> Self {
        self.converters.register(converter);
        self
    }

    /// Validates the configuration and freezes it into [`CsvOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Argument`] when the delimiter equals the quote,
    /// the delimiter is CR or LF, or a buffer size is below 16.
    pub fn build(self) -> CsvResult<CsvOptions> {
        if self.delimiter == self.quote {
            return Err(CsvError::Argument(
                "delimiter and quote must differ".to_string(),
            ));
        }
        if self.delimiter == '\r' || self.delimiter == '\n' {
            return Err(CsvError::Argument(
                "delimiter must not be a line terminator".to_string(),
            ));
        }
        if self.char_buffer_size < MIN_BUFFER_SIZE || self.byte_buffer_size < MIN_BUFFER_SIZE {
            return Err(CsvError::Argument(format!(
                "buffer sizes must be at least {MIN_BUFFER_SIZE}"
            )));
        }
        Ok(CsvOptions {
            delimiter: self.delimiter,
            quote: self.quote,
            escape: self.escape.unwrap_or(self.quote),
            has_header: self.has_header,
            newline: self.newline,
            trim: self.trim,
            mode: self.mode,
            detect_column_count: self.detect_column_count,
            ignore_blank_lines: self.ignore_blank_lines,
            culture: self.culture.unwrap_or_default(),
            char_buffer_size: self.char_buffer_size,
            byte_buffer_size: self.byte_buffer_size,
            bad_data_found: self.bad_data_found,
            converters: self.converters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventions() {
        let options = CsvOptions::default();
        assert_eq!(options.delimiter(), ',');
        assert_eq!(options.quote(), '"');
        assert_eq!(options.escape(), '"');
        assert!(options.has_header());
        assert_eq!(options.trim(), Trim::None);
        assert_eq!(options.mode(), Mode::Strict);
    }

    #[test]
    fn escape_defaults_to_quote() {
        let options = CsvOptions::builder().quote('\'').build().unwrap();
        assert_eq!(options.escape(), '\'');

        let options = CsvOptions::builder().escape('\\').build().unwrap();
        assert_eq!(options.escape(), '\\');
        assert_eq!(options.quote(), '"');
    }

    #[test]
    fn delimiter_equal_to_quote_rejected() {
        let err = CsvOptions::builder().delimiter('"').build().unwrap_err();
        assert!(matches!(err, CsvError::Argument(_)));
    }

    #[test]
    fn newline_delimiter_rejected() {
        assert!(CsvOptions::builder().delimiter('\n').build().is_err());
        assert!(CsvOptions::builder().delimiter('\r').build().is_err());
    }

    #[test]
    fn tiny_buffers_rejected() {
        assert!(CsvOptions::builder().char_buffer_size(8).build().is_err());
        assert!(CsvOptions::builder().byte_buffer_size(15).build().is_err());
        assert!(CsvOptions::builder().byte_buffer_size(16).build().is_ok());
    }
}
