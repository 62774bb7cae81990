use log::warn;

use crate::error::{CsvError, CsvResult};
use crate::options::{BadDataContext, CsvOptions, Mode};

use super::buffer::RowBuffer;
use super::row::Row;

/// What a [`ParserCore::consume`] call achieved.
pub(crate) enum Outcome {
    /// Input exhausted without completing a row.
    NeedMore,
    /// A row is ready; read it with [`ParserCore::row`].
    RowReady,
    /// Strict-mode bad data. Input was consumed through the end of the
    /// offending physical row, so the next call starts on a fresh row.
    Failed(CsvError),
}

pub(crate) struct Consumed {
    /// How many characters of the input slice were consumed.
    pub n: usize,
    pub outcome: Outcome,
}

/// Per-character parse state. The `*Pending` states replace a pushback
/// slot: they record that the machine has seen a character whose meaning
/// depends on the next one, which may arrive in a later chunk.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    /// Accumulating an unquoted field.
    InField,
    /// Inside a quoted field; delimiters and newlines are literal.
    InQuotedField,
    /// Saw a quote inside a quoted field; doubled quote vs closing quote
    /// is decided by the next character.
    QuotePending,
    /// Saw the escape character (when it differs from the quote) inside a
    /// quoted field.
    EscapePending,
    /// Past the closing quote; only whitespace, delimiter or a line
    /// terminator is legal.
    AfterClosingQuote,
    /// Saw CR; a following LF belongs to the same separator.
    CrPending,
    /// Strict-mode recovery: discarding input until the next terminator.
    SkipToLineEnd,
    /// Saw CR while discarding.
    SkipCrPending,
}

/// The I/O-free tokenizer shared by the blocking and async drivers.
///
/// Drivers feed it character chunks; it never suspends and never reads.
pub(crate) struct ParserCore {
    options: CsvOptions,
    row: RowBuffer,
    state: State,
    row_index: u64,
    line_number: u64,
    row_line: u64,
    emitted_line: u64,
    detected_newline: Option<&'static str>,
    consumed_any: bool,
    needs_reset: bool,
    pending_error: Option<CsvError>,
}

impl ParserCore {
    pub(crate) fn new(options: CsvOptions) -> Self {
        let row = RowBuffer::new(options.char_buffer_size());
        Self {
            options,
            row,
            state: State::InField,
            row_index: 0,
            line_number: 1,
            row_line: 1,
            emitted_line: 1,
            detected_newline: None,
            consumed_any: false,
            needs_reset: false,
            pending_error: None,
        }
    }

    pub(crate) fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// The first line terminator observed in the input, if any.
    pub(crate) fn detected_newline(&self) -> Option<&'static str> {
        self.detected_newline
    }

    /// Current 1-based physical line.
    pub(crate) fn line_number(&self) -> u64 {
        self.line_number
    }

    /// The row emitted by the last successful consume/finish.
    pub(crate) fn row(&self) -> Row<'_> {
        Row::new(
            self.row.text(),
            self.row.tokens(),
            self.row_index,
            self.emitted_line,
        )
    }

    /// Consumes characters until a row completes or the slice is
    /// exhausted.
    pub(crate) fn consume(&mut self, input: &[char]) -> Consumed {
        self.prepare_row();
        let delimiter = self.options.delimiter();
        let quote = self.options.quote();
        let escape = self.options.escape();
        let mut i = 0;
        while i < input.len() {
            let c = input[i];
            match self.state {
                State::InField => {
                    i += 1;
                    self.consumed_any = true;
                    if c == delimiter {
                        self.row.complete_field(self.options.trim().trims_end());
                    } else if c == quote {
                        if self.row.current_len() == 0 {
                            self.state = State::InQuotedField;
                        } else if let Some(err) =
                            self.bad_data("Unexpected quote in unquoted field")
                        {
                            self.start_skip(err);
                        } else {
                            self.row.push(c);
                        }
                    } else if c == '\r' {
                        self.state = State::CrPending;
                    } else if c == '\n' {
                        if self.end_row("\n") {
                            return Consumed {
                                n: i,
                                outcome: Outcome::RowReady,
                            };
                        }
                    } else if self.row.current_len() == 0
                        && self.options.trim().trims_start()
                        && c.is_whitespace()
                    {
                        // Leading whitespace dropped while the field is empty.
                    } else {
                        self.row.push(c);
                    }
                }
                State::InQuotedField => {
                    i += 1;
                    self.consumed_any = true;
                    if escape != quote && c == escape {
                        self.state = State::EscapePending;
                    } else if c == quote {
                        self.state = State::QuotePending;
                    } else {
                        self.row.push(c);
                    }
                }
                State::QuotePending => {
                    if c == quote {
                        self.row.push(quote);
                        i += 1;
                        self.consumed_any = true;
                        self.state = State::InQuotedField;
                    } else {
                        self.state = State::AfterClosingQuote;
                    }
                }
                State::EscapePending => {
                    if c == quote {
                        self.row.push(quote);
                        i += 1;
                        self.consumed_any = true;
                    } else {
                        self.row.push(escape);
                    }
                    self.state = State::InQuotedField;
                }
                State::AfterClosingQuote => {
                    if c == delimiter {
                        i += 1;
                        self.consumed_any = true;
                        self.row.complete_field(self.options.trim().trims_end());
                        self.state = State::InField;
                    } else if c == '\r' {
                        i += 1;
                        self.consumed_any = true;
                        self.state = State::CrPending;
                    } else if c == '\n' {
                        i += 1;
                        self.consumed_any = true;
                        if self.end_row("\n") {
                            return Consumed {
                                n: i,
                                outcome: Outcome::RowReady,
                            };
                        }
                    } else if c.is_whitespace() {
                        i += 1;
                        self.consumed_any = true;
                    } else {
                        i += 1;
                        self.consumed_any = true;
                        if let Some(err) =
                            self.bad_data("Unexpected character after closing quote")
                        {
                            self.start_skip(err);
                        } else {
                            self.row.push(c);
                            self.state = State::InField;
                        }
                    }
                }
                State::CrPending => {
                    let sep = if c == '\n' {
                        i += 1;
                        "\r\n"
                    } else {
                        "\r"
                    };
                    if self.end_row(sep) {
                        return Consumed {
                            n: i,
                            outcome: Outcome::RowReady,
                        };
                    }
                }
                State::SkipToLineEnd => {
                    i += 1;
                    if c == '\n' {
                        return Consumed {
                            n: i,
                            outcome: Outcome::Failed(self.end_skip("\n")),
                        };
                    } else if c == '\r' {
                        self.state = State::SkipCrPending;
                    }
                }
                State::SkipCrPending => {
                    let sep = if c == '\n' {
                        i += 1;
                        "\r\n"
                    } else {
                        "\r"
                    };
                    return Consumed {
                        n: i,
                        outcome: Outcome::Failed(self.end_skip(sep)),
                    };
                }
            }
        }
        Consumed {
            n: i,
            outcome: Outcome::NeedMore,
        }
    }

    /// Resolves the pending states at end of stream.
    pub(crate) fn finish(&mut self) -> CsvResult<bool> {
        self.prepare_row();
        loop {
            match self.state {
                State::CrPending => {
                    if self.end_row("\r") {
                        return Ok(true);
                    }
                    // Suppressed blank line; nothing else can follow.
                }
                State::QuotePending => {
                    self.state = State::AfterClosingQuote;
                }
                State::EscapePending => {
                    self.row.push(self.options.escape());
                    self.state = State::InQuotedField;
                }
                State::InQuotedField => {
                    match self.bad_data("Unexpected end of file while inside a quoted field") {
                        Some(err) => {
                            self.row.reset();
                            self.state = State::InField;
                            self.needs_reset = true;
                            return Err(err);
                        }
                        None => self.state = State::AfterClosingQuote,
                    }
                }
                State::SkipToLineEnd | State::SkipCrPending => {
                    self.state = State::InField;
                    self.needs_reset = true;
                    let err = self
                        .pending_error
                        .take()
                        .expect("skip state without a pending error");
                    return Err(err);
                }
                State::InField | State::AfterClosingQuote => {
                    if !self.consumed_any
                        && self.row.field_count() == 0
                        && self.row.current_len() == 0
                    {
                        return Ok(false);
                    }
                    self.state = State::InField;
                    self.row.complete_field(self.options.trim().trims_end());
                    if self.options.ignore_blank_lines() && self.row.is_blank() {
                        self.row.reset();
                        self.consumed_any = false;
                        return Ok(false);
                    }
                    self.emitted_line = self.row_line;
                    self.needs_reset = true;
                    return Ok(true);
                }
            }
        }
    }

    fn prepare_row(&mut self) {
        if self.needs_reset {
            self.needs_reset = false;
            self.row.reset();
            self.row_index += 1;
            self.row_line = self.line_number;
            self.consumed_any = false;
        }
    }

    /// Completes the current row at a separator. Returns false when the
    /// row was a suppressed blank line.
    fn end_row(&mut self, sep: &'static str) -> bool {
        if self.detected_newline.is_none() {
            self.detected_newline = Some(sep);
        }
        self.line_number += 1;
        self.state = State::InField;
        self.row.complete_field(self.options.trim().trims_end());
        if self.options.ignore_blank_lines() && self.row.is_blank() {
            self.row.reset();
            self.row_line = self.line_number;
            self.consumed_any = false;
            return false;
        }
        self.emitted_line = self.row_line;
        self.needs_reset = true;
        true
    }

    fn start_skip(&mut self, err: CsvError) {
        self.pending_error = Some(err);
        self.state = State::SkipToLineEnd;
    }

    /// Ends strict-mode recovery at a separator and surfaces the deferred
    /// error. The discarded row still occupies an index.
    fn end_skip(&mut self, sep: &'static str) -> CsvError {
        if self.detected_newline.is_none() {
            self.detected_newline = Some(sep);
        }
        self.line_number += 1;
        self.state = State::InField;
        self.needs_reset = true;
        self.pending_error
            .take()
            .expect("skip state without a pending error")
    }

    /// Reports a bad-data condition: strict mode returns the error to
    /// raise, lenient mode notifies the callback and returns `None` so the
    /// caller applies the recovery action.
    fn bad_data(&mut self, message: &'static str) -> Option<CsvError> {
        let field_index = self.row.current_index();
        match self.options.mode() {
            Mode::Lenient => {
                warn!(
                    "bad data at row {}, line {}, field {}: {}",
                    self.row_index, self.line_number, field_index, message
                );
                if let Some(handler) = self.options.bad_data_found() {
                    let context = BadDataContext {
                        row_index: self.row_index,
                        line_number: self.line_number,
                        field_index,
                        message,
                        raw_field: self.row.current_field(),
                    };
                    (handler.as_ref())(&context);
                }
                None
            }
            Mode::Strict => Some(CsvError::bad_data(
                self.row_index,
                self.line_number,
                field_index,
                message,
            )),
        }
    }
}
