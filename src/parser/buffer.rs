use crate::pool::{self, PooledChars, PooledTokens};

use super::row::FieldToken;

/// Reusable storage for the row being parsed.
///
/// The occupied prefix of `buf` is the concatenation of all completed and
/// in-progress field text of the current row; `tokens` records the byte
/// range of each completed field. `reset` clears lengths only, so capacity
/// (and the pool rental) survives across rows; the backing buffers return
/// to the pool when the parser is dropped.
pub(crate) struct RowBuffer {
    buf: PooledChars,
    tokens: PooledTokens,
    field_start: usize,
}

impl RowBuffer {
    pub(crate) fn new(char_buffer_size: usize) -> Self {
        Self {
            buf: pool::rent_chars(char_buffer_size),
            tokens: pool::rent_tokens(),
            field_start: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.buf.clear();
        self.tokens.clear();
        self.field_start = 0;
    }

    pub(crate) fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    /// Byte length of the in-progress field.
    pub(crate) fn current_len(&self) -> usize {
        self.buf.len() - self.field_start
    }

    /// The in-progress field's text.
    pub(crate) fn current_field(&self) -> &str {
        &self.buf[self.field_start..]
    }

    /// 0-based index of the in-progress field.
    pub(crate) fn current_index(&self) -> usize {
        self.tokens.len()
    }

    /// Completes the in-progress field, optionally trimming trailing
    /// whitespace from the raw token.
    pub(crate) fn complete_field(&mut self, trim_end: bool) {
        let mut len = self.buf.len() - self.field_start;
        if trim_end {
            len = self.current_field().trim_end().len();
            self.buf.truncate(self.field_start + len);
        }
        self.tokens.push(FieldToken {
            start: self.field_start,
            len,
        });
        self.field_start = self.buf.len();
    }

    pub(crate) fn field_count(&self) -> usize {
        self.tokens.len()
    }

    /// True when the completed row is a blank line: one empty field.
    pub(crate) fn is_blank(&self) -> bool {
        self.tokens.len() == 1 && self.tokens[0].len == 0
    }

    pub(crate) fn text(&self) -> &str {
        &self.buf
    }

    pub(crate) fn tokens(&self) -> &[FieldToken] {
        &self.tokens
    }
}
