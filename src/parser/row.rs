/// Byte range of one field inside a row buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldToken {
    /// Byte offset of the field's first character.
    pub start: usize,
    /// Byte length of the field.
    pub len: usize,
}

/// A read-only view of one parsed row.
///
/// Fields are zero-copy slices into the parser's reusable buffer, so a
/// `Row` borrows the parser and must be dropped before the next
/// row-advancing call; the borrow checker enforces what the contract
/// states. Copy fields out (`to_string`) to retain them.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    buf: &'a str,
    tokens: &'a [FieldToken],
    row_index: u64,
    line_number: u64,
}

impl<'a> Row<'a> {
    pub(crate) fn new(
        buf: &'a str,
        tokens: &'a [FieldToken],
        row_index: u64,
        line_number: u64,
    ) -> Self {
        Self {
            buf,
            tokens,
            row_index,
            line_number,
        }
    }

    /// Number of fields in the row. Always at least 1 for an emitted row.
    pub fn field_count(&self) -> usize {
        self.tokens.len()
    }

    /// The `i`-th field as a slice into the row buffer, or `None` past the
    /// end of the row.
    pub fn field(&self, i: usize) -> Option<&'a str> {
        self.tokens
            .get(i)
            .map(|t| &self.buf[t.start..t.start + t.len])
    }

    /// Iterates the fields in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens.iter().map(|t| &self.buf[t.start..t.start + t.len])
    }

    /// 0-based index of this row.
    pub fn row_index(&self) -> u64 {
        self.row_index
    }

    /// 1-based physical line on which this row starts.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub(crate) fn with_row_index(mut self, row_index: u64) -> Self {
        self.row_index = row_index;
        self
    }
}

impl<'a> IntoIterator for &Row<'a> {
    type Item = &'a str;
    type IntoIter = std::vec::IntoIter<&'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter().collect::<Vec<_>>().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_slice_the_shared_buffer() {
        let buf = "1Ada,Lovelace";
        let tokens = [
            FieldToken { start: 0, len: 1 },
            FieldToken { start: 1, len: 12 },
        ];
        let row = Row::new(buf, &tokens, 0, 1);
        assert_eq!(row.field_count(), 2);
        assert_eq!(row.field(0), Some("1"));
        assert_eq!(row.field(1), Some("Ada,Lovelace"));
        assert_eq!(row.field(2), None);
        assert_eq!(row.iter().collect::<Vec<_>>(), vec!["1", "Ada,Lovelace"]);
    }
}
