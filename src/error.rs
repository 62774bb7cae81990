use thiserror::Error;

/// Result type for CSV operations.
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors raised by the CSV codec.
///
/// Read-side data failures carry the position of the offending row:
/// `row_index` is 0-based, `line_number` is the 1-based physical line on
/// which the row starts, and `field_index` is the 0-based field within the
/// row.
#[derive(Error, Debug)]
pub enum CsvError {
    /// Malformed quoting, an unexpected character after a closing quote, an
    /// unterminated quoted field at end of stream, or a column-count
    /// mismatch.
    #[error("bad data at row {row_index}, line {line_number}, field {field_index}: {message}")]
    BadData {
        row_index: u64,
        line_number: u64,
        field_index: usize,
        message: String,
    },

    /// A column map referenced a column that is not present in the row.
    #[error("missing field at row {row_index}, line {line_number}, field {field_index}: {message}")]
    MissingField {
        row_index: u64,
        line_number: u64,
        field_index: usize,
        message: String,
    },

    /// A field slice could not be parsed to the target type after every
    /// converter layer was consulted.
    #[error("conversion failed at row {row_index}, line {line_number}, field {field_index}: {message}")]
    Conversion {
        row_index: u64,
        line_number: u64,
        field_index: usize,
        message: String,
    },

    /// Invalid options or an invalid argument to a reader/writer call.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Underlying I/O failure, including invalid UTF-8 in the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cooperative-async operation observed a cancelled token.
    #[error("operation cancelled")]
    Cancelled,
}

impl CsvError {
    pub(crate) fn bad_data(
        row_index: u64,
        line_number: u64,
        field_index: usize,
        message: impl Into<String>,
    ) -> Self {
        CsvError::BadData {
            row_index,
            line_number,
            field_index,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_data_display_carries_position() {
        let err = CsvError::bad_data(3, 5, 1, "unexpected quote");
        assert_eq!(
            err.to_string(),
            "bad data at row 3, line 5, field 1: unexpected quote"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed");
        let err: CsvError = io.into();
        assert!(matches!(err, CsvError::Io(_)));
    }
}
