//! Locale handles controlling numeric and date/time parsing.

use std::sync::{Arc, OnceLock};

use time::format_description::{self, OwnedFormatItem};
use time::{Date, PrimitiveDateTime, Time};

use crate::error::{CsvError, CsvResult};

/// A locale handle: decimal and group separators for numbers plus compiled
/// `time` format patterns for dates, times and combined timestamps.
///
/// Cultures are immutable and cheap to clone (the compiled patterns are
/// shared). The invariant culture is the default: `.` decimal separator,
/// `,` group separator, ISO-style `2025-12-31` dates.
///
/// # Examples
///
/// ```
/// use csvflow::Culture;
///
/// let fr = Culture::fr_fr();
/// assert_eq!(fr.parse_float::<f64>("12,5").unwrap(), 12.5);
/// ```
#[derive(Clone, Debug)]
pub struct Culture {
    name: &'static str,
    decimal_separator: char,
    group_separator: char,
    date_format: Arc<OwnedFormatItem>,
    time_format: Arc<OwnedFormatItem>,
    datetime_format: Arc<OwnedFormatItem>,
}

static INVARIANT: OnceLock<Culture> = OnceLock::new();
static EN_US: OnceLock<Culture> = OnceLock::new();
static FR_FR: OnceLock<Culture> = OnceLock::new();
static DE_DE: OnceLock<Culture> = OnceLock::new();

impl Culture {
    /// Builds a culture from separator characters and `time`
    /// format-description patterns (version 2 syntax, e.g.
    /// `"[day]/[month]/[year]"`).
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Argument`] when a pattern does not compile or the
    /// two separators are equal.
    pub fn custom(
        name: &'static str,
        decimal_separator: char,
        group_separator: char,
        date_pattern: &str,
        time_pattern: &str,
        datetime_pattern: &str,
    ) -> CsvResult<Self> {
        if decimal_separator == group_separator {
            return Err(CsvError::Argument(format!(
                "culture '{name}': decimal and group separators must differ"
            )));
        }
        Ok(Self {
            name,
            decimal_separator,
            group_separator,
            date_format: Arc::new(compile(name, date_pattern)?),
            time_format: Arc::new(compile(name, time_pattern)?),
            datetime_format: Arc::new(compile(name, datetime_pattern)?),
        })
    }

    /// The culture-neutral default: `.` decimal point, `,` grouping,
    /// ISO `[year]-[month]-[day]` dates.
    pub fn invariant() -> Self {
        INVARIANT
            .get_or_init(|| {
                Culture::custom(
                    "invariant",
                    '.',
                    ',',
                    "[year]-[month]-[day]",
                    "[hour]:[minute]:[second]",
                    "[year]-[month]-[day] [hour]:[minute]:[second]",
                )
                .expect("invalid built-in culture pattern")
            })
            .clone()
    }

    /// United States English: `.` decimal point, `,` grouping,
    /// month-first dates.
    pub fn en_us() -> Self {
        EN_US
            .get_or_init(|| {
                Culture::custom(
                    "en-US",
                    '.',
                    ',',
                    "[month]/[day]/[year]",
                    "[hour]:[minute]:[second]",
                    "[month]/[day]/[year] [hour]:[minute]:[second]",
                )
                .expect("invalid built-in culture pattern")
            })
            .clone()
    }

    /// French: `,` decimal comma, space grouping, day-first dates.
    pub fn fr_fr() -> Self {
        FR_FR
            .get_or_init(|| {
                Culture::custom(
                    "fr-FR",
                    ',',
                    ' ',
                    "[day]/[month]/[year]",
                    "[hour]:[minute]:[second]",
                    "[day]/[month]/[year] [hour]:[minute]:[second]",
                )
                .expect("invalid built-in culture pattern")
            })
            .clone()
    }

    /// German: `,` decimal comma, `.` grouping, dotted day-first dates.
    pub fn de_de() -> Self {
        DE_DE
            .get_or_init(|| {
                Culture::custom(
                    "de-DE",
                    ',',
                    '.',
                    "[day].[month].[year]",
                    "[hour]:[minute]:[second]",
                    "[day].[month].[year] [hour]:[minute]:[second]",
                )
                .expect("invalid built-in culture pattern")
            })
            .clone()
    }

    /// The culture's display name, e.g. `"fr-FR"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The character separating the integral and fractional digits.
    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// The thousands-group separator.
    pub fn group_separator(&self) -> char {
        self.group_separator
    }

    /// Parses an integer. Group separators are not allowed, matching the
    /// `Integer` numeric style.
    pub fn parse_integer<T: std::str::FromStr>(&self, field: &str) -> Result<T, String> {
        let trimmed = field.trim();
        trimmed
            .parse::<T>()
            .map_err(|_| format!("'{trimmed}' is not a valid integer"))
    }

    /// Parses a floating-point number, allowing group separators and the
    /// culture's decimal separator.
    pub fn parse_float<T: std::str::FromStr>(&self, field: &str) -> Result<T, String> {
        let normalized = self.normalize_number(field);
        normalized
            .parse::<T>()
            .map_err(|_| format!("'{}' is not a valid number", field.trim()))
    }

    /// Parses an arbitrary-precision decimal, allowing group separators.
    pub fn parse_decimal(&self, field: &str) -> Result<rust_decimal::Decimal, String> {
        let normalized = self.normalize_number(field);
        normalized
            .parse::<rust_decimal::Decimal>()
            .map_err(|_| format!("'{}' is not a valid decimal", field.trim()))
    }

    /// Rewrites a number formatted with `.` as the decimal point into this
    /// culture's separators (no grouping is inserted).
    pub fn localize_number(&self, formatted: &str) -> String {
        if self.decimal_separator == '.' {
            formatted.to_string()
        } else {
            formatted.replace('.', &self.decimal_separator.to_string())
        }
    }

    /// Parses a calendar date with the culture's date pattern.
    pub fn parse_date(&self, field: &str) -> Result<Date, String> {
        Date::parse(field.trim(), self.date_format.as_ref())
            .map_err(|_| format!("'{}' is not a valid date for {}", field.trim(), self.name))
    }

    /// Parses a time of day with the culture's time pattern.
    pub fn parse_time(&self, field: &str) -> Result<Time, String> {
        Time::parse(field.trim(), self.time_format.as_ref())
            .map_err(|_| format!("'{}' is not a valid time for {}", field.trim(), self.name))
    }

    /// Parses a timestamp with the culture's datetime pattern, falling back
    /// to a bare date at midnight.
    pub fn parse_datetime(&self, field: &str) -> Result<PrimitiveDateTime, String> {
        let trimmed = field.trim();
        match PrimitiveDateTime::parse(trimmed, self.datetime_format.as_ref()) {
            Ok(dt) => Ok(dt),
            Err(_) => self
                .parse_date(trimmed)
                .map(|d| d.midnight())
                .map_err(|_| format!("'{trimmed}' is not a valid timestamp for {}", self.name)),
        }
    }

    /// Formats a date with the culture's date pattern.
    pub fn format_date(&self, value: &Date) -> Result<String, String> {
        value
            .format(self.date_format.as_ref())
            .map_err(|e| e.to_string())
    }

    /// Formats a time of day with the culture's time pattern.
    pub fn format_time(&self, value: &Time) -> Result<String, String> {
        value
            .format(self.time_format.as_ref())
            .map_err(|e| e.to_string())
    }

    /// Formats a timestamp with the culture's datetime pattern.
    pub fn format_datetime(&self, value: &PrimitiveDateTime) -> Result<String, String> {
        value
            .format(self.datetime_format.as_ref())
            .map_err(|e| e.to_string())
    }

    fn normalize_number(&self, field: &str) -> String {
        let mut out = String::with_capacity(field.len());
        for c in field.trim().chars() {
            if c == self.group_separator {
                continue;
            }
            if c == self.decimal_separator {
                out.push('.');
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl Default for Culture {
    fn default() -> Self {
        Culture::invariant()
    }
}

fn compile(name: &str, pattern: &str) -> CsvResult<OwnedFormatItem> {
    format_description::parse_owned::<2>(pattern)
        .map_err(|e| CsvError::Argument(format!("culture '{name}': bad pattern '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn invariant_parses_plain_numbers() {
        let c = Culture::invariant();
        assert_eq!(c.parse_float::<f64>("12.5").unwrap(), 12.5);
        assert_eq!(c.parse_float::<f64>("1,234.5").unwrap(), 1234.5);
        assert_eq!(c.parse_integer::<i32>(" -42 ").unwrap(), -42);
    }

    #[test]
    fn french_decimal_comma() {
        let c = Culture::fr_fr();
        assert_eq!(c.parse_float::<f64>("12,5").unwrap(), 12.5);
        assert_eq!(c.parse_float::<f64>("1 234,5").unwrap(), 1234.5);
        assert_eq!(c.localize_number("12.5"), "12,5");
    }

    #[test]
    fn german_grouping_dot() {
        let c = Culture::de_de();
        assert_eq!(c.parse_float::<f64>("1.234,5").unwrap(), 1234.5);
        assert_eq!(c.parse_decimal("19,99").unwrap().to_string(), "19.99");
    }

    #[test]
    fn french_day_first_dates() {
        let c = Culture::fr_fr();
        let d = c.parse_date("31/12/2025").unwrap();
        assert_eq!(d.year(), 2025);
        assert_eq!(d.month(), Month::December);
        assert_eq!(d.day(), 31);
        assert_eq!(c.format_date(&d).unwrap(), "31/12/2025");
    }

    #[test]
    fn datetime_falls_back_to_midnight() {
        let c = Culture::invariant();
        let dt = c.parse_datetime("2025-12-31").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.date().day(), 31);
    }

    #[test]
    fn equal_separators_rejected() {
        let err = Culture::custom("x", ',', ',', "[year]", "[hour]", "[year]").unwrap_err();
        assert!(matches!(err, CsvError::Argument(_)));
    }

    #[test]
    fn invalid_date_reports_culture() {
        let c = Culture::en_us();
        let err = c.parse_date("31/12/2025").unwrap_err();
        assert!(err.contains("en-US"));
    }
}
