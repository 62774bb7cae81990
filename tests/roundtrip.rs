//! Write-then-reparse properties: anything the parser accepts survives a
//! trip through the writer unchanged.

use csvflow::{CsvOptions, CsvReaderBuilder, CsvWriterBuilder, Mode};

fn parse_rows(data: &[u8], options: &CsvOptions) -> Vec<Vec<String>> {
    let mut reader = CsvReaderBuilder::new()
        .options(options.clone())
        .from_reader(data);
    let mut rows = Vec::new();
    while let Some(row) = reader.try_read_row().unwrap() {
        rows.push(row.iter().map(str::to_string).collect());
    }
    rows
}

fn write_rows(rows: &[Vec<String>], options: &CsvOptions) -> Vec<u8> {
    let mut writer = CsvWriterBuilder::new()
        .options(options.clone())
        .from_writer(Vec::new());
    for row in rows {
        for field in row {
            writer.write_field(field).unwrap();
        }
        writer.next_record().unwrap();
    }
    writer.into_inner().unwrap()
}

fn assert_round_trips(input: &str) {
    let options = CsvOptions::builder()
        .has_header(false)
        .newline("\n")
        .build()
        .unwrap();
    let first = parse_rows(input.as_bytes(), &options);
    let rewritten = write_rows(&first, &options);
    let second = parse_rows(&rewritten, &options);
    assert_eq!(first, second, "round trip diverged for {input:?}");
}

#[test]
fn plain_rows_round_trip() {
    assert_round_trips("a,b,c\n1,2,3\n");
}

#[test]
fn quoted_and_escaped_rows_round_trip() {
    assert_round_trips("1,\"Ada,Lovelace\"\n2,\"a \"\"quote\"\" b\"\n");
}

#[test]
fn embedded_newlines_round_trip() {
    assert_round_trips("1,\"line1\nline2\"\n2,\"trailing\r\nbit\"\n");
}

#[test]
fn whitespace_edges_round_trip() {
    assert_round_trips("\" lead\",\"trail \",middle space\n");
}

#[test]
fn empty_fields_round_trip() {
    assert_round_trips(",,\na,,b\n,\n");
}

#[test]
fn unquoted_clean_fields_are_written_verbatim() {
    let options = CsvOptions::builder()
        .has_header(false)
        .newline("\n")
        .build()
        .unwrap();
    for value in ["plain", "with space inside", "123", "naïve"] {
        let mut writer = CsvWriterBuilder::new()
            .options(options.clone())
            .from_writer(Vec::new());
        writer.write_field(value).unwrap();
        writer.next_record().unwrap();
        let bytes = writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), format!("{value}\n"));
    }
}

#[test]
fn risky_fields_are_quoted_and_parse_back() {
    let options = CsvOptions::builder()
        .has_header(false)
        .newline("\n")
        .build()
        .unwrap();
    for value in [
        "comma,inside",
        "quote\"inside",
        "cr\rinside",
        "lf\ninside",
        " leading",
        "trailing ",
        "\ttab-led",
    ] {
        let mut writer = CsvWriterBuilder::new()
            .options(options.clone())
            .from_writer(Vec::new());
        writer.write_field(value).unwrap();
        writer.next_record().unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with('"'), "expected quoting for {value:?}");

        let rows = parse_rows(&bytes, &options);
        assert_eq!(rows, vec![vec![value.to_string()]]);
    }
}

#[test]
fn detected_newline_reports_first_separator() {
    let options = CsvOptions::builder().has_header(false).build().unwrap();
    for (input, expected) in [
        ("a\nb\r\nc\n", "\n"),
        ("a\r\nb\nc\n", "\r\n"),
        ("a\rb\n", "\r"),
    ] {
        let mut reader = CsvReaderBuilder::new()
            .options(options.clone())
            .from_reader(input.as_bytes());
        while reader.read().unwrap() {}
        assert_eq!(reader.detected_newline(), Some(expected), "for {input:?}");
    }
}

#[test]
fn suppressed_blank_lines_never_surface() {
    let options = CsvOptions::builder()
        .has_header(false)
        .ignore_blank_lines(true)
        .mode(Mode::Lenient)
        .build()
        .unwrap();
    let data = "\n\na,b\n\n,\n\nend\n\n";
    let rows = parse_rows(data.as_bytes(), &options);
    for row in &rows {
        assert!(!(row.len() == 1 && row[0].is_empty()), "blank row surfaced");
    }
    // The `,` row is two empty fields, not a blank line.
    assert_eq!(
        rows,
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec![String::new(), String::new()],
            vec!["end".to_string()]
        ]
    );
}

#[test]
fn custom_delimiter_round_trips() {
    let options = CsvOptions::builder()
        .has_header(false)
        .delimiter(';')
        .newline("\n")
        .build()
        .unwrap();
    let first = parse_rows("a;b,c;\"d;e\"\n".as_bytes(), &options);
    assert_eq!(first, vec![vec!["a", "b,c", "d;e"]]);
    let rewritten = write_rows(&first, &options);
    assert_eq!(parse_rows(&rewritten, &options), first);
}
