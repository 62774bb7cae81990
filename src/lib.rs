#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # csvflow

 A streaming, low-allocation CSV codec: a tokenizing parser, an
 object-to-row mapper, a culture-aware value-conversion layer and a
 quoting-aware writer.

 ## Features
 + Character-level parser handling quoting, doubled-quote and custom
   escapes, embedded newlines, `\n` / `\r\n` / `\r` detection, trimming
   and blank-line suppression
 + Zero-copy row views over one pooled, reusable row buffer
 + Strict and lenient error policies with a structured bad-data callback
 + Column maps binding records by header name, explicit index or
   declaration order, with per-member and per-type custom converters
 + Culture-aware numbers, dates and times (`fr-FR` reads `12,5` and
   `31/12/2025`)
 + Cooperative-async readers and writers behind the `async` feature,
   cancellation-token aware

 ## Example

 ```rust
 use csvflow::{ColumnMap, CsvOptions, CsvReaderBuilder, CsvRecord};

 #[derive(Default, Debug)]
 struct Record {
     year: u16,
     make: String,
     model: String,
 }

 impl CsvRecord for Record {
     fn column_map() -> ColumnMap<Self> {
         ColumnMap::builder()
             .column("year", |r: &Record| r.year, |r, v| r.year = v)
             .column("make", |r: &Record| r.make.clone(), |r, v| r.make = v)
             .column("model", |r: &Record| r.model.clone(), |r, v| r.model = v)
             .build()
     }
 }

 fn main() -> Result<(), csvflow::CsvError> {
     let csv = "year,make,model\n1948,Porsche,356\n1967,Ford,Mustang\n";

     let mut reader = CsvReaderBuilder::new()
         .options(CsvOptions::builder().build()?)
         .from_reader(csv.as_bytes());

     while reader.read()? {
         let record: Record = reader.get_record()?;
         println!("{} {} {}", record.year, record.make, record.model);
     }
     Ok(())
 }
 ```
*/

/// Locale handles for numeric and date/time conversion.
pub mod culture;

/// Error types for codec operations.
pub mod error;

/// Character sources and sinks over byte streams.
pub mod io;

/// The character-level row parser.
pub mod parser;

/// The value-conversion layer.
pub mod convert;

/// Column maps and the per-instance map registry.
pub mod map;

/// Immutable codec configuration.
pub mod options;

/// Row and record readers.
pub mod reader;

/// Field and record writers.
pub mod writer;

mod pool;

#[doc(inline)]
pub use convert::{
    ConvertContext, ConverterRegistry, FromField, FromStrConverter, ToField, TypedConverter,
};
#[doc(inline)]
pub use culture::Culture;
#[doc(inline)]
pub use error::{CsvError, CsvResult};
#[doc(inline)]
pub use map::{ColumnBuilder, ColumnMap, ColumnMapBuilder, CsvRecord, MapRegistry, MemberMapping};
#[doc(inline)]
pub use options::{BadDataContext, BadDataHandler, CsvOptions, CsvOptionsBuilder, Mode, Trim};
#[doc(inline)]
pub use parser::{CsvParser, FieldToken, Row};
#[doc(inline)]
pub use reader::{CsvReader, CsvReaderBuilder, Header, RowMap};
#[doc(inline)]
pub use writer::{CsvWriter, CsvWriterBuilder};

#[cfg(feature = "async")]
#[doc(inline)]
pub use parser::CsvAsyncParser;
#[cfg(feature = "async")]
#[doc(inline)]
pub use reader::{CsvAsyncReader, CsvAsyncReaderBuilder};
#[cfg(feature = "async")]
#[doc(inline)]
pub use writer::{CsvAsyncWriter, CsvAsyncWriterBuilder};
