//! Column maps: the metadata binding record fields to CSV columns.
//!
//! A [`ColumnMap`] is built once per record type — normally inside
//! [`CsvRecord::column_map`] through the fluent [`ColumnMapBuilder`] — and
//! cached by the [`MapRegistry`] each reader and writer owns. Mappings
//! carry precomputed, type-erased accessor closures, so the per-row hot
//! path never inspects types.
//!
//! # Examples
//!
//! ```
//! use csvflow::{ColumnMap, CsvRecord};
//!
//! #[derive(Default)]
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
//! let map = Car::column_map();
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.mappings()[0].name(), "year");
//! ```

mod builder;
mod registry;

pub use builder::{ColumnBuilder, ColumnMapBuilder};
pub use registry::MapRegistry;

use crate::convert::{ConvertContext, ConverterRegistry};

/// A record type with a declared column map.
///
/// This is the codec's substitute for attribute-discovered mappings:
/// implement it once per record type, or override the declaration at
/// runtime with [`MapRegistry::register`].
pub trait CsvRecord: Sized + 'static {
    /// Declares how this type's fields bind to CSV columns.
    fn column_map() -> ColumnMap<Self>;
}

pub(crate) type ParseFn<T> = Box<
    dyn Fn(&mut T, &str, &ConvertContext<'_>, &ConverterRegistry) -> Result<(), String>
        + Send
        + Sync,
>;
pub(crate) type FormatFn<T> =
    Box<dyn Fn(&T, &ConvertContext<'_>, &ConverterRegistry) -> Result<String, String> + Send + Sync>;

/// One record member bound to one CSV column.
pub struct MemberMapping<T> {
    name: String,
    index: Option<usize>,
    ignore: bool,
    parse: Option<ParseFn<T>>,
    format: Option<FormatFn<T>>,
}

impl<T> MemberMapping<T> {
    pub(crate) fn new(
        name: String,
        index: Option<usize>,
        ignore: bool,
        parse: Option<ParseFn<T>>,
        format: Option<FormatFn<T>>,
    ) -> Self {
        Self {
            name,
            index,
            ignore,
            parse,
            format,
        }
    }

    /// The column header this member binds to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit column position, when one was declared.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Ignored members take part in neither reading nor writing.
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// Parses `field` and stores the result in `record`.
    pub(crate) fn parse_into(
        &self,
        record: &mut T,
        field: &str,
        ctx: &ConvertContext<'_>,
        registry: &ConverterRegistry,
    ) -> Result<(), String> {
        match &self.parse {
            Some(parse) => parse(record, field, ctx, registry),
            None => Ok(()),
        }
    }

    /// Reads the member from `record` and formats it to field text.
    pub(crate) fn format_from(
        &self,
        record: &T,
        ctx: &ConvertContext<'_>,
        registry: &ConverterRegistry,
    ) -> Result<String, String> {
        match &self.format {
            Some(format) => format(record, ctx, registry),
            None => Ok(String::new()),
        }
    }
}

/// The ordered collection of member mappings for one record type.
pub struct ColumnMap<T> {
    mappings: Vec<MemberMapping<T>>,
}

impl<T: 'static> ColumnMap<T> {
    /// Starts a fluent map declaration.
    pub fn builder() -> ColumnMapBuilder<T> {
        ColumnMapBuilder::new()
    }

    pub(crate) fn from_mappings(mappings: Vec<MemberMapping<T>>) -> Self {
        Self { mappings }
    }

    /// The mappings in declaration order.
    pub fn mappings(&self) -> &[MemberMapping<T>] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
