//! The value-conversion layer.
//!
//! Field slices become typed values through a fixed resolution order: the
//! member's own converter (from the column map), then a per-type converter
//! registered in the options, then the built-in [`FromField`]
//! implementations. Formatting mirrors the same chain through [`ToField`].
//! Every call receives a [`ConvertContext`] carrying the culture and the
//! position being converted.

mod builtin;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::culture::Culture;

/// Position and culture handed to every convert/format call.
#[derive(Debug)]
pub struct ConvertContext<'a> {
    /// The locale handle controlling numeric and date/time rules.
    pub culture: &'a Culture,
    /// 0-based index of the row being converted.
    pub row_index: u64,
    /// 0-based index of the field within the row.
    pub field_index: usize,
    /// The bound column's header name, when one is known.
    pub column_name: Option<&'a str>,
}

impl<'a> ConvertContext<'a> {
    /// A context for ad-hoc conversion outside a reader, positioned at
    /// row 0, field 0.
    pub fn standalone(culture: &'a Culture) -> Self {
        Self {
            culture,
            row_index: 0,
            field_index: 0,
            column_name: None,
        }
    }
}

/// Parses field slices into built-in values. Implemented for the scalar
/// types the codec understands natively; implement it (or register a
/// [`TypedConverter`]) to support further types.
pub trait FromField: Sized {
    /// Parses `field` using the context's culture. The error is a bare
    /// message; the reader attaches row/field position.
    fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String>;
}

/// Formats values back into field text. `None` formats to the empty
/// string.
pub trait ToField {
    /// Formats the value using the context's culture.
    fn to_field(&self, ctx: &ConvertContext<'_>) -> Result<String, String>;
}

/// A custom two-way converter for values of type `V`.
///
/// Register one per type on the options builder, or per column on the map
/// builder; either placement overrides the built-in conversion.
pub trait TypedConverter<V>: Send + Sync {
    /// Parses a field slice into a `V`.
    fn parse(&self, field: &str, ctx: &ConvertContext<'_>) -> Result<V, String>;

    /// Formats a `V` into field text.
    fn format(&self, value: &V, ctx: &ConvertContext<'_>) -> Result<String, String>;
}

/// Type-keyed store of custom converters, shared by clone.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `converter` for every field targeting `V`, replacing any
    /// previous registration for that type.
    pub fn register<V: 'static>(&mut self, converter: impl TypedConverter<V> + 'static) {
        let entry: Arc<dyn TypedConverter<V>> = Arc::new(converter);
        self.converters.insert(TypeId::of::<V>(), Arc::new(entry));
    }

    /// Looks up the converter registered for `V`.
    pub fn get<V: 'static>(&self) -> Option<Arc<dyn TypedConverter<V>>> {
        self.converters
            .get(&TypeId::of::<V>())
            .and_then(|any| any.downcast_ref::<Arc<dyn TypedConverter<V>>>())
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }
}

/// Resolves the per-type converter, falling back to the built-in table.
pub(crate) fn parse_field<V: FromField + 'static>(
    field: &str,
    ctx: &ConvertContext<'_>,
    registry: &ConverterRegistry,
) -> Result<V, String> {
    match registry.get::<V>() {
        Some(converter) => converter.parse(field, ctx),
        None => V::from_field(field, ctx),
    }
}

/// Format-side mirror of [`parse_field`].
pub(crate) fn format_field<V: ToField + 'static>(
    value: &V,
    ctx: &ConvertContext<'_>,
    registry: &ConverterRegistry,
) -> Result<String, String> {
    match registry.get::<V>() {
        Some(converter) => converter.format(value, ctx),
        None => value.to_field(ctx),
    }
}

/// Stock converter for any `FromStr + Display` type: the generic
/// change-type fallback for user types without a dedicated converter.
///
/// # Examples
///
/// ```
/// use csvflow::{ConvertContext, Culture, FromStrConverter, TypedConverter};
/// use std::net::IpAddr;
///
/// let culture = Culture::invariant();
/// let ctx = ConvertContext::standalone(&culture);
/// let converter = FromStrConverter::<IpAddr>::new();
/// let ip = converter.parse("127.0.0.1", &ctx).unwrap();
/// assert_eq!(converter.format(&ip, &ctx).unwrap(), "127.0.0.1");
/// ```
pub struct FromStrConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConverter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypedConverter<T> for FromStrConverter<T>
where
    T: std::str::FromStr + std::fmt::Display + 'static,
{
    fn parse(&self, field: &str, _ctx: &ConvertContext<'_>) -> Result<T, String> {
        let trimmed = field.trim();
        trimmed.parse::<T>().map_err(|_| {
            format!(
                "'{trimmed}' is not a valid {}",
                std::any::type_name::<T>()
            )
        })
    }

    fn format(&self, value: &T, _ctx: &ConvertContext<'_>) -> Result<String, String> {
        Ok(value.to_string())
    }
}

/// Implements [`FromField`]/[`ToField`] for a fieldless enum with
/// case-insensitive name matching.
///
/// # Examples
///
/// ```
/// use csvflow::{csv_enum, ConvertContext, Culture, FromField, ToField};
///
/// #[derive(Debug, PartialEq)]
/// enum Status {
///     Active,
///     Retired,
/// }
/// csv_enum!(Status { Active, Retired });
///
/// let culture = Culture::invariant();
/// let ctx = ConvertContext::standalone(&culture);
/// assert_eq!(Status::from_field("retired", &ctx).unwrap(), Status::Retired);
/// assert_eq!(Status::Active.to_field(&ctx).unwrap(), "Active");
/// ```
#[macro_export]
macro_rules! csv_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::FromField for $ty {
            fn from_field(
                field: &str,
                _ctx: &$crate::ConvertContext<'_>,
            ) -> ::std::result::Result<Self, ::std::string::String> {
                let trimmed = field.trim();
                $(
                    if trimmed.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(format!(
                    "'{}' is not a valid {}",
                    trimmed,
                    stringify!($ty)
                ))
            }
        }

        impl $crate::ToField for $ty {
            fn to_field(
                &self,
                _ctx: &$crate::ConvertContext<'_>,
            ) -> ::std::result::Result<::std::string::String, ::std::string::String> {
                match self {
                    $( $ty::$variant => Ok(stringify!($variant).to_string()), )+
                }
            }
        }
    };
}
