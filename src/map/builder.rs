use std::sync::Arc;

use crate::convert::{self, ConvertContext, ConverterRegistry, FromField, ToField, TypedConverter};

use super::{ColumnMap, FormatFn, MemberMapping, ParseFn};

/// Fluent builder for a [`ColumnMap`].
///
/// Each [`ColumnMapBuilder::column`] call opens a [`ColumnBuilder`] for
/// one member; chaining another `column` (or `build`) commits it. Members
/// bind in declaration order, which doubles as the fallback column index
/// when neither an explicit index nor a header match applies.
pub struct ColumnMapBuilder<T> {
    mappings: Vec<MemberMapping<T>>,
}

impl<T: 'static> Default for ColumnMapBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ColumnMapBuilder<T> {
    pub fn new() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }

    /// Opens a mapping for one member. `getter` reads the value out of a
    /// record (cloning if needed); `setter` stores a parsed value.
    pub fn column<V, G, S>(self, name: &str, getter: G, setter: S) -> ColumnBuilder<T, V>
    where
        V: FromField + ToField + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        ColumnBuilder {
            parent: self,
            name: name.to_string(),
            index: None,
            ignore: false,
            converter: None,
            getter: Arc::new(getter),
            setter: Arc::new(setter),
        }
    }

    /// Freezes the declaration.
    ///
    /// # Panics
    ///
    /// Panics when two mappings share a column name; a member may be
    /// mapped at most once.
    pub fn build(self) -> ColumnMap<T> {
        for (i, mapping) in self.mappings.iter().enumerate() {
            if self.mappings[..i].iter().any(|m| m.name() == mapping.name()) {
                panic!("column '{}' is mapped twice", mapping.name());
            }
        }
        ColumnMap::from_mappings(self.mappings)
    }
}

/// Configures one member mapping before it is committed to the map.
pub struct ColumnBuilder<T, V> {
    parent: ColumnMapBuilder<T>,
    name: String,
    index: Option<usize>,
    ignore: bool,
    converter: Option<Arc<dyn TypedConverter<V>>>,
    getter: Arc<dyn Fn(&T) -> V + Send + Sync>,
    setter: Arc<dyn Fn(&mut T, V) + Send + Sync>,
}

impl<T: 'static, V: FromField + ToField + 'static> ColumnBuilder<T, V> {
    /// Binds the member to an explicit column position instead of a header
    /// lookup.
    pub fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Uses `converter` for this member only, overriding both the per-type
    /// registry and the built-in conversion.
    pub fn converter(mut self, converter: impl TypedConverter<V> + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Excludes the member from reading and writing. Its accessors are
    /// discarded.
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Commits this member and opens the next one.
    pub fn column<V2, G, S>(self, name: &str, getter: G, setter: S) -> ColumnBuilder<T, V2>
    where
        V2: FromField + ToField + 'static,
        G: Fn(&T) -> V2 + Send + Sync + 'static,
        S: Fn(&mut T, V2) + Send + Sync + 'static,
    {
        self.commit().column(name, getter, setter)
    }

    /// Commits this member and freezes the map.
    pub fn build(self) -> ColumnMap<T> {
        self.commit().build()
    }

    fn commit(self) -> ColumnMapBuilder<T> {
        let ColumnBuilder {
            mut parent,
            name,
            index,
            ignore,
            converter,
            getter,
            setter,
        } = self;

        let (parse, format) = if ignore {
            (None, None)
        } else {
            let parse_converter = converter.clone();
            let parse: ParseFn<T> = Box::new(
                move |record: &mut T,
                      field: &str,
                      ctx: &ConvertContext<'_>,
                      registry: &ConverterRegistry| {
                    let value = match &parse_converter {
                        Some(c) => c.parse(field, ctx)?,
                        None => convert::parse_field::<V>(field, ctx, registry)?,
                    };
                    (setter.as_ref())(record, value);
                    Ok(())
                },
            );
            let format: FormatFn<T> = Box::new(
                move |record: &T, ctx: &ConvertContext<'_>, registry: &ConverterRegistry| {
                    let value = (getter.as_ref())(record);
                    match &converter {
                        Some(c) => c.format(&value, ctx),
                        None => convert::format_field::<V>(&value, ctx, registry),
                    }
                },
            );
            (Some(parse), Some(format))
        };

        parent
            .mappings
            .push(MemberMapping::new(name, index, ignore, parse, format));
        parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::Culture;

    #[derive(Default, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
        label: String,
    }

    fn point_map() -> ColumnMap<Point> {
        ColumnMap::builder()
            .column("x", |p: &Point| p.x, |p, v| p.x = v)
            .column("y", |p: &Point| p.y, |p, v| p.y = v)
            .column("label", |p: &Point| p.label.clone(), |p, v| p.label = v)
            .build()
    }

    #[test]
    fn declaration_order_is_preserved() {
        let map = point_map();
        let names: Vec<_> = map.mappings().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["x", "y", "label"]);
    }

    #[test]
    fn parse_into_stores_the_value() {
        let map = point_map();
        let culture = Culture::invariant();
        let ctx = ConvertContext::standalone(&culture);
        let registry = ConverterRegistry::new();

        let mut point = Point::default();
        map.mappings()[0]
            .parse_into(&mut point, "4", &ctx, &registry)
            .unwrap();
        map.mappings()[2]
            .parse_into(&mut point, "origin", &ctx, &registry)
            .unwrap();
        assert_eq!(point.x, 4);
        assert_eq!(point.label, "origin");
    }

    #[test]
    fn format_from_reads_the_value() {
        let map = point_map();
        let culture = Culture::invariant();
        let ctx = ConvertContext::standalone(&culture);
        let registry = ConverterRegistry::new();

        let point = Point {
            x: 1,
            y: -2,
            label: "p".into(),
        };
        assert_eq!(
            map.mappings()[1]
                .format_from(&point, &ctx, &registry)
                .unwrap(),
            "-2"
        );
    }

    #[test]
    fn member_converter_overrides_builtin() {
        struct Doubler;
        impl TypedConverter<i32> for Doubler {
            fn parse(&self, field: &str, _ctx: &ConvertContext<'_>) -> Result<i32, String> {
                field.trim().parse::<i32>().map(|v| v * 2).map_err(|e| e.to_string())
            }
            fn format(&self, value: &i32, _ctx: &ConvertContext<'_>) -> Result<String, String> {
                Ok((value / 2).to_string())
            }
        }

        let map = ColumnMap::builder()
            .column("x", |p: &Point| p.x, |p, v| p.x = v)
            .converter(Doubler)
            .build();

        let culture = Culture::invariant();
        let ctx = ConvertContext::standalone(&culture);
        let registry = ConverterRegistry::new();
        let mut point = Point::default();
        map.mappings()[0]
            .parse_into(&mut point, "21", &ctx, &registry)
            .unwrap();
        assert_eq!(point.x, 42);
        assert_eq!(
            map.mappings()[0]
                .format_from(&point, &ctx, &registry)
                .unwrap(),
            "21"
        );
    }

    #[test]
    fn ignored_member_has_no_accessors() {
        let map = ColumnMap::builder()
            .column("x", |p: &Point| p.x, |p, v| p.x = v)
            .column("label", |p: &Point| p.label.clone(), |p, v| p.label = v)
            .ignore()
            .build();

        assert!(map.mappings()[1].is_ignored());
        let culture = Culture::invariant();
        let ctx = ConvertContext::standalone(&culture);
        let registry = ConverterRegistry::new();
        let mut point = Point::default();
        // A parse on an ignored mapping is a no-op rather than a panic.
        map.mappings()[1]
            .parse_into(&mut point, "junk", &ctx, &registry)
            .unwrap();
        assert_eq!(point.label, "");
    }

    #[test]
    #[should_panic(expected = "mapped twice")]
    fn duplicate_names_panic() {
        let _ = ColumnMap::builder()
            .column("x", |p: &Point| p.x, |p, v| p.x = v)
            .column("x", |p: &Point| p.y, |p, v| p.y = v)
            .build();
    }

    #[test]
    fn explicit_index_is_recorded() {
        let map = ColumnMap::builder()
            .column("x", |p: &Point| p.x, |p, v| p.x = v)
            .index(3)
            .build();
        assert_eq!(map.mappings()[0].index(), Some(3));
    }
}
