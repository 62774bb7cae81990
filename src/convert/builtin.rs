//! Built-in conversions for the scalar types the codec understands.

use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

use super::{ConvertContext, FromField, ToField};

impl FromField for String {
    fn from_field(field: &str, _ctx: &ConvertContext<'_>) -> Result<Self, String> {
        Ok(field.to_string())
    }
}

impl ToField for String {
    fn to_field(&self, _ctx: &ConvertContext<'_>) -> Result<String, String> {
        Ok(self.clone())
    }
}

impl ToField for &str {
    fn to_field(&self, _ctx: &ConvertContext<'_>) -> Result<String, String> {
        Ok((*self).to_string())
    }
}

impl FromField for bool {
    fn from_field(field: &str, _ctx: &ConvertContext<'_>) -> Result<Self, String> {
        let trimmed = field.trim();
        if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
            Ok(false)
        } else {
            Err(format!("'{trimmed}' is not a valid boolean"))
        }
    }
}

impl ToField for bool {
    fn to_field(&self, _ctx: &ConvertContext<'_>) -> Result<String, String> {
        Ok(if *self { "true" } else { "false" }.to_string())
    }
}

macro_rules! integer_field {
    ($($ty:ty),+) => {
        $(
            impl FromField for $ty {
                fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String> {
                    ctx.culture.parse_integer(field)
                }
            }

            impl ToField for $ty {
                fn to_field(&self, _ctx: &ConvertContext<'_>) -> Result<String, String> {
                    Ok(self.to_string())
                }
            }
        )+
    };
}

integer_field!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! float_field {
    ($($ty:ty),+) => {
        $(
            impl FromField for $ty {
                fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String> {
                    ctx.culture.parse_float(field)
                }
            }

            impl ToField for $ty {
                fn to_field(&self, ctx: &ConvertContext<'_>) -> Result<String, String> {
                    Ok(ctx.culture.localize_number(&self.to_string()))
                }
            }
        )+
    };
}

float_field!(f32, f64);

impl FromField for Decimal {
    fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String> {
        ctx.culture.parse_decimal(field)
    }
}

impl ToField for Decimal {
    fn to_field(&self, ctx: &ConvertContext<'_>) -> Result<String, String> {
        Ok(ctx.culture.localize_number(&self.to_string()))
    }
}

impl FromField for char {
    fn from_field(field: &str, _ctx: &ConvertContext<'_>) -> Result<Self, String> {
        let mut chars = field.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("'{field}' is not a single character")),
        }
    }
}

impl ToField for char {
    fn to_field(&self, _ctx: &ConvertContext<'_>) -> Result<String, String> {
        Ok(self.to_string())
    }
}

impl FromField for Date {
    fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String> {
        ctx.culture.parse_date(field)
    }
}

impl ToField for Date {
    fn to_field(&self, ctx: &ConvertContext<'_>) -> Result<String, String> {
        ctx.culture.format_date(self)
    }
}

impl FromField for Time {
    fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String> {
        ctx.culture.parse_time(field)
    }
}

impl ToField for Time {
    fn to_field(&self, ctx: &ConvertContext<'_>) -> Result<String, String> {
        ctx.culture.format_time(self)
    }
}

impl FromField for PrimitiveDateTime {
    fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String> {
        ctx.culture.parse_datetime(field)
    }
}

impl ToField for PrimitiveDateTime {
    fn to_field(&self, ctx: &ConvertContext<'_>) -> Result<String, String> {
        ctx.culture.format_datetime(self)
    }
}

impl FromField for Uuid {
    fn from_field(field: &str, _ctx: &ConvertContext<'_>) -> Result<Self, String> {
        let trimmed = field.trim();
        Uuid::try_parse(trimmed).map_err(|_| format!("'{trimmed}' is not a valid UUID"))
    }
}

impl ToField for Uuid {
    fn to_field(&self, _ctx: &ConvertContext<'_>) -> Result<String, String> {
        Ok(self.to_string())
    }
}

/// An empty slice is an absent value when the target is optional.
impl<T: FromField> FromField for Option<T> {
    fn from_field(field: &str, ctx: &ConvertContext<'_>) -> Result<Self, String> {
        if field.is_empty() {
            Ok(None)
        } else {
            T::from_field(field, ctx).map(Some)
        }
    }
}

impl<T: ToField> ToField for Option<T> {
    fn to_field(&self, ctx: &ConvertContext<'_>) -> Result<String, String> {
        match self {
            Some(value) => value.to_field(ctx),
            None => Ok(String::new()),
        }
    }
}
