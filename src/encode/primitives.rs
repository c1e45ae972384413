//! Scalar encoders.
//!
//! Integers wider than 32 bits are emitted as decimal strings so they
//! survive consumers that read every JSON number as a double.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{Encoder, ErasedEncoder};
use crate::shape::PrimitiveKind;
use crate::value::JsonValue;

pub fn string<V: JsonValue>() -> Encoder<String, V> {
    Encoder::new(|value: &String| V::from_string(value.clone()))
}

pub fn char<V: JsonValue>() -> Encoder<char, V> {
    Encoder::new(|value: &char| V::from_string(value.to_string()))
}

pub fn bool<V: JsonValue>() -> Encoder<bool, V> {
    Encoder::new(|value: &bool| V::from_bool(*value))
}

pub fn unit<V: JsonValue>() -> Encoder<(), V> {
    Encoder::new(|_: &()| V::null())
}

/// Non-finite values encode as null.
pub fn float<V: JsonValue>() -> Encoder<f64, V> {
    Encoder::new(|value: &f64| V::from_f64(*value))
}

pub fn float32<V: JsonValue>() -> Encoder<f32, V> {
    Encoder::new(|value: &f32| V::from_f64(f64::from(*value)))
}

pub fn decimal<V: JsonValue>() -> Encoder<Decimal, V> {
    Encoder::new(|value: &Decimal| V::from_string(value.to_string()))
}

pub fn uuid<V: JsonValue>() -> Encoder<Uuid, V> {
    Encoder::new(|value: &Uuid| V::from_string(value.to_string()))
}

/// RFC 3339 with a `Z` suffix and only as many fractional digits as needed.
pub fn datetime<V: JsonValue>() -> Encoder<DateTime<Utc>, V> {
    Encoder::new(|value: &DateTime<Utc>| {
        V::from_string(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    })
}

macro_rules! number_encoders {
    ($($name:ident: $ty:ty => $ctor:ident as $wide:ty;)+) => {
        $(
            pub fn $name<V: JsonValue>() -> Encoder<$ty, V> {
                Encoder::new(|value: &$ty| V::$ctor(<$wide>::from(*value)))
            }
        )+
    };
}

macro_rules! string_encoders {
    ($($name:ident: $ty:ty;)+) => {
        $(
            pub fn $name<V: JsonValue>() -> Encoder<$ty, V> {
                Encoder::new(|value: &$ty| V::from_string(value.to_string()))
            }
        )+
    };
}

number_encoders! {
    int: i32 => from_i64 as i64;
    i8: i8 => from_i64 as i64;
    i16: i16 => from_i64 as i64;
    u8: u8 => from_u64 as u64;
    u16: u16 => from_u64 as u64;
    u32: u32 => from_u64 as u64;
}

string_encoders! {
    i64: i64;
    i128: i128;
    isize: isize;
    u64: u64;
    u128: u128;
    usize: usize;
}

/// The built-in encoder for a primitive kind, in erased form.
pub(crate) fn primitive_encoder<V: JsonValue>(kind: PrimitiveKind) -> ErasedEncoder<V> {
    match kind {
        PrimitiveKind::Unit => unit().erase(),
        PrimitiveKind::Bool => bool().erase(),
        PrimitiveKind::Char => char().erase(),
        PrimitiveKind::String => string().erase(),
        PrimitiveKind::I8 => i8().erase(),
        PrimitiveKind::I16 => i16().erase(),
        PrimitiveKind::I32 => int().erase(),
        PrimitiveKind::I64 => i64().erase(),
        PrimitiveKind::I128 => i128().erase(),
        PrimitiveKind::Isize => isize().erase(),
        PrimitiveKind::U8 => u8().erase(),
        PrimitiveKind::U16 => u16().erase(),
        PrimitiveKind::U32 => u32().erase(),
        PrimitiveKind::U64 => u64().erase(),
        PrimitiveKind::U128 => u128().erase(),
        PrimitiveKind::Usize => usize().erase(),
        PrimitiveKind::F32 => float32().erase(),
        PrimitiveKind::F64 => float().erase(),
        PrimitiveKind::Decimal => decimal().erase(),
        PrimitiveKind::Uuid => uuid().erase(),
        PrimitiveKind::DateTime => datetime().erase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use std::str::FromStr;

    #[test]
    fn test_small_integers_are_numbers() {
        assert_eq!(int::<Value>().encode(&-7), json!(-7));
        assert_eq!(u32::<Value>().encode(&u32::MAX), json!(4294967295u64));
    }

    #[test]
    fn test_wide_integers_are_strings() {
        assert_eq!(i64::<Value>().encode(&9_007_199_254_740_993), json!("9007199254740993"));
        assert_eq!(u128::<Value>().encode(&u128::MAX), json!(u128::MAX.to_string()));
        assert_eq!(usize::<Value>().encode(&3), json!("3"));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(float::<Value>().encode(&f64::NAN), json!(null));
        assert_eq!(float::<Value>().encode(&1.5), json!(1.5));
    }

    #[test]
    fn test_datetime_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(datetime::<Value>().encode(&at), json!("2024-03-01T10:00:00Z"));
    }

    #[test]
    fn test_decimal_and_uuid_are_strings() {
        let price = Decimal::from_str("19.90").unwrap();
        assert_eq!(decimal::<Value>().encode(&price), json!("19.90"));

        let id = Uuid::nil();
        assert_eq!(
            uuid::<Value>().encode(&id),
            json!("00000000-0000-0000-0000-000000000000")
        );
    }

    #[test]
    fn test_primitive_registry_dispatch() {
        let encoder = primitive_encoder::<Value>(PrimitiveKind::I64);
        assert_eq!(encoder(&42i64), json!("42"));
        assert_eq!(encoder(&42i32), json!(null));
    }
}
