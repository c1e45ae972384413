//! Scalar decoders.
//!
//! Integer decoders accept JSON numbers with an integral value and strings
//! holding a decimal integer; the 64-bit and wider types are encoded as
//! strings, so both forms must round-trip.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{Decoder, ErasedDecoder};
use crate::error::DecoderError;
use crate::shape::PrimitiveKind;
use crate::value::JsonValue;

/// Any JSON string.
pub fn string<V: JsonValue>() -> Decoder<String, V> {
    Decoder::new(|value: &V| {
        value
            .as_string()
            .map(str::to_owned)
            .ok_or_else(|| DecoderError::bad_primitive("a string", value))
    })
}

/// A string of exactly one character.
pub fn char<V: JsonValue>() -> Decoder<char, V> {
    Decoder::new(|value: &V| {
        let first_two = value.as_string().map(|text| {
            let mut chars = text.chars();
            (chars.next(), chars.next())
        });
        match first_two {
            Some((Some(c), None)) => Ok(c),
            _ => Err(DecoderError::bad_primitive("a single character string", value)),
        }
    })
}

/// `true` or `false`; other values are a `BadPrimitive` for `a boolean`.
pub fn bool<V: JsonValue>() -> Decoder<bool, V> {
    Decoder::new(|value: &V| {
        value
            .as_bool()
            .ok_or_else(|| DecoderError::bad_primitive("a boolean", value))
    })
}

/// Succeeds with `()` on null.
pub fn unit<V: JsonValue>() -> Decoder<(), V> {
    Decoder::new(|value: &V| {
        if value.is_null() {
            Ok(())
        } else {
            Err(DecoderError::bad_primitive("null", value))
        }
    })
}

/// Any JSON number as an `f64`.
pub fn float<V: JsonValue>() -> Decoder<f64, V> {
    Decoder::new(|value: &V| {
        value
            .as_float()
            .ok_or_else(|| DecoderError::bad_primitive("a float", value))
    })
}

/// Any JSON number as an `f32`.
pub fn float32<V: JsonValue>() -> Decoder<f32, V> {
    Decoder::new(|value: &V| {
        value
            .as_float32()
            .ok_or_else(|| DecoderError::bad_primitive("a float32", value))
    })
}

/// A decimal given as a JSON number or a numeric string.
pub fn decimal<V: JsonValue>() -> Decoder<Decimal, V> {
    Decoder::new(|value: &V| {
        let parsed = if let Some(text) = value.as_string() {
            Decimal::from_str(text).ok()
        } else if let Some(n) = value.as_int() {
            Some(Decimal::from(n))
        } else if let Some(n) = value.as_uint() {
            Some(Decimal::from(n))
        } else {
            value.as_float().and_then(|f| Decimal::try_from(f).ok())
        };
        parsed.ok_or_else(|| DecoderError::bad_primitive("a decimal", value))
    })
}

/// A GUID in any form `Uuid::parse_str` accepts.
pub fn uuid<V: JsonValue>() -> Decoder<Uuid, V> {
    Decoder::new(|value: &V| {
        value
            .as_string()
            .and_then(|text| Uuid::parse_str(text).ok())
            .ok_or_else(|| DecoderError::bad_primitive("a guid", value))
    })
}

/// An RFC 3339 timestamp, normalized to UTC.
pub fn datetime<V: JsonValue>() -> Decoder<DateTime<Utc>, V> {
    Decoder::new(|value: &V| {
        value
            .as_string()
            .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            .ok_or_else(|| DecoderError::bad_primitive("a datetime", value))
    })
}

fn integral<N, V>(expected: &'static str) -> Decoder<N, V>
where
    N: TryFrom<i64> + TryFrom<u64> + FromStr + Send + Sync + 'static,
    V: JsonValue,
{
    Decoder::new(move |value: &V| {
        if value.is_number() {
            if !value.is_integral() {
                return Err(DecoderError::bad_primitive_extra(
                    expected,
                    value,
                    "Value is not an integral value",
                ));
            }
            let converted = if let Some(n) = value.as_int() {
                <N as TryFrom<i64>>::try_from(n).ok()
            } else if let Some(n) = value.as_uint() {
                <N as TryFrom<u64>>::try_from(n).ok()
            } else {
                value.as_float().and_then(from_integral_float::<N>)
            };
            converted.ok_or_else(|| {
                DecoderError::bad_primitive_extra(
                    expected,
                    value,
                    format!("Value was either too large or too small for {}", expected),
                )
            })
        } else if let Some(text) = value.as_string() {
            text.trim()
                .parse::<N>()
                .map_err(|_| DecoderError::bad_primitive(expected, value))
        } else {
            Err(DecoderError::bad_primitive(expected, value))
        }
    })
}

fn from_integral_float<N>(f: f64) -> Option<N>
where
    N: TryFrom<i64> + TryFrom<u64>,
{
    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        <N as TryFrom<i64>>::try_from(f as i64).ok()
    } else if f >= 0.0 && f < u64::MAX as f64 {
        <N as TryFrom<u64>>::try_from(f as u64).ok()
    } else {
        None
    }
}

macro_rules! integer_decoders {
    ($($(#[$meta:meta])* $name:ident: $ty:ty => $expected:literal;)+) => {
        $(
            $(#[$meta])*
            pub fn $name<V: JsonValue>() -> Decoder<$ty, V> {
                integral($expected)
            }
        )+
    };
}

integer_decoders! {
    /// A 32-bit signed integer.
    int: i32 => "an int";
    /// An 8-bit signed integer.
    i8: i8 => "an int8";
    /// A 16-bit signed integer.
    i16: i16 => "an int16";
    /// A 64-bit signed integer, usually sent as a string.
    i64: i64 => "an int64";
    /// A 128-bit signed integer, usually sent as a string.
    i128: i128 => "an int128";
    /// A pointer-sized signed integer.
    isize: isize => "an isize";
    /// An 8-bit unsigned integer.
    u8: u8 => "an uint8";
    /// A 16-bit unsigned integer.
    u16: u16 => "an uint16";
    /// A 32-bit unsigned integer.
    u32: u32 => "an uint32";
    /// A 64-bit unsigned integer, usually sent as a string.
    u64: u64 => "an uint64";
    /// A 128-bit unsigned integer, usually sent as a string.
    u128: u128 => "an uint128";
    /// A pointer-sized unsigned integer.
    usize: usize => "an usize";
}

/// The built-in decoder for a primitive kind, in erased form.
pub(crate) fn primitive_decoder<V: JsonValue>(kind: PrimitiveKind) -> ErasedDecoder<V> {
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
