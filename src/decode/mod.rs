//! Decoder combinators.
//!
//! A [`Decoder`] turns a JSON value into a typed result or a path-qualified
//! [`DecoderError`]. Decoders are cheap to clone and safe to share between
//! threads; composite decoders are built from smaller ones with the
//! combinators in this module.
//!
//! Wherever a combinator descends into a child value, any error the child
//! produces is prefixed with the segment it descended through (`.name` for a
//! field, `.[i]` for an index).
//!
//! # Example
//!
//! ```rust
//! use shapecodec::decode::{self, field, map2};
//! use serde_json::json;
//!
//! let point = map2(
//!     |x, y| (x, y),
//!     field("x", decode::int()),
//!     field("y", decode::int()),
//! );
//!
//! assert_eq!(point.decode(&json!({"x": 1, "y": 2})).unwrap(), (1, 2));
//!
//! let error = point.decode(&json!({"x": 1, "y": "two"})).unwrap_err();
//! assert_eq!(error.path.to_string(), ".y");
//! ```

mod collections;
mod primitives;

use std::any::type_name;
use std::sync::Arc;

use crate::error::{DecoderError, FromStrError};
use crate::shape::Boxed;
use crate::value::JsonValue;
use crate::DecodeResult;

pub use collections::{
    all, array, dict, key_value_pairs, list, option, tuple2, tuple3, tuple4, tuple5, tuple6,
    tuple7, tuple8,
};
pub use primitives::{
    bool, char, datetime, decimal, float, float32, i128, i16, i64, i8, int, isize, string, u128,
    u16, u32, u64, u8, unit, usize, uuid,
};

pub(crate) use primitives::primitive_decoder;

/// A type-erased decoder producing a boxed value.
pub(crate) type ErasedDecoder<V> =
    Arc<dyn Fn(&V) -> Result<Boxed, DecoderError<V>> + Send + Sync>;

type DecodeFn<T, V> = dyn Fn(&V) -> DecodeResult<T, V> + Send + Sync;

/// A decoder from JSON values of type `V` to `T`.
pub struct Decoder<T, V = serde_json::Value> {
    run: Arc<DecodeFn<T, V>>,
}

impl<T, V> Clone for Decoder<T, V> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T: 'static, V: JsonValue> Decoder<T, V> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&V) -> DecodeResult<T, V> + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    pub fn decode(&self, value: &V) -> DecodeResult<T, V> {
        (self.run)(value)
    }

    /// Parses `text` as JSON and decodes the result.
    pub fn decode_str(&self, text: &str) -> Result<T, FromStrError<V>> {
        let value = V::parse(text).map_err(FromStrError::InvalidJson)?;
        Ok(self.decode(&value)?)
    }

    /// Transforms a successful result.
    pub fn map<U, F>(self, f: F) -> Decoder<U, V>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Decoder::new(move |value: &V| self.decode(value).map(&f))
    }

    /// Chooses the next decoder from this one's result. The next decoder
    /// runs against the same input value.
    pub fn and_then<U, F>(self, f: F) -> Decoder<U, V>
    where
        U: 'static,
        F: Fn(T) -> Decoder<U, V> + Send + Sync + 'static,
    {
        Decoder::new(move |value: &V| {
            let first = self.decode(value)?;
            f(first).decode(value)
        })
    }

    pub(crate) fn erase(self) -> ErasedDecoder<V> {
        Arc::new(move |value: &V| self.decode(value).map(|v| Box::new(v) as Boxed))
    }

    pub(crate) fn from_erased(erased: ErasedDecoder<V>) -> Self {
        Decoder::new(move |value: &V| {
            erased(value)?.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
                DecoderError::fail(format!("decoded value is not a `{}`", type_name::<T>()))
            })
        })
    }
}

/// Always succeeds with `output`, ignoring the input.
pub fn succeed<T, V>(output: T) -> Decoder<T, V>
where
    T: Clone + Send + Sync + 'static,
    V: JsonValue,
{
    Decoder::new(move |_: &V| Ok(output.clone()))
}

/// Always fails with `message`.
pub fn fail<T: 'static, V: JsonValue>(message: impl Into<String>) -> Decoder<T, V> {
    let message = message.into();
    Decoder::new(move |_: &V| Err(DecoderError::fail(message.clone())))
}

/// Succeeds with `output` when the input is null.
pub fn nil<T, V>(output: T) -> Decoder<T, V>
where
    T: Clone + Send + Sync + 'static,
    V: JsonValue,
{
    Decoder::new(move |value: &V| {
        if value.is_null() {
            Ok(output.clone())
        } else {
            Err(DecoderError::bad_primitive("null", value))
        }
    })
}

/// Returns the input value unchanged.
pub fn value<V: JsonValue>() -> Decoder<V, V> {
    Decoder::new(|value: &V| Ok(value.clone()))
}

/// Decodes the field `name` of an object.
pub fn field<T: 'static, V: JsonValue>(
    name: impl Into<String>,
    decoder: Decoder<T, V>,
) -> Decoder<T, V> {
    let name = name.into();
    Decoder::new(move |value: &V| {
        if !value.is_object() {
            return Err(DecoderError::bad_type("an object", value));
        }
        match value.get_field(&name) {
            Some(inner) if !inner.is_undefined() => decoder
                .decode(inner)
                .map_err(|e| e.prepend_field(name.as_str())),
            _ => Err(DecoderError::bad_field(
                format!("an object with a field named `{}`", name),
                value,
            )),
        }
    })
}

/// Decodes the field `name` if present.
///
/// Yields `None` when the field is missing, or when it holds null and
/// `decoder` rejects null.
pub fn optional<T: 'static, V: JsonValue>(
    name: impl Into<String>,
    decoder: Decoder<T, V>,
) -> Decoder<Option<T>, V> {
    let name = name.into();
    Decoder::new(move |value: &V| {
        if !value.is_object() {
            return Err(DecoderError::bad_type("an object", value));
        }
        match value.get_field(&name) {
            Some(inner) if !inner.is_undefined() => {
                decode_maybe_null(&decoder, inner).map_err(|e| e.prepend_field(name.as_str()))
            }
            _ => Ok(None),
        }
    })
}

/// Follows a chain of field names and decodes the value at the end.
pub fn at<T, V, S>(fields: impl IntoIterator<Item = S>, decoder: Decoder<T, V>) -> Decoder<T, V>
where
    T: 'static,
    V: JsonValue,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    Decoder::new(move |value: &V| {
        let mut current = value;
        for (depth, name) in fields.iter().enumerate() {
            if !current.is_object() {
                return Err(walked(DecoderError::bad_type("an object", current), &fields[..depth]));
            }
            match current.get_field(name) {
                Some(next) if !next.is_undefined() => current = next,
                _ => {
                    let error = DecoderError::bad_path(
                        format!("an object with path `{}`", fields.join(".")),
                        value,
                        name.as_str(),
                    );
                    return Err(walked(error, &fields[..depth]));
                }
            }
        }
        decoder.decode(current).map_err(|e| walked(e, &fields))
    })
}

/// Like [`at`], but yields `None` when any field along the way is missing
/// or null.
pub fn optional_at<T, V, S>(
    fields: impl IntoIterator<Item = S>,
    decoder: Decoder<T, V>,
) -> Decoder<Option<T>, V>
where
    T: 'static,
    V: JsonValue,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    Decoder::new(move |value: &V| {
        let mut current = value;
        for (depth, name) in fields.iter().enumerate() {
            if current.is_null() {
                return Ok(None);
            }
            if !current.is_object() {
                return Err(walked(DecoderError::bad_type("an object", current), &fields[..depth]));
            }
            match current.get_field(name) {
                Some(next) if !next.is_undefined() => current = next,
                _ => return Ok(None),
            }
        }
        decode_maybe_null(&decoder, current).map_err(|e| walked(e, &fields))
    })
}

/// Decodes element `index` of an array.
pub fn index<T: 'static, V: JsonValue>(index: usize, decoder: Decoder<T, V>) -> Decoder<T, V> {
    Decoder::new(move |value: &V| decode_index(value, index, |item| decoder.decode(item)))
}

/// Tries each decoder in order and returns the first success.
///
/// When every decoder fails, the result is a `BadOneOf` error holding each
/// failure in the order tried. An empty list always fails.
pub fn one_of<T: 'static, V: JsonValue>(decoders: Vec<Decoder<T, V>>) -> Decoder<T, V> {
    Decoder::new(move |value: &V| {
        let mut errors = Vec::with_capacity(decoders.len());
        for decoder in &decoders {
            match decoder.decode(value) {
                Ok(decoded) => return Ok(decoded),
                Err(error) => errors.push(error),
            }
        }
        Err(DecoderError::one_of(errors))
    })
}

/// Free-function form of [`Decoder::and_then`].
pub fn and_then<T, U, V, F>(f: F, decoder: Decoder<T, V>) -> Decoder<U, V>
where
    T: 'static,
    U: 'static,
    V: JsonValue,
    F: Fn(T) -> Decoder<U, V> + Send + Sync + 'static,
{
    decoder.and_then(f)
}

fn decode_maybe_null<T: 'static, V: JsonValue>(
    decoder: &Decoder<T, V>,
    value: &V,
) -> DecodeResult<Option<T>, V> {
    match decoder.decode(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(_) if value.is_null() => Ok(None),
        Err(error) => Err(error),
    }
}

fn walked<V: JsonValue>(error: DecoderError<V>, fields: &[String]) -> DecoderError<V> {
    fields
        .iter()
        .rev()
        .fold(error, |error, name| error.prepend_field(name.as_str()))
}

/// Runs `decode` on element `index` of `value`, prefixing any failure with
/// `.[index]`.
pub(crate) fn decode_index<T, V, F>(value: &V, index: usize, decode: F) -> DecodeResult<T, V>
where
    V: JsonValue,
    F: FnOnce(&V) -> DecodeResult<T, V>,
{
    let result = match value.as_array() {
        Some(items) => match items.get(index) {
            Some(item) => decode(item),
            None => Err(DecoderError::too_small_array(
                format!(
                    "a longer array. Need index `{}` but there are only `{}` entries",
                    index,
                    items.len()
                ),
                value,
            )),
        },
        None => Err(DecoderError::bad_primitive("an array", value)),
    };
    result.map_err(|e| e.prepend_index(index))
}

macro_rules! map_decoder {
    ($(#[$meta:meta])* $name:ident; $($d:ident $T:ident),+) => {
        $(#[$meta])*
        pub fn $name<$($T: 'static,)+ R: 'static, V: JsonValue, F>(
            ctor: F,
            $($d: Decoder<$T, V>,)+
        ) -> Decoder<R, V>
        where
            F: Fn($($T),+) -> R + Send + Sync + 'static,
        {
            Decoder::new(move |value: &V| {
                $(let $d = $d.decode(value);)+
                Ok(ctor($($d?),+))
            })
        }
    };
}

map_decoder!(
    /// Applies `ctor` to the result of one decoder.
    map; d1 A
);
map_decoder!(
    /// Runs two decoders on the same input and combines their results with
    /// `ctor`. Every decoder runs; the first failure in argument order is
    /// reported.
    map2; d1 A, d2 B
);
map_decoder!(
    /// Three-decoder form of [`map2`].
    map3; d1 A, d2 B, d3 C
);
map_decoder!(
    /// Four-decoder form of [`map2`].
    map4; d1 A, d2 B, d3 C, d4 D
);
map_decoder!(map5; d1 A, d2 B, d3 C, d4 D, d5 E);
map_decoder!(map6; d1 A, d2 B, d3 C, d4 D, d5 E, d6 G);
map_decoder!(map7; d1 A, d2 B, d3 C, d4 D, d5 E, d6 G, d7 H);
map_decoder!(map8; d1 A, d2 B, d3 C, d4 D, d5 E, d6 G, d7 H, d8 I);

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Decoder<String>>();
    assert_sync::<Decoder<String>>();
};
