//! Encoders and JSON value builders.
//!
//! An [`Encoder`] is a total function from `T` to a JSON value. The free
//! functions [`object`] and [`array`] build values directly; the remaining
//! functions build encoders for containers from encoders of their elements.

mod primitives;

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::JsonValue;

pub use primitives::{
    bool, char, datetime, decimal, float, float32, i128, i16, i64, i8, int, isize, string, u128,
    u16, u32, u64, u8, unit, usize, uuid,
};

pub(crate) use primitives::primitive_encoder;

/// A type-erased encoder. Given a value of the wrong type it yields null.
pub(crate) type ErasedEncoder<V> = Arc<dyn Fn(&dyn Any) -> V + Send + Sync>;

/// An encoder from `T` to JSON values of type `V`.
pub struct Encoder<T, V = serde_json::Value> {
    run: Arc<dyn Fn(&T) -> V + Send + Sync>,
}

impl<T, V> Clone for Encoder<T, V> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T: 'static, V: JsonValue> Encoder<T, V> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    pub fn encode(&self, value: &T) -> V {
        (self.run)(value)
    }

    /// Encodes `value` and renders it as compact JSON text.
    pub fn encode_to_string(&self, value: &T) -> String
    where
        V: std::fmt::Display,
    {
        self.encode(value).to_string()
    }

    /// Builds an encoder for `U` by first projecting it to `T`.
    pub fn contramap<U, F>(self, f: F) -> Encoder<U, V>
    where
        U: 'static,
        F: Fn(&U) -> T + Send + Sync + 'static,
    {
        Encoder::new(move |value: &U| self.encode(&f(value)))
    }

    pub(crate) fn erase(self) -> ErasedEncoder<V> {
        Arc::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
            Some(typed) => self.encode(typed),
            None => V::null(),
        })
    }

    pub(crate) fn from_erased(erased: ErasedEncoder<V>) -> Self {
        Encoder::new(move |value: &T| erased(value))
    }
}

/// Builds a JSON object from key/value pairs, keeping their order.
pub fn object<K, V, I>(fields: I) -> V
where
    K: Into<String>,
    V: JsonValue,
    I: IntoIterator<Item = (K, V)>,
{
    V::from_object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
}

pub fn array<V: JsonValue>(items: impl IntoIterator<Item = V>) -> V {
    V::from_array(items.into_iter().collect())
}

pub fn null<V: JsonValue>() -> V {
    V::null()
}

pub fn list<T: 'static, V: JsonValue>(encoder: Encoder<T, V>) -> Encoder<Vec<T>, V> {
    Encoder::new(move |items: &Vec<T>| V::from_array(items.iter().map(|i| encoder.encode(i)).collect()))
}

/// `None` encodes as null.
pub fn option<T: 'static, V: JsonValue>(encoder: Encoder<T, V>) -> Encoder<Option<T>, V> {
    Encoder::new(move |value: &Option<T>| match value {
        Some(inner) => encoder.encode(inner),
        None => V::null(),
    })
}

pub fn dict<T: 'static, V: JsonValue>(encoder: Encoder<T, V>) -> Encoder<IndexMap<String, T>, V> {
    Encoder::new(move |map: &IndexMap<String, T>| {
        V::from_object(
            map.iter()
                .map(|(k, v)| (k.clone(), encoder.encode(v)))
                .collect(),
        )
    })
}

macro_rules! tuple_encoder {
    ($(#[$meta:meta])* $name:ident; $($e:ident $v:ident $T:ident),+) => {
        $(#[$meta])*
        pub fn $name<$($T: 'static,)+ V: JsonValue>(
            $($e: Encoder<$T, V>,)+
        ) -> Encoder<($($T,)+), V> {
            Encoder::new(move |value: &($($T,)+)| {
                let ($($v,)+) = value;
                V::from_array(vec![$($e.encode($v)),+])
            })
        }
    };
}

tuple_encoder!(
    /// Encodes a pair as a two-element array.
    tuple2; e1 a A, e2 b B
);
tuple_encoder!(tuple3; e1 a A, e2 b B, e3 c C);
tuple_encoder!(tuple4; e1 a A, e2 b B, e3 c C, e4 d D);

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Encoder<String>>();
    assert_sync::<Encoder<String>>();
};
