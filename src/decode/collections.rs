//! Decoders for arrays, objects and tuples.

use indexmap::IndexMap;

use super::{decode_index, Decoder};
use crate::error::DecoderError;
use crate::value::JsonValue;

/// Decodes every element of an array. Element errors are prefixed with
/// their index.
pub fn list<T: 'static, V: JsonValue>(decoder: Decoder<T, V>) -> Decoder<Vec<T>, V> {
    Decoder::new(move |value: &V| {
        let Some(items) = value.as_array() else {
            return Err(DecoderError::bad_primitive("a list", value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| decoder.decode(item).map_err(|e| e.prepend_index(i)))
            .collect()
    })
}

/// Same as [`list`]; the name matches the JSON vocabulary.
pub fn array<T: 'static, V: JsonValue>(decoder: Decoder<T, V>) -> Decoder<Vec<T>, V> {
    list(decoder)
}

/// Null decodes to `None`; anything else must satisfy `decoder`.
pub fn option<T: 'static, V: JsonValue>(decoder: Decoder<T, V>) -> Decoder<Option<T>, V> {
    Decoder::new(move |value: &V| {
        if value.is_null() {
            Ok(None)
        } else {
            decoder.decode(value).map(Some)
        }
    })
}

/// Decodes an object into its entries, keeping key order.
pub fn key_value_pairs<T: 'static, V: JsonValue>(
    decoder: Decoder<T, V>,
) -> Decoder<Vec<(String, T)>, V> {
    Decoder::new(move |value: &V| {
        if !value.is_object() {
            return Err(DecoderError::bad_primitive("an object", value));
        }
        value
            .object_keys()
            .into_iter()
            .filter_map(|key| value.get_field(key).map(|item| (key, item)))
            .map(|(key, item)| {
                decoder
                    .decode(item)
                    .map(|decoded| (key.to_string(), decoded))
                    .map_err(|e| e.prepend_field(key))
            })
            .collect()
    })
}

/// Decodes an object into an ordered map.
pub fn dict<T: 'static, V: JsonValue>(decoder: Decoder<T, V>) -> Decoder<IndexMap<String, T>, V> {
    key_value_pairs(decoder).map(|pairs| pairs.into_iter().collect())
}

/// Runs every decoder against the same input, collecting the results.
/// Stops at the first failure.
pub fn all<T: 'static, V: JsonValue>(decoders: Vec<Decoder<T, V>>) -> Decoder<Vec<T>, V> {
    Decoder::new(move |value: &V| decoders.iter().map(|d| d.decode(value)).collect())
}

macro_rules! tuple_decoder {
    ($(#[$meta:meta])* $name:ident; $($idx:tt $d:ident $T:ident),+) => {
        $(#[$meta])*
        pub fn $name<$($T: 'static,)+ V: JsonValue>(
            $($d: Decoder<$T, V>,)+
        ) -> Decoder<($($T,)+), V> {
            Decoder::new(move |value: &V| {
                Ok(($(decode_index(value, $idx, |item| $d.decode(item))?,)+))
            })
        }
    };
}

tuple_decoder!(
    /// Decodes a two-element array positionally. Stops at the first failing
    /// element.
    tuple2; 0 d1 A, 1 d2 B
);
tuple_decoder!(
    /// Three-element form of [`tuple2`].
    tuple3; 0 d1 A, 1 d2 B, 2 d3 C
);
tuple_decoder!(tuple4; 0 d1 A, 1 d2 B, 2 d3 C, 3 d4 D);
tuple_decoder!(tuple5; 0 d1 A, 1 d2 B, 2 d3 C, 3 d4 D, 4 d5 E);
tuple_decoder!(tuple6; 0 d1 A, 1 d2 B, 2 d3 C, 3 d4 D, 4 d5 E, 5 d6 F);
tuple_decoder!(tuple7; 0 d1 A, 1 d2 B, 2 d3 C, 3 d4 D, 4 d5 E, 5 d6 F, 6 d7 G);
tuple_decoder!(tuple8; 0 d1 A, 1 d2 B, 2 d3 C, 3 d4 D, 4 d5 E, 5 d6 F, 6 d7 G, 7 d8 H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{int, string};
    use crate::error::ErrorReason;
    use serde_json::json;

    #[test]
    fn test_list_prefixes_index() {
        let error = list(int()).decode(&json!([1, 2, "x"])).unwrap_err();
        assert_eq!(error.path.to_string(), ".[2]");
    }

    #[test]
    fn test_list_rejects_non_array() {
        let error = list(int()).decode(&json!({})).unwrap_err();
        assert!(matches!(error.reason, ErrorReason::BadPrimitive { ref expected, .. } if expected == "a list"));
    }

    #[test]
    fn test_dict_keeps_order() {
        let decoded = dict(int()).decode(&json!({"b": 2, "a": 1})).unwrap();
        let keys: Vec<_> = decoded.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_dict_prefixes_key() {
        let error = dict(int()).decode(&json!({"ok": 1, "bad": "x"})).unwrap_err();
        assert_eq!(error.path.to_string(), ".bad");
    }

    #[test]
    fn test_tuple_decodes_positionally() {
        let decoder = tuple2(string(), int());
        assert_eq!(
            decoder.decode(&json!(["a", 1])).unwrap(),
            ("a".to_string(), 1)
        );

        let error = decoder.decode(&json!(["a"])).unwrap_err();
        assert_eq!(error.path.to_string(), ".[1]");
        assert!(matches!(error.reason, ErrorReason::TooSmallArray { .. }));
    }

    #[test]
    fn test_all_runs_on_same_input() {
        let decoder = all(vec![
            crate::decode::field("a", int()),
            crate::decode::field("b", int()),
        ]);
        assert_eq!(decoder.decode(&json!({"a": 1, "b": 2})).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_option_null() {
        assert_eq!(option(int()).decode(&json!(null)).unwrap(), None);
        assert_eq!(option(int()).decode(&json!(4)).unwrap(), Some(4));
    }
}
