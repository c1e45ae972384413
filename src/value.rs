//! The capability interface over an opaque JSON value.
//!
//! Every decoder, encoder and derived codec in this crate reaches the JSON
//! engine only through [`JsonValue`]. `serde_json::Value` is the bundled
//! implementation; any other engine plugs in by implementing the trait.

use std::fmt::Debug;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value};

const UNRENDERABLE: &str = "<value could not be rendered>";

/// Type predicates, accessors and constructors for a JSON value tree.
///
/// Accessors return `None` when the value has a different type, so the
/// predicates are only needed where no payload is extracted.
pub trait JsonValue: Clone + Debug + PartialEq + Send + Sync + 'static {
    fn is_string(&self) -> bool;
    fn is_boolean(&self) -> bool;
    fn is_number(&self) -> bool;
    fn is_array(&self) -> bool;
    fn is_object(&self) -> bool;
    fn is_null(&self) -> bool;

    /// True for numbers without a fractional part.
    fn is_integral(&self) -> bool;

    /// Engines without a distinct `undefined` value never report one; a
    /// missing object field is signalled by [`JsonValue::get_field`] returning `None`.
    fn is_undefined(&self) -> bool {
        false
    }

    fn as_string(&self) -> Option<&str>;
    fn as_bool(&self) -> Option<bool>;
    fn as_int(&self) -> Option<i64>;
    fn as_uint(&self) -> Option<u64>;
    fn as_float(&self) -> Option<f64>;

    fn as_float32(&self) -> Option<f32> {
        self.as_float().map(|f| f as f32)
    }

    fn as_array(&self) -> Option<&[Self]>;

    /// Looks up a field of an object. Returns `None` for missing fields and
    /// for non-object values.
    fn get_field(&self, name: &str) -> Option<&Self>;

    /// Keys of an object in engine order; empty for non-objects.
    fn object_keys(&self) -> Vec<&str>;

    /// Best-effort human rendering used in error messages. Must not fail.
    fn any_to_string(&self) -> String;

    fn null() -> Self;
    fn from_bool(value: bool) -> Self;
    fn from_string(value: String) -> Self;
    fn from_i64(value: i64) -> Self;
    fn from_u64(value: u64) -> Self;
    /// Non-finite floats have no JSON form and become null.
    fn from_f64(value: f64) -> Self;
    fn from_array(items: Vec<Self>) -> Self;
    fn from_object(fields: Vec<(String, Self)>) -> Self;

    /// Parses JSON text with the engine's parser.
    fn parse(text: &str) -> Result<Self, String>;
}

impl JsonValue for Value {
    fn is_string(&self) -> bool {
        self.is_string()
    }

    fn is_boolean(&self) -> bool {
        self.is_boolean()
    }

    fn is_number(&self) -> bool {
        self.is_number()
    }

    fn is_array(&self) -> bool {
        self.is_array()
    }

    fn is_object(&self) -> bool {
        self.is_object()
    }

    fn is_null(&self) -> bool {
        self.is_null()
    }

    fn is_integral(&self) -> bool {
        match self {
            Value::Number(n) if n.is_i64() || n.is_u64() => true,
            Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
            _ => false,
        }
    }

    fn as_string(&self) -> Option<&str> {
        self.as_str()
    }

    fn as_bool(&self) -> Option<bool> {
        self.as_bool()
    }

    fn as_int(&self) -> Option<i64> {
        self.as_i64()
    }

    fn as_uint(&self) -> Option<u64> {
        self.as_u64()
    }

    fn as_float(&self) -> Option<f64> {
        self.as_f64()
    }

    fn as_array(&self) -> Option<&[Self]> {
        self.as_array().map(Vec::as_slice)
    }

    fn get_field(&self, name: &str) -> Option<&Self> {
        self.as_object().and_then(|obj| obj.get(name))
    }

    fn object_keys(&self) -> Vec<&str> {
        self.as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn any_to_string(&self) -> String {
        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        if self.serialize(&mut serializer).is_err() {
            return UNRENDERABLE.to_string();
        }
        String::from_utf8(out).unwrap_or_else(|_| UNRENDERABLE.to_string())
    }

    fn null() -> Self {
        Value::Null
    }

    fn from_bool(value: bool) -> Self {
        Value::Bool(value)
    }

    fn from_string(value: String) -> Self {
        Value::String(value)
    }

    fn from_i64(value: i64) -> Self {
        Value::Number(value.into())
    }

    fn from_u64(value: u64) -> Self {
        Value::Number(value.into())
    }

    fn from_f64(value: f64) -> Self {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }

    fn from_array(items: Vec<Self>) -> Self {
        Value::Array(items)
    }

    fn from_object(fields: Vec<(String, Self)>) -> Self {
        Value::Object(fields.into_iter().collect::<Map<String, Value>>())
    }

    fn parse(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_any_to_string_uses_four_space_indent() {
        let rendered = JsonValue::any_to_string(&json!({"a": [1]}));
        assert_eq!(rendered, "{\n    \"a\": [\n        1\n    ]\n}");
    }

    #[test]
    fn test_any_to_string_scalar() {
        assert_eq!(JsonValue::any_to_string(&json!("x")), "\"x\"");
        assert_eq!(JsonValue::any_to_string(&json!(null)), "null");
    }

    #[test]
    fn test_is_integral() {
        assert!(JsonValue::is_integral(&json!(3)));
        assert!(JsonValue::is_integral(&json!(3.0)));
        assert!(JsonValue::is_integral(&json!(u64::MAX)));
        assert!(!JsonValue::is_integral(&json!(3.5)));
        assert!(!JsonValue::is_integral(&json!("3")));
    }

    #[test]
    fn test_get_field_and_keys() {
        let value = json!({"z": 1, "a": 2});
        assert_eq!(JsonValue::get_field(&value, "a"), Some(&json!(2)));
        assert_eq!(JsonValue::get_field(&value, "missing"), None);
        assert_eq!(JsonValue::object_keys(&value), vec!["z", "a"]);
        assert!(JsonValue::object_keys(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_from_object_preserves_order() {
        let value = <Value as JsonValue>::from_object(vec![
            ("b".to_string(), json!(1)),
            ("a".to_string(), json!(2)),
        ]);
        assert_eq!(JsonValue::object_keys(&value), vec!["b", "a"]);
    }

    #[test]
    fn test_from_f64_non_finite_is_null() {
        assert_eq!(<Value as JsonValue>::from_f64(f64::NAN), Value::Null);
        assert_eq!(<Value as JsonValue>::from_f64(2.5), json!(2.5));
    }

    #[test]
    fn test_parse() {
        assert_eq!(<Value as JsonValue>::parse("[1, 2]"), Ok(json!([1, 2])));
        assert!(<Value as JsonValue>::parse("{").is_err());
    }
}
