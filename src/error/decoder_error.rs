//! Decode error types.
//!
//! This module provides [`DecoderError`], a path-qualified decode failure, and
//! [`ErrorReason`], the closed set of reasons a decoder can fail with.
//! Rendering follows fixed templates so callers and tests may rely on the text.

use std::fmt::{self, Display};

use crate::path::{DecodePath, PathSegment};
use crate::value::JsonValue;

/// Why a decoder rejected its input.
///
/// Variants carrying `value` hold the JSON value that was rejected, so the
/// rendered message can show it.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorReason<V> {
    /// A scalar of the wrong kind: `Expecting <expected> but instead got: <value>`.
    BadPrimitive {
        expected: String,
        value: V,
    },
    /// A scalar of the right kind that is still rejected, for example an
    /// integer out of range. Renders as `BadPrimitive` followed by
    /// `\nReason: <detail>`.
    BadPrimitiveExtra {
        expected: String,
        value: V,
        detail: String,
    },
    /// A container of the wrong kind:
    /// `Expecting <expected> but instead got:\n<value>`.
    BadType {
        expected: String,
        value: V,
    },
    /// A required object field is absent:
    /// `Expecting <expected> but instead got:\n<value>`.
    BadField {
        expected: String,
        value: V,
    },
    /// A nested field walk stopped at `segment`. Renders as `BadType`
    /// followed by ``\nNode `<segment>` is unknown.``.
    BadPath {
        expected: String,
        value: V,
        segment: String,
    },
    /// An index past the end of an array: `Expecting <detail>.\n<value>`.
    TooSmallArray {
        detail: String,
        value: V,
    },
    /// A failure raised by user code or a combinator:
    /// ``The following `failure` occurred with the decoder: <message>``.
    FailMessage(String),
    /// Every alternative of a `one_of` failed, in the order they were tried.
    /// Renders as `The following errors were found:` and each alternative's
    /// full message, with no header of its own.
    BadOneOf(Vec<DecoderError<V>>),
}

/// A decode failure together with the location it occurred at.
///
/// # Example
///
/// ```rust
/// use shapecodec::{DecoderError, ErrorReason};
/// use serde_json::json;
///
/// let error = DecoderError::new(ErrorReason::BadPrimitive {
///     expected: "an int".to_string(),
///     value: json!("x"),
/// })
/// .prepend_field("age")
/// .prepend_field("user");
///
/// assert_eq!(error.path.to_string(), ".user.age");
/// assert_eq!(
///     error.to_string(),
///     "Error at: `.user.age`\nExpecting an int but instead got: \"x\""
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderError<V = serde_json::Value> {
    /// Location of the failure relative to the outermost input.
    pub path: DecodePath,
    pub reason: ErrorReason<V>,
}

impl<V: JsonValue> DecoderError<V> {
    /// Creates an error located at the root of the value being decoded.
    pub fn new(reason: ErrorReason<V>) -> Self {
        Self {
            path: DecodePath::root(),
            reason,
        }
    }

    /// A [`ErrorReason::BadPrimitive`] at the root.
    pub fn bad_primitive(expected: impl Into<String>, value: &V) -> Self {
        Self::new(ErrorReason::BadPrimitive {
            expected: expected.into(),
            value: value.clone(),
        })
    }

    /// A [`ErrorReason::BadPrimitiveExtra`] at the root.
    pub fn bad_primitive_extra(
        expected: impl Into<String>,
        value: &V,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(ErrorReason::BadPrimitiveExtra {
            expected: expected.into(),
            value: value.clone(),
            detail: detail.into(),
        })
    }

    /// A [`ErrorReason::BadType`] at the root.
    pub fn bad_type(expected: impl Into<String>, value: &V) -> Self {
        Self::new(ErrorReason::BadType {
            expected: expected.into(),
            value: value.clone(),
        })
    }

    /// A [`ErrorReason::BadField`] at the root.
    pub fn bad_field(expected: impl Into<String>, value: &V) -> Self {
        Self::new(ErrorReason::BadField {
            expected: expected.into(),
            value: value.clone(),
        })
    }

    /// A [`ErrorReason::BadPath`] at the root.
    pub fn bad_path(expected: impl Into<String>, value: &V, segment: impl Into<String>) -> Self {
        Self::new(ErrorReason::BadPath {
            expected: expected.into(),
            value: value.clone(),
            segment: segment.into(),
        })
    }

    /// A [`ErrorReason::TooSmallArray`] at the root.
    pub fn too_small_array(detail: impl Into<String>, value: &V) -> Self {
        Self::new(ErrorReason::TooSmallArray {
            detail: detail.into(),
            value: value.clone(),
        })
    }

    /// A [`ErrorReason::FailMessage`] at the root.
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(ErrorReason::FailMessage(message.into()))
    }

    /// Combines the failures of every `one_of` alternative.
    pub fn one_of(errors: Vec<DecoderError<V>>) -> Self {
        Self::new(ErrorReason::BadOneOf(errors))
    }

    /// Places `segment` in front of this error's path.
    ///
    /// A `BadOneOf` error has no path of its own: the segment is pushed into
    /// every alternative instead, so each rendered alternative keeps naming
    /// its location relative to the outermost input.
    pub fn prepend(self, segment: PathSegment) -> Self {
        match self.reason {
            ErrorReason::BadOneOf(errors) => Self {
                path: self.path,
                reason: ErrorReason::BadOneOf(
                    errors
                        .into_iter()
                        .map(|e| e.prepend(segment.clone()))
                        .collect(),
                ),
            },
            reason => Self {
                path: self.path.prepend(segment),
                reason,
            },
        }
    }

    /// Places a field segment in front of this error's path.
    pub fn prepend_field(self, name: impl Into<String>) -> Self {
        self.prepend(PathSegment::Field(name.into()))
    }

    /// Places an index segment in front of this error's path.
    pub fn prepend_index(self, index: usize) -> Self {
        self.prepend(PathSegment::Index(index))
    }

    /// The rendered alternatives of a `BadOneOf`, in the order they were
    /// tried. Empty for every other reason.
    pub fn rendered_messages(&self) -> Vec<String> {
        match &self.reason {
            ErrorReason::BadOneOf(errors) => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }

    fn render_reason(&self) -> String {
        match &self.reason {
            ErrorReason::BadPrimitive { expected, value } => generic_message(expected, value, false),
            ErrorReason::BadType { expected, value } | ErrorReason::BadField { expected, value } => {
                generic_message(expected, value, true)
            }
            ErrorReason::BadPrimitiveExtra {
                expected,
                value,
                detail,
            } => format!("{}\nReason: {}", generic_message(expected, value, false), detail),
            ErrorReason::BadPath {
                expected,
                value,
                segment,
            } => format!(
                "{}\nNode `{}` is unknown.",
                generic_message(expected, value, true),
                segment
            ),
            ErrorReason::TooSmallArray { detail, value } => {
                format!("Expecting {}.\n{}", detail, value.any_to_string())
            }
            ErrorReason::FailMessage(message) => {
                format!("The following `failure` occurred with the decoder: {}", message)
            }
            ErrorReason::BadOneOf(_) => format!(
                "The following errors were found:\n\n{}",
                self.rendered_messages().join("\n\n")
            ),
        }
    }
}

fn generic_message<V: JsonValue>(expected: &str, value: &V, new_line: bool) -> String {
    format!(
        "Expecting {} but instead got:{}{}",
        expected,
        if new_line { "\n" } else { " " },
        value.any_to_string()
    )
}

impl<V: JsonValue> Display for DecoderError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            // each alternative carries its own header
            ErrorReason::BadOneOf(_) => write!(f, "{}", self.render_reason()),
            _ => write!(f, "Error at: `{}`\n{}", self.path, self.render_reason()),
        }
    }
}

impl<V: JsonValue> std::error::Error for DecoderError<V> {}

/// Failure of decoding JSON text: either the text does not parse, or the
/// parsed value is rejected by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum FromStrError<V = serde_json::Value> {
    /// The parser's message. Renders as `Given an invalid JSON: <message>`.
    InvalidJson(String),
    Decode(DecoderError<V>),
}

impl<V: JsonValue> Display for FromStrError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FromStrError::InvalidJson(message) => write!(f, "Given an invalid JSON: {}", message),
            FromStrError::Decode(error) => write!(f, "{}", error),
        }
    }
}

impl<V: JsonValue> std::error::Error for FromStrError<V> {}

impl<V> From<DecoderError<V>> for FromStrError<V> {
    fn from(error: DecoderError<V>) -> Self {
        FromStrError::Decode(error)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<DecoderError>();
    assert_sync::<DecoderError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_new_error_is_at_root() {
        let error: DecoderError = DecoderError::fail("boom");
        assert!(error.path.is_root());
        assert_eq!(error.reason, ErrorReason::FailMessage("boom".to_string()));
    }

    #[test]
    fn test_prepend_builds_root_first_path() {
        let error: DecoderError = DecoderError::fail("boom")
            .prepend_index(2)
            .prepend_field("items");
        assert_eq!(error.path.to_string(), ".items.[2]");
    }

    #[test]
    fn test_render_bad_primitive() {
        let error = DecoderError::bad_primitive("an int", &json!("x")).prepend_field("age");
        assert_eq!(
            error.to_string(),
            "Error at: `.age`\nExpecting an int but instead got: \"x\""
        );
    }

    #[test]
    fn test_render_bad_type_uses_newline() {
        let error = DecoderError::bad_type("an object", &json!(1));
        assert_eq!(
            error.to_string(),
            "Error at: ``\nExpecting an object but instead got:\n1"
        );
    }

    #[test]
    fn test_render_bad_field_dumps_object() {
        let error = DecoderError::bad_field("an object with a field named `name`", &json!({"a": 1}));
        assert_eq!(
            error.to_string(),
            "Error at: ``\nExpecting an object with a field named `name` but instead got:\n{\n    \"a\": 1\n}"
        );
    }

    #[test]
    fn test_render_bad_primitive_extra() {
        let error = DecoderError::bad_primitive_extra("an int", &json!(1.5), "Value is not an integral value");
        assert_eq!(
            error.to_string(),
            "Error at: ``\nExpecting an int but instead got: 1.5\nReason: Value is not an integral value"
        );
    }

    #[test]
    fn test_render_bad_path() {
        let error = DecoderError::bad_path("an object with path `a.b`", &json!({}), "a");
        assert_eq!(
            error.to_string(),
            "Error at: ``\nExpecting an object with path `a.b` but instead got:\n{}\nNode `a` is unknown."
        );
    }

    #[test]
    fn test_render_too_small_array() {
        let error = DecoderError::too_small_array("a longer array", &json!([]));
        assert_eq!(error.to_string(), "Error at: ``\nExpecting a longer array.\n[]");
    }

    #[test]
    fn test_render_fail_message() {
        let error: DecoderError = DecoderError::fail("nope");
        assert_eq!(
            error.to_string(),
            "Error at: ``\nThe following `failure` occurred with the decoder: nope"
        );
    }

    #[test]
    fn test_one_of_has_no_header() {
        let error: DecoderError =
            DecoderError::one_of(vec![DecoderError::fail("a"), DecoderError::fail("b")]);
        let rendered = error.to_string();
        assert!(!rendered.starts_with("Error at:"));
        assert_eq!(
            rendered,
            "The following errors were found:\n\n\
             Error at: ``\nThe following `failure` occurred with the decoder: a\n\n\
             Error at: ``\nThe following `failure` occurred with the decoder: b"
        );
    }

    #[test]
    fn test_prepend_flows_into_one_of_alternatives() {
        let error: DecoderError = DecoderError::one_of(vec![
            DecoderError::fail("a").prepend_field("x"),
            DecoderError::fail("b"),
        ])
        .prepend_field("outer");

        assert!(error.path.is_root());
        let messages = error.rendered_messages();
        assert!(messages[0].starts_with("Error at: `.outer.x`"));
        assert!(messages[1].starts_with("Error at: `.outer`"));
    }

    #[test]
    fn test_rendered_messages_empty_for_other_reasons() {
        let error: DecoderError<Value> = DecoderError::fail("a");
        assert!(error.rendered_messages().is_empty());
    }

    #[test]
    fn test_from_str_error_display() {
        let error: FromStrError = FromStrError::InvalidJson("EOF".to_string());
        assert_eq!(error.to_string(), "Given an invalid JSON: EOF");
    }
}
