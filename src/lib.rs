//! # Shapecodec
//!
//! Type-safe JSON codecs with path-qualified decode errors.
//!
//! ## Overview
//!
//! Codecs come from two places. Hand-written decoders are composed from the
//! combinators in [`decode`], and encoders from the builders in [`encode`].
//! Derived codecs are generated from a type's [`TypeShape`]: records become
//! objects, unions become a case-name string or a `[case, args...]` array,
//! sequences become arrays. A [`Configuration`] controls key casing, null
//! handling, per-type extra coders and per-field overrides, and a
//! [`CodecCache`] memoizes what has been derived.
//!
//! Every decode failure carries the [`DecodePath`] from the outermost value
//! to the offending one, and renders as a stable, human-readable message.
//!
//! ## Core Types
//!
//! - [`Decoder`] / [`Encoder`]: composable, shareable codecs
//! - [`DecoderError`]: a failure reason plus the path where it happened
//! - [`Shaped`]: implemented by types that codecs can be derived for
//! - [`Configuration`]: derivation settings, summarized by a [`Fingerprint`]
//! - [`CodecCache`]: a thread-safe codec store keyed by type and fingerprint
//!
//! ## Example
//!
//! ```rust
//! use shapecodec::{generate_decoder, generate_encoder, Configuration, Shaped, TypeShape};
//! use serde_json::json;
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     name: String,
//!     age: u32,
//!     nickname: Option<String>,
//! }
//!
//! impl Shaped for User {
//!     fn shape() -> TypeShape<Self> {
//!         TypeShape::<Self>::record()
//!             .field("Name", |u| &u.name)
//!             .field("Age", |u| &u.age)
//!             .field("Nickname", |u| &u.nickname)
//!             .build(|fields| {
//!                 Ok(User {
//!                     name: fields.take()?,
//!                     age: fields.take()?,
//!                     nickname: fields.take()?,
//!                 })
//!             })
//!     }
//! }
//!
//! let config = Configuration::new();
//! let encoder = generate_encoder::<User>(&config).unwrap();
//! let decoder = generate_decoder::<User>(&config).unwrap();
//!
//! let user = User { name: "Ada".into(), age: 36, nickname: None };
//! let value = encoder.encode(&user);
//! assert_eq!(value, json!({"Name": "Ada", "Age": 36}));
//! assert_eq!(decoder.decode(&value).unwrap(), user);
//!
//! let error = decoder.decode(&json!({"Name": "Ada", "Age": "old"})).unwrap_err();
//! assert_eq!(error.path.to_string(), ".Age");
//! ```

pub mod cache;
pub mod config;
pub mod decode;
pub mod derive;
pub mod encode;
pub mod error;
pub mod path;
pub mod shape;
pub mod value;

pub use cache::{generate_decoder, generate_encoder, CodecCache};
pub use config::{CaseStrategy, Configuration, FieldOverride, Fingerprint};
pub use decode::Decoder;
pub use derive::{derive_decoder, derive_encoder};
pub use encode::Encoder;
pub use error::{DecoderError, DerivationError, DerivationErrors, ErrorReason, FromStrError};
pub use path::{DecodePath, PathSegment};
pub use shape::{
    Fields, PrimitiveKind, RecordBuilder, ShapeKind, ShapeMismatch, Shaped, TypeKey, TypeRef,
    TypeShape, UnionBuilder, Variant,
};
pub use value::JsonValue;

/// Type alias for decode results.
pub type DecodeResult<T, V = serde_json::Value> = Result<T, DecoderError<V>>;
