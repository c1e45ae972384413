//! Codec derivation failures.
//!
//! A derivation error means a type or a configuration cannot produce a codec
//! at all. It is raised when the codec is built, never while data flows
//! through it.

use std::fmt::{self, Display};

use stillwater::prelude::*;

/// Why a codec could not be derived.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    /// The type has no structural rule and no extra coder was registered.
    #[error(
        "cannot derive a codec for `{type_name}`: no structural rule or extra coder applies. \
         Register one with `Configuration::with_extra_coder`"
    )]
    Unsupported { type_name: &'static str },

    /// A field override names a field the record does not declare.
    #[error("field override targets `{record}.{field}`, but `{record}` has no such field")]
    UnknownField { record: &'static str, field: String },

    /// A field override was registered for a different field type.
    #[error(
        "field override for `{record}.{field}` expects values of `{expected}`, \
         but the field holds `{found}`"
    )]
    OverrideTypeMismatch {
        record: &'static str,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A non-empty collection of derivation errors, used when several types are
/// derived together and every failure should be reported at once.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationErrors(NonEmptyVec<DerivationError>);

impl DerivationErrors {
    pub fn single(error: DerivationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection holds at least one error.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &DerivationError {
        self.0.head()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<DerivationError> {
        self.0.into_vec()
    }
}

impl Semigroup for DerivationErrors {
    fn combine(self, other: Self) -> Self {
        DerivationErrors(self.0.combine(other.0))
    }
}

impl Display for DerivationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Codec derivation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for DerivationErrors {}

impl From<DerivationError> for DerivationErrors {
    fn from(error: DerivationError) -> Self {
        Self::single(error)
    }
}
