//! Error types for decoding and codec derivation.
//!
//! Decode errors are data-dependent and carry the path of the failure.
//! Derivation errors are raised once, when a codec is built.

mod decoder_error;
mod derivation_error;

pub use decoder_error::{DecoderError, ErrorReason, FromStrError};
pub use derivation_error::{DerivationError, DerivationErrors};
