//! Shape-driven codec derivation.
//!
//! Derivation walks a type's shape and assembles a codec from the codecs of
//! its members. Member codecs are found, in order, among the configuration's
//! extra coders, the codecs already derived in the current pass and finally
//! the structural rules for the member's shape.
//!
//! Records and unions may refer to themselves. Before their members are
//! derived a placeholder is registered for them; a member that reaches the
//! placeholder gets a forwarding codec that resolves to the finished codec
//! the first time it runs.

mod decoder;
mod encoder;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::config::Configuration;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::DerivationError;
use crate::shape::{ShapeKind, Shaped, TypeKey, TypeRef};
use crate::value::JsonValue;

pub(crate) use decoder::derive_decoders;
pub(crate) use encoder::derive_encoders;

/// The outcome of one derivation pass: the codec that was asked for and
/// every codec derived along the way, keyed by type.
pub(crate) struct Derived<C> {
    pub(crate) root: C,
    pub(crate) members: Vec<(TypeKey, C)>,
}

enum Slot<C> {
    Ready(C),
    Pending(Arc<OnceLock<C>>),
}

pub(crate) enum Lookup<C> {
    Ready(C),
    Pending(Arc<OnceLock<C>>),
}

/// Codecs derived during a single pass, including placeholders for the
/// records and unions still being derived.
pub(crate) struct CodecMap<C> {
    slots: HashMap<TypeKey, Slot<C>>,
}

impl<C: Clone> CodecMap<C> {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub(crate) fn lookup(&self, key: TypeKey) -> Option<Lookup<C>> {
        self.slots.get(&key).map(|slot| match slot {
            Slot::Ready(codec) => Lookup::Ready(codec.clone()),
            Slot::Pending(cell) => Lookup::Pending(Arc::clone(cell)),
        })
    }

    /// Registers a placeholder for `key`.
    pub(crate) fn reserve(&mut self, key: TypeKey) {
        tracing::trace!(type_name = key.name(), "registered codec placeholder");
        self.slots
            .insert(key, Slot::Pending(Arc::new(OnceLock::new())));
    }

    /// Stores the finished codec for `key`, resolving its placeholder.
    pub(crate) fn complete(&mut self, key: TypeKey, codec: C) {
        if let Some(Slot::Pending(cell)) = self.slots.get(&key) {
            // a cell is only filled here, once per key
            let _ = cell.set(codec.clone());
        }
        self.slots.insert(key, Slot::Ready(codec));
    }

    /// Drops a placeholder whose derivation failed.
    pub(crate) fn abandon(&mut self, key: TypeKey) {
        if matches!(self.slots.get(&key), Some(Slot::Pending(_))) {
            self.slots.remove(&key);
        }
    }

    pub(crate) fn into_ready(self) -> Vec<(TypeKey, C)> {
        self.slots
            .into_iter()
            .filter_map(|(key, slot)| match slot {
                Slot::Ready(codec) => Some((key, codec)),
                Slot::Pending(_) => None,
            })
            .collect()
    }
}

/// Maps whose keys encode as JSON strings are written as objects; all other
/// maps are written as arrays of `[key, value]` pairs.
pub(crate) fn string_keyed<V: JsonValue>(config: &Configuration<V>, key: &TypeRef) -> bool {
    config.extra_coder(key.key()).is_none()
        && matches!(key.shape(), ShapeKind::Primitive(kind) if kind.is_string_like())
}

/// Derives an encoder for `T` without consulting any cache.
///
/// # Example
///
/// ```rust
/// use shapecodec::{derive_encoder, Configuration};
/// use serde_json::json;
///
/// let config: Configuration = Configuration::new();
/// let encoder = derive_encoder::<Vec<Option<i32>>, _>(&config).unwrap();
/// assert_eq!(encoder.encode(&vec![Some(1), None]), json!([1, null]));
/// ```
pub fn derive_encoder<T: Shaped, V: JsonValue>(
    config: &Configuration<V>,
) -> Result<Encoder<T, V>, DerivationError> {
    derive_encoders(&TypeRef::of::<T>(), config).map(|derived| Encoder::from_erased(derived.root))
}

/// Derives a decoder for `T` without consulting any cache.
pub fn derive_decoder<T: Shaped, V: JsonValue>(
    config: &Configuration<V>,
) -> Result<Decoder<T, V>, DerivationError> {
    derive_decoders(&TypeRef::of::<T>(), config).map(|derived| Decoder::from_erased(derived.root))
}
