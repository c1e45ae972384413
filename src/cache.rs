//! Codec cache.
//!
//! This module provides [`CodecCache`], which memoizes derived codecs per
//! type and configuration fingerprint, and the process-wide entry points
//! [`generate_encoder`] and [`generate_decoder`].

use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use stillwater::prelude::*;

use crate::config::{Configuration, Fingerprint};
use crate::decode::{Decoder, ErasedDecoder};
use crate::derive::{derive_decoders, derive_encoders, Derived};
use crate::encode::{Encoder, ErasedEncoder};
use crate::error::{DerivationError, DerivationErrors};
use crate::shape::{Shaped, TypeKey, TypeRef};
use crate::value::JsonValue;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    ty: TypeKey,
    fingerprint: Fingerprint,
}

type CodecMap<C> = Arc<RwLock<HashMap<CacheKey, C>>>;

/// A thread-safe store of derived codecs.
///
/// Codecs are keyed by the target type and the configuration's
/// [`Fingerprint`]. A miss derives the codec outside the lock; when two
/// threads race on the same key, the first stored codec wins and both
/// callers receive it. Every member codec derived along the way is stored
/// too, so deriving `Vec<Person>` also caches `Person`.
///
/// Clones share the same storage.
///
/// # Thread Safety
///
/// Lookups take a read lock and run concurrently. Inserts take a write lock
/// only after derivation has finished.
///
/// # Example
///
/// ```rust
/// use shapecodec::{CodecCache, Configuration};
/// use serde_json::json;
///
/// let cache: CodecCache = CodecCache::new();
/// let config: Configuration = Configuration::new();
///
/// let encoder = cache.encoder::<Vec<u8>>(&config).unwrap();
/// assert_eq!(encoder.encode(&vec![1, 2]), json!([1, 2]));
/// assert!(cache.contains_encoder::<Vec<u8>>(&config));
/// ```
pub struct CodecCache<V = serde_json::Value> {
    encoders: CodecMap<ErasedEncoder<V>>,
    decoders: CodecMap<ErasedDecoder<V>>,
}

impl<V: JsonValue> CodecCache<V> {
    pub fn new() -> Self {
        Self {
            encoders: Arc::new(RwLock::new(HashMap::new())),
            decoders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the encoder for `T` under `config`, deriving it on first use.
    ///
    /// # Errors
    ///
    /// Returns the derivation error if `T`, or any type it contains, has no
    /// codec. Failures are not cached.
    pub fn encoder<T: Shaped>(
        &self,
        config: &Configuration<V>,
    ) -> Result<Encoder<T, V>, DerivationError> {
        self.erased_encoder(&TypeRef::of::<T>(), config)
            .map(Encoder::from_erased)
    }

    /// Returns the decoder for `T` under `config`, deriving it on first use.
    ///
    /// # Errors
    ///
    /// Same as [`CodecCache::encoder`].
    pub fn decoder<T: Shaped>(
        &self,
        config: &Configuration<V>,
    ) -> Result<Decoder<T, V>, DerivationError> {
        self.erased_decoder(&TypeRef::of::<T>(), config)
            .map(Decoder::from_erased)
    }

    /// Derives encoders and decoders for `types` in parallel.
    ///
    /// Every failure is collected rather than stopping at the first one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shapecodec::{CodecCache, Configuration, TypeRef};
    ///
    /// let cache: CodecCache = CodecCache::new();
    /// let config: Configuration = Configuration::new();
    ///
    /// let warmed = cache.prewarm(&[TypeRef::of::<String>(), TypeRef::of::<Vec<i64>>()], &config);
    /// assert!(warmed.is_success());
    /// assert_eq!(cache.encoder_count(), 3);
    /// ```
    pub fn prewarm(
        &self,
        types: &[TypeRef],
        config: &Configuration<V>,
    ) -> Validation<(), DerivationErrors> {
        let outcomes: Vec<Result<(), DerivationError>> = types
            .par_iter()
            .map(|ty| -> Result<(), DerivationError> {
                self.erased_encoder(ty, config)?;
                self.erased_decoder(ty, config)?;
                Ok(())
            })
            .collect();

        let errors = outcomes
            .into_iter()
            .filter_map(Result::err)
            .map(DerivationErrors::single)
            .reduce(|all, next| all.combine(next));

        match errors {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        }
    }

    pub fn contains_encoder<T: Shaped>(&self, config: &Configuration<V>) -> bool {
        self.encoders
            .read()
            .contains_key(&cache_key(TypeKey::of::<T>(), config.fingerprint()))
    }

    pub fn contains_decoder<T: Shaped>(&self, config: &Configuration<V>) -> bool {
        self.decoders
            .read()
            .contains_key(&cache_key(TypeKey::of::<T>(), config.fingerprint()))
    }

    pub fn encoder_count(&self) -> usize {
        self.encoders.read().len()
    }

    pub fn decoder_count(&self) -> usize {
        self.decoders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoder_count() == 0 && self.decoder_count() == 0
    }

    fn erased_encoder(
        &self,
        ty: &TypeRef,
        config: &Configuration<V>,
    ) -> Result<ErasedEncoder<V>, DerivationError> {
        read_through(&self.encoders, ty, config, "encoder", derive_encoders)
    }

    fn erased_decoder(
        &self,
        ty: &TypeRef,
        config: &Configuration<V>,
    ) -> Result<ErasedDecoder<V>, DerivationError> {
        read_through(&self.decoders, ty, config, "decoder", derive_decoders)
    }
}

fn cache_key(ty: TypeKey, fingerprint: Fingerprint) -> CacheKey {
    CacheKey { ty, fingerprint }
}

fn read_through<V, C, D>(
    map: &CodecMap<C>,
    ty: &TypeRef,
    config: &Configuration<V>,
    kind: &'static str,
    derive: D,
) -> Result<C, DerivationError>
where
    V: JsonValue,
    C: Clone,
    D: FnOnce(&TypeRef, &Configuration<V>) -> Result<Derived<C>, DerivationError>,
{
    let fingerprint = config.fingerprint();
    let key = cache_key(ty.key(), fingerprint.clone());
    if let Some(found) = map.read().get(&key) {
        tracing::trace!(type_name = ty.name(), kind, "codec cache hit");
        return Ok(found.clone());
    }

    tracing::debug!(type_name = ty.name(), kind, "codec cache miss");
    let derived = derive(ty, config)?;

    let mut codecs = map.write();
    for (member, codec) in derived.members {
        codecs
            .entry(cache_key(member, fingerprint.clone()))
            .or_insert(codec);
    }
    let stored = codecs.entry(key).or_insert(derived.root).clone();
    tracing::debug!(
        type_name = ty.name(),
        kind,
        cached = codecs.len(),
        "codec cache insert"
    );
    Ok(stored)
}

impl<V: JsonValue> Default for CodecCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for CodecCache<V> {
    fn clone(&self) -> Self {
        Self {
            encoders: Arc::clone(&self.encoders),
            decoders: Arc::clone(&self.decoders),
        }
    }
}

impl CodecCache {
    /// The process-wide cache used by [`generate_encoder`] and
    /// [`generate_decoder`].
    pub fn global() -> &'static CodecCache {
        static GLOBAL: OnceLock<CodecCache> = OnceLock::new();
        GLOBAL.get_or_init(CodecCache::new)
    }
}

/// Returns the encoder for `T` from the global cache.
///
/// # Example
///
/// ```rust
/// use shapecodec::{generate_encoder, Configuration};
/// use serde_json::json;
///
/// let encoder = generate_encoder::<Option<String>>(&Configuration::new()).unwrap();
/// assert_eq!(encoder.encode(&None), json!(null));
/// ```
pub fn generate_encoder<T: Shaped>(config: &Configuration) -> Result<Encoder<T>, DerivationError> {
    CodecCache::global().encoder(config)
}

/// Returns the decoder for `T` from the global cache.
pub fn generate_decoder<T: Shaped>(config: &Configuration) -> Result<Decoder<T>, DerivationError> {
    CodecCache::global().decoder(config)
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<CodecCache>();
    assert_sync::<CodecCache>();
    assert_send::<Configuration>();
    assert_sync::<Configuration>();
};
