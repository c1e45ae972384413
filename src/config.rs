//! Derivation configuration.
//!
//! A [`Configuration`] controls how derived codecs name record fields,
//! whether null fields are written, which types use hand-written codecs and
//! how individual record fields are overridden. Two configurations with the
//! same [`Fingerprint`] always derive identical codecs, which is what the
//! codec cache keys on.
//!
//! # Example
//!
//! ```rust
//! use shapecodec::{CaseStrategy, Configuration};
//!
//! let config: Configuration = Configuration::new()
//!     .with_case_strategy(CaseStrategy::SnakeCase)
//!     .with_skip_null_field(false);
//!
//! assert_eq!(config.case_strategy().apply("FirstName"), "first_name");
//! assert!(!config.skips_null_fields());
//! ```

use std::any::{type_name, Any};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use regex::Regex;

use crate::decode::{Decoder, ErasedDecoder};
use crate::encode::{Encoder, ErasedEncoder};
use crate::error::DerivationError;
use crate::shape::{RecordShape, TypeKey};
use crate::value::JsonValue;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\p{Lu}+)(\p{Lu}\p{Ll}[^\p{Lu}_]*)|\p{Lu}+[^\p{Lu}_]*|[^\p{Lu}_]+")
        .expect("word pattern is valid")
});

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// How declared record field names become JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseStrategy {
    /// `FirstName`
    #[default]
    PascalCase,
    /// `firstName`
    CamelCase,
    /// `first_name`
    SnakeCase,
}

impl CaseStrategy {
    /// Converts a declared field name.
    ///
    /// Words are split at uppercase runs and underscores. A name with no
    /// words (for example `"_"`) is returned unchanged.
    pub fn apply(self, name: &str) -> String {
        let words = split_words(name);
        if words.is_empty() {
            return name.to_string();
        }
        match self {
            CaseStrategy::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
            CaseStrategy::CamelCase => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            CaseStrategy::SnakeCase => words
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

/// Splits at underscores and case changes. A capital run followed by a
/// lowercase letter gives its last capital to the next word, so
/// `HTTPServer` is `HTTP` then `Server`.
fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for caps in WORD.captures_iter(name) {
        match (caps.get(1), caps.get(2)) {
            (Some(run), Some(word)) => {
                words.push(run.as_str());
                words.push(word.as_str());
            }
            _ => words.extend(caps.get(0).map(|m| m.as_str())),
        }
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// What a field override decides for one field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOverride<V = serde_json::Value> {
    /// Encode the field as derivation would.
    UseDerived,
    /// Write this value instead, even when it is null.
    UseLiteral(V),
    /// Leave the field out.
    Omit,
}

pub(crate) type OverrideFn<V> = Arc<dyn Fn(&dyn Any) -> FieldOverride<V> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct ExtraCoder<V> {
    id: u64,
    pub(crate) encode: ErasedEncoder<V>,
    pub(crate) decode: ErasedDecoder<V>,
}

#[derive(Clone)]
pub(crate) struct OverrideEntry<V> {
    id: u64,
    value_type: TypeKey,
    value_type_name: &'static str,
    pub(crate) decide: OverrideFn<V>,
}

/// Settings for codec derivation.
///
/// Builder methods consume and return the configuration. Extra coders apply
/// to every occurrence of their type, including nested and recursive ones.
#[derive(Clone)]
pub struct Configuration<V = serde_json::Value> {
    case_strategy: CaseStrategy,
    skip_null_field: bool,
    extra_coders: IndexMap<TypeKey, ExtraCoder<V>>,
    field_overrides: IndexMap<(TypeKey, String), OverrideEntry<V>>,
}

impl<V: JsonValue> Default for Configuration<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: JsonValue> Configuration<V> {
    /// PascalCase keys, null fields skipped, no extra coders or overrides.
    pub fn new() -> Self {
        Self {
            case_strategy: CaseStrategy::default(),
            skip_null_field: true,
            extra_coders: IndexMap::new(),
            field_overrides: IndexMap::new(),
        }
    }

    pub fn with_case_strategy(mut self, strategy: CaseStrategy) -> Self {
        self.case_strategy = strategy;
        self
    }

    /// Whether derived record fields that encode to null are left out.
    pub fn with_skip_null_field(mut self, skip: bool) -> Self {
        self.skip_null_field = skip;
        self
    }

    /// Uses `encoder` and `decoder` for every occurrence of `T`, replacing
    /// any earlier registration for `T`.
    pub fn with_extra_coder<T: 'static>(mut self, encoder: Encoder<T, V>, decoder: Decoder<T, V>) -> Self {
        self.extra_coders.insert(
            TypeKey::of::<T>(),
            ExtraCoder {
                id: next_id(),
                encode: encoder.erase(),
                decode: decoder.erase(),
            },
        );
        self
    }

    /// Overrides how field `field` of record `R` is encoded. The field must
    /// hold a `F`; this is checked when a codec for `R` is derived.
    pub fn with_field_override<R, F>(
        mut self,
        field: impl Into<String>,
        decide: impl Fn(&F) -> FieldOverride<V> + Send + Sync + 'static,
    ) -> Self
    where
        R: 'static,
        F: 'static,
    {
        let decide: OverrideFn<V> = Arc::new(move |value: &dyn Any| match value.downcast_ref::<F>() {
            Some(typed) => decide(typed),
            None => FieldOverride::UseDerived,
        });
        self.field_overrides.insert(
            (TypeKey::of::<R>(), field.into()),
            OverrideEntry {
                id: next_id(),
                value_type: TypeKey::of::<F>(),
                value_type_name: type_name::<F>(),
                decide,
            },
        );
        self
    }

    pub fn case_strategy(&self) -> CaseStrategy {
        self.case_strategy
    }

    pub fn skips_null_fields(&self) -> bool {
        self.skip_null_field
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut extra_coders: Vec<u64> = self.extra_coders.values().map(|c| c.id).collect();
        extra_coders.sort_unstable();
        let mut field_overrides: Vec<u64> = self.field_overrides.values().map(|o| o.id).collect();
        field_overrides.sort_unstable();
        Fingerprint {
            case_strategy: self.case_strategy,
            skip_null_field: self.skip_null_field,
            extra_coders,
            field_overrides,
        }
    }

    pub(crate) fn extra_coder(&self, key: TypeKey) -> Option<&ExtraCoder<V>> {
        self.extra_coders.get(&key)
    }

    pub(crate) fn field_override(&self, record: TypeKey, field: &str) -> Option<&OverrideEntry<V>> {
        self.field_overrides.get(&(record, field.to_string()))
    }

    /// Checks every override registered for `record` against its shape.
    pub(crate) fn validate_overrides(
        &self,
        record: TypeKey,
        shape: &RecordShape,
    ) -> Result<(), DerivationError> {
        for ((owner, field), entry) in &self.field_overrides {
            if *owner != record {
                continue;
            }
            let declared = shape
                .fields()
                .iter()
                .find(|f| f.name() == field)
                .ok_or_else(|| DerivationError::UnknownField {
                    record: record.name(),
                    field: field.clone(),
                })?;
            if declared.ty().key() != entry.value_type {
                return Err(DerivationError::OverrideTypeMismatch {
                    record: record.name(),
                    field: field.clone(),
                    expected: entry.value_type_name,
                    found: declared.ty().name(),
                });
            }
        }
        Ok(())
    }
}

/// A hashable summary of a configuration.
///
/// Extra coders and overrides are identified by registration, so two
/// separately built configurations with different closures never collide,
/// while clones of one configuration share a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    case_strategy: CaseStrategy,
    skip_null_field: bool,
    extra_coders: Vec<u64>,
    field_overrides: Vec<u64>,
}
