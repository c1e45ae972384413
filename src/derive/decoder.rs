use std::sync::{Arc, OnceLock};

use super::{string_keyed, CodecMap, Derived, Lookup};
use crate::config::Configuration;
use crate::decode::{decode_index, primitive_decoder, ErasedDecoder};
use crate::error::{DecoderError, DerivationError};
use crate::shape::{
    Boxed, Collect, Construct, MapShape, OptionShape, PointerShape, RecordShape,
    SeqShape, ShapeKind, TupleShape, TypeRef, UnionShape,
};
use crate::value::JsonValue;
use crate::DecodeResult;

pub(crate) fn derive_decoders<V: JsonValue>(
    ty: &TypeRef,
    config: &Configuration<V>,
) -> Result<Derived<ErasedDecoder<V>>, DerivationError> {
    tracing::debug!(type_name = ty.name(), "deriving decoder");
    let mut deriver = DecoderDeriver {
        config,
        codecs: CodecMap::new(),
    };
    let root = deriver.derive(ty)?;
    let members = deriver.codecs.into_ready();
    tracing::debug!(
        type_name = ty.name(),
        members = members.len(),
        "derived decoder"
    );
    Ok(Derived { root, members })
}

struct DecoderDeriver<'c, V> {
    config: &'c Configuration<V>,
    codecs: CodecMap<ErasedDecoder<V>>,
}

struct FieldPlan<V> {
    key: String,
    decode: ErasedDecoder<V>,
    optional: bool,
}

struct RecordPlan<V> {
    fields: Vec<FieldPlan<V>>,
    skip_null: bool,
    collect: Collect,
}

impl<V: JsonValue> RecordPlan<V> {
    fn decode(&self, value: &V) -> DecodeResult<Boxed, V> {
        if !value.is_object() {
            return Err(DecoderError::bad_type("an object", value));
        }
        let mut decoded = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let result = match value.get_field(&field.key) {
                Some(present) if !present.is_undefined() => (field.decode)(present),
                // optional fields decode a missing key as null
                _ if field.optional => (field.decode)(&V::null()),
                // the encoder leaves out fields that encode to null
                _ => match self.skip_null.then(|| (field.decode)(&V::null())) {
                    Some(Ok(decoded)) => Ok(decoded),
                    _ => {
                        return Err(DecoderError::bad_field(
                            format!("an object with a field named `{}`", field.key),
                            value,
                        ))
                    }
                },
            };
            decoded.push(result.map_err(|e| e.prepend_field(field.key.as_str()))?);
        }
        (self.collect)(decoded).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
    }
}

struct CasePlan<V> {
    name: String,
    args: Vec<ErasedDecoder<V>>,
}

struct UnionPlan<V> {
    type_name: &'static str,
    cases: Vec<CasePlan<V>>,
    construct: Construct,
}

impl<V: JsonValue> UnionPlan<V> {
    fn decode(&self, value: &V) -> DecodeResult<Boxed, V> {
        if let Some(name) = value.as_string() {
            return self.decode_case(name, &[]);
        }
        if let Some(items) = value.as_array() {
            let name = decode_index(value, 0, |first| {
                first
                    .as_string()
                    .map(str::to_owned)
                    .ok_or_else(|| DecoderError::bad_primitive("a string", first))
            })?;
            return self.decode_case(&name, &items[1..]);
        }
        Err(DecoderError::bad_primitive("a string or an array", value))
    }

    fn decode_case(&self, name: &str, args: &[V]) -> DecodeResult<Boxed, V> {
        let Some((index, case)) = self.cases.iter().enumerate().find(|(_, c)| c.name == name)
        else {
            return Err(DecoderError::fail(format!(
                "Cannot find case `{}` in `{}`",
                name, self.type_name
            )));
        };
        if case.args.len() != args.len() {
            return Err(DecoderError::fail(format!(
                "Expected {} argument(s) for case `{}` but got {}",
                case.args.len(),
                name,
                args.len()
            )));
        }
        let decoded = case
            .args
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (decode, arg))| decode(arg).map_err(|e| e.prepend_index(i + 1)))
            .collect::<Result<Vec<_>, _>>()?;
        (self.construct)(index, decoded).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
    }
}

impl<V: JsonValue> DecoderDeriver<'_, V> {
    fn derive(&mut self, ty: &TypeRef) -> Result<ErasedDecoder<V>, DerivationError> {
        let key = ty.key();
        if let Some(extra) = self.config.extra_coder(key) {
            return Ok(Arc::clone(&extra.decode));
        }
        match self.codecs.lookup(key) {
            Some(Lookup::Ready(decoder)) => return Ok(decoder),
            Some(Lookup::Pending(cell)) => {
                tracing::trace!(type_name = ty.name(), "forward reference to decoder");
                return Ok(forward(cell, ty.name()));
            }
            None => {}
        }

        let decoder = match ty.shape() {
            ShapeKind::Primitive(kind) => primitive_decoder(kind),
            ShapeKind::Array(seq) => self.sequence(&seq)?,
            ShapeKind::Option(opt) => self.option(&opt)?,
            ShapeKind::Tuple(tuple) => self.tuple(&tuple)?,
            ShapeKind::Map(map) => self.map(&map)?,
            ShapeKind::Pointer(pointer) => self.pointer(&pointer)?,
            ShapeKind::Record(record) => {
                self.codecs.reserve(key);
                let derived = self.record(&record);
                if derived.is_err() {
                    self.codecs.abandon(key);
                }
                derived?
            }
            ShapeKind::Union(union) => {
                self.codecs.reserve(key);
                let derived = self.union(ty.name(), &union);
                if derived.is_err() {
                    self.codecs.abandon(key);
                }
                derived?
            }
            ShapeKind::Opaque => {
                return Err(DerivationError::Unsupported {
                    type_name: ty.name(),
                })
            }
        };
        self.codecs.complete(key, Arc::clone(&decoder));
        Ok(decoder)
    }

    fn sequence(&mut self, seq: &SeqShape) -> Result<ErasedDecoder<V>, DerivationError> {
        let element = self.derive(&seq.element)?;
        let collect = Arc::clone(&seq.collect);
        Ok(Arc::new(move |value: &V| -> DecodeResult<Boxed, V> {
            let Some(items) = value.as_array() else {
                return Err(DecoderError::bad_primitive("a list", value));
            };
            let decoded = items
                .iter()
                .enumerate()
                .map(|(i, item)| element(item).map_err(|e| e.prepend_index(i)))
                .collect::<Result<Vec<_>, _>>()?;
            collect(decoded).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
        }))
    }

    fn option(&mut self, opt: &OptionShape) -> Result<ErasedDecoder<V>, DerivationError> {
        let inner = self.derive(&opt.inner)?;
        let wrap = Arc::clone(&opt.wrap);
        Ok(Arc::new(move |value: &V| -> DecodeResult<Boxed, V> {
            let decoded = if value.is_null() {
                None
            } else {
                Some(inner(value)?)
            };
            wrap(decoded).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
        }))
    }

    fn tuple(&mut self, tuple: &TupleShape) -> Result<ErasedDecoder<V>, DerivationError> {
        let elements = tuple
            .elements
            .iter()
            .map(|element| self.derive(element))
            .collect::<Result<Vec<_>, _>>()?;
        let collect = Arc::clone(&tuple.collect);
        Ok(Arc::new(move |value: &V| -> DecodeResult<Boxed, V> {
            let decoded = elements
                .iter()
                .enumerate()
                .map(|(i, decode)| decode_index(value, i, |item| decode(item)))
                .collect::<Result<Vec<_>, _>>()?;
            collect(decoded).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
        }))
    }

    fn map(&mut self, map: &MapShape) -> Result<ErasedDecoder<V>, DerivationError> {
        let decode_key = self.derive(&map.key)?;
        let decode_value = self.derive(&map.value)?;
        let collect = Arc::clone(&map.collect);

        if string_keyed(self.config, &map.key) {
            return Ok(Arc::new(move |value: &V| -> DecodeResult<Boxed, V> {
                if !value.is_object() {
                    return Err(DecoderError::bad_primitive("an object", value));
                }
                let mut pairs = Vec::new();
                for name in value.object_keys() {
                    let Some(item) = value.get_field(name) else {
                        continue;
                    };
                    let k = decode_key(&V::from_string(name.to_string()))
                        .map_err(|e| e.prepend_field(name))?;
                    let v = decode_value(item).map_err(|e| e.prepend_field(name))?;
                    pairs.push((k, v));
                }
                collect(pairs).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
            }));
        }

        Ok(Arc::new(move |value: &V| -> DecodeResult<Boxed, V> {
            let Some(items) = value.as_array() else {
                return Err(DecoderError::bad_primitive("an array", value));
            };
            let pairs = (0..items.len())
                .map(|i| {
                    decode_index(value, i, |pair| {
                        let k = decode_index(pair, 0, |k| decode_key(k))?;
                        let v = decode_index(pair, 1, |v| decode_value(v))?;
                        Ok((k, v))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            collect(pairs).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
        }))
    }

    fn pointer(&mut self, pointer: &PointerShape) -> Result<ErasedDecoder<V>, DerivationError> {
        let target = self.derive(&pointer.target)?;
        let wrap = Arc::clone(&pointer.wrap);
        Ok(Arc::new(move |value: &V| -> DecodeResult<Boxed, V> {
            wrap(target(value)?).map_err(|mismatch| DecoderError::fail(mismatch.to_string()))
        }))
    }

    fn record(&mut self, record: &RecordShape) -> Result<ErasedDecoder<V>, DerivationError> {
        let strategy = self.config.case_strategy();
        let mut fields = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            fields.push(FieldPlan {
                key: strategy.apply(&field.name),
                decode: self.derive(&field.ty)?,
                optional: matches!(field.ty.shape(), ShapeKind::Option(_)),
            });
        }
        let plan = RecordPlan {
            fields,
            skip_null: self.config.skips_null_fields(),
            collect: Arc::clone(&record.collect),
        };
        Ok(Arc::new(move |value: &V| plan.decode(value)))
    }

    fn union(
        &mut self,
        type_name: &'static str,
        union: &UnionShape,
    ) -> Result<ErasedDecoder<V>, DerivationError> {
        let mut cases = Vec::with_capacity(union.cases.len());
        for case in &union.cases {
            let args = case
                .args
                .iter()
                .map(|arg| self.derive(arg))
                .collect::<Result<Vec<_>, _>>()?;
            cases.push(CasePlan {
                name: case.name.clone(),
                args,
            });
        }
        let plan = UnionPlan {
            type_name,
            cases,
            construct: Arc::clone(&union.construct),
        };
        Ok(Arc::new(move |value: &V| plan.decode(value)))
    }
}

fn forward<V: JsonValue>(
    cell: Arc<OnceLock<ErasedDecoder<V>>>,
    type_name: &'static str,
) -> ErasedDecoder<V> {
    Arc::new(move |value: &V| match cell.get() {
        Some(decoder) => decoder(value),
        None => Err(DecoderError::fail(format!(
            "decoder for `{}` used before its derivation finished",
            type_name
        ))),
    })
}
