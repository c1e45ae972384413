use std::any::Any;
use std::sync::{Arc, OnceLock};

use super::{string_keyed, CodecMap, Derived, Lookup};
use crate::config::{Configuration, FieldOverride, OverrideFn};
use crate::encode::{primitive_encoder, ErasedEncoder};
use crate::error::DerivationError;
use crate::shape::{
    MapShape, OptionShape, PointerShape, Project, RecordShape, SeqShape, ShapeKind, TupleShape,
    TypeKey, TypeRef, UnionShape,
};
use crate::value::JsonValue;

pub(crate) fn derive_encoders<V: JsonValue>(
    ty: &TypeRef,
    config: &Configuration<V>,
) -> Result<Derived<ErasedEncoder<V>>, DerivationError> {
    tracing::debug!(type_name = ty.name(), "deriving encoder");
    let mut deriver = EncoderDeriver {
        config,
        codecs: CodecMap::new(),
    };
    let root = deriver.derive(ty)?;
    let members = deriver.codecs.into_ready();
    tracing::debug!(
        type_name = ty.name(),
        members = members.len(),
        "derived encoder"
    );
    Ok(Derived { root, members })
}

struct EncoderDeriver<'c, V> {
    config: &'c Configuration<V>,
    codecs: CodecMap<ErasedEncoder<V>>,
}

struct FieldPlan<V> {
    key: String,
    get: Project,
    encode: ErasedEncoder<V>,
    decide: Option<OverrideFn<V>>,
}

struct CasePlan<V> {
    name: String,
    args: Vec<ErasedEncoder<V>>,
}

impl<V: JsonValue> EncoderDeriver<'_, V> {
    fn derive(&mut self, ty: &TypeRef) -> Result<ErasedEncoder<V>, DerivationError> {
        let key = ty.key();
        if let Some(extra) = self.config.extra_coder(key) {
            return Ok(Arc::clone(&extra.encode));
        }
        match self.codecs.lookup(key) {
            Some(Lookup::Ready(encoder)) => return Ok(encoder),
            Some(Lookup::Pending(cell)) => {
                tracing::trace!(type_name = ty.name(), "forward reference to encoder");
                return Ok(forward(cell));
            }
            None => {}
        }

        let encoder = match ty.shape() {
            ShapeKind::Primitive(kind) => primitive_encoder(kind),
            ShapeKind::Array(seq) => self.sequence(&seq)?,
            ShapeKind::Option(opt) => self.option(&opt)?,
            ShapeKind::Tuple(tuple) => self.tuple(&tuple)?,
            ShapeKind::Map(map) => self.map(&map)?,
            ShapeKind::Pointer(pointer) => self.pointer(&pointer)?,
            ShapeKind::Record(record) => {
                self.codecs.reserve(key);
                let derived = self.record(key, &record);
                if derived.is_err() {
                    self.codecs.abandon(key);
                }
                derived?
            }
            ShapeKind::Union(union) => {
                self.codecs.reserve(key);
                let derived = self.union(&union);
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
        self.codecs.complete(key, Arc::clone(&encoder));
        Ok(encoder)
    }

    fn sequence(&mut self, seq: &SeqShape) -> Result<ErasedEncoder<V>, DerivationError> {
        let element = self.derive(&seq.element)?;
        let items = Arc::clone(&seq.items);
        Ok(Arc::new(move |value: &dyn Any| match items(value) {
            Some(elements) => V::from_array(elements.into_iter().map(|e| element(e)).collect()),
            None => V::null(),
        }))
    }

    fn option(&mut self, opt: &OptionShape) -> Result<ErasedEncoder<V>, DerivationError> {
        let inner = self.derive(&opt.inner)?;
        let inspect = Arc::clone(&opt.inspect);
        Ok(Arc::new(move |value: &dyn Any| match inspect(value) {
            Some(Some(present)) => inner(present),
            _ => V::null(),
        }))
    }

    fn tuple(&mut self, tuple: &TupleShape) -> Result<ErasedEncoder<V>, DerivationError> {
        let elements = tuple
            .elements
            .iter()
            .map(|element| self.derive(element))
            .collect::<Result<Vec<_>, _>>()?;
        let items = Arc::clone(&tuple.items);
        Ok(Arc::new(move |value: &dyn Any| match items(value) {
            Some(values) => V::from_array(
                elements
                    .iter()
                    .zip(values)
                    .map(|(encode, item)| encode(item))
                    .collect(),
            ),
            None => V::null(),
        }))
    }

    fn map(&mut self, map: &MapShape) -> Result<ErasedEncoder<V>, DerivationError> {
        let encode_key = self.derive(&map.key)?;
        let encode_value = self.derive(&map.value)?;
        let entries = Arc::clone(&map.entries);

        if string_keyed(self.config, &map.key) {
            return Ok(Arc::new(move |value: &dyn Any| match entries(value) {
                Some(pairs) => V::from_object(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (key_text(&encode_key(k)), encode_value(v)))
                        .collect(),
                ),
                None => V::null(),
            }));
        }

        Ok(Arc::new(move |value: &dyn Any| match entries(value) {
            Some(pairs) => V::from_array(
                pairs
                    .into_iter()
                    .map(|(k, v)| V::from_array(vec![encode_key(k), encode_value(v)]))
                    .collect(),
            ),
            None => V::null(),
        }))
    }

    fn pointer(&mut self, pointer: &PointerShape) -> Result<ErasedEncoder<V>, DerivationError> {
        let target = self.derive(&pointer.target)?;
        let deref = Arc::clone(&pointer.deref);
        Ok(Arc::new(move |value: &dyn Any| match deref(value) {
            Some(inner) => target(inner),
            None => V::null(),
        }))
    }

    fn record(
        &mut self,
        key: TypeKey,
        record: &RecordShape,
    ) -> Result<ErasedEncoder<V>, DerivationError> {
        self.config.validate_overrides(key, record)?;
        let strategy = self.config.case_strategy();
        let skip_null = self.config.skips_null_fields();

        let mut plans = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let encode = self.derive(&field.ty)?;
            plans.push(FieldPlan {
                key: strategy.apply(&field.name),
                get: Arc::clone(&field.get),
                encode,
                decide: self
                    .config
                    .field_override(key, &field.name)
                    .map(|entry| Arc::clone(&entry.decide)),
            });
        }

        Ok(Arc::new(move |value: &dyn Any| {
            let mut fields = Vec::with_capacity(plans.len());
            for plan in &plans {
                let Some(field) = (plan.get)(value) else {
                    continue;
                };
                let decision = match &plan.decide {
                    Some(decide) => decide(field),
                    None => FieldOverride::UseDerived,
                };
                match decision {
                    FieldOverride::Omit => {}
                    FieldOverride::UseLiteral(literal) => fields.push((plan.key.clone(), literal)),
                    FieldOverride::UseDerived => {
                        let encoded = (plan.encode)(field);
                        if !(skip_null && encoded.is_null()) {
                            fields.push((plan.key.clone(), encoded));
                        }
                    }
                }
            }
            V::from_object(fields)
        }))
    }

    fn union(&mut self, union: &UnionShape) -> Result<ErasedEncoder<V>, DerivationError> {
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

        let split = Arc::clone(&union.split);
        Ok(Arc::new(move |value: &dyn Any| {
            let Some(variant) = split(value) else {
                return V::null();
            };
            let Some(case) = cases.get(variant.index) else {
                return V::null();
            };
            if case.args.is_empty() {
                return V::from_string(case.name.clone());
            }
            let mut items = Vec::with_capacity(case.args.len() + 1);
            items.push(V::from_string(case.name.clone()));
            items.extend(
                case.args
                    .iter()
                    .zip(variant.args)
                    .map(|(encode, arg)| encode(arg)),
            );
            V::from_array(items)
        }))
    }
}

fn forward<V: JsonValue>(cell: Arc<OnceLock<ErasedEncoder<V>>>) -> ErasedEncoder<V> {
    Arc::new(move |value: &dyn Any| match cell.get() {
        Some(encoder) => encoder(value),
        None => V::null(),
    })
}

fn key_text<V: JsonValue>(encoded: &V) -> String {
    encoded
        .as_string()
        .map_or_else(|| encoded.any_to_string(), str::to_owned)
}
