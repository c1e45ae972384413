//! Type shape descriptors.
//!
//! A [`TypeShape`] describes how a Rust type is structured: a primitive, a
//! sequence, an optional value, a tuple, a map, a record of named fields or a
//! union of named cases. Types opt in by implementing [`Shaped`]; the crate
//! implements it for the standard scalars and containers.
//!
//! Shapes reference their member types through [`TypeRef`], which pairs the
//! member's identity with a function producing its shape. Member shapes are
//! therefore only built when the derivation engine asks for them, which is
//! what lets a type refer to itself.
//!
//! # Example
//!
//! ```rust
//! use shapecodec::{Shaped, TypeShape};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Shaped for Person {
//!     fn shape() -> TypeShape<Self> {
//!         TypeShape::<Self>::record()
//!             .field("Name", |p| &p.name)
//!             .field("Age", |p| &p.age)
//!             .build(|fields| {
//!                 Ok(Person {
//!                     name: fields.take()?,
//!                     age: fields.take()?,
//!                 })
//!             })
//!     }
//! }
//! ```

mod impls;

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

pub(crate) type Boxed = Box<dyn Any>;

pub(crate) type Project = Arc<dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync>;
pub(crate) type Items = Arc<dyn Fn(&dyn Any) -> Option<Vec<&dyn Any>> + Send + Sync>;
pub(crate) type Entries =
    Arc<dyn Fn(&dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>> + Send + Sync>;
pub(crate) type Inspect = Arc<dyn Fn(&dyn Any) -> Option<Option<&dyn Any>> + Send + Sync>;
pub(crate) type Split = Arc<dyn Fn(&dyn Any) -> Option<Variant<'_>> + Send + Sync>;
pub(crate) type Collect = Arc<dyn Fn(Vec<Boxed>) -> Result<Boxed, ShapeMismatch> + Send + Sync>;
pub(crate) type CollectPairs =
    Arc<dyn Fn(Vec<(Boxed, Boxed)>) -> Result<Boxed, ShapeMismatch> + Send + Sync>;
pub(crate) type Wrap = Arc<dyn Fn(Option<Boxed>) -> Result<Boxed, ShapeMismatch> + Send + Sync>;
pub(crate) type Rewrap = Arc<dyn Fn(Boxed) -> Result<Boxed, ShapeMismatch> + Send + Sync>;
pub(crate) type Construct =
    Arc<dyn Fn(usize, Vec<Boxed>) -> Result<Boxed, ShapeMismatch> + Send + Sync>;

/// A type whose structure is known to the derivation engine.
pub trait Shaped: Sized + 'static {
    fn shape() -> TypeShape<Self>;
}

/// Identity of a type: its `TypeId` plus its fully-qualified name for messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A reference to a member type: its identity and a way to obtain its shape.
#[derive(Clone, Copy)]
pub struct TypeRef {
    key: TypeKey,
    shape: fn() -> ShapeKind,
}

impl TypeRef {
    pub fn of<T: Shaped>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            shape: erased_shape::<T>,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name
    }

    /// Builds the referenced type's shape.
    pub fn shape(&self) -> ShapeKind {
        (self.shape)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.key).finish()
    }
}

fn erased_shape<T: Shaped>() -> ShapeKind {
    T::shape().kind
}

/// Scalar types with a built-in codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Unit,
    Bool,
    Char,
    String,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    Decimal,
    Uuid,
    DateTime,
}

impl PrimitiveKind {
    /// True when values encode to JSON strings usable as object keys.
    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            PrimitiveKind::String | PrimitiveKind::Char | PrimitiveKind::Uuid
        )
    }
}

/// The structural classification of a type, with the accessors the
/// derivation engine needs to read and build values of it.
#[derive(Clone)]
pub enum ShapeKind {
    Primitive(PrimitiveKind),
    Array(SeqShape),
    Option(OptionShape),
    Tuple(TupleShape),
    Map(MapShape),
    Record(RecordShape),
    Union(UnionShape),
    /// An owning pointer such as `Box<T>`; transparent on the wire.
    Pointer(PointerShape),
    /// Known only by identity; needs an extra coder.
    Opaque,
}

impl fmt::Debug for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
            ShapeKind::Array(seq) => f.debug_tuple("Array").field(&seq.element).finish(),
            ShapeKind::Option(opt) => f.debug_tuple("Option").field(&opt.inner).finish(),
            ShapeKind::Tuple(tuple) => f.debug_tuple("Tuple").field(&tuple.elements).finish(),
            ShapeKind::Map(map) => f
                .debug_struct("Map")
                .field("key", &map.key)
                .field("value", &map.value)
                .finish(),
            ShapeKind::Record(record) => f
                .debug_list()
                .entries(record.fields.iter().map(|field| (&field.name, &field.ty)))
                .finish(),
            ShapeKind::Union(union) => f
                .debug_list()
                .entries(union.cases.iter().map(|case| (&case.name, &case.args)))
                .finish(),
            ShapeKind::Pointer(pointer) => f.debug_tuple("Pointer").field(&pointer.target).finish(),
            ShapeKind::Opaque => f.write_str("Opaque"),
        }
    }
}

#[derive(Clone)]
pub struct SeqShape {
    pub(crate) element: TypeRef,
    pub(crate) items: Items,
    pub(crate) collect: Collect,
}

impl SeqShape {
    pub fn element(&self) -> &TypeRef {
        &self.element
    }
}

#[derive(Clone)]
pub struct OptionShape {
    pub(crate) inner: TypeRef,
    pub(crate) inspect: Inspect,
    pub(crate) wrap: Wrap,
}

impl OptionShape {
    pub fn inner(&self) -> &TypeRef {
        &self.inner
    }
}

#[derive(Clone)]
pub struct TupleShape {
    pub(crate) elements: Vec<TypeRef>,
    pub(crate) items: Items,
    pub(crate) collect: Collect,
}

impl TupleShape {
    pub fn elements(&self) -> &[TypeRef] {
        &self.elements
    }
}

#[derive(Clone)]
pub struct MapShape {
    pub(crate) key: TypeRef,
    pub(crate) value: TypeRef,
    pub(crate) entries: Entries,
    pub(crate) collect: CollectPairs,
}

impl MapShape {
    pub fn key(&self) -> &TypeRef {
        &self.key
    }

    pub fn value(&self) -> &TypeRef {
        &self.value
    }
}

#[derive(Clone)]
pub struct FieldShape {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) get: Project,
}

impl FieldShape {
    /// The declared field name, before any case strategy is applied.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }
}

#[derive(Clone)]
pub struct RecordShape {
    pub(crate) fields: Vec<FieldShape>,
    pub(crate) collect: Collect,
}

impl RecordShape {
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }
}

#[derive(Debug, Clone)]
pub struct CaseShape {
    pub(crate) name: String,
    pub(crate) args: Vec<TypeRef>,
}

impl CaseShape {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }
}

#[derive(Clone)]
pub struct UnionShape {
    pub(crate) cases: Vec<CaseShape>,
    pub(crate) split: Split,
    pub(crate) construct: Construct,
}

impl UnionShape {
    pub fn cases(&self) -> &[CaseShape] {
        &self.cases
    }
}

#[derive(Clone)]
pub struct PointerShape {
    pub(crate) target: TypeRef,
    pub(crate) deref: Project,
    pub(crate) wrap: Rewrap,
}

impl PointerShape {
    pub fn target(&self) -> &TypeRef {
        &self.target
    }
}

/// Raised when a shape's constructor receives values it was not built for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeMismatch {
    #[error("no value supplied for position {position}")]
    MissingValue { position: usize },

    #[error("value at position {position} is not a `{expected}`")]
    WrongType {
        position: usize,
        expected: &'static str,
    },

    #[error("no case with index {0}")]
    UnknownCase(usize),
}

/// Decoded member values handed to a record, tuple or union constructor,
/// in declaration order.
pub struct Fields {
    values: std::vec::IntoIter<Boxed>,
    position: usize,
}

impl Fields {
    pub(crate) fn new(values: Vec<Boxed>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Takes the next value, which must be a `F`.
    pub fn take<F: Any>(&mut self) -> Result<F, ShapeMismatch> {
        let position = self.position;
        self.position += 1;
        let value = self
            .values
            .next()
            .ok_or(ShapeMismatch::MissingValue { position })?;
        downcast::<F>(value, position)
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// The case a union value belongs to, and borrowed views of its arguments.
pub struct Variant<'a> {
    pub(crate) index: usize,
    pub(crate) args: Vec<&'a dyn Any>,
}

impl<'a> Variant<'a> {
    /// Starts a variant for the case declared at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            args: Vec::new(),
        }
    }

    /// Appends the next case argument.
    pub fn arg<A: Any>(mut self, value: &'a A) -> Self {
        self.args.push(value);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

fn downcast<F: Any>(value: Boxed, position: usize) -> Result<F, ShapeMismatch> {
    value
        .downcast::<F>()
        .map(|boxed| *boxed)
        .map_err(|_| ShapeMismatch::WrongType {
            position,
            expected: type_name::<F>(),
        })
}

fn downcast_all<F: Any>(values: Vec<Boxed>) -> Result<Vec<F>, ShapeMismatch> {
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| downcast::<F>(value, position))
        .collect()
}

fn boxed<T: Any>(value: T) -> Boxed {
    Box::new(value)
}

// The helpers below pin closure signatures to the higher-ranked forms the
// erased aliases expect.

fn project<F>(f: F) -> Project
where
    F: Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn items<F>(f: F) -> Items
where
    F: Fn(&dyn Any) -> Option<Vec<&dyn Any>> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn entries<F>(f: F) -> Entries
where
    F: Fn(&dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn inspect<F>(f: F) -> Inspect
where
    F: Fn(&dyn Any) -> Option<Option<&dyn Any>> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn split<F>(f: F) -> Split
where
    F: Fn(&dyn Any) -> Option<Variant<'_>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The shape of `T`.
///
/// Built through the typed constructors below, so every accessor stored in
/// the shape is guaranteed to operate on `T` itself.
pub struct TypeShape<T> {
    kind: ShapeKind,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Shaped> TypeShape<T> {
    fn from_kind(kind: ShapeKind) -> Self {
        Self {
            kind,
            _marker: PhantomData,
        }
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub(crate) fn primitive(kind: PrimitiveKind) -> Self {
        Self::from_kind(ShapeKind::Primitive(kind))
    }

    /// A type without structural rule. Codecs for it must come from
    /// `Configuration::with_extra_coder`.
    pub fn opaque() -> Self {
        Self::from_kind(ShapeKind::Opaque)
    }

    /// A homogeneous sequence encoded as a JSON array.
    pub fn sequence<E, I, C>(items_of: I, collect: C) -> Self
    where
        E: Shaped,
        I: Fn(&T) -> Vec<&E> + Send + Sync + 'static,
        C: Fn(Vec<E>) -> T + Send + Sync + 'static,
    {
        Self::from_kind(ShapeKind::Array(SeqShape {
            element: TypeRef::of::<E>(),
            items: items(move |value| {
                value
                    .downcast_ref::<T>()
                    .map(|seq| items_of(seq).into_iter().map(|e| e as &dyn Any).collect())
            }),
            collect: Arc::new(move |values: Vec<Boxed>| downcast_all::<E>(values).map(|v| boxed(collect(v)))),
        }))
    }

    /// An optional value; `None` encodes as JSON null.
    pub fn optional<E, G, W>(get: G, wrap: W) -> Self
    where
        E: Shaped,
        G: Fn(&T) -> Option<&E> + Send + Sync + 'static,
        W: Fn(Option<E>) -> T + Send + Sync + 'static,
    {
        Self::from_kind(ShapeKind::Option(OptionShape {
            inner: TypeRef::of::<E>(),
            inspect: inspect(move |value| {
                value
                    .downcast_ref::<T>()
                    .map(|opt| get(opt).map(|e| e as &dyn Any))
            }),
            wrap: Arc::new(move |value: Option<Boxed>| match value {
                Some(inner) => downcast::<E>(inner, 0).map(|e| boxed(wrap(Some(e)))),
                None => Ok(boxed(wrap(None))),
            }),
        }))
    }

    /// A fixed-arity tuple encoded positionally.
    pub fn tuple<I, B>(elements: Vec<TypeRef>, items_of: I, build: B) -> Self
    where
        I: Fn(&T) -> Vec<&dyn Any> + Send + Sync + 'static,
        B: Fn(&mut Fields) -> Result<T, ShapeMismatch> + Send + Sync + 'static,
    {
        Self::from_kind(ShapeKind::Tuple(TupleShape {
            elements,
            items: items(move |value| value.downcast_ref::<T>().map(|tuple| items_of(tuple))),
            collect: Arc::new(move |values: Vec<Boxed>| build(&mut Fields::new(values)).map(boxed)),
        }))
    }

    /// A key/value map.
    pub fn map<K, E, I, C>(entries_of: I, collect: C) -> Self
    where
        K: Shaped,
        E: Shaped,
        I: Fn(&T) -> Vec<(&K, &E)> + Send + Sync + 'static,
        C: Fn(Vec<(K, E)>) -> T + Send + Sync + 'static,
    {
        Self::from_kind(ShapeKind::Map(MapShape {
            key: TypeRef::of::<K>(),
            value: TypeRef::of::<E>(),
            entries: entries(move |value| {
                value.downcast_ref::<T>().map(|map| {
                    entries_of(map)
                        .into_iter()
                        .map(|(k, v)| (k as &dyn Any, v as &dyn Any))
                        .collect()
                })
            }),
            collect: Arc::new(move |pairs: Vec<(Boxed, Boxed)>| {
                pairs
                    .into_iter()
                    .enumerate()
                    .map(|(position, (k, v))| Ok((downcast::<K>(k, position)?, downcast::<E>(v, position)?)))
                    .collect::<Result<Vec<_>, ShapeMismatch>>()
                    .map(|pairs| boxed(collect(pairs)))
            }),
        }))
    }

    /// An owning pointer to `E`, encoded exactly as `E`.
    pub fn pointer<E, D, W>(deref: D, wrap: W) -> Self
    where
        E: Shaped,
        D: Fn(&T) -> &E + Send + Sync + 'static,
        W: Fn(E) -> T + Send + Sync + 'static,
    {
        Self::from_kind(ShapeKind::Pointer(PointerShape {
            target: TypeRef::of::<E>(),
            deref: project(move |value| {
                value
                    .downcast_ref::<T>()
                    .map(|pointer| deref(pointer) as &dyn Any)
            }),
            wrap: Arc::new(move |value: Boxed| downcast::<E>(value, 0).map(|e| boxed(wrap(e)))),
        }))
    }

    /// Starts a record: named fields encoded as a JSON object.
    pub fn record() -> RecordBuilder<T> {
        RecordBuilder {
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Starts a union: named cases with positional arguments.
    pub fn union() -> UnionBuilder<T> {
        UnionBuilder {
            cases: Vec::new(),
            _marker: PhantomData,
        }
    }
}

/// Builder for record shapes. Fields are kept in declaration order.
pub struct RecordBuilder<T> {
    fields: Vec<FieldShape>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Shaped> RecordBuilder<T> {
    /// Declares a field and how to read it from a record value.
    pub fn field<F, G>(mut self, name: impl Into<String>, get: G) -> Self
    where
        F: Shaped,
        G: Fn(&T) -> &F + Send + Sync + 'static,
    {
        self.fields.push(FieldShape {
            name: name.into(),
            ty: TypeRef::of::<F>(),
            get: project(move |value| value.downcast_ref::<T>().map(|record| get(record) as &dyn Any)),
        });
        self
    }

    /// Finishes the record with its constructor. The constructor receives the
    /// decoded fields in declaration order.
    pub fn build<B>(self, build: B) -> TypeShape<T>
    where
        B: Fn(&mut Fields) -> Result<T, ShapeMismatch> + Send + Sync + 'static,
    {
        TypeShape::from_kind(ShapeKind::Record(RecordShape {
            fields: self.fields,
            collect: Arc::new(move |values: Vec<Boxed>| build(&mut Fields::new(values)).map(boxed)),
        }))
    }
}

/// Builder for union shapes. Case indices follow declaration order.
pub struct UnionBuilder<T> {
    cases: Vec<CaseShape>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Shaped> UnionBuilder<T> {
    /// Declares the next case and the types of its arguments.
    pub fn case(mut self, name: impl Into<String>, args: &[TypeRef]) -> Self {
        self.cases.push(CaseShape {
            name: name.into(),
            args: args.to_vec(),
        });
        self
    }

    /// Finishes the union. `classify` names the case of a value and borrows
    /// its arguments; `build` constructs a value from a case index and its
    /// decoded arguments.
    pub fn build<S, B>(self, classify: S, build: B) -> TypeShape<T>
    where
        S: for<'a> Fn(&'a T) -> Variant<'a> + Send + Sync + 'static,
        B: Fn(usize, &mut Fields) -> Result<T, ShapeMismatch> + Send + Sync + 'static,
    {
        TypeShape::from_kind(ShapeKind::Union(UnionShape {
            cases: self.cases,
            split: split(move |value| value.downcast_ref::<T>().map(|union| classify(union))),
            construct: Arc::new(move |index: usize, values: Vec<Boxed>| {
                build(index, &mut Fields::new(values)).map(boxed)
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
        y: i32,
    }

    impl Shaped for Point {
        fn shape() -> TypeShape<Self> {
            TypeShape::<Self>::record()
                .field("X", |p| &p.x)
                .field("Y", |p| &p.y)
                .build(|fields| {
                    Ok(Point {
                        x: fields.take()?,
                        y: fields.take()?,
                    })
                })
        }
    }

    enum Toggle {
        Off,
        On(u8),
    }

    impl Shaped for Toggle {
        fn shape() -> TypeShape<Self> {
            TypeShape::<Self>::union()
                .case("Off", &[])
                .case("On", &[TypeRef::of::<u8>()])
                .build(
                    |value| match value {
                        Toggle::Off => Variant::new(0),
                        Toggle::On(level) => Variant::new(1).arg(level),
                    },
                    |case, args| match case {
                        0 => Ok(Toggle::Off),
                        1 => Ok(Toggle::On(args.take()?)),
                        other => Err(ShapeMismatch::UnknownCase(other)),
                    },
                )
        }
    }

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<Point>(), TypeKey::of::<Point>());
        assert_ne!(TypeKey::of::<Point>(), TypeKey::of::<Toggle>());
        assert!(TypeKey::of::<Point>().name().ends_with("Point"));
    }

    #[test]
    fn test_record_shape_lists_fields_in_order() {
        let shape = Point::shape();
        let ShapeKind::Record(record) = shape.kind() else {
            panic!("expected a record shape");
        };
        let names: Vec<_> = record.fields().iter().map(FieldShape::name).collect();
        assert_eq!(names, vec!["X", "Y"]);
        assert_eq!(record.fields()[0].ty().key(), TypeKey::of::<i32>());
    }

    #[test]
    fn test_record_projection_and_construction() {
        let ShapeKind::Record(record) = Point::shape().kind else {
            panic!("expected a record shape");
        };
        let point = Point { x: 3, y: 4 };
        let y = (record.fields[1].get)(&point).and_then(|v| v.downcast_ref::<i32>());
        assert_eq!(y, Some(&4));

        let rebuilt = (record.collect)(vec![Box::new(1i32) as Boxed, Box::new(2i32)]).unwrap();
        let rebuilt = rebuilt.downcast::<Point>().unwrap();
        assert_eq!((rebuilt.x, rebuilt.y), (1, 2));
    }

    #[test]
    fn test_record_construction_reports_mismatch() {
        let ShapeKind::Record(record) = Point::shape().kind else {
            panic!("expected a record shape");
        };
        let error = (record.collect)(vec![Box::new("nope") as Boxed]).unwrap_err();
        assert_eq!(
            error,
            ShapeMismatch::WrongType {
                position: 0,
                expected: "i32"
            }
        );

        let error = (record.collect)(vec![Box::new(1i32) as Boxed]).unwrap_err();
        assert_eq!(error, ShapeMismatch::MissingValue { position: 1 });
    }

    #[test]
    fn test_union_split() {
        let ShapeKind::Union(union) = Toggle::shape().kind else {
            panic!("expected a union shape");
        };
        assert_eq!(union.cases().len(), 2);
        assert_eq!(union.cases()[1].args().len(), 1);

        let on = Toggle::On(7);
        let variant = (union.split)(&on).unwrap();
        assert_eq!(variant.index(), 1);
        assert_eq!(variant.args[0].downcast_ref::<u8>(), Some(&7));

        let off = (union.construct)(0, Vec::new()).unwrap();
        assert!(matches!(*off.downcast::<Toggle>().unwrap(), Toggle::Off));
    }

    #[test]
    fn test_string_like_primitives() {
        assert!(PrimitiveKind::String.is_string_like());
        assert!(PrimitiveKind::Uuid.is_string_like());
        assert!(!PrimitiveKind::I32.is_string_like());
    }
}
