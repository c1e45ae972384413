//! `Shaped` implementations for scalars, std containers and the ecosystem
//! types with built-in codecs.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{Fields, PrimitiveKind, Shaped, TypeRef, TypeShape};

macro_rules! shaped_primitive {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Shaped for $ty {
                fn shape() -> TypeShape<Self> {
                    TypeShape::primitive(PrimitiveKind::$kind)
                }
            }
        )+
    };
}

shaped_primitive! {
    () => Unit,
    bool => Bool,
    char => Char,
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Uuid => Uuid,
    DateTime<Utc> => DateTime,
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::sequence(|items: &Self| items.iter().collect(), |items: Vec<T>| items)
    }
}

impl<T: Shaped> Shaped for VecDeque<T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::sequence(|items: &Self| items.iter().collect(), |items: Vec<T>| items.into())
    }
}

impl<T: Shaped + Eq + Hash> Shaped for HashSet<T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::sequence(
            |items: &Self| items.iter().collect(),
            |items: Vec<T>| items.into_iter().collect(),
        )
    }
}

impl<T: Shaped + Ord> Shaped for BTreeSet<T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::sequence(
            |items: &Self| items.iter().collect(),
            |items: Vec<T>| items.into_iter().collect(),
        )
    }
}

impl<T: Shaped> Shaped for Option<T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::optional(|value: &Self| value.as_ref(), |value: Option<T>| value)
    }
}

impl<T: Shaped> Shaped for Box<T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::pointer(|value: &Self| &**value, Box::new)
    }
}

impl<T: Shaped> Shaped for Arc<T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::pointer(|value: &Self| &**value, Arc::new)
    }
}

impl<K: Shaped + Eq + Hash, T: Shaped> Shaped for HashMap<K, T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::map(
            |map: &Self| map.iter().collect(),
            |entries: Vec<(K, T)>| entries.into_iter().collect(),
        )
    }
}

impl<K: Shaped + Ord, T: Shaped> Shaped for BTreeMap<K, T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::map(
            |map: &Self| map.iter().collect(),
            |entries: Vec<(K, T)>| entries.into_iter().collect(),
        )
    }
}

impl<K: Shaped + Eq + Hash, T: Shaped> Shaped for IndexMap<K, T> {
    fn shape() -> TypeShape<Self> {
        TypeShape::map(
            |map: &Self| map.iter().collect(),
            |entries: Vec<(K, T)>| entries.into_iter().collect(),
        )
    }
}

macro_rules! shaped_tuple {
    ($($T:ident $v:ident),+) => {
        impl<$($T: Shaped),+> Shaped for ($($T,)+) {
            fn shape() -> TypeShape<Self> {
                TypeShape::tuple(
                    vec![$(TypeRef::of::<$T>()),+],
                    |value: &Self| {
                        let ($($v,)+) = value;
                        vec![$($v as &dyn Any),+]
                    },
                    |fields: &mut Fields| Ok(($(fields.take::<$T>()?,)+)),
                )
            }
        }
    };
}

shaped_tuple!(A a);
shaped_tuple!(A a, B b);
shaped_tuple!(A a, B b, C c);
shaped_tuple!(A a, B b, C c, D d);
shaped_tuple!(A a, B b, C c, D d, E e);
shaped_tuple!(A a, B b, C c, D d, E e, F f);
shaped_tuple!(A a, B b, C c, D d, E e, F f, G g);
shaped_tuple!(A a, B b, C c, D d, E e, F f, G g, H h);
