//! Type representation for the metadata engine.
//!
//! Types are described explicitly rather than recovered from an erased
//! runtime. A host registers classes in a [`ClassStore`](crate::ClassStore)
//! and builds type expressions through the [`TypeInterner`](crate::TypeInterner),
//! which hands out [`TypeId`] handles. Two structurally identical expressions
//! always intern to the same `TypeId`, so type equality is a `u32` compare.
//!
//! | Variant | Example |
//! |---------|---------|
//! | `Intrinsic` | `Object`, `int`, `String` |
//! | `Class` | raw `List` |
//! | `Parameterized` | `List<Address>`, `Outer<String>.Inner` |
//! | `TypeParameter` | `T` declared by `Box<T>` |
//! | `Array` | `T[]`, `String[]` |
//! | `Wildcard` | `? extends Number` |

use crate::def::DefId;
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The top type. Every erased type variable without a bound becomes this,
    /// and every resolution that cannot do better falls back to it.
    pub const OBJECT: Self = Self(0);
    pub const VOID: Self = Self(1);
    pub const BOOLEAN: Self = Self(2);
    pub const CHAR: Self = Self(3);
    pub const INT: Self = Self(4);
    pub const LONG: Self = Self(5);
    pub const FLOAT: Self = Self(6);
    pub const DOUBLE: Self = Self(7);
    pub const STRING: Self = Self(8);

    /// First id handed out to non-intrinsic types.
    pub const FIRST_USER: u32 = 16;

    /// Check if this is one of the fixed intrinsic ids.
    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    /// Check if this is the erasure placeholder.
    #[inline]
    pub const fn is_object(self) -> bool {
        self.0 == Self::OBJECT.0
    }
}

/// Built-in types with fixed ids.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Object,
    Void,
    Boolean,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl IntrinsicKind {
    pub const ALL: [Self; 9] = [
        Self::Object,
        Self::Void,
        Self::Boolean,
        Self::Char,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::String,
    ];

    pub const fn type_id(self) -> TypeId {
        match self {
            Self::Object => TypeId::OBJECT,
            Self::Void => TypeId::VOID,
            Self::Boolean => TypeId::BOOLEAN,
            Self::Char => TypeId::CHAR,
            Self::Int => TypeId::INT,
            Self::Long => TypeId::LONG,
            Self::Float => TypeId::FLOAT,
            Self::Double => TypeId::DOUBLE,
            Self::String => TypeId::STRING,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Void => "void",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "String",
        }
    }
}

/// Argument list of a parameterized type.
pub type TypeArgs = SmallVec<[TypeId; 2]>;

/// A generic class applied to type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplication {
    /// The generic class being applied.
    pub base: DefId,
    /// The actual type arguments, positionally matching the base's parameters.
    pub args: TypeArgs,
    /// For nested generic types, the enclosing parameterized type
    /// (`Outer<String>` in `Outer<String>.Inner<Integer>`).
    pub owner: Option<TypeId>,
}

/// A type variable reference.
///
/// Identity is the declaring class plus position, so `T` of `Box<T>` and `T` of
/// `List<T>` are different variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    /// Class that declares the variable.
    pub owner: DefId,
    /// Position in the owner's parameter list.
    pub index: u32,
    /// Declared name (for display).
    pub name: Arc<str>,
}

/// A declared type parameter together with its bound.
///
/// Bounds live beside the declaration instead of inside the interned variable
/// so that self-referential bounds (`T extends Comparable<T>`) can be expressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamDecl {
    /// The `TypeParameter` type this declaration introduces.
    pub param: TypeId,
    /// The first declared bound, if any.
    pub bound: Option<TypeId>,
}

impl TypeParamDecl {
    pub const fn new(param: TypeId) -> Self {
        Self { param, bound: None }
    }

    pub const fn bounded(param: TypeId, bound: TypeId) -> Self {
        Self {
            param,
            bound: Some(bound),
        }
    }
}

/// Structural type data. Interned by [`TypeInterner`](crate::TypeInterner).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// A raw (non-parameterized) class reference.
    Class(DefId),
    Parameterized(TypeApplication),
    TypeParameter(TypeParamInfo),
    /// Array with the given component type.
    Array(TypeId),
    /// `?`, `? extends U` or `? super L`.
    Wildcard {
        upper: Option<TypeId>,
        lower: Option<TypeId>,
    },
}

impl TypeData {
    /// The class a `Class` or `Parameterized` type refers to.
    pub fn raw_def(&self) -> Option<DefId> {
        match self {
            Self::Class(def) => Some(*def),
            Self::Parameterized(app) => Some(app.base),
            _ => None,
        }
    }

    #[inline]
    pub fn is_type_parameter(&self) -> bool {
        matches!(self, Self::TypeParameter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_ids_are_fixed() {
        for (index, kind) in IntrinsicKind::ALL.iter().enumerate() {
            assert_eq!(kind.type_id(), TypeId(index as u32));
            assert!(kind.type_id().is_intrinsic());
        }
        assert!(TypeId::OBJECT.is_object());
        assert!(!TypeId::STRING.is_object());
        assert!(!TypeId(TypeId::FIRST_USER).is_intrinsic());
    }

    #[test]
    fn test_raw_def() {
        let def = DefId(7);
        assert_eq!(TypeData::Class(def).raw_def(), Some(def));
        let app = TypeApplication {
            base: def,
            args: TypeArgs::from_slice(&[TypeId::STRING]),
            owner: None,
        };
        assert_eq!(TypeData::Parameterized(app).raw_def(), Some(def));
        assert_eq!(TypeData::Array(TypeId::INT).raw_def(), None);
        assert_eq!(TypeData::Intrinsic(IntrinsicKind::String).raw_def(), None);
    }
}
