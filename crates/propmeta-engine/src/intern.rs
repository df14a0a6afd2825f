//! Type interning.
//!
//! Every type expression is stored once and referred to by [`TypeId`].
//! The interner is shared between threads: both directions of the mapping are
//! `DashMap`s, and an id only becomes visible through the forward map after its
//! reverse entry has been written.

use crate::def::DefId;
use crate::types::{IntrinsicKind, TypeApplication, TypeArgs, TypeData, TypeId, TypeParamInfo};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU32, Ordering};

/// Thread-safe structural type interner.
pub struct TypeInterner {
    forward: DashMap<TypeData, TypeId, FxBuildHasher>,
    reverse: DashMap<TypeId, TypeData, FxBuildHasher>,
    next_id: AtomicU32,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with the intrinsics pre-registered at their fixed ids.
    pub fn new() -> Self {
        let interner = Self {
            forward: DashMap::with_hasher(FxBuildHasher::default()),
            reverse: DashMap::with_hasher(FxBuildHasher::default()),
            next_id: AtomicU32::new(TypeId::FIRST_USER),
        };
        for kind in IntrinsicKind::ALL {
            let data = TypeData::Intrinsic(kind);
            interner.reverse.insert(kind.type_id(), data.clone());
            interner.forward.insert(data, kind.type_id());
        }
        interner
    }

    /// Intern a type, returning the existing id for structurally equal data.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let TypeData::Intrinsic(kind) = data {
            return kind.type_id();
        }
        if let Some(existing) = self.forward.get(&data) {
            return *existing;
        }
        match self.forward.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = TypeId(self.next_id.fetch_add(1, Ordering::Relaxed));
                self.reverse.insert(id, entry.key().clone());
                entry.insert(id);
                id
            }
        }
    }

    /// Look up the structure behind an id.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.reverse.get(&id).map(|r| r.value().clone())
    }

    /// Number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    // -------------------------------------------------------------------------
    // Constructors
    // -------------------------------------------------------------------------

    /// Raw class reference.
    pub fn class(&self, def: DefId) -> TypeId {
        self.intern(TypeData::Class(def))
    }

    /// `base<args...>`.
    pub fn parameterized(&self, base: DefId, args: impl IntoIterator<Item = TypeId>) -> TypeId {
        self.intern(TypeData::Parameterized(TypeApplication {
            base,
            args: args.into_iter().collect(),
            owner: None,
        }))
    }

    /// `owner.base<args...>` for a nested class of a parameterized type.
    pub fn nested_parameterized(
        &self,
        owner: TypeId,
        base: DefId,
        args: impl IntoIterator<Item = TypeId>,
    ) -> TypeId {
        self.intern(TypeData::Parameterized(TypeApplication {
            base,
            args: args.into_iter().collect(),
            owner: Some(owner),
        }))
    }

    /// The `index`-th type variable declared by `owner`.
    pub fn type_param(&self, owner: DefId, index: u32, name: &str) -> TypeId {
        self.intern(TypeData::TypeParameter(TypeParamInfo {
            owner,
            index,
            name: name.into(),
        }))
    }

    pub fn array(&self, component: TypeId) -> TypeId {
        self.intern(TypeData::Array(component))
    }

    /// `?`
    pub fn unbounded_wildcard(&self) -> TypeId {
        self.intern(TypeData::Wildcard {
            upper: None,
            lower: None,
        })
    }

    /// `? extends upper`
    pub fn wildcard_extends(&self, upper: TypeId) -> TypeId {
        self.intern(TypeData::Wildcard {
            upper: Some(upper),
            lower: None,
        })
    }

    /// `? super lower`
    pub fn wildcard_super(&self, lower: TypeId) -> TypeId {
        self.intern(TypeData::Wildcard {
            upper: None,
            lower: Some(lower),
        })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Actual type arguments of a parameterized type; empty for anything else.
    pub fn type_arguments(&self, id: TypeId) -> TypeArgs {
        match self.lookup(id) {
            Some(TypeData::Parameterized(app)) => app.args,
            _ => TypeArgs::new(),
        }
    }

    /// The class behind a `Class` or `Parameterized` type.
    pub fn raw_def(&self, id: TypeId) -> Option<DefId> {
        self.lookup(id).and_then(|data| data.raw_def())
    }

    pub fn type_param_info(&self, id: TypeId) -> Option<TypeParamInfo> {
        match self.lookup(id) {
            Some(TypeData::TypeParameter(info)) => Some(info),
            _ => None,
        }
    }

    pub fn is_type_parameter(&self, id: TypeId) -> bool {
        !id.is_intrinsic() && self.type_param_info(id).is_some()
    }

    /// Check whether a type variable occurs anywhere inside `id`.
    pub fn contains_type_parameters(&self, id: TypeId) -> bool {
        self.contains_type_parameters_inner(id, 0)
    }

    fn contains_type_parameters_inner(&self, id: TypeId, depth: u32) -> bool {
        if id.is_intrinsic() || depth > propmeta_common::limits::MAX_TYPE_RESOLUTION_DEPTH {
            return false;
        }
        match self.lookup(id) {
            Some(TypeData::TypeParameter(_)) => true,
            Some(TypeData::Parameterized(app)) => {
                app.args
                    .iter()
                    .any(|&arg| self.contains_type_parameters_inner(arg, depth + 1))
                    || app
                        .owner
                        .is_some_and(|owner| self.contains_type_parameters_inner(owner, depth + 1))
            }
            Some(TypeData::Array(component)) => {
                self.contains_type_parameters_inner(component, depth + 1)
            }
            Some(TypeData::Wildcard { upper, lower }) => upper
                .into_iter()
                .chain(lower)
                .any(|bound| self.contains_type_parameters_inner(bound, depth + 1)),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod tests;
