//! Type-variable map construction and type resolution.
//!
//! For a described type, the map records which concrete type the hierarchy
//! substitutes for every type parameter it can see:
//!
//! ```text
//! class Base<T>          { T getValue() }
//! class Mid<U>  extends Base<U>
//! class Leaf    extends Mid<String>
//!
//! map(Leaf) = { Mid.U -> String, Base.T -> String }
//! ```
//!
//! The walk goes leaf to root and never overwrites an entry, so the most
//! specific substitution for a variable always wins. Sources, in order:
//! 1. the type's generic interfaces (and their interfaces, recursively)
//! 2. the generic superclass chain, with each superclass's interfaces
//! 3. for nested types, each enclosing type's generic superclass
//!
//! Owner types of nested parameterized types (`Outer<String>.Inner`) are
//! populated whenever the nested type is.

use crate::def::DefId;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::reflect::TypeReflection;
use crate::types::{TypeData, TypeId};
use propmeta_common::limits::MAX_TYPE_RESOLUTION_DEPTH;
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

/// Type parameter -> substituted type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeVariableMap {
    entries: FxHashMap<TypeId, TypeId>,
}

impl TypeVariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitution recorded for the type parameter `param`.
    #[inline]
    pub fn get(&self, param: TypeId) -> Option<TypeId> {
        self.entries.get(&param).copied()
    }

    pub fn contains(&self, param: TypeId) -> bool {
        self.entries.contains_key(&param)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, TypeId)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }

    /// Record `param -> value` unless `param` already has a substitution.
    /// Returns whether the entry was inserted.
    pub fn insert_if_absent(&mut self, param: TypeId, value: TypeId) -> bool {
        if self.entries.contains_key(&param) {
            return false;
        }
        self.entries.insert(param, value);
        true
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Build the type-variable map of `def`. Pure; callers cache the result.
pub fn build_type_variable_map(reflect: &dyn TypeReflection, def: DefId) -> TypeVariableMap {
    let mut builder = TypeVariableMapBuilder {
        reflect,
        map: TypeVariableMap::new(),
        interfaces: RecursionGuard::with_profile(RecursionProfile::InterfaceWalk),
    };
    builder.collect(def);
    trace!(
        def_id = def.0,
        entries = builder.map.len(),
        "build_type_variable_map"
    );
    builder.map
}

struct TypeVariableMapBuilder<'a> {
    reflect: &'a dyn TypeReflection,
    map: TypeVariableMap,
    interfaces: RecursionGuard<DefId>,
}

impl TypeVariableMapBuilder<'_> {
    fn collect(&mut self, def: DefId) {
        // (a) the type's own interfaces
        self.extract_from_interfaces(self.reflect.generic_interfaces_of(def));

        // (b) superclass chain, leaf to root
        let mut chain = RecursionGuard::with_profile(RecursionProfile::HierarchyWalk);
        let mut generic = self.reflect.generic_superclass_of(def);
        let mut visited = Vec::new();
        while let Some(super_ty) = generic {
            let Some(super_def) = self.reflect.types().raw_def(super_ty) else {
                break;
            };
            match chain.enter(super_def) {
                RecursionResult::Entered => visited.push(super_def),
                result => {
                    warn!(def_id = def.0, ?result, "superclass chain walk stopped");
                    break;
                }
            }
            self.populate(super_ty);
            self.extract_from_interfaces(self.reflect.generic_interfaces_of(super_def));
            generic = self.reflect.generic_superclass_of(super_def);
        }
        for key in visited.into_iter().rev() {
            chain.leave(key);
        }

        // (c) enclosing types of nested classes
        let mut depth = 0;
        let mut current = def;
        while let Some(outer) = self.reflect.enclosing_type_of(current) {
            depth += 1;
            if depth > RecursionProfile::EnclosingWalk.max_depth() {
                warn!(def_id = def.0, "enclosing type walk stopped");
                break;
            }
            if let Some(super_ty) = self.reflect.generic_superclass_of(outer) {
                self.populate(super_ty);
            }
            current = outer;
        }
    }

    fn extract_from_interfaces(&mut self, interfaces: Vec<TypeId>) {
        for iface in interfaces {
            let Some(iface_def) = self.reflect.types().raw_def(iface) else {
                continue;
            };
            match self.interfaces.enter(iface_def) {
                RecursionResult::Entered => {}
                RecursionResult::Cycle => continue,
                result => {
                    warn!(def_id = iface_def.0, ?result, "interface walk stopped");
                    continue;
                }
            }
            self.populate(iface);
            self.extract_from_interfaces(self.reflect.generic_interfaces_of(iface_def));
            self.interfaces.leave(iface_def);
        }
    }

    /// Pair the parameters of a parameterized type with its arguments.
    fn populate(&mut self, ty: TypeId) {
        let mut next = Some(ty);
        let mut depth = 0;
        while let Some(current) = next.take() {
            depth += 1;
            if depth > MAX_TYPE_RESOLUTION_DEPTH {
                break;
            }
            let Some(TypeData::Parameterized(app)) = self.reflect.types().lookup(current) else {
                break;
            };
            let params = self.reflect.type_parameters_of(app.base);
            let args = self.reflect.actual_type_arguments_of(current);
            if params.len() != args.len() {
                trace!(
                    def_id = app.base.0,
                    params = params.len(),
                    args = args.len(),
                    "type argument count mismatch"
                );
            }
            for (decl, &arg) in params.iter().zip(args.iter()) {
                if let Some(value) = self.argument_value(arg) {
                    self.map.insert_if_absent(decl.param, value);
                }
            }
            next = app.owner;
        }
    }

    /// The value a type argument contributes, or `None` to skip it.
    fn argument_value(&self, arg: TypeId) -> Option<TypeId> {
        if arg.is_intrinsic() {
            return Some(arg);
        }
        match self.reflect.types().lookup(arg) {
            Some(TypeData::TypeParameter(_)) => Some(
                self.map
                    .get(arg)
                    .unwrap_or_else(|| bound_of(self.reflect, arg, &self.map)),
            ),
            Some(TypeData::Wildcard { upper, .. }) => {
                upper.map(|upper| self.argument_value(upper).unwrap_or(TypeId::OBJECT))
            }
            Some(_) => Some(arg),
            None => None,
        }
    }
}

/// Declared bound of a type variable, following bounds that are variables
/// themselves. `OBJECT` when unbounded.
pub fn bound_of(reflect: &dyn TypeReflection, param: TypeId, map: &TypeVariableMap) -> TypeId {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::BoundResolution);
    let mut visited = Vec::new();
    let mut current = param;
    let result = loop {
        if !guard.enter(current).is_entered() {
            break TypeId::OBJECT;
        }
        visited.push(current);
        let Some(info) = reflect.types().type_param_info(current) else {
            break current;
        };
        let bound = reflect
            .type_parameters_of(info.owner)
            .into_iter()
            .find(|decl| decl.param == current)
            .and_then(|decl| decl.bound);
        match bound {
            None => break TypeId::OBJECT,
            Some(bound) if reflect.types().is_type_parameter(bound) => {
                if let Some(value) = map.get(bound) {
                    break value;
                }
                current = bound;
            }
            Some(bound) => break bound,
        }
    };
    for key in visited.into_iter().rev() {
        guard.leave(key);
    }
    result
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve a type expression to the concrete raw type it denotes under `map`.
///
/// - type variables resolve through the map, then their bound, then `OBJECT`
/// - parameterized types resolve to their raw class
/// - arrays resolve component-wise
/// - wildcards resolve to their upper bound, or `OBJECT`
pub fn resolve_type(reflect: &dyn TypeReflection, ty: TypeId, map: &TypeVariableMap) -> TypeId {
    resolve_type_inner(reflect, ty, map, 0)
}

fn resolve_type_inner(
    reflect: &dyn TypeReflection,
    ty: TypeId,
    map: &TypeVariableMap,
    depth: u32,
) -> TypeId {
    if ty.is_intrinsic() {
        return ty;
    }
    if depth > MAX_TYPE_RESOLUTION_DEPTH {
        return TypeId::OBJECT;
    }
    let types = reflect.types();
    match types.lookup(ty) {
        Some(TypeData::TypeParameter(_)) => {
            let substituted = map.get(ty).unwrap_or_else(|| bound_of(reflect, ty, map));
            if substituted == ty {
                return TypeId::OBJECT;
            }
            resolve_type_inner(reflect, substituted, map, depth + 1)
        }
        Some(TypeData::Parameterized(app)) => types.class(app.base),
        Some(TypeData::Array(component)) => {
            let resolved = resolve_type_inner(reflect, component, map, depth + 1);
            types.array(resolved)
        }
        Some(TypeData::Wildcard { upper, .. }) => match upper {
            Some(upper) => resolve_type_inner(reflect, upper, map, depth + 1),
            None => TypeId::OBJECT,
        },
        Some(TypeData::Class(_)) | Some(TypeData::Intrinsic(_)) => ty,
        None => TypeId::OBJECT,
    }
}

/// The erased (raw) form of a type: [`resolve_type`] with no substitutions.
pub fn erase(reflect: &dyn TypeReflection, ty: TypeId) -> TypeId {
    resolve_type(reflect, ty, &TypeVariableMap::new())
}

#[cfg(test)]
#[path = "../tests/type_vars_tests.rs"]
mod tests;
