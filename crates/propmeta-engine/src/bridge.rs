//! Bridge-method resolution.
//!
//! When a subclass overrides a generic method with a concrete type argument,
//! the compiler adds a synthetic override carrying the erased signature:
//!
//! ```text
//! class Holder<T>                    { T getItem(); void setItem(T) }
//! class StringHolder extends Holder<String> {
//!     String getItem();              // real override
//!     void setItem(String);          // real override
//!     synthetic Object getItem();    // bridge
//!     synthetic void setItem(Object) // bridge
//! }
//! ```
//!
//! [`find_bridged_method`] maps a bridge back to the method it forwards to,
//! which is the one carrying useful type information.

use crate::def::{DefId, MethodInfo};
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::reflect::TypeReflection;
use crate::type_vars::{TypeVariableMap, build_type_variable_map, erase, resolve_type};
use crate::types::TypeData;
use std::sync::Arc;
use tracing::{debug, trace};

/// Find the method a synthetic bridge forwards to.
///
/// Returns `None` when `bridge` is not synthetic, or when no unambiguous
/// target exists.
pub fn find_bridged_method(
    reflect: &dyn TypeReflection,
    bridge: &Arc<MethodInfo>,
) -> Option<Arc<MethodInfo>> {
    if !bridge.is_synthetic() {
        return None;
    }

    let candidates = bridged_candidates(reflect, bridge);
    let found = match candidates.len() {
        0 => None,
        1 => candidates.into_iter().next(),
        _ => search_candidates(reflect, candidates, bridge),
    };

    debug!(
        method = %bridge.name,
        declaring = bridge.declaring.0,
        resolved = found.as_ref().map(|m| m.declaring.0),
        "find_bridged_method"
    );
    found
}

/// Methods of the bridge's declaring type and its superclasses that could be
/// the bridged method: same name and arity, not synthetic, not the bridge.
fn bridged_candidates(reflect: &dyn TypeReflection, bridge: &Arc<MethodInfo>) -> Vec<Arc<MethodInfo>> {
    let mut candidates = Vec::new();
    for def in superclass_chain(reflect, bridge.declaring, true) {
        candidates.extend(
            reflect
                .declared_methods_of(def)
                .into_iter()
                .filter(|method| is_bridged_candidate_for(method, bridge)),
        );
    }
    candidates
}

fn is_bridged_candidate_for(candidate: &Arc<MethodInfo>, bridge: &Arc<MethodInfo>) -> bool {
    !candidate.is_synthetic()
        && !Arc::ptr_eq(candidate, bridge)
        && candidate.name == bridge.name
        && candidate.arity() == bridge.arity()
}

fn search_candidates(
    reflect: &dyn TypeReflection,
    candidates: Vec<Arc<MethodInfo>>,
    bridge: &Arc<MethodInfo>,
) -> Option<Arc<MethodInfo>> {
    let map = build_type_variable_map(reflect, bridge.declaring);
    let mut generic_declaration: Option<Option<Arc<MethodInfo>>> = None;
    let mut same_signature = true;

    for (index, candidate) in candidates.iter().enumerate() {
        if is_resolved_type_match(reflect, candidate, bridge, &map) {
            return Some(Arc::clone(candidate));
        }
        let declaration = generic_declaration
            .get_or_insert_with(|| find_generic_declaration(reflect, bridge))
            .as_ref();
        if let Some(declaration) = declaration {
            if is_resolved_type_match(reflect, declaration, candidate, &map) {
                return Some(Arc::clone(candidate));
            }
        }
        if index > 0 {
            same_signature &= candidate.params == candidates[index - 1].params;
        }
    }

    if same_signature {
        trace!(
            method = %bridge.name,
            candidates = candidates.len(),
            "bridge candidates share one generic signature"
        );
        candidates.into_iter().next()
    } else {
        None
    }
}

/// Whether the generic parameters of `generic`, resolved under `map`, equal
/// the erased parameters of `candidate`.
fn is_resolved_type_match(
    reflect: &dyn TypeReflection,
    generic: &MethodInfo,
    candidate: &MethodInfo,
    map: &TypeVariableMap,
) -> bool {
    if generic.arity() != candidate.arity() {
        return false;
    }
    let types = reflect.types();
    for (&generic_param, &candidate_param) in generic.params.iter().zip(candidate.params.iter()) {
        let candidate_param = erase(reflect, candidate_param);

        if let Some(TypeData::Array(candidate_component)) = types.lookup(candidate_param) {
            // Compare component types when the generic side is an array of a
            // substitutable type (`T[]` against `String[]`).
            let generic_raw = if types.is_type_parameter(generic_param) {
                map.get(generic_param).unwrap_or(generic_param)
            } else {
                generic_param
            };
            if let Some(TypeData::Array(generic_component)) = types.lookup(generic_raw) {
                if candidate_component != resolve_type(reflect, generic_component, map) {
                    return false;
                }
                continue;
            }
        }

        if candidate_param != resolve_type(reflect, generic_param, map) {
            return false;
        }
    }
    true
}

/// Search superclasses, then all interfaces, for a non-synthetic method with
/// the bridge's erased signature.
fn find_generic_declaration(
    reflect: &dyn TypeReflection,
    bridge: &MethodInfo,
) -> Option<Arc<MethodInfo>> {
    let erased: Vec<_> = bridge.params.iter().map(|&p| erase(reflect, p)).collect();
    let matches = |def: DefId| {
        reflect.declared_methods_of(def).into_iter().find(|method| {
            !method.is_synthetic()
                && method.name == bridge.name
                && method.arity() == erased.len()
                && method
                    .params
                    .iter()
                    .zip(erased.iter())
                    .all(|(&p, &e)| erase(reflect, p) == e)
        })
    };

    let chain = superclass_chain(reflect, bridge.declaring, false);
    if let Some(found) = chain.iter().find_map(|&def| matches(def)) {
        return Some(found);
    }

    let mut guard = RecursionGuard::with_profile(RecursionProfile::InterfaceWalk);
    let mut interfaces = Vec::new();
    for def in superclass_chain(reflect, bridge.declaring, true) {
        collect_interfaces(reflect, def, &mut guard, &mut interfaces);
    }
    interfaces.into_iter().find_map(matches)
}

/// `start` (optionally) followed by its superclasses, root last.
fn superclass_chain(reflect: &dyn TypeReflection, start: DefId, include_start: bool) -> Vec<DefId> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::HierarchyWalk);
    let mut chain = Vec::new();
    let mut current = Some(start);
    while let Some(def) = current {
        if !guard.enter(def).is_entered() {
            break;
        }
        chain.push(def);
        current = reflect.superclass_of(def);
    }
    for &def in chain.iter().rev() {
        guard.leave(def);
    }
    if !include_start && !chain.is_empty() {
        chain.remove(0);
    }
    chain
}

/// All interfaces reachable from `def`, each once, breadth of declaration order.
fn collect_interfaces(
    reflect: &dyn TypeReflection,
    def: DefId,
    guard: &mut RecursionGuard<DefId>,
    out: &mut Vec<DefId>,
) {
    for iface in reflect.generic_interfaces_of(def) {
        let Some(iface_def) = reflect.types().raw_def(iface) else {
            continue;
        };
        if out.contains(&iface_def) {
            continue;
        }
        let walked = guard.scope(iface_def, |guard| {
            out.push(iface_def);
            collect_interfaces(reflect, iface_def, guard, out);
        });
        if let Err(result) = walked {
            trace!(def_id = iface_def.0, ?result, "interface walk stopped");
        }
    }
}

#[cfg(test)]
#[path = "../tests/bridge_tests.rs"]
mod tests;
