//! Reflection collaborators.
//!
//! The engine reads types only through two narrow traits:
//!
//! - [`TypeReflection`]: structural primitives (superclass, interfaces,
//!   type parameters, declared methods) the type-variable map builder and the
//!   bridge resolver need.
//! - [`PropertyScanner`]: raw getter/setter discovery and field lookup.
//!
//! [`ClassStore`] implements both. Hosts with their own metadata source can
//! implement them directly and hand them to
//! [`MetadataRegistry::with_collaborators`](crate::MetadataRegistry::with_collaborators).

use crate::def::{ClassStore, DefId, FieldInfo, MethodInfo, ModuleId};
use crate::error::ScanError;
use crate::intern::TypeInterner;
use crate::type_vars::erase;
use crate::types::{TypeArgs, TypeId, TypeParamDecl};
use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::trace;

/// Reader plus optional writer for one property.
#[derive(Clone, Debug)]
pub struct AccessorPair {
    pub reader: Arc<MethodInfo>,
    pub writer: Option<Arc<MethodInfo>>,
}

impl AccessorPair {
    pub fn new(reader: Arc<MethodInfo>, writer: Option<Arc<MethodInfo>>) -> Self {
        Self { reader, writer }
    }

    pub fn read_only(reader: Arc<MethodInfo>) -> Self {
        Self {
            reader,
            writer: None,
        }
    }
}

/// Property name -> accessors, in discovery order.
pub type PropertyAccessors = IndexMap<Arc<str>, AccessorPair, FxBuildHasher>;

/// Structural reflection over registered types.
pub trait TypeReflection: Send + Sync {
    /// The interner every `TypeId` handed out by this reflection lives in.
    fn types(&self) -> &TypeInterner;

    fn type_name(&self, def: DefId) -> Option<Arc<str>>;

    fn module_of(&self, def: DefId) -> Option<ModuleId>;

    fn enclosing_type_of(&self, def: DefId) -> Option<DefId>;

    /// Generic superclass (`Class` or `Parameterized`), `None` at the root.
    fn generic_superclass_of(&self, def: DefId) -> Option<TypeId>;

    fn generic_interfaces_of(&self, def: DefId) -> Vec<TypeId>;

    fn type_parameters_of(&self, def: DefId) -> Vec<TypeParamDecl>;

    fn declared_methods_of(&self, def: DefId) -> Vec<Arc<MethodInfo>>;

    /// Raw superclass.
    fn superclass_of(&self, def: DefId) -> Option<DefId> {
        self.generic_superclass_of(def)
            .and_then(|ty| self.types().raw_def(ty))
    }

    /// Actual type arguments of a parameterized type; empty otherwise.
    fn actual_type_arguments_of(&self, ty: TypeId) -> TypeArgs {
        self.types().type_arguments(ty)
    }
}

/// Raw property discovery.
pub trait PropertyScanner: Send + Sync {
    /// Properties declared by `def` itself (not inherited ones).
    fn property_accessors_of(&self, def: DefId) -> Result<PropertyAccessors, ScanError>;

    /// Field backing a property, used only for annotation metadata.
    fn declared_field_named(&self, def: DefId, name: &str) -> Option<FieldInfo>;
}

// =============================================================================
// ClassStore implementations
// =============================================================================

impl TypeReflection for ClassStore {
    fn types(&self) -> &TypeInterner {
        ClassStore::types(self)
    }

    fn type_name(&self, def: DefId) -> Option<Arc<str>> {
        self.name_of(def)
    }

    fn module_of(&self, def: DefId) -> Option<ModuleId> {
        self.get(def).map(|info| info.module)
    }

    fn enclosing_type_of(&self, def: DefId) -> Option<DefId> {
        self.get(def).and_then(|info| info.enclosing)
    }

    fn generic_superclass_of(&self, def: DefId) -> Option<TypeId> {
        self.get(def).and_then(|info| info.superclass)
    }

    fn generic_interfaces_of(&self, def: DefId) -> Vec<TypeId> {
        self.get(def)
            .map(|info| info.interfaces.clone())
            .unwrap_or_default()
    }

    fn type_parameters_of(&self, def: DefId) -> Vec<TypeParamDecl> {
        self.get(def)
            .map(|info| info.type_params.clone())
            .unwrap_or_default()
    }

    fn declared_methods_of(&self, def: DefId) -> Vec<Arc<MethodInfo>> {
        self.get(def)
            .map(|info| info.methods.clone())
            .unwrap_or_default()
    }
}

impl PropertyScanner for ClassStore {
    fn property_accessors_of(&self, def: DefId) -> Result<PropertyAccessors, ScanError> {
        let Some(info) = self.get(def) else {
            return Err(if self.is_reserved(def) {
                ScanError::Undefined(def)
            } else {
                ScanError::UnknownType(def)
            });
        };
        let accessors = scan_accessors(self, &info.methods);
        trace!(
            def_id = def.0,
            name = %info.name,
            properties = accessors.len(),
            "ClassStore::property_accessors_of"
        );
        Ok(accessors)
    }

    fn declared_field_named(&self, def: DefId, name: &str) -> Option<FieldInfo> {
        self.get(def).and_then(|info| info.field(name).cloned())
    }
}

// =============================================================================
// Naming-convention scan
// =============================================================================

/// Accessor role of a method, judged by name and shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AccessorRole {
    Reader,
    Writer,
}

fn classify(method: &MethodInfo) -> Option<(AccessorRole, &str)> {
    let name = &*method.name;
    if let Some(rest) = name.strip_prefix("get") {
        if method.arity() == 0 && method.return_type != TypeId::VOID && !rest.is_empty() {
            return Some((AccessorRole::Reader, rest));
        }
    }
    if let Some(rest) = name.strip_prefix("is") {
        if method.arity() == 0 && method.return_type == TypeId::BOOLEAN && !rest.is_empty() {
            return Some((AccessorRole::Reader, rest));
        }
    }
    if let Some(rest) = name.strip_prefix("set") {
        if method.arity() == 1 && !rest.is_empty() {
            return Some((AccessorRole::Writer, rest));
        }
    }
    None
}

/// JavaBeans decapitalization: `Name` -> `name`, `URL` -> `URL`.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(&name[first.len_utf8()..]);
    out
}

/// Pair readers with writers by naming convention.
///
/// The first declared reader of a name wins. A writer is attached when its
/// erased parameter type equals the reader's erased return type; the first
/// such writer wins. Writers without a reader are dropped.
pub fn scan_accessors(reflect: &dyn TypeReflection, methods: &[Arc<MethodInfo>]) -> PropertyAccessors {
    let mut accessors = PropertyAccessors::default();
    let mut writers: Vec<(String, &Arc<MethodInfo>)> = Vec::new();

    for method in methods {
        match classify(method) {
            Some((AccessorRole::Reader, stem)) => {
                let name: Arc<str> = decapitalize(stem).into();
                if let Entry::Vacant(slot) = accessors.entry(name) {
                    slot.insert(AccessorPair::read_only(Arc::clone(method)));
                }
            }
            Some((AccessorRole::Writer, stem)) => writers.push((decapitalize(stem), method)),
            None => {}
        }
    }

    for (name, writer) in writers {
        let Some(pair) = accessors.get_mut(name.as_str()) else {
            continue;
        };
        if pair.writer.is_some() {
            continue;
        }
        let read_type = erase(reflect, pair.reader.return_type);
        let write_type = erase(reflect, writer.params[0]);
        if read_type == write_type {
            pair.writer = Some(Arc::clone(writer));
        }
    }

    accessors
}

#[cfg(test)]
#[path = "../tests/reflect_tests.rs"]
mod tests;
