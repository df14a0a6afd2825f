//! Class definitions and their storage.
//!
//! Hosts describe their types by registering [`ClassInfo`] values in a
//! [`ClassStore`]. Registration is two-phase for generic classes: a `DefId`
//! is reserved first so the class's own type parameters (and members that
//! mention them) can be built before the definition is installed.
//!
//! ```ignore
//! let store = ClassStore::new();
//! let boxed = store.reserve("Box");
//! let t = store.types().type_param(boxed, 0, "T");
//! store.define(
//!     boxed,
//!     ClassInfo::class("Box")
//!         .with_type_params(vec![TypeParamDecl::new(t)])
//!         .with_method(MethodInfo::new("getValue", [], t)),
//! );
//! ```

use crate::accessor::MethodBody;
use crate::intern::TypeInterner;
use crate::types::{TypeArgs, TypeId, TypeParamDecl};
use dashmap::DashMap;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `ClassStore` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// Identifiers
// =============================================================================

/// Nominal identity of a registered class or interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Unit of loading and unloading (a plugin, a bundle, a class loader).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ModuleId(pub u32);

impl ModuleId {
    /// The module classes belong to unless told otherwise. Never unloaded by
    /// the engine itself.
    pub const ROOT: Self = Self(0);
}

// =============================================================================
// Definitions
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
}

/// Name plus ordered key/value pairs attached to a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub name: Arc<str>,
    pub values: IndexMap<Arc<str>, Arc<str>, FxBuildHasher>,
}

impl Annotation {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::default(),
        }
    }

    pub fn with_value(mut self, key: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| &**v)
    }
}

/// A declared field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: Arc<str>,
    pub type_id: TypeId,
    pub annotations: Vec<Annotation>,
}

impl FieldInfo {
    pub fn new(name: impl Into<Arc<str>>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &*a.name == name)
    }
}

/// A declared method.
///
/// `params` and `return_type` carry the *generic* signature. The erased
/// signature is derived on demand (see [`erase`](crate::erase)). Bridge
/// methods are registered with their erased signature and `synthetic` set.
#[derive(Clone, Debug)]
pub struct MethodInfo {
    pub name: Arc<str>,
    /// Stamped by [`ClassStore::define`].
    pub declaring: DefId,
    pub params: TypeArgs,
    pub return_type: TypeId,
    /// Compiler-synthesized covariant override (bridge).
    pub synthetic: bool,
    pub body: MethodBody,
}

impl MethodInfo {
    pub fn new(
        name: impl Into<Arc<str>>,
        params: impl IntoIterator<Item = TypeId>,
        return_type: TypeId,
    ) -> Self {
        Self {
            name: name.into(),
            declaring: DefId::INVALID,
            params: params.into_iter().collect(),
            return_type,
            synthetic: false,
            body: MethodBody::Abstract,
        }
    }

    /// Zero-argument method returning `return_type`.
    pub fn getter(name: impl Into<Arc<str>>, return_type: TypeId) -> Self {
        Self::new(name, [], return_type)
    }

    /// One-argument `void` method.
    pub fn setter(name: impl Into<Arc<str>>, param: TypeId) -> Self {
        Self::new(name, [param], TypeId::VOID)
    }

    /// Mark as a compiler-synthesized bridge.
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = body;
        self
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Complete description of a class or interface.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub kind: ClassKind,
    pub name: Arc<str>,
    pub module: ModuleId,
    pub type_params: Vec<TypeParamDecl>,
    /// Generic superclass: a `Class` or `Parameterized` type. `None` at the root.
    pub superclass: Option<TypeId>,
    /// Generic interfaces in declaration order.
    pub interfaces: Vec<TypeId>,
    /// For nested classes: the class they are declared in.
    pub enclosing: Option<DefId>,
    pub methods: Vec<Arc<MethodInfo>>,
    pub fields: Vec<FieldInfo>,
}

impl ClassInfo {
    fn with_kind(kind: ClassKind, name: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            name: name.into(),
            module: ModuleId::ROOT,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            enclosing: None,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self::with_kind(ClassKind::Class, name)
    }

    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        Self::with_kind(ClassKind::Interface, name)
    }

    pub const fn with_module(mut self, module: ModuleId) -> Self {
        self.module = module;
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParamDecl>) -> Self {
        self.type_params = type_params;
        self
    }

    pub const fn with_superclass(mut self, superclass: TypeId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<TypeId>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub const fn with_enclosing(mut self, enclosing: DefId) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| &*f.name == name)
    }
}

// =============================================================================
// ClassStore
// =============================================================================

/// Thread-safe storage for class definitions and the types that mention them.
///
/// Uses `DashMap` so hosts may register classes while other threads introspect.
pub struct ClassStore {
    /// Unique instance ID for debugging.
    instance_id: u64,

    types: TypeInterner,

    /// Names of reserved ids, defined or not.
    reserved: DashMap<DefId, Arc<str>, FxBuildHasher>,

    definitions: DashMap<DefId, Arc<ClassInfo>, FxBuildHasher>,

    /// `ModuleId` -> classes defined in it.
    modules: DashMap<ModuleId, Vec<DefId>, FxBuildHasher>,

    next_id: AtomicU32,
}

impl Default for ClassStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassStore {
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "ClassStore::new");
        Self {
            instance_id,
            types: TypeInterner::new(),
            reserved: DashMap::with_hasher(FxBuildHasher::default()),
            definitions: DashMap::with_hasher(FxBuildHasher::default()),
            modules: DashMap::with_hasher(FxBuildHasher::default()),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    /// The interner all of this store's types live in.
    #[inline]
    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    /// Reserve a `DefId` for a class that will be defined later.
    pub fn reserve(&self, name: impl Into<Arc<str>>) -> DefId {
        let id = DefId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let name = name.into();
        trace!(
            instance_id = self.instance_id,
            def_id = id.0,
            name = %name,
            "ClassStore::reserve"
        );
        self.reserved.insert(id, name);
        id
    }

    /// Install the definition of a reserved id.
    ///
    /// Stamps every method with `id` as its declaring class. Redefining an id
    /// replaces the previous definition.
    pub fn define(&self, id: DefId, mut info: ClassInfo) {
        for method in &mut info.methods {
            Arc::make_mut(method).declaring = id;
        }
        trace!(
            instance_id = self.instance_id,
            def_id = id.0,
            kind = ?info.kind,
            methods = info.methods.len(),
            "ClassStore::define"
        );
        self.reserved.insert(id, info.name.clone());
        let module = info.module;
        if let Some(previous) = self.definitions.insert(id, Arc::new(info)) {
            if previous.module != module {
                self.forget_in_module(previous.module, id);
            }
        }
        let mut members = self.modules.entry(module).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
    }

    /// Reserve and define in one step, for classes that need no self-reference.
    pub fn register(&self, info: ClassInfo) -> DefId {
        let id = self.reserve(info.name.clone());
        self.define(id, info);
        id
    }

    pub fn get(&self, id: DefId) -> Option<Arc<ClassInfo>> {
        self.definitions.get(&id).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn is_reserved(&self, id: DefId) -> bool {
        self.reserved.contains_key(&id)
    }

    pub fn name_of(&self, id: DefId) -> Option<Arc<str>> {
        self.reserved.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Number of defined classes.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn classes_in_module(&self, module: ModuleId) -> Vec<DefId> {
        self.modules
            .get(&module)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    /// Remove every class defined in `module`, returning their ids.
    ///
    /// Pair with [`MetadataRegistry::unregister_module`](crate::MetadataRegistry::unregister_module)
    /// so no descriptor outlives its definition.
    pub fn unload_module(&self, module: ModuleId) -> Vec<DefId> {
        let removed = self
            .modules
            .remove(&module)
            .map(|(_, ids)| ids)
            .unwrap_or_default();
        for id in &removed {
            self.definitions.remove(id);
            self.reserved.remove(id);
        }
        trace!(
            instance_id = self.instance_id,
            module = module.0,
            removed = removed.len(),
            "ClassStore::unload_module"
        );
        removed
    }

    fn forget_in_module(&self, module: ModuleId, id: DefId) {
        if let Some(mut members) = self.modules.get_mut(&module) {
            members.retain(|member| *member != id);
        }
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
