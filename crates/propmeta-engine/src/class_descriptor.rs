//! Class descriptors.
//!
//! A [`ClassDescriptor`] is the cached metadata of one described type: its
//! own properties, the link to its superclass's descriptor, and the memoized
//! type-variable map every property of the type resolves against.
//!
//! Everything except the superclass link is computed lazily and at most once.
//! A scan failure is memoized like a success and handed out again on every
//! later query, for this descriptor and for every subclass descriptor.

use crate::def::{DefId, ModuleId};
use crate::error::MetadataError;
use crate::options::EngineOptions;
use crate::property::PropertyDescriptor;
use crate::reflect::{PropertyScanner, TypeReflection};
use crate::type_vars::{TypeVariableMap, build_type_variable_map};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Property name -> descriptor, in report order.
pub type PropertyMap = IndexMap<Arc<str>, Arc<PropertyDescriptor>, FxBuildHasher>;

/// What a property descriptor resolves against: the described type, the
/// collaborators and that type's type-variable map.
pub struct ResolutionContext {
    pub(crate) def: DefId,
    pub(crate) reflect: Arc<dyn TypeReflection>,
    pub(crate) scanner: Arc<dyn PropertyScanner>,
    pub(crate) options: EngineOptions,
    type_vars: OnceLock<TypeVariableMap>,
}

impl ResolutionContext {
    pub(crate) fn new(
        def: DefId,
        reflect: Arc<dyn TypeReflection>,
        scanner: Arc<dyn PropertyScanner>,
        options: EngineOptions,
    ) -> Self {
        Self {
            def,
            reflect,
            scanner,
            options,
            type_vars: OnceLock::new(),
        }
    }

    pub(crate) fn type_variables(&self) -> &TypeVariableMap {
        self.type_vars
            .get_or_init(|| build_type_variable_map(&*self.reflect, self.def))
    }
}

pub struct ClassDescriptor {
    def: DefId,
    name: Arc<str>,
    module: Option<ModuleId>,
    superclass: Option<Arc<ClassDescriptor>>,
    chain_length: u32,
    truncated: bool,
    context: Arc<ResolutionContext>,
    own: OnceLock<Result<PropertyMap, MetadataError>>,
    all: OnceLock<Result<PropertyMap, MetadataError>>,
}

impl ClassDescriptor {
    pub(crate) fn new(
        context: ResolutionContext,
        superclass: Option<Arc<ClassDescriptor>>,
        cut: bool,
    ) -> Self {
        let def = context.def;
        let name = context
            .reflect
            .type_name(def)
            .unwrap_or_else(|| Arc::from(format!("#{}", def.0)));
        let module = context.reflect.module_of(def);
        let chain_length = superclass.as_ref().map_or(0, |s| s.chain_length + 1);
        let truncated = cut || superclass.as_ref().is_some_and(|s| s.truncated);
        Self {
            def,
            name,
            module,
            superclass,
            chain_length,
            truncated,
            context: Arc::new(context),
            own: OnceLock::new(),
            all: OnceLock::new(),
        }
    }

    pub fn described_type(&self) -> DefId {
        self.def
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` when the reflection does not know the type.
    pub fn module(&self) -> Option<ModuleId> {
        self.module
    }

    #[inline]
    pub fn has_superclass(&self) -> bool {
        self.superclass.is_some()
    }

    pub fn superclass_descriptor(&self) -> Option<&Arc<ClassDescriptor>> {
        self.superclass.as_ref()
    }

    /// Number of superclass links above this descriptor.
    pub fn chain_length(&self) -> u32 {
        self.chain_length
    }

    /// Whether the hierarchy depth cap cut this descriptor's superclass chain.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Substitutions visible from this type, leaf to root.
    pub fn type_variables(&self) -> &TypeVariableMap {
        self.context.type_variables()
    }

    /// Names of the properties this type declares itself, in scan order.
    pub fn own_property_names(&self) -> Result<Vec<Arc<str>>, MetadataError> {
        Ok(self.own_properties()?.keys().cloned().collect())
    }

    /// Own properties followed by inherited ones; own names shadow inherited.
    pub fn all_property_names(&self) -> Result<Vec<Arc<str>>, MetadataError> {
        Ok(self.all_properties()?.keys().cloned().collect())
    }

    pub fn all_property_descriptors(&self) -> Result<Vec<Arc<PropertyDescriptor>>, MetadataError> {
        Ok(self.all_properties()?.values().cloned().collect())
    }

    /// `Ok(None)` when neither this type nor a superclass has the property.
    /// Own properties shadow inherited ones in the merged map, so a failure
    /// anywhere up the chain is reported even for an own name.
    pub fn property_named(
        &self,
        name: &str,
    ) -> Result<Option<Arc<PropertyDescriptor>>, MetadataError> {
        Ok(self.all_properties()?.get(name).cloned())
    }

    /// Whether this descriptor or any descriptor above it describes a type
    /// of `module`.
    pub fn depends_on_module(&self, module: ModuleId) -> bool {
        let mut current = Some(self);
        while let Some(descriptor) = current {
            if descriptor.module == Some(module) {
                return true;
            }
            current = descriptor.superclass.as_deref();
        }
        false
    }

    fn own_properties(&self) -> Result<&PropertyMap, MetadataError> {
        self.own
            .get_or_init(|| self.scan_own_properties())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn scan_own_properties(&self) -> Result<PropertyMap, MetadataError> {
        let accessors = self
            .context
            .scanner
            .property_accessors_of(self.def)
            .map_err(|source| {
                warn!(def_id = self.def.0, name = %self.name, %source, "property scan failed");
                MetadataError::Scan {
                    type_name: Arc::clone(&self.name),
                    source,
                }
            })?;
        debug!(
            def_id = self.def.0,
            name = %self.name,
            properties = accessors.len(),
            "scanned own properties"
        );
        Ok(accessors
            .into_iter()
            .map(|(name, pair)| {
                let descriptor =
                    PropertyDescriptor::new(Arc::clone(&name), pair, Arc::clone(&self.context));
                (name, Arc::new(descriptor))
            })
            .collect())
    }

    fn all_properties(&self) -> Result<&PropertyMap, MetadataError> {
        self.all
            .get_or_init(|| self.merge_properties())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn merge_properties(&self) -> Result<PropertyMap, MetadataError> {
        let mut merged = self.own_properties()?.clone();
        let Some(superclass) = &self.superclass else {
            return Ok(merged);
        };
        for (name, inherited) in superclass.all_properties()? {
            if merged.contains_key(name) {
                continue;
            }
            let descriptor = if inherited.depends_on_type_variables() {
                Arc::new(inherited.rebind(Arc::clone(&self.context)))
            } else {
                Arc::clone(inherited)
            };
            merged.insert(Arc::clone(name), descriptor);
        }
        Ok(merged)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("def", &self.def)
            .field("name", &self.name)
            .field("module", &self.module)
            .field("superclass", &self.superclass.as_ref().map(|s| s.def))
            .field("truncated", &self.truncated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/class_descriptor_tests.rs"]
mod tests;
