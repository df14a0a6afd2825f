//! Property descriptors.
//!
//! A [`PropertyDescriptor`] pairs a reader (and optional writer) with the
//! [`ResolutionContext`] of the class descriptor that owns it. Its type is
//! resolved against that context's type-variable map, which is why an
//! inherited generic property is rebound to every subclass that reports it:
//!
//! ```text
//! class Box<T>      { T getValue() }
//! class StringBox extends Box<String>
//!
//! Box.value.property_type()       == Object
//! StringBox.value.property_type() == String
//! ```

use crate::accessor::{MethodBody, Value};
use crate::bridge::find_bridged_method;
use crate::class_descriptor::ResolutionContext;
use crate::def::{Annotation, DefId, FieldInfo, MethodInfo};
use crate::error::AccessError;
use crate::format::TypeFormatter;
use crate::query_trace;
use crate::reflect::AccessorPair;
use crate::type_vars::{erase, resolve_type};
use crate::types::{TypeArgs, TypeData, TypeId};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::trace;

pub struct PropertyDescriptor {
    name: Arc<str>,
    accessors: AccessorPair,
    context: Arc<ResolutionContext>,
    property_type: OnceLock<TypeId>,
    element_types: OnceLock<TypeArgs>,
    field: OnceLock<Option<FieldInfo>>,
    bridged_reader: OnceLock<Option<Arc<MethodInfo>>>,
}

impl PropertyDescriptor {
    pub(crate) fn new(
        name: Arc<str>,
        accessors: AccessorPair,
        context: Arc<ResolutionContext>,
    ) -> Self {
        Self {
            name,
            accessors,
            context,
            property_type: OnceLock::new(),
            element_types: OnceLock::new(),
            field: OnceLock::new(),
            bridged_reader: OnceLock::new(),
        }
    }

    /// Same accessors, resolved against another class's type variables.
    pub(crate) fn rebind(&self, context: Arc<ResolutionContext>) -> Self {
        Self::new(Arc::clone(&self.name), self.accessors.clone(), context)
    }

    /// Whether the resolved types can differ between subclasses.
    pub(crate) fn depends_on_type_variables(&self) -> bool {
        let types = self.context.reflect.types();
        let reader = &self.accessors.reader;
        reader.is_synthetic()
            || types.contains_type_parameters(reader.return_type)
            || self.accessors.writer.as_ref().is_some_and(|writer| {
                writer
                    .params
                    .iter()
                    .any(|&param| types.contains_type_parameters(param))
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class descriptor this property was resolved for.
    pub fn owner(&self) -> DefId {
        self.context.def
    }

    /// The class that declares the reader.
    pub fn declaring_type(&self) -> DefId {
        self.accessors.reader.declaring
    }

    pub fn reader(&self) -> &Arc<MethodInfo> {
        &self.accessors.reader
    }

    pub fn writer(&self) -> Option<&Arc<MethodInfo>> {
        self.accessors.writer.as_ref()
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.accessors.writer.is_none()
    }

    /// Concrete type of the property. Never a type variable: an unresolvable
    /// type is reported as `OBJECT`.
    pub fn property_type(&self) -> TypeId {
        *self.property_type.get_or_init(|| self.resolve_property_type())
    }

    /// Type arguments of the property's parameterized type, concrete where
    /// the owner's hierarchy binds them. Empty for non-parameterized types.
    pub fn element_types(&self) -> &[TypeId] {
        self.element_types
            .get_or_init(|| self.resolve_element_types())
            .as_slice()
    }

    /// Backing field, looked up by property name on the declaring type and
    /// then its superclasses.
    pub fn field(&self) -> Option<&FieldInfo> {
        self.field
            .get_or_init(|| {
                let mut current = Some(self.declaring_type());
                let mut depth = 0;
                while let Some(def) = current {
                    if let Some(field) = self.context.scanner.declared_field_named(def, &self.name) {
                        return Some(field);
                    }
                    depth += 1;
                    if depth >= self.context.options.max_hierarchy_depth {
                        break;
                    }
                    current = self.context.reflect.superclass_of(def);
                }
                None
            })
            .as_ref()
    }

    /// Annotation on the backing field.
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.field().and_then(|field| field.annotation(name))
    }

    /// Invoke the reader on `instance`.
    pub fn read(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        let reader = self.invocable(&self.accessors.reader, || self.bridged_reader());
        match &reader.body {
            MethodBody::Read(read) => read(instance),
            _ => Err(AccessError::NotInvocable {
                method: Arc::clone(&reader.name),
            }),
        }
    }

    /// Invoke the writer on `instance`.
    pub fn write(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let Some(writer) = &self.accessors.writer else {
            return Err(AccessError::ReadOnly {
                property: Arc::clone(&self.name),
            });
        };
        let writer = self.invocable(writer, || {
            find_bridged_method(&*self.context.reflect, writer)
        });
        match &writer.body {
            MethodBody::Write(write) => write(instance, value),
            _ => Err(AccessError::NotInvocable {
                method: Arc::clone(&writer.name),
            }),
        }
    }

    /// A bodiless bridge forwards to the method it bridges.
    fn invocable(
        &self,
        method: &Arc<MethodInfo>,
        bridged: impl FnOnce() -> Option<Arc<MethodInfo>>,
    ) -> Arc<MethodInfo> {
        if method.is_synthetic() && method.body.is_abstract() {
            if let Some(target) = bridged() {
                return target;
            }
        }
        Arc::clone(method)
    }

    fn bridged_reader(&self) -> Option<Arc<MethodInfo>> {
        self.bridged_reader
            .get_or_init(|| find_bridged_method(&*self.context.reflect, &self.accessors.reader))
            .clone()
    }

    /// The reader whose generic signature carries the type information.
    fn generic_reader(&self) -> Arc<MethodInfo> {
        let reader = &self.accessors.reader;
        if reader.is_synthetic() && self.context.options.resolve_bridges {
            if let Some(bridged) = self.bridged_reader() {
                return bridged;
            }
        }
        Arc::clone(reader)
    }

    fn resolve_property_type(&self) -> TypeId {
        let reader = &self.accessors.reader;

        let mut via_bridge = false;
        let mut resolved = self.resolve_return_type(reader);
        if resolved.is_object() && reader.is_synthetic() && self.context.options.resolve_bridges {
            if let Some(bridged) = self.bridged_reader() {
                resolved = self.resolve_return_type(&bridged);
                via_bridge = true;
            }
        }

        trace!(
            property = %self.name,
            owner = self.context.def.0,
            result_type_id = resolved.0,
            result_type = %TypeFormatter::new(&*self.context.reflect).format(resolved),
            via_bridge,
            "property_type"
        );
        if query_trace::enabled() {
            query_trace::property_resolved(
                query_trace::next_query_id(),
                "property_type",
                self.context.def,
                &self.name,
                resolved,
                via_bridge,
            );
        }
        resolved
    }

    /// Erased return type, or the owner's substitution for a bare type
    /// variable that erases to `OBJECT`.
    fn resolve_return_type(&self, method: &MethodInfo) -> TypeId {
        let reflect = &*self.context.reflect;
        let erased = erase(reflect, method.return_type);
        if !erased.is_object() {
            return erased;
        }
        if reflect.types().is_type_parameter(method.return_type) {
            let map = self.context.type_variables();
            if let Some(substituted) = map.get(method.return_type) {
                return resolve_type(reflect, substituted, map);
            }
        }
        TypeId::OBJECT
    }

    fn resolve_element_types(&self) -> TypeArgs {
        let reflect = &*self.context.reflect;
        let types = reflect.types();
        let map = self.context.type_variables();

        let mut generic = self.generic_reader().return_type;
        if types.is_type_parameter(generic) {
            match map.get(generic) {
                Some(substituted) => generic = substituted,
                None => return TypeArgs::new(),
            }
        }
        let Some(TypeData::Parameterized(app)) = types.lookup(generic) else {
            return TypeArgs::new();
        };
        app.args
            .iter()
            .map(|&arg| self.element_argument(arg, 0))
            .collect()
    }

    fn element_argument(&self, arg: TypeId, depth: u32) -> TypeId {
        if arg.is_intrinsic() {
            return arg;
        }
        let types = self.context.reflect.types();
        match types.lookup(arg) {
            Some(TypeData::TypeParameter(_)) => self
                .context
                .type_variables()
                .get(arg)
                .unwrap_or(TypeId::OBJECT),
            Some(TypeData::Wildcard {
                upper: Some(upper), ..
            }) if depth == 0 => self.element_argument(upper, depth + 1),
            Some(TypeData::Wildcard { .. }) | None => TypeId::OBJECT,
            Some(_) => arg,
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("owner", &self.context.def)
            .field("declaring", &self.accessors.reader.declaring)
            .field("read_only", &self.is_read_only())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/property_tests.rs"]
mod tests;
