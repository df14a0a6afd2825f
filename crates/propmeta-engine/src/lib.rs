//! Generic-aware property metadata engine
//!
//! Given an explicitly described class hierarchy, the engine answers which
//! properties a type has and what their types are once every generic type
//! variable the hierarchy binds is substituted:
//!
//! - **Type model**: interned [`TypeId`] handles over [`TypeData`]
//! - **Type-variable maps**: leaf-to-root substitution of type parameters
//! - **Bridge resolution**: mapping compiler-synthesized overrides back to
//!   the method that carries the generic signature
//! - **Descriptors**: cached [`ClassDescriptor`]s and lazily resolved
//!   [`PropertyDescriptor`]s, owned by a [`MetadataRegistry`]
//!
//! ```ignore
//! let registry = MetadataRegistry::new(store);
//! let descriptor = registry.descriptor_of(string_box);
//! let value = descriptor.property_named("value")?.expect("declared by Box<T>");
//! assert_eq!(value.property_type(), TypeId::STRING);
//! ```
pub mod accessor;
pub mod bridge;
pub mod class_descriptor;
pub mod def;
pub mod error;
mod format;
mod intern;
pub mod options;
pub mod property;
#[path = "caches/query_trace.rs"]
mod query_trace;
pub mod recursion;
pub mod reflect;
pub mod registry;
pub mod type_vars;
pub mod types;

pub use accessor::{MethodBody, Value, read_with, write_with};
pub use bridge::find_bridged_method;
pub use class_descriptor::{ClassDescriptor, PropertyMap};
pub use def::{Annotation, ClassInfo, ClassKind, ClassStore, DefId, FieldInfo, MethodInfo, ModuleId};
pub use error::{AccessError, MetadataError, ScanError};
pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use options::EngineOptions;
pub use property::PropertyDescriptor;
pub use reflect::{AccessorPair, PropertyAccessors, PropertyScanner, TypeReflection};
pub use registry::{MetadataRegistry, RegistryStats};
pub use type_vars::{TypeVariableMap, bound_of, build_type_variable_map, erase, resolve_type};
pub use types::{IntrinsicKind, TypeApplication, TypeArgs, TypeData, TypeId, TypeParamDecl, TypeParamInfo};

// Test modules: most are loaded by their source files via #[path = "../tests/..."] declarations.
#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
