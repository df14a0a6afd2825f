//! Accessor bodies: how a registered method is actually invoked.
//!
//! The engine never calls user code except through these closures. Instances
//! and values travel as `dyn Any`; the helpers below do the downcasting.

use crate::error::AccessError;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A property value.
pub type Value = Box<dyn Any + Send>;

pub type ReadFn = Arc<dyn Fn(&dyn Any) -> Result<Value, AccessError> + Send + Sync>;
pub type WriteFn = Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), AccessError> + Send + Sync>;

/// What happens when a method is invoked.
#[derive(Clone, Default)]
pub enum MethodBody {
    /// Declaration only (interfaces, abstract methods, described-only types).
    #[default]
    Abstract,
    Read(ReadFn),
    Write(WriteFn),
}

impl MethodBody {
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Abstract)
    }
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abstract => f.write_str("Abstract"),
            Self::Read(_) => f.write_str("Read(..)"),
            Self::Write(_) => f.write_str("Write(..)"),
        }
    }
}

/// Build a reader body from a typed getter.
pub fn read_with<T, V, F>(getter: F) -> MethodBody
where
    T: Any,
    V: Any + Send,
    F: Fn(&T) -> V + Send + Sync + 'static,
{
    MethodBody::Read(Arc::new(move |instance: &dyn Any| -> Result<Value, AccessError> {
        let target = instance
            .downcast_ref::<T>()
            .ok_or(AccessError::InstanceMismatch {
                expected: type_name::<T>(),
            })?;
        Ok(Box::new(getter(target)) as Value)
    }))
}

/// Build a writer body from a typed setter.
pub fn write_with<T, V, F>(setter: F) -> MethodBody
where
    T: Any,
    V: Any + Send,
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    MethodBody::Write(Arc::new(move |instance: &mut dyn Any, value: Value| -> Result<(), AccessError> {
        let target = instance
            .downcast_mut::<T>()
            .ok_or(AccessError::InstanceMismatch {
                expected: type_name::<T>(),
            })?;
        let value = value
            .downcast::<V>()
            .map_err(|_| AccessError::ValueMismatch {
                expected: type_name::<V>(),
            })?;
        setter(target, *value);
        Ok(())
    }))
}
