//! Error types.
//!
//! Metadata errors are memoized inside descriptors and handed out again on
//! every later query, so they are all `Clone`.

use crate::def::DefId;
use std::sync::Arc;
use thiserror::Error;

/// Failure of the property-scanning collaborator for one type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("type {0:?} is not registered")]
    UnknownType(DefId),

    #[error("type {0:?} is reserved but has no definition")]
    Undefined(DefId),

    #[error("{0}")]
    Collaborator(Arc<str>),
}

/// Static metadata failure surfaced by a class descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The properties of `type_name` could not be enumerated.
    #[error("failed to scan properties of `{type_name}`: {source}")]
    Scan {
        type_name: Arc<str>,
        #[source]
        source: ScanError,
    },
}

/// Failure while reading or writing a property value on an instance.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("method `{method}` has no invocable body")]
    NotInvocable { method: Arc<str> },

    #[error("instance is not a `{expected}`")]
    InstanceMismatch { expected: &'static str },

    #[error("value is not a `{expected}`")]
    ValueMismatch { expected: &'static str },

    #[error("property `{property}` is read-only")]
    ReadOnly { property: Arc<str> },

    #[error("accessor failed: {message}")]
    Failed { message: Arc<str> },
}

impl AccessError {
    pub fn failed(message: impl Into<Arc<str>>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
