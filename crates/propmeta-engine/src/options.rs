//! Engine configuration.

use propmeta_common::limits::MAX_HIERARCHY_DEPTH;
use serde::{Deserialize, Serialize};

/// Knobs for a [`MetadataRegistry`](crate::MetadataRegistry).
///
/// ```json
/// { "maxHierarchyDepth": 16, "resolveBridges": false }
/// ```
///
/// Missing keys take their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineOptions {
    /// Superclass descriptors linked above a described type. Longer chains
    /// are truncated with a warning.
    pub max_hierarchy_depth: u32,
    /// Follow synthetic bridge methods when a reader's erased type is `OBJECT`.
    pub resolve_bridges: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: MAX_HIERARCHY_DEPTH,
            resolve_bridges: true,
        }
    }
}

impl EngineOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub const fn with_max_hierarchy_depth(mut self, depth: u32) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    pub const fn with_resolve_bridges(mut self, enabled: bool) -> Self {
        self.resolve_bridges = enabled;
        self
    }
}
