//! Centralized limits and thresholds for the metadata engine.
//!
//! Hierarchies described by hosts are acyclic by construction, but the engine
//! never trusts that. Every walk over a superclass chain, an interface graph or
//! a chain of type-variable bounds is capped by one of these values.
//!
//! # Engine recursion limits
//!
//! The per-walk depth and iteration caps used inside the engine are
//! expressed as `propmeta_engine::recursion::RecursionProfile` presets,
//! which read their depths from the constants below.

// =============================================================================
// Hierarchy limits
// =============================================================================

/// Maximum length of a superclass chain the registry links together.
///
/// When a chain is longer than this the registry stops linking superclass
/// descriptors and logs a warning. Properties declared above the cut-off are
/// not reported.
///
/// ```text
/// class C0 extends C1
/// class C1 extends C2
/// ...
/// class C63 extends C64   // C64 and above are cut off
/// ```
pub const MAX_HIERARCHY_DEPTH: u32 = 64;

/// Maximum nesting depth when following interfaces of interfaces.
///
/// ```text
/// interface I0<T> extends I1<T>
/// interface I1<T> extends I2<T>
/// ...
/// ```
pub const MAX_INTERFACE_DEPTH: u32 = 64;

/// Maximum number of enclosing types followed for nested classes.
pub const MAX_ENCLOSING_DEPTH: u32 = 16;

// =============================================================================
// Resolution limits
// =============================================================================

/// Maximum depth when resolving a type variable through its declared bounds.
///
/// ```text
/// class Pair<A extends B, B extends C, C extends Number>
/// // A -> B -> C -> Number
/// ```
pub const MAX_BOUND_DEPTH: u32 = 32;

/// Maximum structural depth when resolving a type expression to its raw type.
///
/// Covers nested arrays and wildcards such as `? extends T[][]`.
pub const MAX_TYPE_RESOLUTION_DEPTH: u32 = 32;

/// Upper bound on the total number of steps any single walk may take.
pub const MAX_WALK_ITERATIONS: u32 = 10_000;
