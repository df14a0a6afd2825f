//! Structured query tracing for engine entry points.
//!
//! Events use target `propmeta::query_json` and are intended to be consumed with:
//! `PROPMETA_LOG=propmeta::query_json=trace PROPMETA_LOG_FORMAT=json`.
//!
//! Environment:
//! - `PROPMETA_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::def::DefId;
use crate::types::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "propmeta::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| {
            std::env::var("PROPMETA_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string())
        })
        .as_str()
}

#[inline]
pub(crate) fn lookup_start(query_id: u64, op: &'static str, def: DefId) {
    trace!(
        target: "propmeta::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        def_id = def.0
    );
}

#[inline]
pub(crate) fn lookup_end(query_id: u64, op: &'static str, def: DefId, cache_hit: bool) {
    trace!(
        target: "propmeta::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        def_id = def.0,
        cache_hit
    );
}

#[inline]
pub(crate) fn property_resolved(
    query_id: u64,
    op: &'static str,
    owner: DefId,
    property: &str,
    result_type: TypeId,
    via_bridge: bool,
) {
    trace!(
        target: "propmeta::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        def_id = owner.0,
        property,
        result_type_id = result_type.0,
        via_bridge
    );
}

#[inline]
pub(crate) fn eviction(query_id: u64, module: u32, evicted: usize, generation: u64) {
    trace!(
        target: "propmeta::query_json",
        event = "eviction",
        phase = "end",
        run_id = run_id(),
        query_id,
        module_id = module,
        evicted,
        generation
    );
}
