//! The metadata registry: process-wide cache of class descriptors.
//!
//! ```text
//! descriptor_of(def)
//!   cache hit  -> stored Arc
//!   cache miss -> build superclass descriptor (same path, depth-capped;
//!                 a chain cut by the cap below the looked-up type stays uncached)
//!              -> build descriptor (type, name, module, superclass link only)
//!              -> insert first-write-wins; racing builders get the stored Arc
//! ```
//!
//! No map guard is held while a descriptor is built, so building a
//! superclass descriptor re-enters the cache freely. Descriptors stay cached
//! until the module that declares them, or a module of any of their
//! superclasses, is unregistered.

use crate::class_descriptor::{ClassDescriptor, ResolutionContext};
use crate::def::{ClassStore, DefId, ModuleId};
use crate::options::EngineOptions;
use crate::query_trace;
use crate::reflect::{PropertyScanner, TypeReflection};
use crate::types::TypeId;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};

/// Point-in-time registry counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub cached: usize,
    pub generation: u64,
}

pub struct MetadataRegistry {
    reflect: Arc<dyn TypeReflection>,
    scanner: Arc<dyn PropertyScanner>,
    options: EngineOptions,
    cache: DashMap<DefId, Arc<ClassDescriptor>, FxBuildHasher>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MetadataRegistry {
    /// Registry over a [`ClassStore`] acting as both collaborators.
    pub fn new(store: Arc<ClassStore>) -> Self {
        Self::with_options(store, EngineOptions::default())
    }

    pub fn with_options(store: Arc<ClassStore>, options: EngineOptions) -> Self {
        let reflect: Arc<dyn TypeReflection> = store.clone();
        let scanner: Arc<dyn PropertyScanner> = store;
        Self::with_collaborators(reflect, scanner, options)
    }

    pub fn with_collaborators(
        reflect: Arc<dyn TypeReflection>,
        scanner: Arc<dyn PropertyScanner>,
        options: EngineOptions,
    ) -> Self {
        Self {
            reflect,
            scanner,
            options,
            cache: DashMap::with_hasher(FxBuildHasher),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The descriptor of `def`. Repeated calls return the same `Arc` until the
    /// descriptor is evicted.
    pub fn descriptor_of(&self, def: DefId) -> Arc<ClassDescriptor> {
        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::lookup_start(query_id, "descriptor_of", def);
        }

        let (descriptor, cache_hit) = self.lookup_or_build(def, 0);

        if let Some(query_id) = query_id {
            query_trace::lookup_end(query_id, "descriptor_of", def, cache_hit);
        }
        descriptor
    }

    /// Descriptor of the raw class of a class or parameterized type; `None`
    /// for intrinsics, arrays, type variables and wildcards.
    pub fn descriptor_of_type(&self, ty: TypeId) -> Option<Arc<ClassDescriptor>> {
        self.reflect
            .types()
            .raw_def(ty)
            .map(|def| self.descriptor_of(def))
    }

    fn lookup_or_build(&self, def: DefId, depth: u32) -> (Arc<ClassDescriptor>, bool) {
        if let Some(found) = self.cache.get(&def) {
            if self.fits(found.value(), depth) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return (Arc::clone(found.value()), true);
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        (self.build(def, depth), false)
    }

    /// Whether a cached descriptor can stand in at `depth` links below the
    /// looked-up type without exceeding the depth cap.
    fn fits(&self, cached: &ClassDescriptor, depth: u32) -> bool {
        depth == 0
            || (!cached.is_truncated()
                && depth.saturating_add(cached.chain_length()) <= self.options.max_hierarchy_depth)
    }

    fn build(&self, def: DefId, depth: u32) -> Arc<ClassDescriptor> {
        let generation = self.generation();

        let mut truncated = false;
        let superclass = match self.reflect.superclass_of(def) {
            Some(super_def) if depth < self.options.max_hierarchy_depth => {
                Some(self.lookup_or_build(super_def, depth + 1).0)
            }
            Some(super_def) => {
                warn!(
                    def_id = def.0,
                    super_def_id = super_def.0,
                    max_depth = self.options.max_hierarchy_depth,
                    "superclass chain truncated"
                );
                truncated = true;
                None
            }
            None => None,
        };

        let context = ResolutionContext::new(
            def,
            Arc::clone(&self.reflect),
            Arc::clone(&self.scanner),
            self.options,
        );
        let built = Arc::new(ClassDescriptor::new(context, superclass, truncated));

        // A module was unregistered while building: the superclass link may
        // point at an evicted descriptor, so hand this one out uncached.
        if self.generation() != generation {
            debug!(def_id = def.0, "descriptor built across an eviction, not cached");
            return built;
        }

        // Below the looked-up type, a chain cut by the cap is not what a
        // direct lookup of `def` would produce.
        if depth > 0 && built.is_truncated() {
            trace!(def_id = def.0, depth, "truncated superclass descriptor, not cached");
            return built;
        }

        let stored = Arc::clone(self.cache.entry(def).or_insert(built).value());
        trace!(def_id = def.0, name = stored.name(), depth, "descriptor cached");
        stored
    }

    /// Evict every descriptor that describes a type of `module` or whose
    /// superclass chain reaches one. Returns the number of evicted entries.
    ///
    /// A lookup racing the sweep may fetch a superclass descriptor just
    /// before it is removed and cache itself behind the sweep. Follow-up
    /// sweeps, each under a new generation, remove such descriptors until
    /// every cached chain links only cached descriptors.
    pub fn unregister_module(&self, module: ModuleId) -> usize {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let mut evicted = 0;
        self.cache.retain(|_, descriptor| {
            let doomed = descriptor.depends_on_module(module);
            evicted += usize::from(doomed);
            !doomed
        });

        let mut sweeps = 1;
        loop {
            self.generation.fetch_add(1, Ordering::AcqRel);
            let stale = self.stale_entries();
            if stale.is_empty() {
                break;
            }
            sweeps += 1;
            evicted += stale
                .iter()
                .filter(|(def, descriptor)| {
                    self.cache
                        .remove_if(def, |_, cached| Arc::ptr_eq(cached, descriptor))
                        .is_some()
                })
                .count();
        }
        self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);

        let generation = self.generation();
        debug!(module = module.0, evicted, sweeps, generation, "unregister_module");
        if query_trace::enabled() {
            query_trace::eviction(query_trace::next_query_id(), module.0, evicted, generation);
        }
        evicted
    }

    /// Cached descriptors whose chain links a complete descriptor that is no
    /// longer the cached one for its type.
    fn stale_entries(&self) -> Vec<(DefId, Arc<ClassDescriptor>)> {
        let snapshot: Vec<_> = self
            .cache
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        snapshot
            .into_iter()
            .filter(|(_, descriptor)| !self.links_cached_chain(descriptor))
            .collect()
    }

    fn links_cached_chain(&self, descriptor: &ClassDescriptor) -> bool {
        let mut link = descriptor.superclass_descriptor();
        while let Some(superclass) = link {
            // Cut copies are never cached.
            if !superclass.is_truncated() {
                let cached = self
                    .cache
                    .get(&superclass.described_type())
                    .is_some_and(|found| Arc::ptr_eq(found.value(), superclass));
                if !cached {
                    return false;
                }
            }
            link = superclass.superclass_descriptor();
        }
        true
    }

    /// Advances at least once per eviction call.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Drop every cached descriptor.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        let evicted = self.cache.len();
        self.cache.clear();
        self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
        debug!(evicted, "registry cleared");
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, def: DefId) -> bool {
        self.cache.contains_key(&def)
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            cached: self.cache.len(),
            generation: self.generation(),
        }
    }
}

impl fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("options", &self.options)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
