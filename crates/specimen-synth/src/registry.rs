//! Implementation registry: maps interfaces and abstract types to one
//! concrete implementation.
//!
//! A registry is built once from a list of candidate types and is immutable
//! afterwards. Each build is a separate *epoch*: within an epoch an abstract
//! type resolves to the same concrete type on every lookup.
//!
//! Candidates are scanned non-generic first, then generic. For each concrete
//! candidate, every interface it implements (transitively) and every type in
//! its base chain is registered unless it already has an entry.

use crate::class_hierarchy::ClassHierarchy;
use crate::instantiate::{expand_application, is_open};
use crate::types::{TypeId, TypeShape};
use crate::universe::TypeProvider;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// How competing implementations of one abstract type are ordered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionPolicy {
    /// The first candidate in scan order wins.
    #[default]
    FirstRegistered,
    /// The candidate implementing the fewest interfaces wins; scan order
    /// breaks ties.
    MostSpecific,
}

/// Abstract type -> concrete type, fixed for the lifetime of one epoch.
#[derive(Clone, Debug)]
pub struct ImplementationRegistry {
    epoch: u64,
    policy: ResolutionPolicy,
    entries: FxHashMap<TypeId, TypeId>,
}

impl ImplementationRegistry {
    /// A registry that resolves nothing.
    pub fn empty(policy: ResolutionPolicy) -> Self {
        Self {
            epoch: NEXT_EPOCH.fetch_add(1, Ordering::Relaxed),
            policy,
            entries: FxHashMap::default(),
        }
    }

    /// Build a registry from `types`. Non-object and non-concrete entries are
    /// ignored.
    pub fn build(db: &dyn TypeProvider, types: &[TypeId], policy: ResolutionPolicy) -> Self {
        let mut registry = Self::empty(policy);
        let hierarchy = ClassHierarchy::new(db);

        let mut plain = Vec::new();
        let mut generic = Vec::new();
        for &id in types {
            let Some(def) = db.get(id) else { continue };
            let Some(shape) = def.as_object() else { continue };
            if !shape.is_concrete() {
                continue;
            }
            if shape.is_generic_definition() {
                generic.push(id);
            } else {
                plain.push(id);
            }
        }

        let tier = |ids: Vec<TypeId>| {
            let mut ranked: Vec<(TypeId, Vec<TypeId>)> =
                ids.into_iter().map(|id| (id, hierarchy.interfaces(id))).collect();
            if policy == ResolutionPolicy::MostSpecific {
                // Stable: equal counts keep scan order.
                ranked.sort_by_key(|(_, interfaces)| interfaces.len());
            }
            ranked
        };
        // Generic candidates never jump ahead of non-generic ones.
        let candidates = tier(plain).into_iter().chain(tier(generic));

        for (concrete, interfaces) in candidates {
            for iface in interfaces {
                registry.register(db, iface, concrete);
            }
            for base in hierarchy.base_chain(concrete) {
                registry.register(db, base, concrete);
            }
        }

        debug!(
            epoch = registry.epoch,
            ?policy,
            candidates = types.len(),
            entries = registry.entries.len(),
            "ImplementationRegistry::build"
        );
        registry
    }

    fn register(&mut self, db: &dyn TypeProvider, abstract_type: TypeId, concrete: TypeId) {
        let key = normalize_key(db, abstract_type);
        if self.entries.contains_key(&key) {
            return;
        }
        trace!(
            epoch = self.epoch,
            abstract_type = %db.name_of(key),
            concrete = %db.name_of(concrete),
            "ImplementationRegistry::register"
        );
        self.entries.insert(key, concrete);
    }

    /// Concrete implementation registered for `abstract_type`.
    ///
    /// An instantiation such as `IRepository<int>` with no entry of its own
    /// falls back to the entry for its generic definition.
    pub fn lookup(&self, db: &dyn TypeProvider, abstract_type: TypeId) -> Option<TypeId> {
        let key = normalize_key(db, abstract_type);
        if let Some(&concrete) = self.entries.get(&key) {
            return Some(concrete);
        }
        let origin = db.get(key)?.as_object()?.generic_origin?;
        self.entries.get(&origin).copied()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Closed applications key by their instantiation, open ones by their
/// generic definition.
fn normalize_key(db: &dyn TypeProvider, type_id: TypeId) -> TypeId {
    let Some(def) = db.get(type_id) else {
        return type_id;
    };
    match &def.shape {
        TypeShape::Application { origin, .. } if is_open(db, type_id) => *origin,
        TypeShape::Application { .. } => expand_application(db, type_id).unwrap_or(type_id),
        _ => type_id,
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
