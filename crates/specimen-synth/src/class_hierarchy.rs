//! Record hierarchy queries.
//!
//! Responsibilities:
//! - Merge base fields with derived fields (derived overrides, base order kept)
//! - Walk the base chain of a record
//! - Collect the transitive interface closure of a type
//!
//! Inheritance cycles in hand-written universes are tolerated: every walk is
//! bounded by a [`RecursionGuard`] keyed on the visited type.

use crate::instantiate::expand_application;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::types::{FieldInfo, ObjectShape, TypeId};
use crate::universe::TypeProvider;
use indexmap::{IndexMap, IndexSet};

/// Hierarchy queries over a [`TypeProvider`].
pub struct ClassHierarchy<'a> {
    db: &'a dyn TypeProvider,
}

impl<'a> ClassHierarchy<'a> {
    pub fn new(db: &'a dyn TypeProvider) -> Self {
        Self { db }
    }

    /// Object shape of `type_id`, expanding a generic application first.
    fn object(&self, type_id: TypeId) -> Option<ObjectShape> {
        let id = expand_application(self.db, type_id).unwrap_or(type_id);
        self.db.get(id)?.as_object().cloned()
    }

    /// All fields of `type_id`, inherited ones included.
    ///
    /// Base fields come first in declaration order; a derived field with the
    /// same name replaces the base field in place.
    pub fn fields(&self, type_id: TypeId) -> Vec<FieldInfo> {
        let mut chain = self.base_chain(type_id);
        chain.reverse();
        chain.push(type_id);

        let mut merged: IndexMap<String, FieldInfo> = IndexMap::new();
        for id in chain {
            let Some(shape) = self.object(id) else {
                continue;
            };
            for field in shape.fields {
                merged.insert(field.name.clone(), field);
            }
        }
        merged.into_values().collect()
    }

    /// Base types of `type_id`, nearest first, excluding `type_id` itself.
    pub fn base_chain(&self, type_id: TypeId) -> Vec<TypeId> {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::HierarchyWalk);
        let mut chain = Vec::new();
        let mut current = type_id;
        let mut entered = Vec::new();

        while guard.enter(current).is_entered() {
            entered.push(current);
            let Some(base) = self.object(current).and_then(|shape| shape.base) else {
                break;
            };
            if guard.is_visiting(&base) {
                break;
            }
            chain.push(base);
            current = base;
        }

        for id in entered.into_iter().rev() {
            guard.leave(id);
        }
        chain
    }

    /// Every interface `type_id` implements: declared ones, those inherited
    /// through the base chain, and base interfaces of those, in discovery
    /// order without duplicates.
    pub fn interfaces(&self, type_id: TypeId) -> Vec<TypeId> {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::HierarchyWalk);
        let mut found: IndexSet<TypeId> = IndexSet::new();

        let mut owners = vec![type_id];
        owners.extend(self.base_chain(type_id));
        for owner in owners {
            if let Some(shape) = self.object(owner) {
                for iface in shape.interfaces {
                    self.collect_interface(iface, &mut found, &mut guard);
                }
            }
        }
        found.into_iter().collect()
    }

    fn collect_interface(
        &self,
        iface: TypeId,
        found: &mut IndexSet<TypeId>,
        guard: &mut RecursionGuard<TypeId>,
    ) {
        if found.contains(&iface) || !guard.enter(iface).is_entered() {
            return;
        }
        found.insert(iface);
        if let Some(shape) = self.object(iface) {
            for parent in shape.interfaces.iter().copied().chain(shape.base) {
                self.collect_interface(parent, found, guard);
            }
        }
        guard.leave(iface);
    }
}

#[cfg(test)]
#[path = "tests/class_hierarchy_tests.rs"]
mod tests;
