//! Closing open generic types.
//!
//! An open type mentions unbound parameters: a parameter itself, a generic
//! definition, an application with open arguments, or a container over any
//! of those. Closing replaces every free parameter:
//!
//! - with its first constraint, closed recursively, and swapped for the
//!   registry's implementation when that constraint is abstract
//! - with `int` when it has no constraint
//!
//! Self-referential constraints (`T: IComparable<T>`) are cut by a guard on
//! the parameter being closed; the inner occurrence gets the default.

use crate::instantiate::{TypeSubstitution, expand_application, instantiate, substitute};
use crate::recursion::{DepthCounter, RecursionGuard, RecursionProfile};
use crate::registry::ImplementationRegistry;
use crate::type_classifier::{TypeKind, classify_type};
use crate::types::{TypeId, TypeShape};
use crate::universe::TypeProvider;
use indexmap::IndexSet;
use tracing::trace;

/// Type substituted for a parameter without constraints.
pub const DEFAULT_TYPE_ARGUMENT: TypeId = TypeId::INT;

pub struct GenericCloser<'a> {
    db: &'a dyn TypeProvider,
    registry: &'a ImplementationRegistry,
    depth: DepthCounter,
    params: RecursionGuard<TypeId>,
}

impl<'a> GenericCloser<'a> {
    pub fn new(db: &'a dyn TypeProvider, registry: &'a ImplementationRegistry) -> Self {
        Self {
            db,
            registry,
            depth: DepthCounter::with_profile(RecursionProfile::GenericClosing),
            params: RecursionGuard::with_profile(RecursionProfile::GenericClosing),
        }
    }

    /// Close `type_id`. Closed types are returned unchanged.
    pub fn close(&mut self, type_id: TypeId) -> TypeId {
        if !self.depth.enter() {
            trace!(type_id = type_id.0, "GenericCloser::close - depth exceeded");
            return DEFAULT_TYPE_ARGUMENT;
        }
        let closed = self.close_inner(type_id);
        self.depth.leave();
        trace!(
            open = %self.db.name_of(type_id),
            closed = %self.db.name_of(closed),
            "GenericCloser::close"
        );
        closed
    }

    fn close_inner(&mut self, type_id: TypeId) -> TypeId {
        let Some(def) = self.db.get(type_id) else {
            return type_id;
        };
        if matches!(def.shape, TypeShape::Parameter(_)) {
            return self.close_param(type_id);
        }

        let mut free = IndexSet::new();
        collect_free_params(self.db, type_id, &mut free);
        if free.is_empty() {
            return type_id;
        }
        let mut subst = TypeSubstitution::new();
        for param in free {
            let closed = self.close_param(param);
            subst.insert(param, closed);
        }

        match def.as_object() {
            Some(shape) if shape.is_generic_definition() => {
                let args: Vec<TypeId> = shape
                    .type_params
                    .iter()
                    .map(|&p| subst.get(p).unwrap_or(DEFAULT_TYPE_ARGUMENT))
                    .collect();
                instantiate(self.db, type_id, &args).unwrap_or(type_id)
            }
            Some(shape) => match shape.generic_origin {
                Some(origin) => {
                    let args: Vec<TypeId> = shape
                        .type_args
                        .iter()
                        .map(|&arg| substitute(self.db, arg, &subst))
                        .collect();
                    instantiate(self.db, origin, &args).unwrap_or(type_id)
                }
                None => type_id,
            },
            None => substitute(self.db, type_id, &subst),
        }
    }

    fn close_param(&mut self, param: TypeId) -> TypeId {
        if !self.params.enter(param).is_entered() {
            return DEFAULT_TYPE_ARGUMENT;
        }
        let closed = self.close_constraint(param);
        self.params.leave(param);
        closed
    }

    fn close_constraint(&mut self, param: TypeId) -> TypeId {
        let constraint = self.db.get(param).and_then(|def| match &def.shape {
            TypeShape::Parameter(info) => info.constraints.first().copied(),
            _ => None,
        });
        let Some(constraint) = constraint else {
            return DEFAULT_TYPE_ARGUMENT;
        };

        let closed = self.close(constraint);
        let target = expand_application(self.db, closed).unwrap_or(closed);
        if classify_type(self.db, target) != TypeKind::Interface {
            return closed;
        }
        match self.registry.lookup(self.db, target) {
            Some(concrete) => self.close(concrete),
            None => closed,
        }
    }
}

/// Parameters reachable from `type_id` without entering nominal members.
fn collect_free_params(db: &dyn TypeProvider, type_id: TypeId, out: &mut IndexSet<TypeId>) {
    let Some(def) = db.get(type_id) else {
        return;
    };
    match &def.shape {
        TypeShape::Parameter(_) => {
            out.insert(type_id);
        }
        TypeShape::Object(shape) => {
            for &id in shape.type_params.iter().chain(&shape.type_args) {
                collect_free_params(db, id, out);
            }
        }
        TypeShape::Application { args, .. } => {
            for &arg in args {
                collect_free_params(db, arg, out);
            }
        }
        TypeShape::Tuple { elements } => {
            for &element in elements {
                collect_free_params(db, element, out);
            }
        }
        TypeShape::List { element }
        | TypeShape::ReadOnlyList { element }
        | TypeShape::Set { element }
        | TypeShape::Sequence { element }
        | TypeShape::Array { element, .. } => collect_free_params(db, *element, out),
        TypeShape::Map { key, value } | TypeShape::MapInterface { key, value } => {
            collect_free_params(db, *key, out);
            collect_free_params(db, *value, out);
        }
        TypeShape::Scalar(_) | TypeShape::Singleton(_) | TypeShape::Enum { .. } | TypeShape::Opaque => {}
    }
}

#[cfg(test)]
#[path = "tests/generic_closer_tests.rs"]
mod tests;
