//! Value synthesizer: the recursive orchestrator and its entry points.
//!
//! [`Synthesizer::synthesize`] produces one representative value for a type;
//! [`Synthesizer::synthesize_many`] does the same for a batch. Both return
//! their diagnostics alongside the result and never panic: failures inside
//! the recursion (including panics raised by a custom [`Activator`]) become
//! diagnostics and a missing value.
//!
//! ## Depth
//!
//! Every nested value (record member, collection element, map key or value,
//! tuple component, constructor argument) is synthesized one level deeper
//! than its owner. Swapping a type for another one (interface to
//! implementation, open generic to closed, application to instantiation)
//! does not cost a level. Past `SynthConfig::max_depth` the branch is cut
//! with a cycle-break warning.

use crate::activator::{Activator, RecordActivator};
use crate::class_hierarchy::ClassHierarchy;
use crate::config::SynthConfig;
use crate::error::{SynthError, SynthResult};
use crate::generic_closer::GenericCloser;
use crate::instantiate::{expand_application, instantiate};
use crate::registry::ImplementationRegistry;
use crate::type_classifier::{ContainerInterface, TypeKind, classify_type};
use crate::types::TypeId;
use crate::universe::TypeProvider;
use crate::value::Value;
use once_cell::sync::OnceCell;
use serde::Serialize;
use specimen_common::diagnostics::{Diagnostic, Diagnostics, diagnostic_codes};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, trace, warn};

// =============================================================================
// Results
// =============================================================================

/// Outcome of a single synthesis call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Synthesis {
    /// `None` when no test data could be generated.
    pub value: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl Synthesis {
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }
}

/// Outcome of a bulk call: every requested type lands in exactly one of
/// `values` or `failures`, in request order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub values: Vec<(TypeId, Value)>,
    pub failures: Vec<TypeId>,
    pub diagnostics: Diagnostics,
}

impl BulkOutcome {
    pub fn value_of(&self, type_id: TypeId) -> Option<&Value> {
        self.values
            .iter()
            .find(|(id, _)| *id == type_id)
            .map(|(_, value)| value)
    }
}

// =============================================================================
// Synthesizer
// =============================================================================

/// Synthesizes representative values for types of one [`TypeProvider`].
///
/// ## Usage
///
/// ```ignore
/// let db = TypeUniverse::new();
/// let order = db.declare_with("Order", TypeShape::Object(
///     ObjectShape::record().with_field("Name", TypeId::STRING),
/// ));
/// let synthesis = Synthesizer::new(&db).synthesize(order);
/// assert!(synthesis.is_success());
/// ```
pub struct Synthesizer<'a> {
    db: &'a dyn TypeProvider,
    config: SynthConfig,
    activator: Box<dyn Activator>,
    /// Built on first use from every known type.
    registry: OnceCell<ImplementationRegistry>,
}

impl<'a> Synthesizer<'a> {
    pub fn new(db: &'a dyn TypeProvider) -> Self {
        Self::with_config(db, SynthConfig::default())
    }

    pub fn with_config(db: &'a dyn TypeProvider, config: SynthConfig) -> Self {
        Self {
            db,
            config,
            activator: Box::new(RecordActivator),
            registry: OnceCell::new(),
        }
    }

    /// Replace the default [`RecordActivator`].
    pub fn with_activator(mut self, activator: impl Activator + 'static) -> Self {
        self.activator = Box::new(activator);
        self
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// The registry used by [`synthesize`](Self::synthesize), built from
    /// [`TypeProvider::known_types`] on first access.
    pub fn registry(&self) -> &ImplementationRegistry {
        self.registry.get_or_init(|| {
            ImplementationRegistry::build(self.db, &self.db.known_types(), self.config.resolution)
        })
    }

    /// Synthesize one value for `type_id`.
    pub fn synthesize(&self, type_id: TypeId) -> Synthesis {
        self.run(type_id, self.registry())
    }

    /// Synthesize a value for each of `types`.
    ///
    /// The batch gets its own registry built from `types` alone; it is
    /// dropped when the call returns.
    pub fn synthesize_many(&self, types: &[TypeId]) -> BulkOutcome {
        self.synthesize_many_in(types, types)
    }

    /// Like [`synthesize_many`](Self::synthesize_many), but the batch
    /// registry is built from `universe`. Use this when implementations
    /// (generic definitions, say) are not themselves requested.
    pub fn synthesize_many_in(&self, types: &[TypeId], universe: &[TypeId]) -> BulkOutcome {
        let registry = ImplementationRegistry::build(self.db, universe, self.config.resolution);
        let mut outcome = BulkOutcome::default();
        for &type_id in types {
            let synthesis = self.run(type_id, &registry);
            outcome.diagnostics.extend(synthesis.diagnostics);
            match synthesis.value {
                Some(value) => outcome.values.push((type_id, value)),
                None => outcome.failures.push(type_id),
            }
        }
        debug!(
            epoch = registry.epoch(),
            requested = types.len(),
            universe = universe.len(),
            succeeded = outcome.values.len(),
            failed = outcome.failures.len(),
            "Synthesizer::synthesize_many"
        );
        outcome
    }

    fn run(&self, type_id: TypeId, registry: &ImplementationRegistry) -> Synthesis {
        let mut ctx = SynthContext {
            db: self.db,
            config: &self.config,
            activator: self.activator.as_ref(),
            registry,
            diagnostics: Diagnostics::new(),
        };
        let result = catch_unwind(AssertUnwindSafe(|| ctx.synthesize(type_id, 0)));
        let value = match result {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                ctx.record(&err);
                None
            }
            Err(payload) => {
                let type_name = self.db.name_of(type_id);
                let message = panic_message(payload.as_ref());
                warn!(type_name = %type_name, %message, "synthesis panicked");
                ctx.diagnostics.push(Diagnostic::from_code(
                    diagnostic_codes::SYNTHESIS_PANICKED,
                    &type_name,
                    &[&type_name, &message],
                ));
                None
            }
        };
        Synthesis {
            value,
            diagnostics: ctx.diagnostics,
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// =============================================================================
// SynthContext
// =============================================================================

/// State of one synthesis call.
pub(crate) struct SynthContext<'a> {
    pub(crate) db: &'a dyn TypeProvider,
    pub(crate) config: &'a SynthConfig,
    pub(crate) activator: &'a dyn Activator,
    pub(crate) registry: &'a ImplementationRegistry,
    pub(crate) diagnostics: Diagnostics,
}

impl SynthContext<'_> {
    pub(crate) fn record(&mut self, err: &SynthError) {
        trace!(type_name = err.type_name(), code = err.code(), %err, "diagnostic");
        self.diagnostics.push(err.to_diagnostic());
    }

    /// Synthesize `type_id` at nesting level `depth`.
    pub(crate) fn synthesize(&mut self, type_id: TypeId, depth: u32) -> SynthResult<Value> {
        if depth > self.config.max_depth {
            return Err(SynthError::CycleBreak {
                type_name: self.db.name_of(type_id),
                depth: self.config.max_depth,
            });
        }

        let kind = classify_type(self.db, type_id);
        trace!(
            type_name = %self.db.name_of(type_id),
            depth,
            kind = kind.label(),
            "SynthContext::synthesize"
        );

        match kind {
            TypeKind::Scalar(scalar) => Ok(self.scalar_value(scalar)),
            TypeKind::Singleton(singleton) => Ok(Self::singleton_value(singleton)),
            TypeKind::Enum { members } => self.enum_value(type_id, &members),
            TypeKind::Map { key, value } => Ok(self.map_value(key, value, depth)),
            TypeKind::Array { element, rank } => self.array_value(type_id, element, rank, depth),
            TypeKind::List { element } => Ok(Value::List(self.single_element(element, depth))),
            TypeKind::ReadOnlyList { element } => {
                Ok(Value::ReadOnlyList(self.single_element(element, depth)))
            }
            TypeKind::Set { .. } => Ok(Value::Set(Vec::new())),
            TypeKind::Tuple(elements) => Ok(self.tuple_value(&elements, depth)),
            TypeKind::OpenGenericContainer(ContainerInterface::Sequence { element }) => {
                Ok(Value::List(self.single_element(element, depth)))
            }
            TypeKind::OpenGenericContainer(ContainerInterface::Map { key, value }) => {
                Ok(self.map_value(key, value, depth))
            }
            TypeKind::Interface => self.resolve_interface(type_id, depth),
            TypeKind::OpenGeneric => {
                let closed = GenericCloser::new(self.db, self.registry).close(type_id);
                self.resynthesize(type_id, closed, depth)
            }
            TypeKind::Application { .. } => match expand_application(self.db, type_id) {
                Some(expanded) => self.resynthesize(type_id, expanded, depth),
                None => Err(self.unsupported(type_id)),
            },
            TypeKind::ImmutableRecord => self.build_immutable(type_id, depth),
            TypeKind::MutableRecord => self.build_mutable(type_id, depth),
            TypeKind::Unsupported => Err(self.unsupported(type_id)),
        }
    }

    /// Continue with `replacement` at the same depth. A replacement equal to
    /// the original would recurse forever and is rejected.
    fn resynthesize(&mut self, original: TypeId, replacement: TypeId, depth: u32) -> SynthResult<Value> {
        if replacement == original {
            return Err(self.unsupported(original));
        }
        trace!(
            from = %self.db.name_of(original),
            to = %self.db.name_of(replacement),
            "SynthContext::resynthesize"
        );
        self.synthesize(replacement, depth)
    }

    fn unsupported(&self, type_id: TypeId) -> SynthError {
        SynthError::Unsupported {
            type_name: self.db.name_of(type_id),
        }
    }

    fn resolve_interface(&mut self, type_id: TypeId, depth: u32) -> SynthResult<Value> {
        let Some(concrete) = self.registry.lookup(self.db, type_id) else {
            return Err(SynthError::Unresolved {
                type_name: self.db.name_of(type_id),
            });
        };
        let concrete = self.specialize(type_id, concrete);
        debug!(
            interface = %self.db.name_of(type_id),
            concrete = %self.db.name_of(concrete),
            epoch = self.registry.epoch(),
            "resolved implementation"
        );
        if concrete == type_id {
            return Err(SynthError::Unresolved {
                type_name: self.db.name_of(type_id),
            });
        }
        self.synthesize(concrete, depth)
    }

    /// A generic implementation registered for a generic interface takes
    /// the requested instantiation's arguments when the arities agree.
    fn specialize(&self, requested: TypeId, concrete: TypeId) -> TypeId {
        let args = self
            .db
            .get(requested)
            .and_then(|def| def.as_object().map(|shape| shape.type_args.clone()))
            .unwrap_or_default();
        if args.is_empty() {
            return concrete;
        }
        instantiate(self.db, concrete, &args).unwrap_or(concrete)
    }

    fn enum_value(&self, type_id: TypeId, members: &[String]) -> SynthResult<Value> {
        let type_name = self.db.name_of(type_id);
        match members.last() {
            Some(member) => Ok(Value::Enum {
                type_name,
                member: member.clone(),
                ordinal: members.len() - 1,
            }),
            None => Err(SynthError::EmptyEnum { type_name }),
        }
    }

    fn build_mutable(&mut self, type_id: TypeId, depth: u32) -> SynthResult<Value> {
        let mut record = self
            .activator
            .instantiate(self.db, type_id)
            .map_err(|source| SynthError::Instantiation {
                type_name: self.db.name_of(type_id),
                source,
            })?;
        self.populate_fields(type_id, &mut record, &[], depth);
        Ok(record)
    }

    /// Assign a synthesized value to every writable member of `record`
    /// except the reserved one and those named in `skip` (compared
    /// case-insensitively). Members whose value or assignment fails (or
    /// panics) keep their current value.
    pub(crate) fn populate_fields(
        &mut self,
        type_id: TypeId,
        record: &mut Value,
        skip: &[&str],
        depth: u32,
    ) {
        for field in ClassHierarchy::new(self.db).fields(type_id) {
            if !field.is_writable()
                || self.config.is_reserved(&field.name)
                || skip.iter().any(|s| s.eq_ignore_ascii_case(&field.name))
            {
                continue;
            }
            let Some(value) = self.leaf(field.type_id, depth) else {
                continue;
            };
            let (db, activator) = (self.db, self.activator);
            let assigned = catch_unwind(AssertUnwindSafe(|| {
                activator.assign(db, type_id, record, &field.name, value)
            }));
            match assigned {
                Ok(Ok(())) => {}
                Ok(Err(err)) => trace!(field = %field.name, %err, "assignment skipped"),
                Err(payload) => trace!(
                    field = %field.name,
                    message = %panic_message(payload.as_ref()),
                    "assignment panicked"
                ),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/synthesizer_tests.rs"]
mod tests;
