//! Object construction seam.
//!
//! The synthesizer never builds records itself. It asks an [`Activator`] to
//! default-construct a record, to invoke a specific constructor, or to assign
//! a member. [`RecordActivator`] is the built-in implementation producing
//! [`Value::Record`]s; embedders can supply their own, e.g. one that rejects
//! arguments a real constructor would reject.

use crate::class_hierarchy::ClassHierarchy;
use crate::types::{ConstructorInfo, FieldInfo, TypeId};
use crate::universe::TypeProvider;
use crate::value::Value;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("'{type_name}' is not a concrete record")]
    NotARecord { type_name: String },

    #[error("'{type_name}' has no parameterless constructor")]
    NoDefaultConstructor { type_name: String },

    #[error("'{type_name}' declares no constructor with {arity} parameter(s)")]
    NoMatchingConstructor { type_name: String, arity: usize },

    /// Raised by activators that refuse null arguments.
    #[error("missing value for required parameter '{param}'")]
    MissingArgument { param: String },

    #[error("'{type_name}' has no member '{field}'")]
    UnknownField { type_name: String, field: String },

    #[error("member '{field}' of '{type_name}' is read-only")]
    ReadOnlyField { type_name: String, field: String },

    /// Raised by custom activators.
    #[error("{0}")]
    Rejected(String),
}

/// Builds and mutates record values.
pub trait Activator: Send + Sync {
    /// Default-construct `type_id`.
    fn instantiate(&self, db: &dyn TypeProvider, type_id: TypeId) -> Result<Value, ActivationError>;

    /// Invoke `ctor` of `type_id`. `args` holds one slot per parameter; `None`
    /// marks an argument that could not be synthesized.
    fn construct(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        ctor: &ConstructorInfo,
        args: Vec<Option<Value>>,
    ) -> Result<Value, ActivationError>;

    /// Assign `value` to the member `field` of `target`.
    fn assign(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        target: &mut Value,
        field: &str,
        value: Value,
    ) -> Result<(), ActivationError>;
}

/// Builds [`Value::Record`]s whose members start out as [`Value::Null`].
///
/// Constructor parameters are stored into the member with the same name,
/// compared case-insensitively; parameters without a matching member are
/// accepted and dropped. A missing argument leaves its member `Null`, the
/// way a runtime would pass a null reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordActivator;

impl RecordActivator {
    fn blank(db: &dyn TypeProvider, type_id: TypeId) -> Result<(Value, Vec<FieldInfo>), ActivationError> {
        let type_name = db.name_of(type_id);
        let concrete = db
            .get(type_id)
            .and_then(|def| def.as_object().map(|shape| shape.is_concrete()))
            .unwrap_or(false);
        if !concrete {
            return Err(ActivationError::NotARecord { type_name });
        }
        let members = ClassHierarchy::new(db).fields(type_id);
        let fields: IndexMap<String, Value> = members
            .iter()
            .map(|f| (f.name.clone(), Value::Null))
            .collect();
        Ok((Value::Record { type_name, fields }, members))
    }
}

impl Activator for RecordActivator {
    fn instantiate(&self, db: &dyn TypeProvider, type_id: TypeId) -> Result<Value, ActivationError> {
        let has_default = db
            .get(type_id)
            .and_then(|def| def.as_object().map(|shape| shape.has_default_constructor()))
            .unwrap_or(false);
        let (record, _) = Self::blank(db, type_id)?;
        if !has_default {
            return Err(ActivationError::NoDefaultConstructor {
                type_name: db.name_of(type_id),
            });
        }
        Ok(record)
    }

    fn construct(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        ctor: &ConstructorInfo,
        args: Vec<Option<Value>>,
    ) -> Result<Value, ActivationError> {
        let (mut record, members) = Self::blank(db, type_id)?;
        let declared = ctor.params.is_empty()
            || db
                .get(type_id)
                .and_then(|def| def.as_object().map(|shape| shape.constructors.contains(ctor)))
                .unwrap_or(false);
        if !declared || args.len() != ctor.arity() {
            return Err(ActivationError::NoMatchingConstructor {
                type_name: db.name_of(type_id),
                arity: args.len(),
            });
        }

        if let Value::Record { fields, .. } = &mut record {
            for (param, arg) in ctor.params.iter().zip(args) {
                let Some(value) = arg else {
                    continue;
                };
                if let Some(member) = members
                    .iter()
                    .find(|m| m.name.eq_ignore_ascii_case(&param.name))
                {
                    fields.insert(member.name.clone(), value);
                }
            }
        }
        Ok(record)
    }

    fn assign(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        target: &mut Value,
        field: &str,
        value: Value,
    ) -> Result<(), ActivationError> {
        let type_name = db.name_of(type_id);
        let members = ClassHierarchy::new(db).fields(type_id);
        let Some(member) = members.iter().find(|m| m.name == field) else {
            return Err(ActivationError::UnknownField {
                type_name,
                field: field.to_string(),
            });
        };
        if !member.is_writable() {
            return Err(ActivationError::ReadOnlyField {
                type_name,
                field: field.to_string(),
            });
        }
        match target {
            Value::Record { fields, .. } => {
                fields.insert(member.name.clone(), value);
                Ok(())
            }
            _ => Err(ActivationError::NotARecord { type_name }),
        }
    }
}

/// [`RecordActivator`] that refuses to pass a missing argument to a
/// parameter not marked optional.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictRecordActivator;

impl Activator for StrictRecordActivator {
    fn instantiate(&self, db: &dyn TypeProvider, type_id: TypeId) -> Result<Value, ActivationError> {
        RecordActivator.instantiate(db, type_id)
    }

    fn construct(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        ctor: &ConstructorInfo,
        args: Vec<Option<Value>>,
    ) -> Result<Value, ActivationError> {
        let missing = ctor
            .params
            .iter()
            .zip(&args)
            .find(|(param, arg)| arg.is_none() && !param.optional);
        if let Some((param, _)) = missing {
            return Err(ActivationError::MissingArgument {
                param: param.name.clone(),
            });
        }
        RecordActivator.construct(db, type_id, ctor, args)
    }

    fn assign(
        &self,
        db: &dyn TypeProvider,
        type_id: TypeId,
        target: &mut Value,
        field: &str,
        value: Value,
    ) -> Result<(), ActivationError> {
        RecordActivator.assign(db, type_id, target, field, value)
    }
}

#[cfg(test)]
#[path = "tests/activator_tests.rs"]
mod tests;
