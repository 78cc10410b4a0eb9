//! Immutable records: construction through the widest constructor.
//!
//! Constructor arguments are nested values and cost one depth level each,
//! so a record whose constructor takes its own type still terminates.

use crate::error::{SynthError, SynthResult};
use crate::synthesizer::SynthContext;
use crate::types::{ConstructorInfo, TypeId};
use crate::value::Value;
use specimen_common::diagnostics::diagnostic_codes;
use tracing::debug;

impl SynthContext<'_> {
    /// Build `type_id` through its constructor with the most parameters
    /// (declaration order breaks ties), then populate the writable members
    /// the constructor did not cover.
    ///
    /// With `SynthConfig::constructor_fallback` set, a failing constructor is
    /// followed by the next narrower one.
    pub(crate) fn build_immutable(&mut self, type_id: TypeId, depth: u32) -> SynthResult<Value> {
        let type_name = self.db.name_of(type_id);
        let mut constructors: Vec<ConstructorInfo> = self
            .db
            .get(type_id)
            .and_then(|def| def.as_object().map(|shape| shape.constructors.clone()))
            .unwrap_or_default();
        if constructors.is_empty() {
            // Read-only members and no constructor to set them through.
            return Err(SynthError::NoConstructor { type_name });
        }
        constructors.sort_by(|a, b| b.arity().cmp(&a.arity()));

        let attempts = if self.config.constructor_fallback {
            constructors.len()
        } else {
            1
        };

        let mut last_error = None;
        for (attempt, ctor) in constructors.iter().take(attempts).enumerate() {
            if let Some(err) = last_error.take() {
                self.record(&err);
            }
            if attempt > 0 {
                self.diagnostics.report(
                    diagnostic_codes::RETRYING_WITH_SMALLER_CONSTRUCTOR,
                    &type_name,
                    &[&type_name, &ctor.arity().to_string()],
                );
            }

            let args: Vec<Option<Value>> = ctor
                .params
                .iter()
                .map(|param| self.leaf(param.type_id, depth))
                .collect();

            match self.activator.construct(self.db, type_id, ctor, args) {
                Ok(mut record) => {
                    let covered: Vec<&str> = ctor.params.iter().map(|p| p.name.as_str()).collect();
                    self.populate_fields(type_id, &mut record, &covered, depth);
                    return Ok(record);
                }
                Err(source) => {
                    debug!(type_name = %type_name, arity = ctor.arity(), %source, "constructor failed");
                    last_error = Some(SynthError::Construction {
                        type_name: type_name.clone(),
                        arity: ctor.arity(),
                        source,
                    });
                }
            }
        }

        Err(last_error.unwrap_or(SynthError::NoConstructor { type_name }))
    }
}
