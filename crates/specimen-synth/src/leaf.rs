//! Leaf and container rules.
//!
//! Every collection gets exactly one synthesized element, except sets, which
//! stay empty. An element that cannot be synthesized is left out of lists and
//! maps, and becomes `Null` in fixed-size slots (arrays, tuples).

use crate::config::GuidStrategy;
use crate::error::SynthError;
use crate::synthesizer::{SynthContext, panic_message};
use crate::types::{ScalarKind, SingletonKind, TypeId};
use crate::value::{Decimal, Rgba, Value};
use chrono::DateTime;
use specimen_common::diagnostics::diagnostic_codes;
use specimen_common::limits;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::warn;
use uuid::Uuid;

impl SynthContext<'_> {
    /// Synthesize a nested value one level below `depth`.
    ///
    /// Failures are recorded as diagnostics and yield `None`. A panic is
    /// contained here so the owner keeps its other members.
    pub(crate) fn leaf(&mut self, type_id: TypeId, depth: u32) -> Option<Value> {
        match catch_unwind(AssertUnwindSafe(|| self.synthesize(type_id, depth + 1))) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                self.record(&err);
                None
            }
            Err(payload) => {
                let type_name = self.db.name_of(type_id);
                let message = panic_message(payload.as_ref());
                warn!(type_name = %type_name, depth, %message, "member synthesis panicked");
                self.diagnostics.report(
                    diagnostic_codes::MEMBER_SYNTHESIS_PANICKED,
                    &type_name,
                    &[&type_name, &message],
                );
                None
            }
        }
    }

    pub(crate) fn scalar_value(&self, kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::Bool => Value::Bool(true),
            ScalarKind::Int => Value::Int(limits::INT_LITERAL),
            ScalarKind::Double => Value::Double(limits::FLOAT_LITERAL),
            ScalarKind::Float => Value::Float(limits::FLOAT_LITERAL as f32),
            ScalarKind::Char => Value::Char(limits::CHAR_LITERAL),
            ScalarKind::Decimal => {
                Value::Decimal(Decimal::new(limits::DECIMAL_MANTISSA, limits::DECIMAL_SCALE))
            }
            ScalarKind::Guid => Value::Guid(match self.config.guids {
                GuidStrategy::Fresh => Uuid::new_v4(),
                GuidStrategy::Fixed => Uuid::from_u128(limits::FIXED_GUID),
            }),
            ScalarKind::String => Value::String(limits::STRING_LITERAL.to_string()),
            ScalarKind::Regex => Value::Regex(limits::STRING_LITERAL.to_string()),
            ScalarKind::Date => Value::Date(
                DateTime::from_timestamp(limits::FIXED_DATE_UNIX_SECONDS, 0).unwrap_or_default(),
            ),
            ScalarKind::Color => Value::Color(Rgba::from_array(limits::COLOR_RGBA)),
        }
    }

    pub(crate) fn singleton_value(kind: SingletonKind) -> Value {
        match kind {
            SingletonKind::TopType => Value::String(limits::STRING_LITERAL.to_string()),
            SingletonKind::TypeHandle => Value::TypeHandle(ScalarKind::String.name().to_string()),
            SingletonKind::MethodHandle => Value::MethodHandle("ToString".to_string()),
            SingletonKind::Comparable => Value::Int(limits::INT_LITERAL),
        }
    }

    /// One entry, inserted only when both key and value are present.
    pub(crate) fn map_value(&mut self, key: TypeId, value: TypeId, depth: u32) -> Value {
        let key = self.leaf(key, depth);
        let value = self.leaf(value, depth);
        let entries = match (key, value) {
            (Some(k), Some(v)) => vec![(k, v)],
            _ => Vec::new(),
        };
        Value::Map(entries)
    }

    pub(crate) fn array_value(
        &mut self,
        type_id: TypeId,
        element: TypeId,
        rank: u8,
        depth: u32,
    ) -> Result<Value, SynthError> {
        match rank {
            1 => Ok(Value::Array(vec![self.slot(element, depth)])),
            2 => Ok(Value::Array2(vec![vec![self.slot(element, depth)]])),
            _ => Err(SynthError::UnsupportedRank {
                type_name: self.db.name_of(type_id),
                rank,
            }),
        }
    }

    /// List contents: the element when present, nothing otherwise.
    pub(crate) fn single_element(&mut self, element: TypeId, depth: u32) -> Vec<Value> {
        self.leaf(element, depth).into_iter().collect()
    }

    pub(crate) fn tuple_value(&mut self, elements: &[TypeId], depth: u32) -> Value {
        let items = elements.iter().map(|&e| self.slot(e, depth)).collect();
        Value::Tuple(items)
    }

    fn slot(&mut self, element: TypeId, depth: u32) -> Value {
        self.leaf(element, depth).unwrap_or(Value::Null)
    }
}
