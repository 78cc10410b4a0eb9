//! Synthesis configuration.

use crate::registry::ResolutionPolicy;
use serde::{Deserialize, Serialize};
use specimen_common::limits;

/// How `guid` values are produced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuidStrategy {
    /// A fresh random (v4) guid per value.
    #[default]
    Fresh,
    /// One fixed guid, so whole values compare equal across runs.
    Fixed,
}

/// Knobs for one [`Synthesizer`](crate::Synthesizer).
///
/// Deserializes from camelCase JSON; every key is optional:
///
/// ```json
/// { "maxDepth": 12, "resolution": "mostSpecific", "guids": "fixed" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SynthConfig {
    /// Deepest nesting level that still produces a value.
    pub max_depth: u32,
    pub resolution: ResolutionPolicy,
    pub guids: GuidStrategy,
    /// Member skipped by field population.
    pub reserved_property: String,
    /// Retry lesser-arity constructors when the widest one fails.
    pub constructor_fallback: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_depth: limits::DEFAULT_MAX_SYNTHESIS_DEPTH,
            resolution: ResolutionPolicy::default(),
            guids: GuidStrategy::default(),
            reserved_property: limits::DEFAULT_RESERVED_PROPERTY.to_string(),
            constructor_fallback: false,
        }
    }
}

impl SynthConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_resolution(mut self, resolution: ResolutionPolicy) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_guids(mut self, guids: GuidStrategy) -> Self {
        self.guids = guids;
        self
    }

    pub fn with_constructor_fallback(mut self, enabled: bool) -> Self {
        self.constructor_fallback = enabled;
        self
    }

    /// Returns `true` if `name` is the reserved extension member.
    pub fn is_reserved(&self, name: &str) -> bool {
        !self.reserved_property.is_empty() && self.reserved_property == name
    }
}
