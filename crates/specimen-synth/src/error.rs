//! Internal synthesis failures.
//!
//! A [`SynthError`] never escapes the public entry points: it is turned into
//! a [`Diagnostic`] at the leaf boundary (or at the top-level call) and the
//! branch that failed yields no value.

use crate::activator::ActivationError;
use specimen_common::diagnostics::{Diagnostic, diagnostic_codes};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("breaking cycle after depth {depth} at '{type_name}'")]
    CycleBreak { type_name: String, depth: u32 },

    #[error("no concrete implementation registered for '{type_name}'")]
    Unresolved { type_name: String },

    #[error("could not instantiate '{type_name}': {source}")]
    Instantiation {
        type_name: String,
        #[source]
        source: ActivationError,
    },

    #[error("constructor of '{type_name}' with {arity} parameter(s) failed: {source}")]
    Construction {
        type_name: String,
        arity: usize,
        #[source]
        source: ActivationError,
    },

    #[error("'{type_name}' has no settable members and declares no constructor")]
    NoConstructor { type_name: String },

    #[error("enum '{type_name}' declares no members")]
    EmptyEnum { type_name: String },

    #[error("type '{type_name}' is not supported")]
    Unsupported { type_name: String },

    #[error("array rank {rank} of '{type_name}' is not supported")]
    UnsupportedRank { type_name: String, rank: u8 },
}

impl SynthError {
    /// Diagnostic code reported for this failure.
    pub fn code(&self) -> u32 {
        match self {
            Self::CycleBreak { .. } => diagnostic_codes::BREAKING_CYCLE_AFTER_DEPTH,
            Self::Unresolved { .. } => diagnostic_codes::NO_IMPLEMENTATION_REGISTERED,
            Self::Instantiation { .. } => diagnostic_codes::COULD_NOT_INSTANTIATE,
            Self::Construction { .. } => diagnostic_codes::CONSTRUCTOR_FAILED,
            Self::NoConstructor { .. } => diagnostic_codes::NO_CONSTRUCTOR_DECLARED,
            Self::EmptyEnum { .. } => diagnostic_codes::ENUM_HAS_NO_MEMBERS,
            Self::Unsupported { .. } => diagnostic_codes::TYPE_NOT_SUPPORTED,
            Self::UnsupportedRank { .. } => diagnostic_codes::ARRAY_RANK_NOT_SUPPORTED,
        }
    }

    /// Display name of the type that failed.
    pub fn type_name(&self) -> &str {
        match self {
            Self::CycleBreak { type_name, .. }
            | Self::Unresolved { type_name }
            | Self::Instantiation { type_name, .. }
            | Self::Construction { type_name, .. }
            | Self::NoConstructor { type_name }
            | Self::EmptyEnum { type_name }
            | Self::Unsupported { type_name }
            | Self::UnsupportedRank { type_name, .. } => type_name,
        }
    }

    /// Table-driven diagnostic for this failure.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let type_name = self.type_name();
        match self {
            Self::CycleBreak { depth, .. } => {
                Diagnostic::from_code(self.code(), type_name, &[&depth.to_string()])
            }
            Self::Instantiation { source, .. } => {
                Diagnostic::from_code(self.code(), type_name, &[type_name, &source.to_string()])
            }
            Self::Construction { arity, source, .. } => Diagnostic::from_code(
                self.code(),
                type_name,
                &[type_name, &arity.to_string(), &source.to_string()],
            ),
            Self::UnsupportedRank { rank, .. } => {
                Diagnostic::from_code(self.code(), type_name, &[type_name, &rank.to_string()])
            }
            Self::Unresolved { .. }
            | Self::NoConstructor { .. }
            | Self::EmptyEnum { .. }
            | Self::Unsupported { .. } => Diagnostic::from_code(self.code(), type_name, &[type_name]),
        }
    }
}

pub type SynthResult<T> = Result<T, SynthError>;
