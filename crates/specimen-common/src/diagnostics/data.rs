//! Diagnostic message table.
//!
//! Codes start at 9001 and are never reused. The table fixes each code's
//! category: a panic at the top level is an error, one inside a member is a
//! warning, and constructor retries are informational.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const BREAKING_CYCLE_AFTER_DEPTH: u32 = 9001;
    pub const NO_IMPLEMENTATION_REGISTERED: u32 = 9002;
    pub const COULD_NOT_INSTANTIATE: u32 = 9003;
    pub const CONSTRUCTOR_FAILED: u32 = 9004;
    pub const NO_CONSTRUCTOR_DECLARED: u32 = 9005;
    pub const ENUM_HAS_NO_MEMBERS: u32 = 9006;
    pub const TYPE_NOT_SUPPORTED: u32 = 9007;
    pub const ARRAY_RANK_NOT_SUPPORTED: u32 = 9008;
    pub const SYNTHESIS_PANICKED: u32 = 9009;
    pub const RETRYING_WITH_SMALLER_CONSTRUCTOR: u32 = 9010;
    pub const MEMBER_SYNTHESIS_PANICKED: u32 = 9011;
}

pub mod diagnostic_messages {
    pub const BREAKING_CYCLE_AFTER_DEPTH: &str = "Breaking cycle after depth {0}.";
    pub const NO_IMPLEMENTATION_REGISTERED: &str =
        "No concrete implementation is registered for '{0}'.";
    pub const COULD_NOT_INSTANTIATE: &str = "Could not instantiate '{0}': {1}";
    pub const CONSTRUCTOR_FAILED: &str = "Constructor of '{0}' with {1} parameter(s) failed: {2}";
    pub const NO_CONSTRUCTOR_DECLARED: &str = "'{0}' has no settable members and declares no constructor.";
    pub const ENUM_HAS_NO_MEMBERS: &str = "Enum '{0}' declares no members.";
    pub const TYPE_NOT_SUPPORTED: &str = "Type '{0}' is not supported for synthesis.";
    pub const ARRAY_RANK_NOT_SUPPORTED: &str = "Array rank {1} of '{0}' is not supported.";
    pub const SYNTHESIS_PANICKED: &str = "Synthesis of '{0}' panicked: {1}";
    pub const RETRYING_WITH_SMALLER_CONSTRUCTOR: &str =
        "Retrying '{0}' with its {1}-parameter constructor.";
    pub const MEMBER_SYNTHESIS_PANICKED: &str = "Synthesis of member type '{0}' panicked: {1}";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::BREAKING_CYCLE_AFTER_DEPTH,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::BREAKING_CYCLE_AFTER_DEPTH,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NO_IMPLEMENTATION_REGISTERED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::NO_IMPLEMENTATION_REGISTERED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::COULD_NOT_INSTANTIATE,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::COULD_NOT_INSTANTIATE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::CONSTRUCTOR_FAILED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::CONSTRUCTOR_FAILED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NO_CONSTRUCTOR_DECLARED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::NO_CONSTRUCTOR_DECLARED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::ENUM_HAS_NO_MEMBERS,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::ENUM_HAS_NO_MEMBERS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_NOT_SUPPORTED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::TYPE_NOT_SUPPORTED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::ARRAY_RANK_NOT_SUPPORTED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::ARRAY_RANK_NOT_SUPPORTED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::SYNTHESIS_PANICKED,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::SYNTHESIS_PANICKED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::RETRYING_WITH_SMALLER_CONSTRUCTOR,
        category: DiagnosticCategory::Message,
        message: diagnostic_messages::RETRYING_WITH_SMALLER_CONSTRUCTOR,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MEMBER_SYNTHESIS_PANICKED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::MEMBER_SYNTHESIS_PANICKED,
    },
];
