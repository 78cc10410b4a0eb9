//! Centralized limits and fixed literals for value synthesis.
//!
//! The synthesis depth default seeds `SynthConfig::max_depth`; the generic
//! closing and hierarchy limits back `specimen_synth::recursion::RecursionProfile`.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Default maximum nesting depth for a single synthesis run.
///
/// Every nested value (record field, collection element, map key or value,
/// tuple component, constructor argument) adds one level. Past this depth the
/// synthesizer reports a cycle break and yields no value for that branch.
///
/// ```text
/// record Node { Next: Node, Value: int }
/// // Node -> Next -> Next -> ... stops after 20 levels
/// ```
pub const DEFAULT_MAX_SYNTHESIS_DEPTH: u32 = 20;

/// Maximum depth for closing generic parameters through their constraints.
///
/// Guards self-referential constraints such as `T: IComparable<T>`; once
/// exceeded the parameter falls back to the default scalar.
pub const MAX_GENERIC_CLOSE_DEPTH: u32 = 8;

/// Maximum number of base types followed when walking a record hierarchy.
///
/// Inheritance cycles are rejected by the visited set; this bounds
/// pathological but acyclic chains.
pub const MAX_HIERARCHY_DEPTH: u32 = 64;

// =============================================================================
// Fixed Literals
// =============================================================================

/// Integer literal used for `int` and for the comparable singleton.
pub const INT_LITERAL: i64 = 42;

/// Floating literal used for `double` and `float`.
pub const FLOAT_LITERAL: f64 = 42.42;

/// `decimal` literal as mantissa and scale (42.42).
pub const DECIMAL_MANTISSA: i64 = 4242;
pub const DECIMAL_SCALE: u32 = 2;

/// Character literal.
pub const CHAR_LITERAL: char = 't';

/// String literal, also used as the regex pattern.
pub const STRING_LITERAL: &str = "test";

/// Fixed date: 2000-01-01T00:00:00Z.
pub const FIXED_DATE_UNIX_SECONDS: i64 = 946_684_800;

/// Fixed RGBA color.
pub const COLOR_RGBA: [u8; 4] = [1, 2, 3, 4];

/// Value used for guids when deterministic guids are requested.
pub const FIXED_GUID: u128 = 0x0000_0042_0000_4000_8000_0000_0000_0042;

/// Default name of the reserved extension property that population skips.
pub const DEFAULT_RESERVED_PROPERTY: &str = "ExtensionData";
