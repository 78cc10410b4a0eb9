//! Common types and utilities for the specimen value synthesizer.
//!
//! This crate provides foundational types used across all specimen crates:
//! - Diagnostic records, message templates and the per-run accumulator
//! - Synthesis limits and fixed literal constants

// Diagnostics - message table and per-run accumulator
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};

// Centralized limits and thresholds
pub mod limits;
