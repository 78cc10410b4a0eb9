//! Representative Value Synthesis
//!
//! Given a description of a type, this crate produces one well-formed,
//! fully populated value of that type for use as test input (serialization
//! round trips, schema-migration checks, API versioning checks).
//!
//! - **Classification**: every type maps to one closed [`TypeKind`]
//! - **Resolution**: interfaces go through an [`ImplementationRegistry`],
//!   open generics through the [`GenericCloser`]
//! - **Cycle handling**: a depth bound cuts self-referential shapes
//! - **Graceful degradation**: failures become [`Diagnostics`], never panics
mod immutable;
mod leaf;

pub mod activator;
pub mod class_hierarchy;
pub mod config;
pub mod error;
pub mod generic_closer;
pub mod instantiate;
pub mod recursion;
pub mod registry;
pub mod schema;
pub mod synthesizer;
pub mod type_classifier;
pub mod types;
pub mod universe;
pub mod value;

pub use activator::{ActivationError, Activator, RecordActivator, StrictRecordActivator};
pub use config::{GuidStrategy, SynthConfig};
pub use error::{SynthError, SynthResult};
pub use generic_closer::GenericCloser;
pub use registry::{ImplementationRegistry, ResolutionPolicy};
pub use schema::{SchemaDocument, SchemaError, load_schema};
pub use specimen_common::{Diagnostic, DiagnosticCategory, Diagnostics};
pub use synthesizer::{BulkOutcome, Synthesis, Synthesizer};
pub use type_classifier::{TypeKind, classify_type};
pub use types::{
    ConstructorInfo, FieldInfo, Mutability, ObjectFlags, ObjectShape, ParamInfo, ScalarKind,
    SingletonKind, TypeDef, TypeId, TypeParamInfo, TypeShape,
};
pub use universe::{TypeProvider, TypeUniverse};
pub use value::{Decimal, Rgba, Value};
