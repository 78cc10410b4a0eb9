//! Type classification for synthesis.
//!
//! Every type the synthesizer visits is classified exactly once into a
//! [`TypeKind`]. Each variant carries what its synthesis rule needs, so the
//! rules never have to look the shape up again.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::type_classifier::{classify_type, TypeKind};
//!
//! match classify_type(&db, type_id) {
//!     TypeKind::Scalar(kind) => { /* literal */ }
//!     TypeKind::Interface => { /* registry lookup */ }
//!     TypeKind::MutableRecord => { /* populate fields */ }
//!     _ => { /* other rules */ }
//! }
//! ```

use crate::class_hierarchy::ClassHierarchy;
use crate::instantiate::is_open;
use crate::types::{FieldInfo, ObjectShape, ScalarKind, SingletonKind, TypeId, TypeShape};
use crate::universe::TypeProvider;

/// Synthesis category of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    // =========================================================================
    // Leaves
    // =========================================================================
    /// Primitive, string-like, or well-known scalar.
    Scalar(ScalarKind),

    /// Platform singleton with a fixed substitute value.
    Singleton(SingletonKind),

    /// Enumeration; synthesized as its last member.
    Enum { members: Vec<String> },

    // =========================================================================
    // Containers
    // =========================================================================
    Map { key: TypeId, value: TypeId },
    Array { element: TypeId, rank: u8 },
    List { element: TypeId },
    ReadOnlyList { element: TypeId },
    Set { element: TypeId },
    Tuple(Vec<TypeId>),

    /// Abstract sequence or map interface, materialized as the concrete
    /// container it stands for.
    OpenGenericContainer(ContainerInterface),

    // =========================================================================
    // Objects
    // =========================================================================
    /// Interface or abstract class; needs a registry resolution.
    Interface,

    /// Type mentioning unbound parameters; needs closing first.
    OpenGeneric,

    /// Closed reference to a generic definition; expanded before synthesis.
    Application { origin: TypeId, args: Vec<TypeId> },

    /// Record built through a constructor.
    ImmutableRecord,

    /// Record built by default construction plus field assignment.
    MutableRecord,

    /// Anything the synthesizer cannot build.
    Unsupported,
}

/// The abstract container interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerInterface {
    Sequence { element: TypeId },
    Map { key: TypeId, value: TypeId },
}

impl TypeKind {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Singleton(_) => "singleton",
            Self::Enum { .. } => "enum",
            Self::Map { .. } => "map",
            Self::Array { .. } => "array",
            Self::List { .. } => "list",
            Self::ReadOnlyList { .. } => "read-only list",
            Self::Set { .. } => "set",
            Self::Tuple(_) => "tuple",
            Self::OpenGenericContainer(_) => "container interface",
            Self::Interface => "interface",
            Self::OpenGeneric => "open generic",
            Self::Application { .. } => "generic application",
            Self::ImmutableRecord => "immutable record",
            Self::MutableRecord => "mutable record",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Classify `type_id`.
///
/// Containers whose element types are still open classify as
/// [`TypeKind::OpenGeneric`] so they get closed before element synthesis.
pub fn classify_type(db: &dyn TypeProvider, type_id: TypeId) -> TypeKind {
    let Some(def) = db.get(type_id) else {
        return TypeKind::Unsupported;
    };

    let kind = match &def.shape {
        TypeShape::Scalar(kind) => return TypeKind::Scalar(*kind),
        TypeShape::Singleton(kind) => return TypeKind::Singleton(*kind),
        TypeShape::Enum { members } => return TypeKind::Enum {
            members: members.clone(),
        },
        TypeShape::Opaque => return TypeKind::Unsupported,
        TypeShape::Parameter(_) => return TypeKind::OpenGeneric,
        TypeShape::Object(shape) => return classify_object(db, type_id, shape),
        TypeShape::Map { key, value } => TypeKind::Map {
            key: *key,
            value: *value,
        },
        TypeShape::Array { element, rank } => TypeKind::Array {
            element: *element,
            rank: *rank,
        },
        TypeShape::List { element } => TypeKind::List { element: *element },
        TypeShape::ReadOnlyList { element } => TypeKind::ReadOnlyList { element: *element },
        TypeShape::Set { element } => TypeKind::Set { element: *element },
        TypeShape::Tuple { elements } => TypeKind::Tuple(elements.clone()),
        TypeShape::Sequence { element } => {
            TypeKind::OpenGenericContainer(ContainerInterface::Sequence { element: *element })
        }
        TypeShape::MapInterface { key, value } => {
            TypeKind::OpenGenericContainer(ContainerInterface::Map {
                key: *key,
                value: *value,
            })
        }
        TypeShape::Application { origin, args } => TypeKind::Application {
            origin: *origin,
            args: args.clone(),
        },
    };

    if is_open(db, type_id) {
        TypeKind::OpenGeneric
    } else {
        kind
    }
}

fn classify_object(db: &dyn TypeProvider, type_id: TypeId, shape: &ObjectShape) -> TypeKind {
    if !shape.is_concrete() {
        return TypeKind::Interface;
    }
    if shape.is_generic_definition() || shape.type_args.iter().any(|&arg| is_open(db, arg)) {
        return TypeKind::OpenGeneric;
    }
    let fields = ClassHierarchy::new(db).fields(type_id);
    if is_immutable(&fields, shape) {
        TypeKind::ImmutableRecord
    } else {
        TypeKind::MutableRecord
    }
}

/// A record is immutable when it cannot be default-constructed, or when it
/// has members but none of them can be assigned after construction.
///
/// `fields` includes inherited fields. A record with no members and no
/// declared constructor is mutable: default construction builds it whole.
pub fn is_immutable(fields: &[FieldInfo], shape: &ObjectShape) -> bool {
    if !shape.has_default_constructor() {
        return true;
    }
    let has_writable = fields.iter().any(FieldInfo::is_writable);
    let trivially_empty = fields.is_empty() && shape.constructors.is_empty();
    !has_writable && !trivially_empty
}

#[cfg(test)]
#[path = "tests/type_classifier_tests.rs"]
mod tests;
