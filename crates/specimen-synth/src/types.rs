//! Type descriptions consumed by the synthesizer.
//!
//! A type is addressed by a [`TypeId`] handle and described by a [`TypeDef`]:
//! a display name plus a closed [`TypeShape`] tag. The shape is produced once
//! by whoever builds the universe (schema loader, tests, a reflection bridge)
//! so the synthesizer never has to re-derive structure from names.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// =============================================================================
// TypeId
// =============================================================================

/// Handle to a type stored in a [`TypeUniverse`](crate::TypeUniverse).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel value for an invalid `TypeId`.
    pub const INVALID: Self = Self(0);

    // Well-known scalars, pre-registered by every universe in this order.
    pub const BOOL: Self = Self(1);
    pub const INT: Self = Self(2);
    pub const DOUBLE: Self = Self(3);
    pub const FLOAT: Self = Self(4);
    pub const CHAR: Self = Self(5);
    pub const DECIMAL: Self = Self(6);
    pub const GUID: Self = Self(7);
    pub const STRING: Self = Self(8);
    pub const REGEX: Self = Self(9);
    pub const DATE: Self = Self(10);
    pub const COLOR: Self = Self(11);

    // Platform singletons.
    pub const TOP: Self = Self(12);
    pub const TYPE_HANDLE: Self = Self(13);
    pub const METHOD_HANDLE: Self = Self(14);
    pub const COMPARABLE: Self = Self(15);

    /// First id handed out to user types.
    pub const FIRST_USER: u32 = 16;

    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// Returns `true` for the pre-registered scalar and singleton ids.
    pub const fn is_builtin(self) -> bool {
        self.0 != 0 && self.0 < Self::FIRST_USER
    }
}

// =============================================================================
// Scalars and singletons
// =============================================================================

/// Well-known scalar types with a fixed literal value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    Int,
    Double,
    Float,
    Char,
    Decimal,
    Guid,
    String,
    Regex,
    Date,
    Color,
}

impl ScalarKind {
    /// Every scalar, in `TypeId` registration order.
    pub const ALL: [ScalarKind; 11] = [
        ScalarKind::Bool,
        ScalarKind::Int,
        ScalarKind::Double,
        ScalarKind::Float,
        ScalarKind::Char,
        ScalarKind::Decimal,
        ScalarKind::Guid,
        ScalarKind::String,
        ScalarKind::Regex,
        ScalarKind::Date,
        ScalarKind::Color,
    ];

    /// Name used in schema documents and display names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::Float => "float",
            Self::Char => "char",
            Self::Decimal => "decimal",
            Self::Guid => "guid",
            Self::String => "string",
            Self::Regex => "regex",
            Self::Date => "date",
            Self::Color => "color",
        }
    }
}

/// Platform placeholder types that get a fixed substitute value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingletonKind {
    /// The "top" type every value is assignable to.
    TopType,
    /// A handle to a type.
    TypeHandle,
    /// A handle to a method.
    MethodHandle,
    /// An ordering-comparable marker interface.
    Comparable,
}

impl SingletonKind {
    pub const ALL: [SingletonKind; 4] = [
        SingletonKind::TopType,
        SingletonKind::TypeHandle,
        SingletonKind::MethodHandle,
        SingletonKind::Comparable,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::TopType => "object",
            Self::TypeHandle => "type",
            Self::MethodHandle => "method",
            Self::Comparable => "comparable",
        }
    }
}

// =============================================================================
// Object shapes
// =============================================================================

bitflags! {
    /// Flags on an object shape.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        const INTERFACE = 1 << 0;
        const ABSTRACT = 1 << 1;
    }
}

/// Whether a member can be written after construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mutability {
    #[default]
    ReadWrite,
    ReadOnly,
}

/// A field or property of a record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldInfo {
    pub name: String,
    pub type_id: TypeId,
    pub mutability: Mutability,
}

impl FieldInfo {
    pub fn read_write(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            mutability: Mutability::ReadWrite,
        }
    }

    pub fn read_only(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            mutability: Mutability::ReadOnly,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.mutability == Mutability::ReadWrite
    }
}

/// A constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: String,
    pub type_id: TypeId,
    /// Optional parameters accept a missing argument.
    pub optional: bool,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            optional: false,
        }
    }
}

/// A constructor, described by its ordered parameter list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConstructorInfo {
    pub params: Vec<ParamInfo>,
}

impl ConstructorInfo {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// An unbound generic type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: String,
    /// Position in the owning definition's parameter list.
    pub index: u32,
    /// Constraint types; only the first one drives closing.
    pub constraints: Vec<TypeId>,
}

/// Structural description of a record, class, or interface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub flags: ObjectFlags,
    /// Parameter types (each a `TypeShape::Parameter`) of a generic definition.
    pub type_params: Vec<TypeId>,
    /// Arguments this shape was instantiated with.
    pub type_args: Vec<TypeId>,
    /// The generic definition this shape was instantiated from.
    pub generic_origin: Option<TypeId>,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub fields: Vec<FieldInfo>,
    /// Declared constructors; empty means an implicit zero-argument constructor.
    pub constructors: Vec<ConstructorInfo>,
}

impl ObjectShape {
    /// A concrete record.
    pub fn record() -> Self {
        Self::default()
    }

    /// An interface.
    pub fn interface() -> Self {
        Self {
            flags: ObjectFlags::INTERFACE,
            ..Self::default()
        }
    }

    /// An abstract class.
    pub fn abstract_class() -> Self {
        Self {
            flags: ObjectFlags::ABSTRACT,
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, type_id: TypeId) -> Self {
        self.fields.push(FieldInfo::read_write(name, type_id));
        self
    }

    pub fn with_readonly_field(mut self, name: impl Into<String>, type_id: TypeId) -> Self {
        self.fields.push(FieldInfo::read_only(name, type_id));
        self
    }

    pub fn with_constructor(mut self, params: Vec<ParamInfo>) -> Self {
        self.constructors.push(ConstructorInfo { params });
        self
    }

    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<TypeId>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn with_type_params(mut self, params: Vec<TypeId>) -> Self {
        self.type_params = params;
        self
    }

    pub fn is_interface(&self) -> bool {
        self.flags.contains(ObjectFlags::INTERFACE)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ObjectFlags::ABSTRACT)
    }

    /// Neither an interface nor abstract.
    pub fn is_concrete(&self) -> bool {
        !self.flags.intersects(ObjectFlags::INTERFACE | ObjectFlags::ABSTRACT)
    }

    /// A generic definition with unbound parameters.
    pub fn is_generic_definition(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructors.is_empty() || self.constructors.iter().any(|c| c.params.is_empty())
    }
}

// =============================================================================
// TypeShape / TypeDef
// =============================================================================

/// Closed description of a type's shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Scalar(ScalarKind),
    Singleton(SingletonKind),
    /// Enumeration with members in declaration order.
    Enum { members: Vec<String> },
    /// Concrete keyed associative container.
    Map { key: TypeId, value: TypeId },
    /// Array of rank 1 or 2.
    Array { element: TypeId, rank: u8 },
    /// Growable ordered sequence.
    List { element: TypeId },
    /// Read-only wrapper over a sequence.
    ReadOnlyList { element: TypeId },
    Set { element: TypeId },
    Tuple { elements: Vec<TypeId> },
    /// Abstract sequence interface with no concrete collection behind it.
    Sequence { element: TypeId },
    /// Abstract map interface with no concrete collection behind it.
    MapInterface { key: TypeId, value: TypeId },
    /// Unbound generic parameter.
    Parameter(TypeParamInfo),
    /// Reference to a generic definition applied to arguments; expanded lazily.
    Application { origin: TypeId, args: Vec<TypeId> },
    Object(ObjectShape),
    /// A type the synthesizer cannot build (pointers, delegates, ...).
    Opaque,
}

/// A stored type description.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDef {
    pub name: String,
    pub shape: TypeShape,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match &self.shape {
            TypeShape::Object(shape) => Some(shape),
            _ => None,
        }
    }
}
