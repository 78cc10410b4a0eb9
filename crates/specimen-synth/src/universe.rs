//! Type universe: storage and interning for type descriptions.
//!
//! The universe is the in-process Type Descriptor Provider. Named types are
//! *declared* (nominal, listed by [`TypeProvider::known_types`]) and then
//! *defined*; anonymous types such as `List<int>` or `Box<string>` are
//! *interned* so that structurally equal descriptions share one [`TypeId`].
//!
//! Declaration and definition are split so that mutually recursive types can
//! reference each other before either is complete.

use crate::types::{ScalarKind, SingletonKind, TypeDef, TypeId, TypeParamInfo, TypeShape};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `TypeUniverse` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// TypeProvider
// =============================================================================

/// Read access to type descriptions, plus interning of derived types.
///
/// The synthesizer treats the provider as read-only apart from [`intern`],
/// which it uses to materialize closed generic instantiations.
///
/// [`intern`]: TypeProvider::intern
pub trait TypeProvider: Send + Sync {
    /// Look up the description of `id`.
    fn get(&self, id: TypeId) -> Option<Arc<TypeDef>>;

    /// Intern an anonymous description, returning the existing id for an
    /// equal description.
    fn intern(&self, def: TypeDef) -> TypeId;

    /// Every declared (named) type, in declaration order.
    fn known_types(&self) -> Vec<TypeId>;

    /// Display name of `id`, with a placeholder for unknown ids.
    fn name_of(&self, id: TypeId) -> String {
        self.get(id)
            .map(|def| def.name.clone())
            .unwrap_or_else(|| format!("<type {}>", id.0))
    }
}

// =============================================================================
// TypeUniverse
// =============================================================================

/// Thread-safe storage for type descriptions.
///
/// Uses `DashMap` so that `&TypeUniverse` can intern new instantiations while
/// it is shared.
///
/// ## Usage
///
/// ```ignore
/// let db = TypeUniverse::new();
/// let order = db.declare("Order");
/// db.define(order, TypeShape::Object(
///     ObjectShape::record()
///         .with_field("Name", TypeId::STRING)
///         .with_field("Count", TypeId::INT),
/// ));
/// let tags = db.list(TypeId::STRING);
/// ```
pub struct TypeUniverse {
    /// Unique instance ID for debugging
    instance_id: u64,

    /// `TypeId` -> description
    types: DashMap<TypeId, Arc<TypeDef>>,

    /// description -> `TypeId` for anonymous (interned) types
    interned: DashMap<Arc<TypeDef>, TypeId>,

    /// name -> `TypeId` for builtins and declared types
    names: DashMap<String, TypeId>,

    /// Declared (named, nominal) types and their names
    declared: DashMap<TypeId, String>,

    /// Reserved anonymous ids awaiting a definition (self-referencing parameters)
    reserved: DashMap<TypeId, String>,

    /// Next available `TypeId`
    next_id: AtomicU32,
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeUniverse {
    /// Create a universe with the well-known scalars and singletons registered.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "TypeUniverse::new - creating new instance");
        let universe = Self {
            instance_id,
            types: DashMap::new(),
            interned: DashMap::new(),
            names: DashMap::new(),
            declared: DashMap::new(),
            reserved: DashMap::new(),
            next_id: AtomicU32::new(TypeId::FIRST_USER),
        };

        let scalars = ScalarKind::ALL
            .iter()
            .map(|&kind| (kind.name(), TypeShape::Scalar(kind)));
        let singletons = SingletonKind::ALL
            .iter()
            .map(|&kind| (kind.name(), TypeShape::Singleton(kind)));
        for (offset, (name, shape)) in scalars.chain(singletons).enumerate() {
            let id = TypeId(offset as u32 + 1);
            let def = Arc::new(TypeDef::new(name, shape));
            universe.types.insert(id, Arc::clone(&def));
            universe.interned.insert(def, id);
            universe.names.insert(name.to_string(), id);
        }
        universe
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    fn allocate(&self) -> TypeId {
        TypeId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    // -------------------------------------------------------------------------
    // Named types
    // -------------------------------------------------------------------------

    /// Declare a named type and return its id. The type stays undefined until
    /// [`define`](Self::define) is called; a later declaration with the same
    /// name shadows this one in [`lookup_name`](Self::lookup_name).
    pub fn declare(&self, name: impl Into<String>) -> TypeId {
        let name = name.into();
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            type_id = id.0,
            name = %name,
            "TypeUniverse::declare"
        );
        self.names.insert(name.clone(), id);
        self.declared.insert(id, name);
        id
    }

    /// Reserve an anonymous id that will be defined later. Used for type
    /// parameters whose constraints mention the parameter itself.
    pub fn reserve(&self, name: impl Into<String>) -> TypeId {
        let id = self.allocate();
        self.reserved.insert(id, name.into());
        id
    }

    /// Attach a shape to a declared or reserved id.
    pub fn define(&self, id: TypeId, shape: TypeShape) {
        let name = self
            .declared
            .get(&id)
            .map(|r| r.value().clone())
            .or_else(|| self.reserved.remove(&id).map(|(_, name)| name))
            .or_else(|| self.types.get(&id).map(|r| r.name.clone()))
            .unwrap_or_else(|| format!("<type {}>", id.0));
        self.types.insert(id, Arc::new(TypeDef::new(name, shape)));
    }

    /// Declare and define in one step.
    pub fn declare_with(&self, name: impl Into<String>, shape: TypeShape) -> TypeId {
        let id = self.declare(name);
        self.define(id, shape);
        id
    }

    /// Look up a builtin or declared type by name.
    pub fn lookup_name(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).map(|r| *r.value())
    }

    /// Number of stored descriptions, builtins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // -------------------------------------------------------------------------
    // Anonymous types
    // -------------------------------------------------------------------------

    pub fn list(&self, element: TypeId) -> TypeId {
        intern_shape(self, TypeShape::List { element })
    }

    pub fn read_only_list(&self, element: TypeId) -> TypeId {
        intern_shape(self, TypeShape::ReadOnlyList { element })
    }

    pub fn set(&self, element: TypeId) -> TypeId {
        intern_shape(self, TypeShape::Set { element })
    }

    pub fn map(&self, key: TypeId, value: TypeId) -> TypeId {
        intern_shape(self, TypeShape::Map { key, value })
    }

    pub fn array(&self, element: TypeId, rank: u8) -> TypeId {
        intern_shape(self, TypeShape::Array { element, rank })
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        intern_shape(self, TypeShape::Tuple { elements })
    }

    pub fn sequence(&self, element: TypeId) -> TypeId {
        intern_shape(self, TypeShape::Sequence { element })
    }

    pub fn map_interface(&self, key: TypeId, value: TypeId) -> TypeId {
        intern_shape(self, TypeShape::MapInterface { key, value })
    }

    /// Reference to `origin` applied to `args`, expanded lazily.
    pub fn application(&self, origin: TypeId, args: Vec<TypeId>) -> TypeId {
        intern_shape(self, TypeShape::Application { origin, args })
    }

    /// An unbound type parameter.
    pub fn type_param(&self, name: &str, index: u32, constraints: Vec<TypeId>) -> TypeId {
        let info = TypeParamInfo {
            name: name.to_string(),
            index,
            constraints,
        };
        intern_shape(self, TypeShape::Parameter(info))
    }

    /// Declare an enumeration with members in declaration order.
    pub fn declare_enum(&self, name: &str, members: &[&str]) -> TypeId {
        let members = members.iter().map(|m| (*m).to_string()).collect();
        self.declare_with(name, TypeShape::Enum { members })
    }
}

impl TypeProvider for TypeUniverse {
    fn get(&self, id: TypeId) -> Option<Arc<TypeDef>> {
        self.types.get(&id).map(|r| Arc::clone(r.value()))
    }

    fn intern(&self, def: TypeDef) -> TypeId {
        if let Some(existing) = self.interned.get(&def) {
            return *existing;
        }
        let def = Arc::new(def);
        match self.interned.entry(Arc::clone(&def)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = self.allocate();
                trace!(
                    instance_id = self.instance_id,
                    type_id = id.0,
                    name = %def.name,
                    "TypeUniverse::intern"
                );
                self.types.insert(id, def);
                entry.insert(id);
                id
            }
        }
    }

    fn known_types(&self) -> Vec<TypeId> {
        let mut ids: Vec<TypeId> = self.declared.iter().map(|r| *r.key()).collect();
        ids.sort_unstable();
        ids
    }

    fn name_of(&self, id: TypeId) -> String {
        if let Some(def) = self.types.get(&id) {
            return def.name.clone();
        }
        if let Some(name) = self.declared.get(&id) {
            return name.value().clone();
        }
        if let Some(name) = self.reserved.get(&id) {
            return name.value().clone();
        }
        format!("<type {}>", id.0)
    }
}

// =============================================================================
// Anonymous shape helpers
// =============================================================================

/// Intern an anonymous shape under its canonical display name.
pub fn intern_shape(db: &dyn TypeProvider, shape: TypeShape) -> TypeId {
    let name = anonymous_name(db, &shape);
    db.intern(TypeDef::new(name, shape))
}

/// Canonical display name of an anonymous shape.
pub fn anonymous_name(db: &dyn TypeProvider, shape: &TypeShape) -> String {
    match shape {
        TypeShape::List { element } => format!("List<{}>", db.name_of(*element)),
        TypeShape::ReadOnlyList { element } => format!("ReadOnlyList<{}>", db.name_of(*element)),
        TypeShape::Set { element } => format!("Set<{}>", db.name_of(*element)),
        TypeShape::Sequence { element } => format!("Sequence<{}>", db.name_of(*element)),
        TypeShape::Map { key, value } => {
            format!("Map<{}, {}>", db.name_of(*key), db.name_of(*value))
        }
        TypeShape::MapInterface { key, value } => {
            format!("AbstractMap<{}, {}>", db.name_of(*key), db.name_of(*value))
        }
        TypeShape::Array { element, rank } => {
            let commas = ",".repeat(usize::from(rank.saturating_sub(1)));
            format!("{}[{commas}]", db.name_of(*element))
        }
        TypeShape::Tuple { elements } => format!("({})", join_names(db, elements)),
        TypeShape::Application { origin, args } => {
            format!("{}<{}>", db.name_of(*origin), join_names(db, args))
        }
        TypeShape::Parameter(info) => info.name.clone(),
        TypeShape::Scalar(kind) => kind.name().to_string(),
        TypeShape::Singleton(kind) => kind.name().to_string(),
        TypeShape::Enum { .. } | TypeShape::Object(_) | TypeShape::Opaque => {
            "<anonymous>".to_string()
        }
    }
}

/// Comma-separated display names.
pub fn join_names(db: &dyn TypeProvider, ids: &[TypeId]) -> String {
    ids.iter()
        .map(|&id| db.name_of(id))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "tests/universe_tests.rs"]
mod tests;
