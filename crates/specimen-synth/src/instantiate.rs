//! Generic type instantiation.
//!
//! Generic definitions are objects with unbound parameter types. Applying a
//! definition to arguments substitutes each parameter through the definition's
//! members, producing an interned, closed object shape whose name is
//! `Origin<Args>`. Applications stored inside shapes (`TypeShape::Application`)
//! are expanded lazily, one level at a time, so recursive generics such as
//! `Node<T> { Next: Node<T> }` never unfold more than the synthesizer asks for.

use crate::types::{ConstructorInfo, FieldInfo, ObjectShape, ParamInfo, TypeDef, TypeId, TypeShape};
use crate::universe::{TypeProvider, intern_shape, join_names};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Mapping from parameter types to the types that replace them.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeId, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair parameters with arguments positionally.
    pub fn from_params(params: &[TypeId], args: &[TypeId]) -> Self {
        let map = params.iter().copied().zip(args.iter().copied()).collect();
        Self { map }
    }

    pub fn insert(&mut self, param: TypeId, arg: TypeId) {
        self.map.insert(param, arg);
    }

    pub fn get(&self, param: TypeId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Replace parameters inside `type_id`.
///
/// Structural shapes (containers, tuples, applications) are rebuilt and
/// interned; nominal objects are left untouched because their members are
/// only substituted when they are instantiated.
pub fn substitute(db: &dyn TypeProvider, type_id: TypeId, subst: &TypeSubstitution) -> TypeId {
    if subst.is_empty() {
        return type_id;
    }
    if let Some(replacement) = subst.get(type_id) {
        return replacement;
    }
    let Some(def) = db.get(type_id) else {
        return type_id;
    };

    let rebuilt = match &def.shape {
        TypeShape::List { element } => {
            let element = substitute(db, *element, subst);
            TypeShape::List { element }
        }
        TypeShape::ReadOnlyList { element } => {
            let element = substitute(db, *element, subst);
            TypeShape::ReadOnlyList { element }
        }
        TypeShape::Set { element } => {
            let element = substitute(db, *element, subst);
            TypeShape::Set { element }
        }
        TypeShape::Sequence { element } => {
            let element = substitute(db, *element, subst);
            TypeShape::Sequence { element }
        }
        TypeShape::Array { element, rank } => {
            let element = substitute(db, *element, subst);
            TypeShape::Array {
                element,
                rank: *rank,
            }
        }
        TypeShape::Map { key, value } => TypeShape::Map {
            key: substitute(db, *key, subst),
            value: substitute(db, *value, subst),
        },
        TypeShape::MapInterface { key, value } => TypeShape::MapInterface {
            key: substitute(db, *key, subst),
            value: substitute(db, *value, subst),
        },
        TypeShape::Tuple { elements } => TypeShape::Tuple {
            elements: substitute_all(db, elements, subst),
        },
        TypeShape::Application { origin, args } => TypeShape::Application {
            origin: *origin,
            args: substitute_all(db, args, subst),
        },
        _ => return type_id,
    };

    if rebuilt == def.shape {
        type_id
    } else {
        intern_shape(db, rebuilt)
    }
}

fn substitute_all(db: &dyn TypeProvider, ids: &[TypeId], subst: &TypeSubstitution) -> Vec<TypeId> {
    ids.iter().map(|&id| substitute(db, id, subst)).collect()
}

/// Apply the generic definition `origin` to `args`.
///
/// Returns `None` when `origin` is not a generic definition or the argument
/// count does not match. Applying a definition to its own parameters yields
/// the definition itself.
pub fn instantiate(db: &dyn TypeProvider, origin: TypeId, args: &[TypeId]) -> Option<TypeId> {
    let def = db.get(origin)?;
    let shape = def.as_object()?;
    if !shape.is_generic_definition() || shape.type_params.len() != args.len() {
        return None;
    }
    if shape.type_params.as_slice() == args {
        return Some(origin);
    }

    let subst = TypeSubstitution::from_params(&shape.type_params, args);
    let fields = shape
        .fields
        .iter()
        .map(|field| FieldInfo {
            name: field.name.clone(),
            type_id: substitute(db, field.type_id, &subst),
            mutability: field.mutability,
        })
        .collect();
    let constructors = shape
        .constructors
        .iter()
        .map(|ctor| ConstructorInfo {
            params: ctor
                .params
                .iter()
                .map(|param| ParamInfo {
                    name: param.name.clone(),
                    type_id: substitute(db, param.type_id, &subst),
                    optional: param.optional,
                })
                .collect(),
        })
        .collect();

    let closed = ObjectShape {
        flags: shape.flags,
        type_params: Vec::new(),
        type_args: args.to_vec(),
        generic_origin: Some(origin),
        base: shape.base.map(|base| substitute(db, base, &subst)),
        interfaces: substitute_all(db, &shape.interfaces, &subst),
        fields,
        constructors,
    };
    let name = format!("{}<{}>", def.name, join_names(db, args));
    Some(db.intern(TypeDef::new(name, TypeShape::Object(closed))))
}

/// Expand an application one level. Returns `None` for non-applications and
/// for applications whose origin is not a matching generic definition.
pub fn expand_application(db: &dyn TypeProvider, type_id: TypeId) -> Option<TypeId> {
    let def = db.get(type_id)?;
    match &def.shape {
        TypeShape::Application { origin, args } => instantiate(db, *origin, args),
        _ => None,
    }
}

/// Returns `true` if `type_id` still mentions an unbound parameter.
pub fn is_open(db: &dyn TypeProvider, type_id: TypeId) -> bool {
    let Some(def) = db.get(type_id) else {
        return false;
    };
    let children: SmallVec<[TypeId; 4]> = match &def.shape {
        TypeShape::Parameter(_) => return true,
        TypeShape::Object(shape) => {
            if shape.is_generic_definition() {
                return true;
            }
            shape.type_args.iter().copied().collect()
        }
        TypeShape::Application { args, .. } => args.iter().copied().collect(),
        TypeShape::Tuple { elements } => elements.iter().copied().collect(),
        TypeShape::List { element }
        | TypeShape::ReadOnlyList { element }
        | TypeShape::Set { element }
        | TypeShape::Sequence { element }
        | TypeShape::Array { element, .. } => SmallVec::from_slice(&[*element]),
        TypeShape::Map { key, value } | TypeShape::MapInterface { key, value } => {
            SmallVec::from_slice(&[*key, *value])
        }
        TypeShape::Scalar(_) | TypeShape::Singleton(_) | TypeShape::Enum { .. } | TypeShape::Opaque => {
            return false;
        }
    };
    children.into_iter().any(|child| is_open(db, child))
}

#[cfg(test)]
#[path = "tests/instantiate_tests.rs"]
mod tests;
