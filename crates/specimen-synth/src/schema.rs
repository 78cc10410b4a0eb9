//! JSON schema documents describing a type universe.
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Shape", "kind": "interface" },
//!     { "name": "Circle", "interfaces": ["Shape"],
//!       "fields": [{ "name": "Radius", "type": "double" }] },
//!     { "name": "Box", "typeParams": [{ "name": "T" }],
//!       "fields": [{ "name": "Items", "type": { "list": "T" } }] },
//!     { "name": "Point",
//!       "fields": [{ "name": "X", "type": "int", "readonly": true }],
//!       "constructors": [[{ "name": "x", "type": "int" }]] }
//!   ]
//! }
//! ```
//!
//! Loading runs in two passes: every name is declared first, so
//! declarations may reference each other in any order (including
//! themselves), then each declaration is defined.

use crate::types::{FieldInfo, ObjectShape, ParamInfo, TypeId, TypeParamInfo, TypeShape};
use crate::universe::{TypeProvider, TypeUniverse};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("type '{name}' is declared more than once")]
    Duplicate { name: String },

    #[error("unknown type '{name}' referenced from '{context}'")]
    UnknownType { name: String, context: String },

    #[error("'{name}' takes {expected} type argument(s) but {found} were given in '{context}'")]
    GenericArity {
        name: String,
        expected: usize,
        found: usize,
        context: String,
    },

    #[error("'{name}' is not a generic type (referenced from '{context}')")]
    NotGeneric { name: String, context: String },

    #[error("array rank must be at least 1 in '{context}'")]
    InvalidRank { context: String },
}

// =============================================================================
// Document model
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaDocument {
    pub types: Vec<TypeDecl>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKind {
    #[default]
    Record,
    Interface,
    Abstract,
    Enum,
    /// A type that cannot be synthesized.
    Opaque,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub kind: DeclKind,
    #[serde(default)]
    pub type_params: Vec<TypeParamDecl>,
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Each constructor is its ordered parameter list.
    #[serde(default)]
    pub constructors: Vec<Vec<ParamDecl>>,
    /// Enum members in declaration order.
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeParamDecl {
    pub name: String,
    #[serde(default)]
    pub constraints: Vec<TypeRef>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub optional: bool,
}

/// Reference to a type: a name, or a structural form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Named(String),
    List {
        list: Box<TypeRef>,
    },
    ReadOnlyList {
        #[serde(rename = "readonlyList")]
        readonly_list: Box<TypeRef>,
    },
    Set {
        set: Box<TypeRef>,
    },
    Map {
        map: Box<(TypeRef, TypeRef)>,
    },
    Array {
        array: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u8,
    },
    Tuple {
        tuple: Vec<TypeRef>,
    },
    Sequence {
        sequence: Box<TypeRef>,
    },
    MapInterface {
        #[serde(rename = "mapInterface")]
        map_interface: Box<(TypeRef, TypeRef)>,
    },
    Generic {
        generic: String,
        args: Vec<TypeRef>,
    },
}

fn default_rank() -> u8 {
    1
}

// =============================================================================
// Loading
// =============================================================================

/// Parse `json` and load it into a fresh universe.
pub fn load_schema(json: &str) -> Result<TypeUniverse, SchemaError> {
    let doc: SchemaDocument = serde_json::from_str(json)?;
    let db = TypeUniverse::new();
    load_into(&db, &doc)?;
    Ok(db)
}

/// Declare and define every type of `doc` in `db`, returning their ids in
/// document order.
pub fn load_into(db: &TypeUniverse, doc: &SchemaDocument) -> Result<Vec<TypeId>, SchemaError> {
    let mut loader = SchemaLoader {
        db,
        arity: FxHashMap::default(),
    };

    let mut ids = Vec::with_capacity(doc.types.len());
    for decl in &doc.types {
        if db.lookup_name(&decl.name).is_some() {
            return Err(SchemaError::Duplicate {
                name: decl.name.clone(),
            });
        }
        ids.push(db.declare(decl.name.as_str()));
        loader.arity.insert(decl.name.clone(), decl.type_params.len());
    }

    for (decl, &id) in doc.types.iter().zip(&ids) {
        let shape = loader.define(decl)?;
        db.define(id, shape);
    }

    debug!(types = ids.len(), instance_id = db.instance_id(), "schema loaded");
    Ok(ids)
}

struct SchemaLoader<'a> {
    db: &'a TypeUniverse,
    /// Declared name -> number of type parameters.
    arity: FxHashMap<String, usize>,
}

type Scope = FxHashMap<String, TypeId>;

impl SchemaLoader<'_> {
    fn define(&self, decl: &TypeDecl) -> Result<TypeShape, SchemaError> {
        match decl.kind {
            DeclKind::Enum => {
                return Ok(TypeShape::Enum {
                    members: decl.members.clone(),
                });
            }
            DeclKind::Opaque => return Ok(TypeShape::Opaque),
            DeclKind::Record | DeclKind::Interface | DeclKind::Abstract => {}
        }

        let scope = self.declare_params(decl)?;
        let context = decl.name.as_str();

        let mut shape = match decl.kind {
            DeclKind::Interface => ObjectShape::interface(),
            DeclKind::Abstract => ObjectShape::abstract_class(),
            _ => ObjectShape::record(),
        };
        shape.type_params = decl
            .type_params
            .iter()
            .filter_map(|p| scope.get(&p.name).copied())
            .collect();
        shape.base = decl
            .base
            .as_ref()
            .map(|base| self.resolve(base, &scope, context))
            .transpose()?;
        shape.interfaces = decl
            .interfaces
            .iter()
            .map(|iface| self.resolve(iface, &scope, context))
            .collect::<Result<_, _>>()?;
        for field in &decl.fields {
            let type_id = self.resolve(&field.ty, &scope, context)?;
            shape.fields.push(if field.readonly {
                FieldInfo::read_only(field.name.as_str(), type_id)
            } else {
                FieldInfo::read_write(field.name.as_str(), type_id)
            });
        }
        for ctor in &decl.constructors {
            let params = ctor
                .iter()
                .map(|param| {
                    let type_id = self.resolve(&param.ty, &scope, context)?;
                    let mut info = ParamInfo::new(param.name.as_str(), type_id);
                    info.optional = param.optional;
                    Ok(info)
                })
                .collect::<Result<Vec<_>, SchemaError>>()?;
            shape = shape.with_constructor(params);
        }
        Ok(TypeShape::Object(shape))
    }

    /// Reserve an id per type parameter, then define each one so that
    /// constraints can mention any parameter of the same declaration.
    fn declare_params(&self, decl: &TypeDecl) -> Result<Scope, SchemaError> {
        let mut scope = Scope::default();
        for param in &decl.type_params {
            if scope.contains_key(&param.name) {
                return Err(SchemaError::Duplicate {
                    name: format!("{}.{}", decl.name, param.name),
                });
            }
            scope.insert(param.name.clone(), self.db.reserve(param.name.as_str()));
        }
        for (index, param) in decl.type_params.iter().enumerate() {
            let constraints = param
                .constraints
                .iter()
                .map(|c| self.resolve(c, &scope, &decl.name))
                .collect::<Result<Vec<_>, _>>()?;
            let Some(&id) = scope.get(&param.name) else {
                continue;
            };
            self.db.define(
                id,
                TypeShape::Parameter(TypeParamInfo {
                    name: param.name.clone(),
                    index: index as u32,
                    constraints,
                }),
            );
        }
        Ok(scope)
    }

    fn resolve(&self, ty: &TypeRef, scope: &Scope, context: &str) -> Result<TypeId, SchemaError> {
        let db = self.db;
        Ok(match ty {
            TypeRef::Named(name) => self.lookup(name, scope, context)?,
            TypeRef::List { list } => db.list(self.resolve(list, scope, context)?),
            TypeRef::ReadOnlyList { readonly_list } => {
                db.read_only_list(self.resolve(readonly_list, scope, context)?)
            }
            TypeRef::Set { set } => db.set(self.resolve(set, scope, context)?),
            TypeRef::Map { map } => db.map(
                self.resolve(&map.0, scope, context)?,
                self.resolve(&map.1, scope, context)?,
            ),
            TypeRef::Array { array, rank } => {
                if *rank == 0 {
                    return Err(SchemaError::InvalidRank {
                        context: context.to_string(),
                    });
                }
                db.array(self.resolve(array, scope, context)?, *rank)
            }
            TypeRef::Tuple { tuple } => {
                let elements = tuple
                    .iter()
                    .map(|t| self.resolve(t, scope, context))
                    .collect::<Result<Vec<_>, _>>()?;
                db.tuple(elements)
            }
            TypeRef::Sequence { sequence } => db.sequence(self.resolve(sequence, scope, context)?),
            TypeRef::MapInterface { map_interface } => db.map_interface(
                self.resolve(&map_interface.0, scope, context)?,
                self.resolve(&map_interface.1, scope, context)?,
            ),
            TypeRef::Generic { generic, args } => {
                let origin = self.lookup(generic, scope, context)?;
                let expected = self.arity.get(generic).copied().unwrap_or(0);
                if expected == 0 {
                    return Err(SchemaError::NotGeneric {
                        name: generic.clone(),
                        context: context.to_string(),
                    });
                }
                if expected != args.len() {
                    return Err(SchemaError::GenericArity {
                        name: generic.clone(),
                        expected,
                        found: args.len(),
                        context: context.to_string(),
                    });
                }
                let args = args
                    .iter()
                    .map(|a| self.resolve(a, scope, context))
                    .collect::<Result<Vec<_>, _>>()?;
                db.application(origin, args)
            }
        })
    }

    fn lookup(&self, name: &str, scope: &Scope, context: &str) -> Result<TypeId, SchemaError> {
        scope
            .get(name)
            .copied()
            .or_else(|| self.db.lookup_name(name))
            .ok_or_else(|| SchemaError::UnknownType {
                name: name.to_string(),
                context: context.to_string(),
            })
    }
}

/// Display names of every declared type, in declaration order.
pub fn declared_names(db: &TypeUniverse) -> Vec<String> {
    db.known_types().into_iter().map(|id| db.name_of(id)).collect()
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;
