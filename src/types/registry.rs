// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Type registry
//!
//! Types are registered once, receive an arena-style [`TypeId`], and are
//! immutable afterwards. Shapes reference other types only through ids that
//! were handed out earlier, so a registry can never contain a reference
//! cycle and compatibility checks always terminate.

use std::collections::HashMap;
use std::fmt;

use crate::errors::FlowError;

/// Identifier of a registered type, assigned at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of this type in its registry.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Builtin primitive data shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Integer,
    Float,
    Boolean,
    Text,
    Bytes,
}

impl Primitive {
    /// All primitives, in the order they are preregistered by
    /// [`TypeRegistry::with_builtins`].
    pub const ALL: [Primitive; 5] = [
        Primitive::Integer,
        Primitive::Float,
        Primitive::Boolean,
        Primitive::Text,
        Primitive::Bytes,
    ];

    /// Canonical name, usable as a type name in declaration documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Primitive {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Primitive::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("Unknown primitive type: {}", s))
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordField {
    pub name: String,
    pub ty: TypeId,
}

/// The shape of a registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A primitive scalar.
    Primitive(Primitive),
    /// Homogeneous sequence of a registered element type.
    List(TypeId),
    /// Ordered, named fields.
    Record(Vec<RecordField>),
}

/// A named type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    name: String,
    shape: TypeShape,
}

impl TypeDef {
    /// A primitive type under the given name.
    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            shape: TypeShape::Primitive(primitive),
        }
    }

    /// A list of an already-registered element type.
    pub fn list(name: impl Into<String>, element: TypeId) -> Self {
        Self {
            name: name.into(),
            shape: TypeShape::List(element),
        }
    }

    /// A record with ordered fields of already-registered types.
    pub fn record<S: Into<String>>(name: impl Into<String>, fields: Vec<(S, TypeId)>) -> Self {
        Self {
            name: name.into(),
            shape: TypeShape::Record(
                fields
                    .into_iter()
                    .map(|(name, ty)| RecordField {
                        name: name.into(),
                        ty,
                    })
                    .collect(),
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }
}

/// Registry of channel data types.
///
/// Storage is an append-only arena; the name index is rebuildable and only
/// used for lookups, so nodes and channels can reference types by plain
/// [`TypeId`] without ownership cycles.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    defs: Vec<TypeDef>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the five builtin primitives preregistered under
    /// their canonical names.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for primitive in Primitive::ALL {
            // Fresh registry, distinct names: registration cannot fail.
            let _ = registry.register(TypeDef::primitive(primitive.name(), primitive));
        }
        registry
    }

    /// Register a type definition.
    ///
    /// Fails with [`FlowError::DuplicateType`] if the name is taken; the
    /// registry is unchanged in that case.
    pub fn register(&mut self, def: TypeDef) -> Result<TypeId, FlowError> {
        if self.by_name.contains_key(def.name()) {
            return Err(FlowError::DuplicateType {
                name: def.name().to_string(),
            });
        }

        let id = TypeId::from_index(self.defs.len());
        self.by_name.insert(def.name().to_string(), id);
        self.defs.push(def);
        Ok(id)
    }

    /// Look up a type definition by id.
    pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
        self.defs.get(id.index())
    }

    /// Look up a type id by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Name of a registered type; placeholder for ids from another registry.
    pub fn name_of(&self, id: TypeId) -> &str {
        self.get(id).map(TypeDef::name).unwrap_or("<unknown>")
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Registered definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (TypeId::from_index(i), def))
    }

    /// Whether two types may share a channel.
    ///
    /// Reflexive and symmetric. Primitives must be identical; lists need
    /// compatible element types; records need the same arity, the same
    /// field names in the same order, and pairwise-compatible field types.
    /// Type names themselves do not participate: two records registered
    /// under different names but with identical structure are compatible.
    pub fn compatible(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (Some(da), Some(db)) => self.shapes_compatible(da.shape(), db.shape()),
            _ => false,
        }
    }

    fn shapes_compatible(&self, a: &TypeShape, b: &TypeShape) -> bool {
        match (a, b) {
            (TypeShape::Primitive(x), TypeShape::Primitive(y)) => x == y,
            (TypeShape::List(x), TypeShape::List(y)) => self.compatible(*x, *y),
            (TypeShape::Record(xs), TypeShape::Record(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys.iter())
                        .all(|(f, g)| f.name == g.name && self.compatible(f.ty, g.ty))
            }
            _ => false,
        }
    }

    /// Canonical structural signature, e.g. `record{id: text, count: integer}`.
    ///
    /// Stable across registries with the same structure, which makes it
    /// suitable for fingerprinting and error messages.
    pub fn render(&self, id: TypeId) -> String {
        match self.get(id).map(TypeDef::shape) {
            Some(TypeShape::Primitive(p)) => p.name().to_string(),
            Some(TypeShape::List(element)) => format!("list<{}>", self.render(*element)),
            Some(TypeShape::Record(fields)) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}: {}", f.name, self.render(f.ty)))
                    .collect();
                format!("record{{{}}}", fields.join(", "))
            }
            None => "<unknown>".to_string(),
        }
    }
}
