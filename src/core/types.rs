//! Purpose: Type expressions in declared (`Ty`) and resolved (`TypeExpr`) form.
//! Exports: `Ty`, `TypeExpr`, `JsonKind`.
//! Role: `Ty` is what static model declarations write; `TypeExpr` is what the binder walks.
//! Invariants: `Ty` names other types by string only; names are resolved lazily by `core::plan`.
//! Invariants: Kind matching looks at the JSON kind of a value, never at its content.
use crate::core::plan::ModelDecl;
use crate::core::scalar::{EnumDecl, FlagsDecl};
use serde_json::Value;
use std::fmt;

/// Declared field type. Everything is `'static` so declarations can live in statics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
    Str,
    Bool,
    /// Untyped payload kept as raw JSON.
    Any,
    /// Only `null` binds; used by overrides for payloads that never carry a value.
    Null,
    /// Model, enum, flags, or a built-in name (`Datetime`, `Cursor`).
    Named(&'static str),
    List(&'static Ty),
    Optional(&'static Ty),
    /// Candidates are tried in declared order; the first kind match wins.
    Union(&'static [Ty]),
    /// String-keyed mapping with homogeneous values.
    Map(&'static Ty),
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => f.write_str("int"),
            Ty::Float => f.write_str("float"),
            Ty::Str => f.write_str("str"),
            Ty::Bool => f.write_str("bool"),
            Ty::Any => f.write_str("any"),
            Ty::Null => f.write_str("null"),
            Ty::Named(name) => f.write_str(name),
            Ty::List(inner) => write!(f, "list<{inner}>"),
            Ty::Optional(inner) => write!(f, "optional<{inner}>"),
            Ty::Map(inner) => write!(f, "map<{inner}>"),
            Ty::Union(candidates) => {
                f.write_str("union<")?;
                for (idx, candidate) in candidates.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{candidate}")?;
                }
                f.write_str(">")
            }
        }
    }
}

/// Fully resolved type; model/enum/flags references point at their declarations.
#[derive(Clone, Debug)]
pub enum TypeExpr {
    Int,
    Float,
    Str,
    Bool,
    Any,
    Null,
    DateTime,
    Cursor,
    Model(&'static ModelDecl),
    Enum(&'static EnumDecl),
    Flags(&'static FlagsDecl),
    List(Box<TypeExpr>),
    Optional(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Map(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeExpr::Optional(_))
    }

    /// Whether `value`'s JSON kind can be bound against this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeExpr::Int => value.is_i64() || value.is_u64(),
            TypeExpr::Float => value.is_number(),
            TypeExpr::Str | TypeExpr::DateTime => value.is_string(),
            TypeExpr::Bool => value.is_boolean(),
            TypeExpr::Null => value.is_null(),
            TypeExpr::Any => true,
            TypeExpr::Cursor | TypeExpr::Model(_) | TypeExpr::Map(_) => value.is_object(),
            TypeExpr::Enum(decl) => decl.accepts_kind(value),
            TypeExpr::Flags(_) => value.is_u64() || value.is_string() || value.is_array(),
            TypeExpr::List(_) => value.is_array(),
            TypeExpr::Optional(inner) => value.is_null() || inner.accepts(value),
            TypeExpr::Union(candidates) => candidates.iter().any(|c| c.accepts(value)),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Int => f.write_str("int"),
            TypeExpr::Float => f.write_str("float"),
            TypeExpr::Str => f.write_str("str"),
            TypeExpr::Bool => f.write_str("bool"),
            TypeExpr::Any => f.write_str("any"),
            TypeExpr::Null => f.write_str("null"),
            TypeExpr::DateTime => f.write_str("datetime"),
            TypeExpr::Cursor => f.write_str("cursor"),
            TypeExpr::Model(decl) => f.write_str(decl.name),
            TypeExpr::Enum(decl) => f.write_str(decl.name),
            TypeExpr::Flags(decl) => f.write_str(decl.name),
            TypeExpr::List(inner) => write!(f, "list<{inner}>"),
            TypeExpr::Optional(inner) => write!(f, "optional<{inner}>"),
            TypeExpr::Map(inner) => write!(f, "map<{inner}>"),
            TypeExpr::Union(candidates) => {
                f.write_str("union<")?;
                for (idx, candidate) in candidates.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{candidate}")?;
                }
                f.write_str(">")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}
