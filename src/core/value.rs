//! Purpose: Bound attribute values produced by the binder.
//! Exports: `Bound`.
//! Role: Closed sum of everything an attribute can hold after binding.
//! Invariants: `Null` is the single "documented null" sentinel for nullable attributes.
//! Invariants: Equality is structural; instances compare by model name and attributes.
use crate::core::cursor::Cursor;
use crate::core::instance::Instance;
use crate::core::scalar::{EnumValue, FlagSet};
use serde_json::Value;
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq)]
pub enum Bound {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(OffsetDateTime),
    Enum(EnumValue),
    Flags(FlagSet),
    List(Vec<Bound>),
    Map(BTreeMap<String, Bound>),
    Model(Instance),
    Cursor(Cursor),
    /// Payload bound against `any`; kept verbatim.
    Raw(Value),
}

impl Bound {
    pub fn is_null(&self) -> bool {
        matches!(self, Bound::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Bound::Null => "null",
            Bound::Bool(_) => "bool",
            Bound::Int(_) => "int",
            Bound::Float(_) => "float",
            Bound::Str(_) => "str",
            Bound::DateTime(_) => "datetime",
            Bound::Enum(_) => "enum",
            Bound::Flags(_) => "flags",
            Bound::List(_) => "list",
            Bound::Map(_) => "map",
            Bound::Model(_) => "model",
            Bound::Cursor(_) => "cursor",
            Bound::Raw(_) => "any",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Bound::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Bound::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers widen to floats; the wire does not distinguish `1` from `1.0`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Bound::Float(value) => Some(*value),
            Bound::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bound::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<OffsetDateTime> {
        match self {
            Bound::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Bound::Enum(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_flags(&self) -> Option<&FlagSet> {
        match self {
            Bound::Flags(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Bound]> {
        match self {
            Bound::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Bound>> {
        match self {
            Bound::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Bound::Model(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_cursor(&self) -> Option<&Cursor> {
        match self {
            Bound::Cursor(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Bound::Raw(value) => Some(value),
            _ => None,
        }
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Int(value)
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Float(value)
    }
}

impl From<bool> for Bound {
    fn from(value: bool) -> Self {
        Bound::Bool(value)
    }
}

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Bound::Str(value.to_string())
    }
}

impl From<String> for Bound {
    fn from(value: String) -> Self {
        Bound::Str(value)
    }
}

impl From<Instance> for Bound {
    fn from(value: Instance) -> Self {
        Bound::Model(value)
    }
}

impl From<Cursor> for Bound {
    fn from(value: Cursor) -> Self {
        Bound::Cursor(value)
    }
}

impl<T: Into<Bound>> From<Option<T>> for Bound {
    fn from(value: Option<T>) -> Self {
        value.map_or(Bound::Null, Into::into)
    }
}

impl<T: Into<Bound>> From<Vec<T>> for Bound {
    fn from(items: Vec<T>) -> Self {
        Bound::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Bound;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Bound::from(3_i64).as_int(), Some(3));
        assert_eq!(Bound::from(3_i64).as_float(), Some(3.0));
        assert_eq!(Bound::from("x").as_int(), None);
        assert_eq!(Bound::from(Some("x")).as_str(), Some("x"));
        assert!(Bound::from(None::<i64>).is_null());
    }

    #[test]
    fn lists_preserve_order() {
        let list = Bound::from(vec![1_i64, 2, 3]);
        let ints: Vec<i64> = list
            .as_list()
            .expect("list")
            .iter()
            .filter_map(Bound::as_int)
            .collect();
        assert_eq!(ints, vec![1, 2, 3]);
        assert_eq!(list.kind_name(), "list");
    }
}
