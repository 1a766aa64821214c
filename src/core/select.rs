//! Purpose: Polymorphic selection outcomes and discriminant lookup helpers.
//! Exports: `Selection`, `VariantTable`, `OverrideTable`, `discriminant`.
//! Role: Model declarations attach a `SelectFn` that returns a `Selection` before construction.
//! Invariants: Selectors are pure over `(payload, api context)`; they never mutate the payload.
//! Invariants: An unrecognized discriminant is an explicit `UnknownVariant`, never a fallback.
use crate::core::error::{Error, ErrorKind};
use crate::core::types::{JsonKind, Ty};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Bind as the declared model.
    Keep,
    /// Replace the declared model wholesale with the named model.
    Subclass(&'static str),
    /// Bind as the declared model, re-typing the named attributes for this payload only.
    Overrides(Vec<(&'static str, Ty)>),
}

/// Reads a string discriminant. Absence is `MissingField`; a non-string is `TypeMismatch`.
pub fn discriminant<'a>(
    payload: &'a Map<String, Value>,
    key: &str,
    model: &str,
) -> Result<&'a str, Error> {
    match payload.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(Error::new(ErrorKind::TypeMismatch)
            .with_message(format!(
                "discriminant must be a string, found {}",
                JsonKind::of(other).as_str()
            ))
            .with_model(model)
            .with_field(key)),
        None => Err(Error::new(ErrorKind::MissingField)
            .with_message("payload has no discriminant")
            .with_model(model)
            .with_field(key)),
    }
}

fn unknown_variant(model: &str, key: &str, value: &str) -> Error {
    Error::new(ErrorKind::UnknownVariant)
        .with_message(format!("unrecognized discriminant {value:?}"))
        .with_model(model)
        .with_field(key)
        .with_value(value)
}

/// Discriminant value to subclass name.
#[derive(Debug)]
pub struct VariantTable {
    pub model: &'static str,
    pub key: &'static str,
    pub variants: &'static [(&'static str, &'static str)],
}

impl VariantTable {
    pub fn select(&self, payload: &Map<String, Value>) -> Result<Selection, Error> {
        let value = discriminant(payload, self.key, self.model)?;
        self.variants
            .iter()
            .find(|(tag, _)| *tag == value)
            .map(|(_, subclass)| Selection::Subclass(subclass))
            .ok_or_else(|| unknown_variant(self.model, self.key, value))
    }
}

/// Discriminant value to a replacement type for one attribute.
#[derive(Debug)]
pub struct OverrideTable {
    pub model: &'static str,
    pub key: &'static str,
    pub attr: &'static str,
    pub types: &'static [(&'static str, Ty)],
}

impl OverrideTable {
    pub fn select(&self, payload: &Map<String, Value>) -> Result<Selection, Error> {
        let value = discriminant(payload, self.key, self.model)?;
        self.types
            .iter()
            .find(|(tag, _)| *tag == value)
            .map(|(_, ty)| Selection::Overrides(vec![(self.attr, *ty)]))
            .ok_or_else(|| unknown_variant(self.model, self.key, value))
    }
}
