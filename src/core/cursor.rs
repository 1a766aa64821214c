//! Purpose: Pagination cursor with an open attribute set.
//! Exports: `Cursor`.
//! Role: Carries whatever keys the provider returned so the next page can be requested.
//! Invariants: No fixed schema; equality is structural over the key/value set.
//! Invariants: Constructible from a payload or directly from caller-supplied pairs.
use crate::core::error::{Error, ErrorKind};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Default, PartialEq)]
pub struct Cursor {
    entries: BTreeMap<String, Value>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        map.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn attr(&self, key: &str) -> Result<&Value, Error> {
        self.entries.get(key).ok_or_else(|| {
            Error::new(ErrorKind::AttributeMissing)
                .with_message("cursor has no such key")
                .with_model("Cursor")
                .with_field(key)
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    /// Query parameters resuming from this cursor: `cursor[key]=value`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (format!("cursor[{key}]"), text)
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Cursor {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cursor(")?;
        for (idx, (key, value)) in self.entries.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn equality_is_structural() {
        let bound = match json!({"page": 2, "id": 55}) {
            serde_json::Value::Object(map) => Cursor::from_map(&map),
            _ => unreachable!(),
        };
        let manual = Cursor::new().with("id", 55).with("page", 2);
        assert_eq!(bound, manual);
        assert_ne!(manual, Cursor::new().with("page", 2));
    }

    #[test]
    fn cloning_a_cursor_is_a_no_op_copy() {
        let cursor: Cursor = [("page", 199)].into_iter().collect();
        let copy = cursor.clone();
        assert_eq!(copy, cursor);
        assert_eq!(copy.attr("page").expect("page"), &json!(199));
    }

    #[test]
    fn missing_key_is_attribute_missing() {
        let err = Cursor::new().attr("page").expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::AttributeMissing);
        assert_eq!(err.field(), Some("page"));
    }

    #[test]
    fn query_pairs_are_bracketed() {
        let cursor = Cursor::new().with("page", 3).with("sort", "desc");
        assert_eq!(
            cursor.query_pairs(),
            vec![
                ("cursor[page]".to_string(), "3".to_string()),
                ("cursor[sort]".to_string(), "desc".to_string()),
            ]
        );
        assert_eq!(format!("{cursor:?}"), "Cursor(page=3, sort=\"desc\")");
    }
}
