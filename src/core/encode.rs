//! Purpose: Encode bound instances back into JSON.
//! Exports: `Instance::to_json`, `Instance::to_wire`, `encode_bound`, `KeyStyle`.
//! Role: Attribute-keyed output for consumers; wire-keyed output that re-binds to an equal value.
//! Invariants: Absent attributes are omitted; the null sentinel encodes as `null`.
//! Invariants: Enum values encode as their raw scalar, flags as their integer bitset.
use crate::core::error::Error;
use crate::core::instance::Instance;
use crate::core::scalar::format_datetime;
use crate::core::value::Bound;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyStyle {
    Attribute,
    Wire,
}

impl Instance {
    /// JSON object keyed by attribute names.
    pub fn to_json(&self) -> Result<Value, Error> {
        encode_instance(self, KeyStyle::Attribute)
    }

    /// JSON object keyed by wire names, as the provider would send it.
    pub fn to_wire(&self) -> Result<Value, Error> {
        encode_instance(self, KeyStyle::Wire)
    }
}

fn encode_instance(instance: &Instance, style: KeyStyle) -> Result<Value, Error> {
    let mut out = Map::new();
    for (descriptor, value) in instance.attrs() {
        let key = match style {
            KeyStyle::Attribute => descriptor.attr,
            KeyStyle::Wire => descriptor.wire,
        };
        out.insert(key.to_string(), encode_bound(value, style)?);
    }
    Ok(Value::Object(out))
}

pub fn encode_bound(value: &Bound, style: KeyStyle) -> Result<Value, Error> {
    Ok(match value {
        Bound::Null => Value::Null,
        Bound::Bool(value) => Value::Bool(*value),
        Bound::Int(value) => Value::from(*value),
        Bound::Float(value) => Value::from(*value),
        Bound::Str(value) => Value::String(value.clone()),
        Bound::DateTime(value) => Value::String(format_datetime(value)?),
        Bound::Enum(value) => value.to_json(),
        Bound::Flags(flags) => Value::from(flags.bits()),
        Bound::List(items) => Value::Array(
            items
                .iter()
                .map(|item| encode_bound(item, style))
                .collect::<Result<_, _>>()?,
        ),
        Bound::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), encode_bound(item, style)?)))
                .collect::<Result<_, Error>>()?,
        ),
        Bound::Model(instance) => encode_instance(instance, style)?,
        Bound::Cursor(cursor) => cursor.to_json(),
        Bound::Raw(value) => value.clone(),
    })
}
