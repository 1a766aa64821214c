//! Purpose: Convert wire scalars into declared scalar, date-time, enum and flag values.
//! Exports: `EnumDecl`, `EnumMember`, `EnumRaw`, `EnumValue`, `FlagsDecl`, `FlagDecl`, `FlagSet`,
//!          `coerce_int`, `coerce_float`, `coerce_str`, `coerce_bool`, `coerce_datetime`,
//!          `coerce_enum`, `coerce_flags`, `legacy_bool`.
//! Role: Leaf layer of the binder; no recursion, no registry access.
//! Invariants: Dispatch is on JSON kind; strings are never parsed as numbers or vice versa.
//! Invariants: Unknown enum/flag values fail in strict mode and are preserved in lenient mode.
use crate::core::context::Mode;
use crate::core::error::{Error, ErrorKind};
use crate::core::types::JsonKind;
use serde_json::Value;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnumRepr {
    Str,
    Int,
}

#[derive(Debug)]
pub struct EnumMember {
    pub name: &'static str,
    pub raw: &'static str,
    pub int: i64,
    /// String spelling an integer-backed member also arrives as.
    pub alias: Option<&'static str>,
}

impl EnumMember {
    pub const fn str(name: &'static str, raw: &'static str) -> Self {
        Self {
            name,
            raw,
            int: 0,
            alias: None,
        }
    }

    pub const fn int(name: &'static str, int: i64) -> Self {
        Self {
            name,
            raw: "",
            int,
            alias: None,
        }
    }

    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }
}

/// Closed set of named values wrapping a string or integer wire scalar.
#[derive(Debug)]
pub struct EnumDecl {
    pub name: &'static str,
    pub repr: EnumRepr,
    pub members: &'static [EnumMember],
}

impl EnumDecl {
    pub fn accepts_kind(&self, value: &Value) -> bool {
        match self.repr {
            EnumRepr::Str => value.is_string(),
            EnumRepr::Int => value.is_i64() || (value.is_string() && self.has_aliases()),
        }
    }

    /// Whether an integer-backed enum also accepts string spellings.
    pub fn has_aliases(&self) -> bool {
        self.members.iter().any(|member| member.alias.is_some())
    }

    pub fn member(&self, name: &str) -> Option<&'static EnumMember> {
        self.members.iter().find(|member| member.name == name)
    }

    fn lookup(&self, raw: &EnumRaw) -> Option<&'static EnumMember> {
        self.members.iter().find(|member| match raw {
            EnumRaw::Str(text) => match self.repr {
                EnumRepr::Str => member.raw == text,
                EnumRepr::Int => member.alias == Some(text.as_str()),
            },
            EnumRaw::Int(int) => self.repr == EnumRepr::Int && member.int == *int,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum EnumRaw {
    Str(String),
    Int(i64),
}

impl fmt::Display for EnumRaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumRaw::Str(text) => write!(f, "{text:?}"),
            EnumRaw::Int(int) => write!(f, "{int}"),
        }
    }
}

#[derive(Clone)]
pub struct EnumValue {
    decl: &'static EnumDecl,
    member: Option<&'static EnumMember>,
    raw: EnumRaw,
}

impl EnumValue {
    /// Builds a known member by name; `None` if the enum has no such member.
    pub fn of(decl: &'static EnumDecl, name: &str) -> Option<Self> {
        let member = decl.member(name)?;
        let raw = match decl.repr {
            EnumRepr::Str => EnumRaw::Str(member.raw.to_string()),
            EnumRepr::Int => EnumRaw::Int(member.int),
        };
        Some(Self {
            decl,
            member: Some(member),
            raw,
        })
    }

    pub fn enum_name(&self) -> &'static str {
        self.decl.name
    }

    /// Member name, or `None` for a synthesized unknown member.
    pub fn name(&self) -> Option<&'static str> {
        self.member.map(|member| member.name)
    }

    pub fn is(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    pub fn is_unknown(&self) -> bool {
        self.member.is_none()
    }

    pub fn raw(&self) -> &EnumRaw {
        &self.raw
    }

    pub fn to_json(&self) -> Value {
        match &self.raw {
            EnumRaw::Str(text) => Value::String(text.clone()),
            EnumRaw::Int(int) => Value::from(*int),
        }
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.decl.name == other.decl.name && self.raw == other.raw
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.member {
            Some(member) => write!(f, "{}::{}", self.decl.name, member.name),
            None => write!(f, "{}::Unknown({})", self.decl.name, self.raw),
        }
    }
}

#[derive(Debug)]
pub struct FlagDecl {
    pub name: &'static str,
    pub bit: u64,
}

impl FlagDecl {
    pub const fn new(name: &'static str, bit: u64) -> Self {
        Self { name, bit }
    }
}

/// Bitset of named integer flags. Wire forms: integer, acronym string, or list of acronyms.
#[derive(Debug)]
pub struct FlagsDecl {
    pub name: &'static str,
    pub flags: &'static [FlagDecl],
}

impl FlagsDecl {
    pub fn known_bits(&self) -> u64 {
        self.flags.iter().fold(0, |acc, flag| acc | flag.bit)
    }

    pub fn flag(&self, name: &str) -> Option<&'static FlagDecl> {
        self.flags
            .iter()
            .find(|flag| flag.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Copy)]
pub struct FlagSet {
    decl: &'static FlagsDecl,
    bits: u64,
}

impl FlagSet {
    pub fn new(decl: &'static FlagsDecl, bits: u64) -> Self {
        Self { decl, bits }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decl
            .flag(name)
            .is_some_and(|flag| flag.bit != 0 && self.bits & flag.bit == flag.bit)
    }

    /// Bits outside the declared flags (kept in lenient mode).
    pub fn unknown_bits(&self) -> u64 {
        self.bits & !self.decl.known_bits()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.decl
            .flags
            .iter()
            .filter(|flag| flag.bit != 0 && self.bits & flag.bit == flag.bit)
            .map(|flag| flag.name)
            .collect()
    }
}

impl PartialEq for FlagSet {
    fn eq(&self, other: &Self) -> bool {
        self.decl.name == other.decl.name && self.bits == other.bits
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.decl.name, self.names().join(""))?;
        if self.unknown_bits() != 0 {
            write!(f, "+{:#x}", self.unknown_bits())?;
        }
        Ok(())
    }
}

pub(crate) fn mismatch(expected: &str, value: &Value) -> Error {
    Error::new(ErrorKind::TypeMismatch).with_message(format!(
        "expected {expected}, found {}",
        JsonKind::of(value).as_str()
    ))
}

pub fn coerce_int(value: &Value) -> Result<i64, Error> {
    if let Some(int) = value.as_i64() {
        return Ok(int);
    }
    if value.is_u64() {
        return Err(Error::new(ErrorKind::TypeMismatch)
            .with_message("integer out of range")
            .with_value(value.to_string()));
    }
    Err(mismatch("integer", value))
}

pub fn coerce_float(value: &Value) -> Result<f64, Error> {
    value.as_f64().ok_or_else(|| mismatch("number", value))
}

pub fn coerce_str(value: &Value) -> Result<String, Error> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch("string", value))
}

pub fn coerce_bool(value: &Value) -> Result<bool, Error> {
    value.as_bool().ok_or_else(|| mismatch("boolean", value))
}

/// Converts a provider `0/1` integer flag to a boolean in place.
/// Returns whether a conversion happened.
pub fn legacy_bool(value: &mut Value) -> bool {
    match value.as_i64() {
        Some(int) => {
            *value = Value::Bool(int != 0);
            true
        }
        None => false,
    }
}

pub fn coerce_datetime(value: &Value) -> Result<OffsetDateTime, Error> {
    let text = value.as_str().ok_or_else(|| mismatch("timestamp string", value))?;
    parse_datetime(text)
}

pub fn parse_datetime(text: &str) -> Result<OffsetDateTime, Error> {
    if let Ok(parsed) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(parsed);
    }
    // api v1 style, implicitly UTC
    let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(parsed) = PrimitiveDateTime::parse(text, &spaced) {
        return Ok(parsed.assume_utc());
    }
    let date_only = format_description!("[year]-[month]-[day]");
    match Date::parse(text, &date_only) {
        Ok(date) => Ok(date.midnight().assume_utc()),
        Err(err) => Err(Error::new(ErrorKind::DateParse)
            .with_message("malformed ISO-8601 timestamp")
            .with_value(text)
            .with_source(err)),
    }
}

pub fn format_datetime(value: &OffsetDateTime) -> Result<String, Error> {
    value.format(&Rfc3339).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("timestamp format failed")
            .with_source(err)
    })
}

pub fn coerce_enum(decl: &'static EnumDecl, value: &Value, mode: Mode) -> Result<EnumValue, Error> {
    let raw = match (decl.repr, value) {
        (EnumRepr::Str, Value::String(text)) => EnumRaw::Str(text.clone()),
        (EnumRepr::Int, Value::Number(_)) => EnumRaw::Int(coerce_int(value)?),
        (EnumRepr::Int, Value::String(text)) if decl.has_aliases() => EnumRaw::Str(text.clone()),
        (EnumRepr::Str, _) => return Err(mismatch("string enum value", value)),
        (EnumRepr::Int, _) => return Err(mismatch("integer enum value", value)),
    };
    match decl.lookup(&raw) {
        // aliased spellings settle on the canonical integer
        Some(member) => Ok(EnumValue {
            decl,
            member: Some(member),
            raw: match decl.repr {
                EnumRepr::Str => raw,
                EnumRepr::Int => EnumRaw::Int(member.int),
            },
        }),
        None if mode.is_strict() => Err(Error::new(ErrorKind::UnknownEnumValue)
            .with_message(format!("{raw} is not a member of {}", decl.name))
            .with_model(decl.name)
            .with_value(raw.to_string())),
        None => Ok(EnumValue {
            decl,
            member: None,
            raw,
        }),
    }
}

pub fn coerce_flags(decl: &'static FlagsDecl, value: &Value, mode: Mode) -> Result<FlagSet, Error> {
    let bits = match value {
        Value::Number(_) => {
            let bits = value
                .as_u64()
                .ok_or_else(|| mismatch("non-negative flag bits", value))?;
            let unknown = bits & !decl.known_bits();
            if unknown != 0 && mode.is_strict() {
                return Err(Error::new(ErrorKind::UnknownEnumValue)
                    .with_message(format!("unknown {} bits {unknown:#x}", decl.name))
                    .with_model(decl.name)
                    .with_value(bits.to_string()));
            }
            bits
        }
        Value::String(text) => parse_acronyms(decl, text, mode)?,
        Value::Array(items) => {
            let mut bits = 0;
            for item in items {
                let acronym = item
                    .as_str()
                    .ok_or_else(|| mismatch("flag acronym string", item))?;
                bits |= parse_acronyms(decl, acronym, mode)?;
            }
            bits
        }
        other => return Err(mismatch("flag bits, acronyms or acronym list", other)),
    };
    Ok(FlagSet { decl, bits })
}

fn parse_acronyms(decl: &'static FlagsDecl, text: &str, mode: Mode) -> Result<u64, Error> {
    let mut bits = 0;
    let mut rest = text.trim();
    while !rest.is_empty() {
        let matched = decl
            .flags
            .iter()
            .filter(|flag| {
                rest.len() >= flag.name.len()
                    && rest.is_char_boundary(flag.name.len())
                    && rest[..flag.name.len()].eq_ignore_ascii_case(flag.name)
            })
            .max_by_key(|flag| flag.name.len());
        match matched {
            Some(flag) => {
                bits |= flag.bit;
                rest = &rest[flag.name.len()..];
            }
            None if mode.is_strict() => {
                return Err(Error::new(ErrorKind::UnknownEnumValue)
                    .with_message(format!("unknown {} acronym in {text:?}", decl.name))
                    .with_model(decl.name)
                    .with_value(text));
            }
            None => {
                tracing::warn!(flags = decl.name, input = text, "dropping unknown flag acronym");
                let skip = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                rest = &rest[skip..];
            }
        }
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static COLOUR: EnumDecl = EnumDecl {
        name: "Colour",
        repr: EnumRepr::Str,
        members: &[EnumMember::str("Red", "red"), EnumMember::str("Blue", "blue")],
    };

    static LEVEL: EnumDecl = EnumDecl {
        name: "Level",
        repr: EnumRepr::Int,
        members: &[EnumMember::int("Low", -1), EnumMember::int("High", 4)],
    };

    static STATUS: EnumDecl = EnumDecl {
        name: "Status",
        repr: EnumRepr::Int,
        members: &[
            EnumMember::int("Pending", 0).alias("pending"),
            EnumMember::int("Ranked", 1).alias("ranked"),
        ],
    };

    static MODS: FlagsDecl = FlagsDecl {
        name: "Mods",
        flags: &[
            FlagDecl::new("NM", 0),
            FlagDecl::new("HD", 8),
            FlagDecl::new("DT", 64),
            FlagDecl::new("NC", 512),
        ],
    };

    #[test]
    fn int_rejects_strings_and_floats() {
        assert_eq!(coerce_int(&json!(7)).expect("int"), 7);
        let err = coerce_int(&json!("7")).expect_err("string");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(coerce_int(&json!(7.5)).is_err());
        assert!(coerce_int(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn legacy_bool_only_touches_integers() {
        let mut value = json!(1);
        assert!(legacy_bool(&mut value));
        assert_eq!(value, json!(true));
        let mut value = json!(true);
        assert!(!legacy_bool(&mut value));
        assert_eq!(value, json!(true));
    }

    #[test]
    fn datetime_accepts_rfc3339_and_legacy_forms() {
        let a = coerce_datetime(&json!("2021-05-20T03:24:05+00:00")).expect("rfc3339");
        let b = coerce_datetime(&json!("2021-05-20 03:24:05")).expect("spaced");
        assert_eq!(a, b);
        let c = coerce_datetime(&json!("2021-05-20")).expect("date");
        assert_eq!(c.date(), a.date());
    }

    #[test]
    fn malformed_datetime_is_date_parse_error() {
        let err = coerce_datetime(&json!("yesterday")).expect_err("bad");
        assert_eq!(err.kind(), ErrorKind::DateParse);
        assert_eq!(err.value(), Some("yesterday"));
        let err = coerce_datetime(&json!(12)).expect_err("number");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn unknown_enum_strict_vs_lenient() {
        let strict = coerce_enum(&COLOUR, &json!("green"), Mode::Strict).expect_err("strict");
        assert_eq!(strict.kind(), ErrorKind::UnknownEnumValue);
        assert_eq!(strict.model(), Some("Colour"));
        assert_eq!(strict.value(), Some("\"green\""));

        let lenient = coerce_enum(&COLOUR, &json!("green"), Mode::Lenient).expect("lenient");
        assert!(lenient.is_unknown());
        assert_eq!(lenient.raw(), &EnumRaw::Str("green".to_string()));
        assert_eq!(lenient.to_json(), json!("green"));
    }

    #[test]
    fn int_enum_binds_by_value() {
        let low = coerce_enum(&LEVEL, &json!(-1), Mode::Strict).expect("low");
        assert!(low.is("Low"));
        assert_eq!(low, EnumValue::of(&LEVEL, "Low").expect("member"));
        assert!(coerce_enum(&LEVEL, &json!("-1"), Mode::Lenient).is_err());
    }

    #[test]
    fn aliased_int_enum_accepts_member_names() {
        assert!(STATUS.accepts_kind(&json!("ranked")));
        assert!(!LEVEL.accepts_kind(&json!("low")));

        let named = coerce_enum(&STATUS, &json!("ranked"), Mode::Strict).expect("named");
        let numbered = coerce_enum(&STATUS, &json!(1), Mode::Strict).expect("numbered");
        assert_eq!(named, numbered);
        assert_eq!(named.raw(), &EnumRaw::Int(1));

        let err = coerce_enum(&STATUS, &json!("Ranked"), Mode::Strict).expect_err("case");
        assert_eq!(err.kind(), ErrorKind::UnknownEnumValue);
    }

    #[test]
    fn flags_accept_bits_acronyms_and_lists() {
        let from_bits = coerce_flags(&MODS, &json!(72), Mode::Strict).expect("bits");
        let from_text = coerce_flags(&MODS, &json!("HDDT"), Mode::Strict).expect("text");
        let from_list = coerce_flags(&MODS, &json!(["DT", "hd"]), Mode::Strict).expect("list");
        assert_eq!(from_bits, from_text);
        assert_eq!(from_text, from_list);
        assert!(from_bits.contains("HD"));
        assert!(!from_bits.contains("NC"));
        assert_eq!(from_bits.names(), vec!["HD", "DT"]);
    }

    #[test]
    fn unknown_flag_bits_are_kept_leniently() {
        let err = coerce_flags(&MODS, &json!(8 | 4096), Mode::Strict).expect_err("strict");
        assert_eq!(err.kind(), ErrorKind::UnknownEnumValue);
        let lenient = coerce_flags(&MODS, &json!(8 | 4096), Mode::Lenient).expect("lenient");
        assert_eq!(lenient.unknown_bits(), 4096);
        assert!(lenient.contains("HD"));
    }

    #[test]
    fn unknown_acronym_strict_vs_lenient() {
        assert!(coerce_flags(&MODS, &json!("HDXX"), Mode::Strict).is_err());
        let lenient = coerce_flags(&MODS, &json!("HDXX"), Mode::Lenient).expect("lenient");
        assert_eq!(lenient.bits(), 8);
    }
}
