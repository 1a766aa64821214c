//! Purpose: Single error type for binding, resolution, relations and transport.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Every fallible operation in the crate returns this type; context is attached by builders.
//! Invariants: `kind` is the stable classification; message/model/field/path are optional context.
//! Invariants: Exit-code mapping is stable and additive-only.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    Internal,
    Usage,
    /// A declared type name never resolves against the registry.
    Resolution,
    TypeMismatch,
    MissingField,
    UnknownField,
    /// Discriminant value not covered by a model family's selector.
    UnknownVariant,
    UnknownEnumValue,
    DateParse,
    /// Relation accessed on an instance without a live owning client.
    DetachedInstance,
    AttributeMissing,
    Transport,
    Decode,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    model: Option<String>,
    field: Option<String>,
    path: Option<String>,
    value: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            model: None,
            field: None,
            path: None,
            value: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// JSON path of the payload node that failed, e.g. `$.scores[2].user`.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The offending raw value (discriminant, enum member, timestamp text).
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attaches a path unless a deeper frame already recorded one.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        if self.path.is_none() {
            self.path = Some(path.into());
        }
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(model) = &self.model {
            write!(f, " (model: {model})")?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {field})")?;
        }
        if let Some(value) = &self.value {
            write!(f, " (value: {value})")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (at: {path})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::Resolution => 3,
        ErrorKind::TypeMismatch => 4,
        ErrorKind::MissingField => 5,
        ErrorKind::UnknownField => 6,
        ErrorKind::UnknownVariant => 7,
        ErrorKind::UnknownEnumValue => 8,
        ErrorKind::DateParse => 9,
        ErrorKind::DetachedInstance => 10,
        ErrorKind::AttributeMissing => 11,
        ErrorKind::Transport => 12,
        ErrorKind::Decode => 13,
    }
}
