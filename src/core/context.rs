//! Purpose: Ambient inputs threaded through every bind call.
//! Exports: `Mode`, `ApiContext`.
//! Role: Validation posture and protocol version consulted by the binder and selectors.
//! Invariants: Both types are `Copy`; a client fixes them once at construction.
use crate::core::error::{Error, ErrorKind};
use std::str::FromStr;

/// Validation posture for shape drift.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Unknown keys, missing required keys and unknown enum values are errors.
    Strict,
    /// Best effort; tolerated drift is logged and optionally reported.
    #[default]
    Lenient,
}

impl Mode {
    pub fn is_strict(self) -> bool {
        matches!(self, Mode::Strict)
    }

    pub fn from_strict_flag(strict: bool) -> Self {
        if strict { Mode::Strict } else { Mode::Lenient }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Strict => "strict",
            Mode::Lenient => "lenient",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" | "1" | "true" | "yes" => Ok(Mode::Strict),
            "lenient" | "0" | "false" | "no" => Ok(Mode::Lenient),
            other => Err(Error::new(ErrorKind::Usage)
                .with_message(format!("invalid validation mode `{other}`"))
                .with_hint("Use `strict` or `lenient`.")),
        }
    }
}

/// Provider protocol facts known to the caller, not present in payloads.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ApiContext {
    /// Value sent as the `x-api-version` header (a `YYYYMMDD` date).
    pub api_version: u32,
}

impl ApiContext {
    pub const DEFAULT_VERSION: u32 = 20220705;

    pub fn new(api_version: u32) -> Self {
        Self { api_version }
    }
}

impl Default for ApiContext {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VERSION)
    }
}
