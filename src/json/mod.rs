//! Purpose: Internal JSON parsing boundary shared by runtime callsites.
//! Exports: `parse` module and `decode`, which maps parse failures to `ErrorKind::Decode`.
//! Role: Single seam for parser implementation so callsites avoid ad hoc decode logic.
//! Invariants: Runtime JSON decoding (CLI input, HTTP bodies) goes through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;

use crate::core::error::{Error, ErrorKind};
use serde_json::Value;

/// Decodes JSON text; `context` names the input in the error hint (e.g. `stdin`, `GET users/2`).
pub fn decode(input: &str, context: &str) -> Result<Value, Error> {
    parse::from_str::<Value>(input).map_err(|err| {
        let category = parse::categorize_error(&err);
        Error::new(ErrorKind::Decode)
            .with_message(format!("invalid JSON ({})", category.label()))
            .with_hint(parse::hint_for_error(&err, context))
            .with_source(err)
    })
}
