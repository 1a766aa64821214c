//! Purpose: Define the stable public Rust API boundary for ossbind.
//! Exports: Clients, binding entrypoints, instances, relations, drift reports and errors.
//! Role: Public, additive-only surface; declarations and plans stay under `core`/`models`.
//! Invariants: Everything a caller needs to fetch, bind and traverse is reachable from here.
//! Invariants: Both clients bind against the same process-wide catalogue registry.

mod async_client;
mod client;

pub use crate::core::bind::{
    BindContext, bind, bind_value, bind_value_with_report, bind_with_report,
};
pub use crate::core::context::{ApiContext, Mode};
pub use crate::core::cursor::Cursor;
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::instance::{ClientHandle, Instance};
pub use crate::core::relation::{EntityKind, Fetch, FetchFuture, FetchRequest, Related};
pub use crate::core::scalar::{EnumRaw, EnumValue, FlagSet};
pub use crate::core::validate::{DriftCode, DriftIssue, DriftReport, DriftStatus};
pub use crate::core::value::Bound;
pub use crate::json::decode as decode_json;
pub use crate::models::registry;
pub use async_client::AsyncClient;
pub use client::{
    Client, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_API_VERSION, ENV_BASE_URL,
    ENV_STRICT, ENV_TOKEN,
};
