//! Purpose: Library crate behind the `ossbind` CLI: osu! API v2 payloads bound onto models.
//! Exports: `api` (clients, binding, instances), `core` (type engine), `models` (the catalogue).
//! Role: `core` knows nothing about osu!; `models` is declaration data; `api` adds HTTP.
//! Invariants: Binding is deterministic for a given payload, model, mode and API version.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub mod models;

pub(crate) mod json;
