// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) resolves configuration once and hands it to these modules.
//
// Module responsibilities:
// - `config`: environment and `.env` loading, required-variable checks.
// - `api`: the `Transport` seam and its `reqwest` implementation.
// - `tasks`: task listing, comment fetching and index resolution.
// - `snapshot`: the write-only `~/tasks.json` listing snapshot.
// - `ui`: colored console rendering of the listing and detail views.
pub mod api;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod tasks;
pub mod ui;

pub use error::{Error, Result};
