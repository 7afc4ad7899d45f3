//! Purpose: Blocking client library for the WikiPathways pathway web service.
//! Exports: `api` (client, transport, response records, vocabulary, GPML model, errors).
//! Role: Library only; `api` is the single public path into the crate.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
mod core;

pub use api::{Auth, ClientConfig, Error, ErrorKind, WikiPathwaysClient};
