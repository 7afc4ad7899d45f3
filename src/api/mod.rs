//! Purpose: Define the public Rust API boundary for the WikiPathways client.
//! Exports: The client, its transport seam, response records, vocabulary and GPML model.
//! Role: Public, additive-only surface; internal modules are reached only through here.
//! Invariants: Every remote operation is a method on `WikiPathwaysClient`.
//! Invariants: Write operations take an explicit `Auth`; the client keeps no session.

mod client;
mod config;
mod http;
mod legacy;
mod transport;
mod types;

pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::gpml::{
    self, Comment, DataNode, GPML_NAMESPACE, GpmlXref, Interaction, Label, NodeGraphics, Pathway,
    Point, read_from_xml, write_to_xml,
};
pub use crate::core::timestamp::{
    BEGINNING_OF_TIME, cutoff_to_timestamp, date_to_timestamp, timestamp_to_date,
};
pub use crate::core::vocab::{DataSource, Organism, Xref};
pub use client::WikiPathwaysClient;
pub use config::{BASE_URL_ENV, ClientConfig, DEFAULT_BASE_URL};
pub use http::HttpTransport;
pub use legacy::LegacyClientExt;
pub use transport::{Method, RemoteCall, Transport};
pub use types::{
    Auth, CurationTag, CurationTagHistory, HistoryEntry, PathwayHistory, PathwayInfo,
    SearchField, SearchResult, WsPathway,
};
