//! Purpose: Public client for the WikiPathways web service.
//! Exports: `WikiPathwaysClient`.
//! Role: One local method per remote operation; marshals arguments and decodes replies.
//! Invariants: Each method issues exactly one remote call (plus local I/O for saves).
//! Invariants: The client holds no session state; writes take an explicit `Auth`.
//! Invariants: Array results are never absent; null arrays decode as empty.
#![allow(clippy::result_large_err)]

use super::config::ClientConfig;
use super::transport::{RemoteCall, Transport};
use super::types::{
    Auth, CurationTag, CurationTagHistory, PathwayHistory, PathwayInfo, SearchResult, WriteStatus,
    WsPathway, remote_array,
};
use crate::core::error::{Error, ErrorKind};
use crate::core::gpml::{self, Pathway};
use crate::core::timestamp::{cutoff_to_timestamp, date_to_timestamp};
use crate::core::vocab::{DataSource, Organism, Xref};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::debug;

type ApiResult<T> = Result<T, Error>;

#[derive(Clone)]
pub struct WikiPathwaysClient {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for WikiPathwaysClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiPathwaysClient").finish_non_exhaustive()
    }
}

impl WikiPathwaysClient {
    /// Client for the url in `WIKIPATHWAYS_URL`, or the public service.
    pub fn new() -> ApiResult<Self> {
        Self::from_config(&ClientConfig::default())
    }

    pub fn with_url(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::from_config(&ClientConfig::new().with_base_url(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self::with_transport(config.build_transport()?))
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Pathway metadata without the GPML payload.
    pub fn pathway_info(&self, id: &str) -> ApiResult<PathwayInfo> {
        let call = RemoteCall::get("getPathwayInfo").arg("pwId", id);
        self.fetch(&call, "pathwayInfo")
    }

    /// Latest revision of a pathway; same as `pathway_revision(id, 0)`.
    pub fn pathway(&self, id: &str) -> ApiResult<WsPathway> {
        self.pathway_revision(id, 0)
    }

    pub fn pathway_revision(&self, id: &str, revision: u32) -> ApiResult<WsPathway> {
        let call = RemoteCall::get("getPathway")
            .arg("pwId", id)
            .arg("revision", revision.to_string());
        self.fetch(&call, "pathway")
    }

    pub fn list_pathways(&self) -> ApiResult<Vec<PathwayInfo>> {
        let call = RemoteCall::get("listPathways");
        self.fetch_array(&call, "pathways")
    }

    pub fn list_pathways_for(&self, organism: Organism) -> ApiResult<Vec<PathwayInfo>> {
        let call = RemoteCall::get("listPathways").arg("organism", organism.latin_name());
        self.fetch_array(&call, "pathways")
    }

    /// Latin names of all organisms with pathways on the service.
    pub fn list_organisms(&self) -> ApiResult<Vec<String>> {
        let call = RemoteCall::get("listOrganisms");
        self.fetch_array(&call, "organisms")
    }

    pub fn pathway_history(&self, id: &str, since: OffsetDateTime) -> ApiResult<PathwayHistory> {
        let call = RemoteCall::get("getPathwayHistory")
            .arg("pwId", id)
            .arg("timestamp", date_to_timestamp(since)?);
        self.fetch(&call, "history")
    }

    /// Rendered pathway (e.g. `png`, `svg`, `pdf`, `gpml`) as raw bytes.
    pub fn pathway_as(&self, file_type: &str, id: &str, revision: u32) -> ApiResult<Vec<u8>> {
        let call = RemoteCall::get("getPathwayAs")
            .arg("fileType", file_type)
            .arg("pwId", id)
            .arg("revision", revision.to_string());
        let data: String = self.fetch(&call, "data")?;
        let compact: String = data.split_ascii_whitespace().collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|err| {
                Error::new(ErrorKind::Format)
                    .with_message("pathway data is not valid base64")
                    .with_operation(call.operation())
                    .with_source(err)
            })
    }

    /// Fetch a rendering and write it to `path`, replacing any existing file.
    pub fn save_pathway_as(
        &self,
        path: impl AsRef<Path>,
        file_type: &str,
        id: &str,
        revision: u32,
    ) -> ApiResult<()> {
        let path = path.as_ref();
        let data = self.pathway_as(file_type, id, revision)?;
        let file = File::create(path)
            .map_err(|err| io_error("failed to create output file", path, err))?;
        let mut out = BufWriter::new(file);
        out.write_all(&data)
            .map_err(|err| io_error("failed to write output file", path, err))?;
        out.flush()
            .map_err(|err| io_error("failed to flush output file", path, err))?;
        debug!(path = %path.display(), bytes = data.len(), file_type, "saved pathway");
        Ok(())
    }

    /// Identifiers on the pathway, translated to `data_source`.
    pub fn xref_list(&self, id: &str, data_source: &DataSource) -> ApiResult<Vec<String>> {
        let call = RemoteCall::get("getXrefList")
            .arg("pwId", id)
            .arg("code", data_source.system_code());
        self.fetch_array(&call, "xrefs")
    }

    /// Parse the GPML carried by a fetched pathway.
    pub fn to_pathway(pathway: &WsPathway) -> ApiResult<Pathway> {
        pathway.to_pathway()
    }

    /// Replace the content of a pathway. `revision` is the revision the edit
    /// was based on; the service rejects the update if it is stale.
    pub fn update_pathway(
        &self,
        auth: &Auth,
        id: &str,
        pathway: &Pathway,
        description: &str,
        revision: u32,
    ) -> ApiResult<()> {
        let gpml = gpml::write_to_xml(pathway)?;
        let call = RemoteCall::post("updatePathway")
            .arg("pwId", id)
            .arg("description", description)
            .arg("gpml", gpml)
            .arg("revision", revision.to_string());
        self.execute(&with_auth(call, auth))
    }

    /// Returns the id and revision assigned to the new pathway.
    pub fn create_pathway(&self, auth: &Auth, pathway: &Pathway) -> ApiResult<PathwayInfo> {
        let gpml = gpml::write_to_xml(pathway)?;
        let call = RemoteCall::post("createPathway").arg("gpml", gpml);
        self.fetch(&with_auth(call, auth), "pathwayInfo")
    }

    /// Tag the latest revision. An existing tag with the same name is overwritten.
    pub fn save_curation_tag(
        &self,
        auth: &Auth,
        id: &str,
        tag_name: &str,
        text: &str,
    ) -> ApiResult<()> {
        self.save_curation_tag_revision(auth, id, tag_name, text, 0)
    }

    pub fn save_curation_tag_revision(
        &self,
        auth: &Auth,
        id: &str,
        tag_name: &str,
        text: &str,
        revision: u32,
    ) -> ApiResult<()> {
        let call = RemoteCall::post("saveCurationTag")
            .arg("pwId", id)
            .arg("tagName", tag_name)
            .arg("text", text)
            .arg("revision", revision.to_string());
        self.execute(&with_auth(call, auth))
    }

    pub fn remove_curation_tag(&self, auth: &Auth, id: &str, tag_name: &str) -> ApiResult<()> {
        let call = RemoteCall::post("removeCurationTag")
            .arg("pwId", id)
            .arg("tagName", tag_name);
        self.execute(&with_auth(call, auth))
    }

    pub fn curation_tags(&self, id: &str) -> ApiResult<Vec<CurationTag>> {
        let call = RemoteCall::get("getCurationTags").arg("pwId", id);
        self.fetch_array(&call, "tags")
    }

    pub fn curation_tags_by_name(&self, tag_name: &str) -> ApiResult<Vec<CurationTag>> {
        let call = RemoteCall::get("getCurationTagsByName").arg("tagName", tag_name);
        self.fetch_array(&call, "tags")
    }

    /// Tag events after `cutoff`; `None` returns the full history.
    pub fn curation_tag_history(
        &self,
        id: &str,
        cutoff: Option<OffsetDateTime>,
    ) -> ApiResult<Vec<CurationTagHistory>> {
        let call = RemoteCall::get("getCurationTagHistory")
            .arg("pwId", id)
            .arg("timestamp", cutoff_to_timestamp(cutoff)?);
        self.fetch_array(&call, "history")
    }

    /// Log in and return the credential that write operations require.
    pub fn login(&self, name: &str, pass: &str) -> ApiResult<Auth> {
        let call = RemoteCall::post("login").arg("name", name).arg("pass", pass);
        let key: String = self.fetch(&call, "auth")?;
        debug!(user = name, "logged in");
        Ok(Auth::new(name, key))
    }

    pub fn recent_changes(&self, cutoff: OffsetDateTime) -> ApiResult<Vec<PathwayInfo>> {
        let call = RemoteCall::get("getRecentChanges").arg("timestamp", date_to_timestamp(cutoff)?);
        self.fetch_array(&call, "pathways")
    }

    pub fn find_pathways_by_text(
        &self,
        query: &str,
        organism: Option<Organism>,
    ) -> ApiResult<Vec<SearchResult>> {
        let call = RemoteCall::get("findPathwaysByText")
            .arg("query", query)
            .opt_arg("species", organism.map(Organism::latin_name));
        self.fetch_array(&call, "result")
    }

    /// Pathways containing any of `xrefs`, including matches through
    /// identifier mapping to other databases.
    pub fn find_pathways_by_xref(&self, xrefs: &[Xref]) -> ApiResult<Vec<SearchResult>> {
        let ids = xrefs.iter().map(|xref| Some(xref.id()));
        let codes = xrefs
            .iter()
            .map(|xref| xref.data_source().map(DataSource::system_code));
        let call = RemoteCall::get("findPathwaysByXref")
            .array_arg("ids", ids)
            .array_arg("codes", codes);
        self.fetch_array(&call, "result")
    }

    pub fn find_interactions(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        let call = RemoteCall::get("findInteractions").arg("query", query);
        self.fetch_array(&call, "result")
    }

    /// Search by literature reference (title, author, or PubMed id).
    pub fn find_pathways_by_literature(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        let call = RemoteCall::get("findPathwaysByLiterature").arg("query", query);
        self.fetch_array(&call, "result")
    }

    fn invoke(&self, call: &RemoteCall) -> ApiResult<Value> {
        self.transport.call(call)
    }

    fn fetch<T>(&self, call: &RemoteCall, field: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let mut body = self.invoke(call)?;
        match body.get_mut(field).map(Value::take) {
            Some(Value::Null) | None => Err(Error::new(ErrorKind::Remote)
                .with_message(format!("response is missing `{field}`"))
                .with_operation(call.operation())),
            Some(value) => decode(call, value),
        }
    }

    fn fetch_array<T>(&self, call: &RemoteCall, field: &str) -> ApiResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut body = self.invoke(call)?;
        let value = body.get_mut(field).map(Value::take);
        let items: Option<Vec<T>> = match value {
            Some(value) => decode(call, value)?,
            None => None,
        };
        Ok(remote_array(items))
    }

    /// Calls without a payload answer `{"success": ...}`.
    fn execute(&self, call: &RemoteCall) -> ApiResult<()> {
        let status: WriteStatus = decode(call, self.invoke(call)?)?;
        if status.failed() {
            return Err(Error::new(ErrorKind::Remote)
                .with_message("service reported failure")
                .with_operation(call.operation()));
        }
        Ok(())
    }
}

fn with_auth(call: RemoteCall, auth: &Auth) -> RemoteCall {
    call.arg("auth", auth.key()).arg("username", auth.user())
}

fn decode<T>(call: &RemoteCall, value: Value) -> ApiResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|err| {
        Error::new(ErrorKind::Remote)
            .with_message("unexpected response shape")
            .with_operation(call.operation())
            .with_source(err)
    })
}

fn io_error(message: &str, path: &Path, err: std::io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message(message)
        .with_path(path)
        .with_source(err)
}
