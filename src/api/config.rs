//! Purpose: Client configuration and service url resolution.
//! Exports: `ClientConfig`, `DEFAULT_BASE_URL`, `BASE_URL_ENV`.
//! Role: Single place that turns settings into an `HttpTransport`.
//! Invariants: Url precedence is explicit value, then `WIKIPATHWAYS_URL`, then the default.
use super::http::HttpTransport;
use crate::core::error::Error;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://webservice.wikipathways.org/";
pub const BASE_URL_ENV: &str = "WIKIPATHWAYS_URL";

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    /// PEM bundle used instead of the built-in roots.
    pub tls_ca_file: Option<PathBuf>,
    pub tls_skip_verify: bool,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_tls_ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tls_ca_file = Some(path.into());
        self
    }

    pub fn with_tls_skip_verify(mut self, skip: bool) -> Self {
        self.tls_skip_verify = skip;
        self
    }

    pub fn resolve_base_url(&self) -> String {
        resolve_base_url(
            self.base_url.as_deref(),
            std::env::var(BASE_URL_ENV).ok().as_deref(),
        )
    }

    pub fn build_transport(&self) -> Result<HttpTransport, Error> {
        let mut transport = HttpTransport::new(self.resolve_base_url())?;
        if let Some(path) = &self.tls_ca_file {
            transport = transport.with_tls_ca_file(path)?;
        }
        if self.tls_skip_verify {
            transport = transport.with_tls_skip_verify();
        }
        Ok(transport)
    }
}

/// First non-blank candidate wins; blank values are treated as unset.
fn resolve_base_url(explicit: Option<&str>, from_env: Option<&str>) -> String {
    [explicit, from_env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}
