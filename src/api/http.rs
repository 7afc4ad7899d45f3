//! Purpose: Default `Transport` speaking the WikiPathways REST/JSON interface over HTTP.
//! Exports: `HttpTransport`.
//! Role: Blocking transport built on a shared `ureq::Agent`.
//! Invariants: Every request asks for `format=json`; reads are GET, writes are form POSTs.
//! Invariants: Status and transport failures surface as `ErrorKind::Remote`, unretried.
//! Invariants: The base url keeps its path prefix and always ends with a slash.
#![allow(clippy::result_large_err)]

use super::transport::{Method, RemoteCall, Transport};
use crate::core::error::{Error, ErrorKind};
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use ureq::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use ureq::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use ureq::rustls::{DigitallySignedStruct, Error as TlsError, SignatureScheme};
use url::Url;

type ApiResult<T> = Result<T, Error>;

const USER_AGENT: &str = concat!("wpclient/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpTransport {
    base_url: Url,
    agent: ureq::Agent,
}

/// Accepts any server certificate; signatures are still checked by the provider.
#[derive(Debug)]
struct UnverifiedServer {
    schemes: Vec<SignatureScheme>,
}

impl UnverifiedServer {
    fn new() -> Self {
        let schemes = ureq::rustls::crypto::aws_lc_rs::default_provider()
            .signature_verification_algorithms
            .supported_schemes();
        Self { schemes }
    }
}

impl ServerCertVerifier for UnverifiedServer {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let agent = agent_builder().build();
        Ok(Self { base_url, agent })
    }

    /// Replace the agent, e.g. to configure timeouts or a proxy.
    pub fn with_agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = agent;
        self
    }

    /// Trust only the certificates in the PEM bundle at `path`.
    pub fn with_tls_ca_file(self, path: impl AsRef<Path>) -> ApiResult<Self> {
        let roots = load_root_store(path.as_ref())?;
        let tls = ureq::rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Ok(self.with_tls_config(tls))
    }

    /// Skip server certificate verification. Intended for local test services.
    pub fn with_tls_skip_verify(self) -> Self {
        install_crypto_provider();
        let tls = ureq::rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(UnverifiedServer::new()))
            .with_no_client_auth();
        self.with_tls_config(tls)
    }

    fn with_tls_config(self, tls: ureq::rustls::ClientConfig) -> Self {
        let agent = agent_builder().tls_config(Arc::new(tls)).build();
        self.with_agent(agent)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn operation_url(&self, operation: &str) -> ApiResult<Url> {
        let mut url = self.base_url.join(operation).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("cannot build operation url")
                .with_operation(operation)
                .with_source(err)
        })?;
        url.query_pairs_mut().append_pair("format", "json");
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn call(&self, call: &RemoteCall) -> ApiResult<Value> {
        let mut url = self.operation_url(call.operation())?;
        debug!(
            operation = call.operation(),
            method = ?call.method(),
            params = ?call.param_names(),
            "remote call"
        );

        let response = match call.method() {
            Method::Get => {
                {
                    let mut pairs = url.query_pairs_mut();
                    for (name, value) in call.params() {
                        pairs.append_pair(name, value.as_deref().unwrap_or(""));
                    }
                }
                self.agent
                    .get(url.as_str())
                    .set("Accept", "application/json")
                    .call()
            }
            Method::Post => {
                let form: Vec<(&str, &str)> = call
                    .params()
                    .iter()
                    .map(|(name, value)| (*name, value.as_deref().unwrap_or("")))
                    .collect();
                self.agent
                    .post(url.as_str())
                    .set("Accept", "application/json")
                    .send_form(&form)
            }
        };

        match response {
            Ok(resp) => read_json_response(call, resp),
            Err(ureq::Error::Status(code, resp)) => Err(parse_error_response(call, code, resp)),
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Remote)
                .with_message("request failed")
                .with_operation(call.operation())
                .with_source(err)),
        }
    }
}

fn agent_builder() -> ureq::AgentBuilder {
    ureq::AgentBuilder::new().user_agent(USER_AGENT)
}

fn install_crypto_provider() {
    // Fails only when a provider is already installed.
    let _ = ureq::rustls::crypto::aws_lc_rs::default_provider().install_default();
}

fn load_root_store(path: &Path) -> ApiResult<ureq::rustls::RootCertStore> {
    let usage = |message: &str| {
        Error::new(ErrorKind::Usage)
            .with_message(message)
            .with_path(path)
    };
    let pem = std::fs::read(path)
        .map_err(|err| usage("failed to read TLS CA file").with_source(err))?;
    let certs = rustls_pemfile::certs(&mut Cursor::new(pem))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| usage("failed to parse TLS CA file").with_source(err))?;
    if certs.is_empty() {
        return Err(usage("TLS CA file contains no certificates"));
    }

    install_crypto_provider();
    let mut roots = ureq::rustls::RootCertStore::empty();
    let (added, _ignored) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(usage("TLS CA file contains no usable certificates"));
    }
    Ok(roots)
}

fn normalize_base_url(raw: String) -> ApiResult<Url> {
    let mut url = Url::parse(&raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid service base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("service base url must use http or https scheme"));
    }
    if url.cannot_be_a_base() {
        return Err(Error::new(ErrorKind::Usage).with_message("service base url cannot be a base"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn read_json_response(call: &RemoteCall, response: ureq::Response) -> ApiResult<Value> {
    let value: Value = serde_json::from_reader(response.into_reader()).map_err(|err| {
        Error::new(ErrorKind::Remote)
            .with_message("invalid response json")
            .with_operation(call.operation())
            .with_source(err)
    })?;
    if let Some(message) = error_message(&value) {
        warn!(operation = call.operation(), "service returned an error envelope");
        return Err(Error::new(ErrorKind::Remote)
            .with_message(message)
            .with_operation(call.operation()));
    }
    Ok(value)
}

fn parse_error_response(call: &RemoteCall, status: u16, response: ureq::Response) -> Error {
    let body = response.into_string().unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| format!("remote error status {status}"));
    warn!(operation = call.operation(), status, "service rejected the call");
    let err = Error::new(ErrorKind::Remote)
        .with_message(message)
        .with_operation(call.operation())
        .with_status(status);
    match status {
        401 | 403 => err.with_hint("log in again and pass the returned credential"),
        _ => err,
    }
}

/// The service reports faults as `{"error": "..."}` or `{"error": {"message": "..."}}`.
fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(object) => Some(
            object
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown service error")
                .to_string(),
        ),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpTransport, UnverifiedServer, error_message, normalize_base_url};
    use ureq::rustls::client::danger::ServerCertVerifier;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn normalize_base_url_keeps_path_prefix() {
        let url = normalize_base_url("http://localhost:8080/wpi/webservice".to_string())
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/wpi/webservice/");
    }

    #[test]
    fn normalize_base_url_strips_query_and_fragment() {
        let url = normalize_base_url("https://webservice.wikipathways.org?x=1#top".to_string())
            .expect("url");
        assert_eq!(url.as_str(), "https://webservice.wikipathways.org/");
    }

    #[test]
    fn normalize_base_url_rejects_other_schemes() {
        let err = normalize_base_url("ftp://example.org".to_string()).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = normalize_base_url("not a url".to_string()).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn operation_url_requests_json() {
        let transport = HttpTransport::new("http://localhost:8080/ws").expect("transport");
        let url = transport.operation_url("listOrganisms").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/ws/listOrganisms?format=json");
    }

    #[test]
    fn error_message_handles_envelope_shapes() {
        assert_eq!(
            error_message(&json!({"error": "bad id"})).as_deref(),
            Some("bad id")
        );
        assert_eq!(
            error_message(&json!({"error": {"message": "denied"}})).as_deref(),
            Some("denied")
        );
        assert_eq!(error_message(&json!({"error": null})), None);
        assert_eq!(error_message(&json!({"pathways": []})), None);
    }

    fn self_signed_pem() -> String {
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
            .expect("cert")
            .serialize_pem()
            .expect("pem")
    }

    #[test]
    fn ca_file_with_a_certificate_is_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, self_signed_pem()).expect("write");
        let transport = HttpTransport::new("https://localhost:8443/ws")
            .expect("transport")
            .with_tls_ca_file(&path)
            .expect("ca file");
        assert_eq!(transport.base_url().as_str(), "https://localhost:8443/ws/");
    }

    #[test]
    fn ca_file_without_certificates_is_usage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.pem");
        std::fs::write(&path, "not a certificate\n").expect("write");
        let err = HttpTransport::new("https://localhost")
            .expect("transport")
            .with_tls_ca_file(&path)
            .err()
            .expect("err");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn unverified_server_offers_provider_schemes() {
        let verifier = UnverifiedServer::new();
        assert!(!verifier.supported_verify_schemes().is_empty());
    }

    #[test]
    fn missing_ca_file_is_usage_error() {
        let transport = HttpTransport::new("https://localhost").expect("transport");
        let err = transport
            .with_tls_ca_file("/nonexistent/ca.pem")
            .err()
            .expect("err");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.path().is_some());
    }
}
