//! Purpose: Deprecated call shapes kept for older callers.
//! Exports: `LegacyClientExt`.
//! Role: Thin forwards onto the current `WikiPathwaysClient` operations.
use super::client::WikiPathwaysClient;
use super::types::SearchResult;
use crate::core::error::Error;
use crate::core::vocab::Xref;

pub trait LegacyClientExt {
    /// Search by a bare identifier without naming its database.
    #[deprecated(note = "use `find_pathways_by_xref` with an `Xref` instead")]
    fn find_pathways_by_xref_id(&self, id: &str) -> Result<Vec<SearchResult>, Error>;
}

impl LegacyClientExt for WikiPathwaysClient {
    fn find_pathways_by_xref_id(&self, id: &str) -> Result<Vec<SearchResult>, Error> {
        self.find_pathways_by_xref(&[Xref::new(id, None)])
    }
}

#[cfg(test)]
mod tests {
    use super::LegacyClientExt;
    use crate::api::client::WikiPathwaysClient;
    use crate::api::transport::{RemoteCall, Transport};
    use crate::core::error::Error;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct LastCall(Mutex<Option<RemoteCall>>);

    impl Transport for LastCall {
        fn call(&self, call: &RemoteCall) -> Result<Value, Error> {
            *self.0.lock().expect("lock") = Some(call.clone());
            Ok(json!({"result": [{"id": "WP4", "score": 3}]}))
        }
    }

    #[test]
    #[allow(deprecated)]
    fn bare_id_search_sends_one_id_without_code() {
        let transport = Arc::new(LastCall::default());
        let client = WikiPathwaysClient::with_transport(Arc::clone(&transport));

        let results = client.find_pathways_by_xref_id("7157").expect("search");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].info.id, "WP4");

        let call = transport.0.lock().expect("lock").clone().expect("call");
        assert_eq!(call.operation(), "findPathwaysByXref");
        assert_eq!(call.values("ids"), vec![Some("7157")]);
        assert_eq!(call.values("codes"), vec![None]);
    }
}
