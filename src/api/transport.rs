//! Purpose: Describe one remote procedure invocation and the seam that executes it.
//! Exports: `Transport`, `RemoteCall`, `Method`.
//! Role: Pluggable boundary between the client's marshaling and the network.
//! Invariants: Parameter order is preserved; repeated names encode array parameters.
//! Invariants: Absent scalar parameters are omitted; absent array entries keep their slot.
use crate::core::error::Error;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Parameters whose values never appear in `Debug` output.
const SENSITIVE_PARAMS: [&str; 2] = ["pass", "auth"];

/// Executes remote calls and returns the decoded JSON response body.
pub trait Transport: Send + Sync {
    fn call(&self, call: &RemoteCall) -> Result<Value, Error>;
}

impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    fn call(&self, call: &RemoteCall) -> Result<Value, Error> {
        (**self).call(call)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    /// Read-only operations.
    Get,
    /// Operations that change remote state or carry credentials.
    Post,
}

#[derive(Clone, Eq, PartialEq)]
pub struct RemoteCall {
    operation: &'static str,
    method: Method,
    params: Vec<(&'static str, Option<String>)>,
}

impl RemoteCall {
    pub fn get(operation: &'static str) -> Self {
        Self::new(operation, Method::Get)
    }

    pub fn post(operation: &'static str) -> Self {
        Self::new(operation, Method::Post)
    }

    fn new(operation: &'static str, method: Method) -> Self {
        Self {
            operation,
            method,
            params: Vec::new(),
        }
    }

    pub fn arg(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, Some(value.into())));
        self
    }

    pub fn opt_arg<V>(mut self, name: &'static str, value: Option<V>) -> Self
    where
        V: Into<String>,
    {
        if let Some(value) = value {
            self.params.push((name, Some(value.into())));
        }
        self
    }

    /// Append one entry per item under the same name; `None` items stay in place.
    pub fn array_arg<I, V>(mut self, name: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<String>,
    {
        self.params
            .extend(values.into_iter().map(|value| (name, value.map(Into::into))));
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn params(&self) -> &[(&'static str, Option<String>)] {
        &self.params
    }

    /// First value for `name`, if present and non-null.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(param, _)| *param == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn values(&self, name: &str) -> Vec<Option<&str>> {
        self.params
            .iter()
            .filter(|(param, _)| *param == name)
            .map(|(_, value)| value.as_deref())
            .collect()
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|(param, _)| *param == name)
    }

    /// Distinct parameter names in first-seen order.
    pub fn param_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for (name, _) in &self.params {
            if !names.contains(name) {
                names.push(*name);
            }
        }
        names
    }
}

impl fmt::Debug for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<(&str, Option<&str>)> = self
            .params
            .iter()
            .map(|(name, value)| {
                let shown = if SENSITIVE_PARAMS.contains(name) {
                    value.as_ref().map(|_| "<redacted>")
                } else {
                    value.as_deref()
                };
                (*name, shown)
            })
            .collect();
        f.debug_struct("RemoteCall")
            .field("operation", &self.operation)
            .field("method", &self.method)
            .field("params", &params)
            .finish()
    }
}
