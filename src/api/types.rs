//! Purpose: Records returned by the web service and the login credential value.
//! Exports: `PathwayInfo`, `WsPathway`, `PathwayHistory`, `HistoryEntry`, `SearchResult`,
//!          `SearchField`, `CurationTag`, `CurationTagHistory`, `Auth`.
//! Role: Pass-through value types; decoding tolerates the service's loose JSON typing.
//! Invariants: Array fields are never absent: missing or null arrays decode as empty.
//! Invariants: Revisions decode from either numbers or numeric strings; blank means 0.
use crate::core::error::Error;
use crate::core::gpml::{self, Pathway};
use crate::core::timestamp::timestamp_to_date;
use serde::Deserialize;
use std::fmt;
use time::OffsetDateTime;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct PathwayInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default, deserialize_with = "de::revision")]
    pub revision: u32,
}

/// A pathway with its GPML payload.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct WsPathway {
    #[serde(flatten)]
    pub info: PathwayInfo,
    #[serde(default)]
    pub gpml: String,
}

impl WsPathway {
    pub fn to_pathway(&self) -> Result<Pathway, Error> {
        gpml::read_from_xml(&self.gpml)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct PathwayHistory {
    #[serde(flatten)]
    pub info: PathwayInfo,
    #[serde(default, deserialize_with = "de::array")]
    pub history: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "de::revision")]
    pub revision: u32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn time(&self) -> Result<OffsetDateTime, Error> {
        timestamp_to_date(&self.timestamp)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(flatten)]
    pub info: PathwayInfo,
    #[serde(default, deserialize_with = "de::score")]
    pub score: f64,
    #[serde(default, deserialize_with = "de::array")]
    pub fields: Vec<SearchField>,
}

impl SearchResult {
    pub fn field(&self, name: &str) -> Option<&SearchField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A matched index field (e.g. `graphId`) and its values.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct SearchField {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_list")]
    pub values: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurationTag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub pathway: PathwayInfo,
    #[serde(default, deserialize_with = "de::revision")]
    pub revision: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub time_modified: String,
    #[serde(default)]
    pub user_modified: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurationTagHistory {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub pathway_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub time: String,
}

/// Credential returned by `login`; every write operation takes one explicitly.
#[derive(Clone, Eq, PartialEq)]
pub struct Auth {
    user: String,
    key: String,
}

impl Auth {
    pub fn new(user: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            key: key.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("user", &self.user)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Reply of write calls that carry no payload. An absent flag means success.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub(crate) struct WriteStatus {
    #[serde(default, deserialize_with = "de::flag")]
    pub(crate) success: Option<bool>,
}

impl WriteStatus {
    pub(crate) fn failed(&self) -> bool {
        self.success == Some(false)
    }
}

/// Collapse a missing or null remote array into an empty one.
pub(crate) fn remote_array<T>(items: Option<Vec<T>>) -> Vec<T> {
    items.unwrap_or_default()
}

pub(crate) mod de {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Integer(u64),
        Float(f64),
        Text(String),
    }

    pub(crate) fn revision<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(0),
            Some(NumberOrText::Integer(value)) => u32::try_from(value).map_err(D::Error::custom),
            Some(NumberOrText::Float(value)) => Err(D::Error::custom(format!(
                "revision must be an integer, got {value}"
            ))),
            Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(0),
            Some(NumberOrText::Text(text)) => text.trim().parse().map_err(D::Error::custom),
        }
    }

    pub(crate) fn score<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(0.0),
            Some(NumberOrText::Integer(value)) => Ok(value as f64),
            Some(NumberOrText::Float(value)) => Ok(value),
            Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(0.0),
            Some(NumberOrText::Text(text)) => text.trim().parse().map_err(D::Error::custom),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagValue {
        Bool(bool),
        Integer(i64),
        Float(f64),
        Text(String),
    }

    /// Booleans arrive as `true`, `"true"`, `1` or `"1"` depending on the deployment.
    pub(crate) fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<FlagValue>::deserialize(deserializer)? {
            None => Ok(None),
            Some(FlagValue::Bool(value)) => Ok(Some(value)),
            Some(FlagValue::Integer(value)) => Ok(Some(value != 0)),
            Some(FlagValue::Float(value)) => Ok(Some(value != 0.0)),
            Some(FlagValue::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" | "1" | "yes" => Ok(Some(true)),
                "false" | "0" | "no" => Ok(Some(false)),
                other => Err(D::Error::custom(format!("expected a boolean, got {other:?}"))),
            },
        }
    }

    pub(crate) fn array<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Option::<Vec<T>>::deserialize(deserializer).map(super::remote_array)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    /// Single-valued fields arrive as a bare string.
    pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::One(value)) => vec![value],
            Some(OneOrMany::Many(values)) => values,
        })
    }
}
