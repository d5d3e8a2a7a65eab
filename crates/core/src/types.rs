use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Prefix for the one route emitted per distinct section
pub const SECTION_ROUTE_PREFIX: &str = "/kind/";

/// Tag naming what a list holds (`app`, `game`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListKind(String);

impl ListKind {
    /// Build a kind from a lowercase slug (`[a-z0-9-]+`)
    pub fn new(kind: impl Into<String>) -> Result<Self> {
        let kind = kind.into();
        if kind.is_empty() {
            return Err(Error::ConfigParse("List kind must not be empty".to_string()));
        }
        if !kind
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(Error::ConfigParse(format!(
                "Invalid list kind '{}': use lowercase letters, digits and '-'",
                kind
            )));
        }
        Ok(Self(kind))
    }

    pub fn app() -> Self {
        Self("app".to_string())
    }

    pub fn game() -> Self {
        Self("game".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default detail route for an entry of this kind, e.g. `/app/<slug>`.
    ///
    /// Route derivation never calls this; it only fills in `endpoint` for
    /// builders whose source omits one.
    pub fn entry_route(&self, slug: &str) -> String {
        format!("/{}/{}", self.0, slug)
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ListKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ListKind::new(value)
    }
}

impl From<ListKind> for String {
    fn from(kind: ListKind) -> Self {
        kind.0
    }
}

/// Where a list lives once materialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTarget {
    pub kind: ListKind,
    /// Destination file, relative to the project root
    pub path: PathBuf,
}

impl ListTarget {
    pub fn new(kind: ListKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Fields route derivation reads; everything else is opaque
const REQUIRED_FIELDS: [&str; 3] = ["slug", "endpoint", "section"];

/// One item of a materialized list.
///
/// Only `slug`, `endpoint` and `section.slug` mean anything to the pipeline.
/// The whole object is kept as parsed, key order included, so a list
/// serializes back exactly as its builder produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Entry {
    fields: Map<String, Value>,
}

impl Entry {
    pub fn new(
        slug: impl Into<String>,
        endpoint: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        let mut section_fields = Map::new();
        section_fields.insert("slug".to_string(), Value::String(section.into()));

        let mut fields = Map::new();
        fields.insert("slug".to_string(), Value::String(slug.into()));
        fields.insert("endpoint".to_string(), Value::String(endpoint.into()));
        fields.insert("section".to_string(), Value::Object(section_fields));
        Self { fields }
    }

    /// Append an opaque attribute. `slug`, `endpoint` and `section` are left
    /// as they are.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !REQUIRED_FIELDS.contains(&key.as_str()) {
            self.fields.insert(key, value.into());
        }
        self
    }

    pub fn slug(&self) -> &str {
        self.str_field("slug")
    }

    /// Canonical route of the entry's detail page
    pub fn endpoint(&self) -> &str {
        self.str_field("endpoint")
    }

    pub fn section_slug(&self) -> &str {
        self.fields
            .get("section")
            .and_then(|s| s.get("slug"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    // Checked on construction, so the default is unreachable
    fn str_field(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

impl TryFrom<Map<String, Value>> for Entry {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> std::result::Result<Self, String> {
        for key in ["slug", "endpoint"] {
            match fields.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => return Err(format!("field `{}` must be a string", key)),
                None => return Err(format!("missing field `{}`", key)),
            }
        }

        match fields.get("section") {
            Some(Value::Object(section)) => match section.get("slug") {
                Some(Value::String(_)) => {}
                Some(_) => return Err("field `section.slug` must be a string".to_string()),
                None => return Err("missing field `section.slug`".to_string()),
            },
            Some(_) => return Err("field `section` must be an object".to_string()),
            None => return Err("missing field `section`".to_string()),
        }

        Ok(Self { fields })
    }
}

impl From<Entry> for Map<String, Value> {
    fn from(entry: Entry) -> Self {
        entry.fields
    }
}
