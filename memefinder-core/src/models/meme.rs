use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_PRIMARY_PLATFORM: &str = "primary_platform";
pub const FIELD_SUMMARY: &str = "summary";
pub const FIELD_EVIDENCE_LINKS: &str = "evidence_links";
pub const FIELD_STARTED_AROUND: &str = "started_around";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_RAW_OUTPUT: &str = "raw_output";

/// One viral meme candidate as emitted by the analyst agent.
///
/// Backed by the JSON object the model produced so unknown keys pass through
/// untouched. Accessors are lenient about types because the model is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemeRecord(Map<String, Value>);

impl MemeRecord {
    /// Degraded record holding text that could not be parsed into records.
    pub fn fallback(raw: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(FIELD_RAW_OUTPUT.to_string(), Value::String(raw.into()));
        Self(map)
    }

    /// Trimmed title, empty when missing or not a string.
    pub fn title(&self) -> &str {
        self.str_field(FIELD_TITLE).map(str::trim).unwrap_or("")
    }

    pub fn primary_platform(&self) -> Option<&str> {
        self.str_field(FIELD_PRIMARY_PLATFORM)
    }

    pub fn summary(&self) -> Option<&str> {
        self.str_field(FIELD_SUMMARY)
    }

    pub fn started_around(&self) -> Option<&str> {
        self.str_field(FIELD_STARTED_AROUND)
    }

    pub fn evidence_links(&self) -> Vec<&str> {
        match self.0.get(FIELD_EVIDENCE_LINKS) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Tags in their original order. Scalars are stringified, nulls dropped,
    /// and a bare string counts as a single tag.
    pub fn tags(&self) -> Vec<String> {
        match self.0.get(FIELD_TAGS) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(tag)) => vec![tag.clone()],
            _ => Vec::new(),
        }
    }

    pub fn raw_output(&self) -> Option<&str> {
        self.str_field(FIELD_RAW_OUTPUT)
    }

    pub fn is_fallback(&self) -> bool {
        self.0.contains_key(FIELD_RAW_OUTPUT)
    }

    /// Copy of this record with `evidence_links` replaced.
    pub fn with_evidence_links(&self, links: Vec<String>) -> Self {
        let mut map = self.0.clone();
        map.insert(
            FIELD_EVIDENCE_LINKS.to_string(),
            Value::Array(links.into_iter().map(Value::String).collect()),
        );
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for MemeRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
