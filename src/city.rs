use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned by the local store.
///
/// json-server hands out either strings or integers depending on its version,
/// so both are accepted and kept as text.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CityId(String);

impl CityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => CityId(s),
            Raw::Number(n) => CityId(n.to_string()),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CityRecord {
    /// Only present for records persisted in the local store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CityId>,

    pub name: String,

    pub temperature: f64,

    pub condition: String,

    pub humidity: u32,
}

impl CityRecord {
    /// Case-insensitive match against an already-normalized lookup key.
    pub fn matches(&self, key: &str) -> bool {
        self.name.to_lowercase() == key
    }
}

/// Body of a create request: a record without an identifier.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewCity {
    pub name: String,
    pub temperature: f64,
    pub condition: String,
    pub humidity: u32,
}

/// Body of a partial update. Only supplied fields are serialized, so the
/// store leaves the rest untouched.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<u32>,
}

impl CityPatch {
    pub fn apply_to(&self, record: &mut CityRecord) {
        if let Some(temperature) = self.temperature {
            record.temperature = temperature;
        }
        if let Some(ref condition) = self.condition {
            record.condition = condition.clone();
        }
        if let Some(humidity) = self.humidity {
            record.humidity = humidity;
        }
    }
}

/// Where a resolved record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Local,
    Remote,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local => f.write_str("local store"),
            Source::Remote => f.write_str("weather service"),
        }
    }
}

/// Lookup keys are trimmed and lowercased everywhere.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
