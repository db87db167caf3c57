//! Sync request configuration.
//!
//! The payload arrives from the host as untrusted JSON. Parsing is lenient:
//! [`SyncConfiguration::parse_lenient`] never fails, it keeps every field it
//! can read and falls back to zero values for the rest, reporting each
//! problem in [`ParsedConfiguration::issues`].

use hb_error::{HbError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration for one sync invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfiguration {
    /// Credential profile selector
    pub profile: String,

    /// Provider region
    pub region: String,

    /// Page size bound (0 = provider default)
    pub max_keys: u32,

    /// Containers to scan; `None` triggers discovery
    pub buckets: Option<Vec<String>>,
}

/// Result of a lenient parse.
#[derive(Debug, Clone, Default)]
pub struct ParsedConfiguration {
    /// The configuration, with unreadable fields defaulted
    pub config: SyncConfiguration,

    /// One entry per field (or payload) that had to be defaulted
    pub issues: Vec<String>,
}

impl ParsedConfiguration {
    /// Whether any part of the payload was replaced by a zero value.
    pub fn is_defaulted(&self) -> bool {
        !self.issues.is_empty()
    }
}

impl SyncConfiguration {
    /// Create an empty configuration (discovery, provider default page size).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credential profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the page size bound.
    pub fn with_max_keys(mut self, max_keys: u32) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// Set an explicit container list.
    pub fn with_buckets<I, S>(mut self, buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buckets = Some(buckets.into_iter().map(Into::into).collect());
        self
    }

    /// Page size to request from the provider, `None` for its default.
    pub fn page_size(&self) -> Option<u32> {
        (self.max_keys > 0).then_some(self.max_keys)
    }

    /// Parse a payload strictly.
    pub fn parse(payload: &str) -> Result<Self> {
        serde_json::from_str(payload)
            .map_err(|e| HbError::Config(format!("Invalid sync payload: {e}")))
    }

    /// Parse a payload, defaulting whatever cannot be read.
    pub fn parse_lenient(payload: &str) -> ParsedConfiguration {
        if let Ok(config) = Self::parse(payload) {
            return ParsedConfiguration {
                config,
                issues: Vec::new(),
            };
        }

        let mut parsed = ParsedConfiguration::default();

        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                parsed.issues.push(format!("Invalid sync payload: {e}"));
                return parsed;
            }
        };

        let Value::Object(fields) = value else {
            parsed
                .issues
                .push("Sync payload is not a JSON object".to_string());
            return parsed;
        };

        parsed.config.profile = read_string(&fields, "profile", &mut parsed.issues);
        parsed.config.region = read_string(&fields, "region", &mut parsed.issues);
        parsed.config.max_keys = read_max_keys(&fields, &mut parsed.issues);
        parsed.config.buckets = read_buckets(&fields, &mut parsed.issues);

        parsed
    }
}

fn read_string(fields: &Map<String, Value>, name: &str, issues: &mut Vec<String>) -> String {
    match fields.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            issues.push(format!("Field '{name}' is not a string: {other}"));
            String::new()
        }
    }
}

fn read_max_keys(fields: &Map<String, Value>, issues: &mut Vec<String>) -> u32 {
    match fields.get("max_keys") {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(u32::MAX)
            } else {
                issues.push(format!("Field 'max_keys' is not a non-negative integer: {n}"));
                0
            }
        }
        Some(other) => {
            issues.push(format!("Field 'max_keys' is not an integer: {other}"));
            0
        }
    }
}

// Non-string entries become empty names so the container count is kept.
fn read_buckets(fields: &Map<String, Value>, issues: &mut Vec<String>) -> Option<Vec<String>> {
    match fields.get("buckets") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => s.clone(),
                    other => {
                        issues.push(format!("Field 'buckets[{i}]' is not a string: {other}"));
                        String::new()
                    }
                })
                .collect(),
        ),
        Some(other) => {
            issues.push(format!("Field 'buckets' is not an array: {other}"));
            None
        }
    }
}
