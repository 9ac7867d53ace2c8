//! Build metadata injected into every archive.
//!
//! The record lives in memory and is written only into a staging directory,
//! never into the project being packed.

use crate::MANIFEST_FILE;
use charmpack_core::PackResult;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Contents of `manifest.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Version of the tool that produced the archive.
    #[serde(rename = "charmcraft-version")]
    pub version: String,

    /// When packing started, ISO-8601 in UTC with a trailing `Z`.
    #[serde(rename = "charmcraft-started-at")]
    pub started_at: String,

    /// Additional fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl ManifestRecord {
    /// Create a record for a run that started at `started_at`.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: format_timestamp(started_at),
            extra: BTreeMap::new(),
        }
    }

    /// Add or replace an additional field.
    pub fn set(&mut self, key: &str, value: impl Into<serde_yaml::Value>) {
        self.extra.insert(key.to_string(), value.into());
    }

    pub fn to_yaml(&self) -> PackResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> PackResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Write the record as `manifest.yaml` inside `dir`.
    pub fn write_into(&self, dir: &Path) -> PackResult<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        std::fs::write(&path, self.to_yaml()?)?;
        Ok(path)
    }
}

/// Format a timestamp as ISO-8601 with a `Z` suffix.
///
/// Microseconds are shown only when non-zero, so a whole second renders as
/// `2020-03-14T00:00:00Z`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    let precision = if timestamp.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    timestamp.to_rfc3339_opts(precision, true)
}

#[cfg(test)]
#[path = "manifest/manifest_tests.rs"]
mod manifest_tests;
