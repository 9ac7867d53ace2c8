//! Project configuration loaded from `charmcraft.yaml`

use crate::{PackError, PackResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "charmcraft.yaml";

/// The kind of deliverable a project produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Built by the external orchestrator, then archived
    Charm,
    /// Assembled locally from `bundle.yaml` and declared files
    Bundle,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::Charm => write!(f, "charm"),
            ProjectKind::Bundle => write!(f, "bundle"),
        }
    }
}

/// Facts about the project being packed, fixed for the whole invocation
#[derive(Debug, Clone)]
pub struct Project {
    /// Absolute path to the project root
    pub dirpath: PathBuf,

    /// Whether a `charmcraft.yaml` was found
    pub config_provided: bool,

    /// When the invocation started (recorded in the manifest)
    pub started_at: DateTime<Utc>,
}

/// The `parts` section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parts {
    #[serde(default)]
    pub bundle: BundlePart,
}

/// Settings for the bundle part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlePart {
    /// Extra files to include, as literal paths or glob patterns
    #[serde(default)]
    pub prime: Vec<String>,
}

/// On-disk shape of `charmcraft.yaml`
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "type")]
    kind: ProjectKind,

    #[serde(default)]
    parts: Parts,
}

/// Resolved project configuration
///
/// `kind` is `None` when no configuration file was provided; the pack command
/// then defaults to building a charm.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub kind: Option<ProjectKind>,
    pub project: Project,
    pub parts: Parts,
}

impl ProjectConfig {
    /// Load the configuration for the project rooted at `dir`
    ///
    /// A missing `charmcraft.yaml` is not an error; it yields an unresolved
    /// configuration with `config_provided` unset.
    pub fn load(dir: impl AsRef<Path>, started_at: DateTime<Utc>) -> PackResult<Self> {
        let dirpath = std::path::absolute(dir.as_ref())?;
        let config_path = dirpath.join(CONFIG_FILE);

        if !config_path.is_file() {
            return Ok(Self::unconfigured(dirpath, started_at));
        }

        let content = std::fs::read_to_string(&config_path)?;
        let parsed: ConfigFile =
            serde_yaml::from_str(&content).map_err(|e| PackError::InvalidConfig {
                path: config_path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            kind: Some(parsed.kind),
            project: Project {
                dirpath,
                config_provided: true,
                started_at,
            },
            parts: parsed.parts,
        })
    }

    /// Configuration for a project without a `charmcraft.yaml`
    pub fn unconfigured(dirpath: impl Into<PathBuf>, started_at: DateTime<Utc>) -> Self {
        Self {
            kind: None,
            project: Project {
                dirpath: dirpath.into(),
                config_provided: false,
                started_at,
            },
            parts: Parts::default(),
        }
    }

    /// Configuration of the given kind, as if a minimal file declared it
    pub fn with_kind(
        kind: ProjectKind,
        dirpath: impl Into<PathBuf>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: Some(kind),
            project: Project {
                dirpath: dirpath.into(),
                config_provided: true,
                started_at,
            },
            parts: Parts::default(),
        }
    }

    /// Replace the bundle prime patterns
    #[must_use]
    pub fn prime<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parts.bundle.prime = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// The project root
    pub fn project_dir(&self) -> &Path {
        &self.project.dirpath
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "config/config_parameterized_tests.rs"]
mod config_parameterized_tests;
