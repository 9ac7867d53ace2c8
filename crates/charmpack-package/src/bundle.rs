//! Bundle packing.
//!
//! The [`BundleAssembler`] drives the whole local path: read and check
//! `bundle.yaml`, select the files, stage them together with a fresh
//! manifest in a scratch directory, and zip that directory into
//! `<name>.zip` in the project root.

use crate::archive::{archive_path, build_zip};
use crate::manifest::ManifestRecord;
use crate::selector::{self, FileSpec};
use crate::{BUNDLE_EXTENSION, BUNDLE_FILE, MANDATORY_FILES};
use charmpack_core::{PackError, PackResult, ProjectConfig};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The parsed `bundle.yaml`.
#[derive(Debug, Clone)]
pub struct BundleDescriptor {
    path: PathBuf,
    name: String,
    content: Mapping,
}

impl BundleDescriptor {
    /// Read and check `bundle.yaml` in `root`.
    ///
    /// The file must parse to a mapping with a non-empty string `name`.
    pub fn load(root: &Path) -> PackResult<Self> {
        let path = root.join(BUNDLE_FILE);

        let content = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_yaml::from_str::<Value>(&text).ok())
            .and_then(|value| match value {
                Value::Mapping(mapping) => Some(mapping),
                _ => None,
            })
            .ok_or_else(|| PackError::MissingOrInvalidDescriptor(path.clone()))?;

        let name = match content.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
            _ => return Err(PackError::MissingRequiredField(path)),
        };

        Ok(Self {
            path,
            name,
            content,
        })
    }

    /// The bundle's name; also the archive's file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the descriptor file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Any other top-level field of the descriptor.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.content.get(key)
    }
}

/// Packs a bundle project into `<name>.zip`.
///
/// # Example
///
/// ```no_run
/// use charmpack_core::{ProjectConfig, ProjectKind};
/// use charmpack_package::BundleAssembler;
///
/// let config = ProjectConfig::with_kind(ProjectKind::Bundle, "/path/to/bundle", chrono::Utc::now());
/// let archive = BundleAssembler::new(&config).assemble()?;
/// # Ok::<(), charmpack_core::PackError>(())
/// ```
pub struct BundleAssembler<'a> {
    config: &'a ProjectConfig,
    mandatory: Vec<String>,
}

impl<'a> BundleAssembler<'a> {
    /// Create an assembler requiring the standard mandatory files.
    #[must_use]
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self {
            config,
            mandatory: MANDATORY_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Replace the set of files that must be present.
    #[must_use]
    pub fn with_mandatory_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory = files.into_iter().map(Into::into).collect();
        self
    }

    /// Build the bundle archive and return its path.
    pub fn assemble(&self) -> PackResult<PathBuf> {
        let root = self.config.project_dir();
        let descriptor = BundleDescriptor::load(root)?;
        let zip_path = archive_path(root, descriptor.name(), BUNDLE_EXTENSION)?;
        debug!("Packing bundle '{}'", descriptor.name());

        let spec = FileSpec::new()
            .mandatory(&self.mandatory)
            .extra(&self.config.parts.bundle.prime);
        let files = selector::select(root, &spec)?;

        // Removed on drop, whichever way this function exits.
        let staging = tempfile::Builder::new()
            .prefix("charmpack-bundle-")
            .tempdir()?;
        selector::stage(root, &files, staging.path())?;
        ManifestRecord::new(self.config.project.started_at).write_into(staging.path())?;

        build_zip(&zip_path, staging.path())?;

        info!("Created '{}'.", zip_path.display());
        Ok(zip_path)
    }
}
