//! Packaging pipeline for charms and bundles
//!
//! This crate turns a project tree into a distributable zip archive:
//! - [`selector`] resolves mandatory files and prime patterns to concrete paths
//! - [`archive`] writes a directory tree into a reproducible zip
//! - [`manifest`] synthesizes the `manifest.yaml` build record
//! - [`bundle`] assembles the three for bundle projects
//!
//! # Bundle Structure
//!
//! ```text
//! my-bundle.zip
//! ├── bundle.yaml
//! ├── README.md
//! ├── manifest.yaml          # injected, never written to the project
//! └── <files selected by parts.bundle.prime>
//! ```
//!
//! # Example
//!
//! ```no_run
//! use charmpack_package::archive::build_zip;
//! use std::path::Path;
//!
//! // Pack a staged charm tree
//! build_zip(Path::new("my-charm.charm"), Path::new("build/stage"))?;
//! # Ok::<(), charmpack_core::PackError>(())
//! ```

pub mod archive;
pub mod bundle;
pub mod manifest;
pub mod selector;

pub use archive::{archive_path, build_zip};
pub use bundle::{BundleAssembler, BundleDescriptor};
pub use manifest::ManifestRecord;
pub use selector::{FileSpec, PatternKind, ResolvedFileSet, select};

/// Bundle descriptor file name, relative to the project root.
pub const BUNDLE_FILE: &str = "bundle.yaml";

/// Files every bundle must contain.
pub const MANDATORY_FILES: [&str; 2] = [BUNDLE_FILE, "README.md"];

/// Manifest file name within the archive.
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Extension of bundle archives.
pub const BUNDLE_EXTENSION: &str = "zip";

/// Extension of charm archives.
pub const CHARM_EXTENSION: &str = "charm";
