//! Error types for the packaging pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for packaging operations
pub type PackResult<T> = Result<T, PackError>;

/// Error type for packaging operations
///
/// The `Display` output of the user-facing variants is part of the command's
/// contract; tooling matches on these strings.
#[derive(Error, Debug)]
pub enum PackError {
    /// A charm-only option was given while packing a bundle
    #[error("The {flag} option is valid only when packing a charm")]
    InvalidOptionCombination { flag: &'static str },

    /// A mandatory file is absent from the project root
    #[error("Missing mandatory file: '{}'.", .0.display())]
    MissingMandatoryFile(PathBuf),

    /// A literal prime entry could not be staged
    #[error("Parts processing error: Failed to copy '{}': no such file or directory.", .0.display())]
    StagingFailure(PathBuf),

    /// The bundle descriptor is absent or is not a mapping
    #[error("Missing or invalid main bundle file: '{}'.", .0.display())]
    MissingOrInvalidDescriptor(PathBuf),

    /// The bundle descriptor has no usable name
    #[error(
        "Invalid bundle config; missing a 'name' field indicating the bundle's name in file '{}'.",
        .0.display()
    )]
    MissingRequiredField(PathBuf),

    /// Not running from the snap and developer mode is off
    #[error(
        "For a supported user experience, please use the Charmcraft snap. \
         For more information, please see https://juju.is/docs/sdk/setting-up-charmcraft"
    )]
    UnsupportedEnvironment,

    /// An archive name would place the archive outside its directory
    #[error("Invalid archive name '{0}': it must be a plain file name.")]
    InvalidArchiveName(String),

    /// A prime pattern is malformed or escapes the project
    #[error("Invalid file pattern '{pattern}': {reason}.")]
    InvalidPattern { pattern: String, reason: String },

    /// The project configuration file could not be loaded
    #[error("Invalid charmcraft.yaml file '{}': {reason}.", .path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    /// A boolean environment flag has an unrecognized value
    #[error("Invalid value '{value}' for environment variable {name}.")]
    InvalidEnvironmentFlag { name: &'static str, value: String },

    /// The external charm build orchestrator failed
    #[error("Charm build failed: {0}.")]
    BuildFailed(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking a directory tree
    #[error("I/O error: {0}")]
    Walk(#[from] walkdir::Error),

    /// ZIP archive error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PackError {
    /// Returns the process exit status for this error
    ///
    /// Problems the user can fix in the project or the invocation map to 1;
    /// environment problems to 2; failures of the underlying machinery to 3.
    pub fn exit_code(&self) -> u8 {
        match self {
            PackError::InvalidOptionCombination { .. }
            | PackError::MissingMandatoryFile(_)
            | PackError::StagingFailure(_)
            | PackError::MissingOrInvalidDescriptor(_)
            | PackError::MissingRequiredField(_)
            | PackError::InvalidArchiveName(_)
            | PackError::InvalidPattern { .. }
            | PackError::InvalidConfig { .. } => 1,
            PackError::UnsupportedEnvironment | PackError::InvalidEnvironmentFlag { .. } => 2,
            PackError::BuildFailed(_)
            | PackError::Io(_)
            | PackError::Walk(_)
            | PackError::Zip(_)
            | PackError::Yaml(_)
            | PackError::Json(_) => 3,
        }
    }
}


#[cfg(test)]
#[path = "error/error_parameterized_tests.rs"]
mod error_parameterized_tests;
