//! Execution environment detection
//!
//! Variables are read through an [`Environment`] snapshot rather than from the
//! process directly, so callers can evaluate any set of values.

use crate::{PackError, PackResult};
use std::collections::HashMap;
use std::path::PathBuf;

/// Snap name exported by snapd inside the charmcraft snap
pub const SNAP_NAME_VAR: &str = "SNAP_NAME";

/// Snap mount point exported by snapd
pub const SNAP_VAR: &str = "SNAP";

/// Developer-mode override
pub const DEVELOPER_VAR: &str = "CHARMCRAFT_DEVELOPER";

/// Set when running inside a managed build environment
pub const MANAGED_MODE_VAR: &str = "CHARMCRAFT_MANAGED_MODE";

const SNAP_NAME: &str = "charmcraft";

/// Home directory inside a managed environment
pub fn managed_home_path() -> PathBuf {
    PathBuf::from("/root")
}

/// Log file inside a managed environment
pub fn managed_log_path() -> PathBuf {
    PathBuf::from("/tmp/charmcraft.log")
}

/// Project directory inside a managed environment
pub fn managed_project_path() -> PathBuf {
    managed_home_path().join("project")
}

/// Snapshot of the variables and platform the pipeline runs under
#[derive(Debug, Clone)]
pub struct Environment {
    vars: HashMap<String, String>,
    os: String,
}

impl Environment {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
            os: std::env::consts::OS.to_string(),
        }
    }

    /// Build an environment from explicit variables and an OS name
    /// (as in `std::env::consts::OS`)
    pub fn from_vars<I, K, V>(vars: I, os: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            os: os.to_string(),
        }
    }

    /// Value of a variable, if set
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Whether the process runs from the charmcraft snap
    pub fn running_from_snap(&self) -> bool {
        self.var(SNAP_NAME_VAR) == Some(SNAP_NAME) && self.var(SNAP_VAR).is_some()
    }

    /// Whether the developer-mode override is set
    pub fn developer_mode(&self) -> PackResult<bool> {
        self.flag(DEVELOPER_VAR)
    }

    /// Whether the process runs inside a managed build environment
    pub fn managed_mode(&self) -> PackResult<bool> {
        self.flag(MANAGED_MODE_VAR)
    }

    /// Whether this is a supported platform and installation
    pub fn supported_environment(&self) -> bool {
        self.os == "linux" && self.running_from_snap()
    }

    /// Refuse to run outside a supported environment unless in developer mode
    pub fn ensure_supported(&self) -> PackResult<()> {
        if !self.supported_environment() && !self.developer_mode()? {
            return Err(PackError::UnsupportedEnvironment);
        }
        Ok(())
    }

    fn flag(&self, name: &'static str) -> PackResult<bool> {
        match self.var(name) {
            Some(value) => parse_flag(name, value),
            None => Ok(false),
        }
    }
}

/// Parse a boolean flag value, case-insensitively
pub fn parse_flag(name: &'static str, value: &str) -> PackResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(PackError::InvalidEnvironmentFlag {
            name,
            value: value.to_string(),
        }),
    }
}
