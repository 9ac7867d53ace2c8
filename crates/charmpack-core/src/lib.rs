//! charmpack-core - Configuration, environment and error types
//!
//! This crate provides the types shared by every stage of the packaging
//! pipeline:
//! - [`ProjectConfig`] and [`ProjectKind`] describing what is being packed
//! - [`Environment`] for snap, developer-mode and managed-mode detection
//! - [`PackError`] with the user-facing error messages

mod config;
mod error;

pub mod env;

pub use config::{BundlePart, CONFIG_FILE, Parts, Project, ProjectConfig, ProjectKind};
pub use env::Environment;
pub use error::{PackError, PackResult};

/// Log levels understood by the console renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}
