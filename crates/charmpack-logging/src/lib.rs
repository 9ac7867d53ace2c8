//! charmpack-logging - Terminal rendering for tracing events
//!
//! This crate provides:
//! - [`ConsoleLayer`], a tracing layer that prints user-facing messages verbatim
//! - [`init_logging`] to install it, optionally alongside a log file
//! - [`LogCapture`] for asserting on emitted messages in tests

mod capture;
mod layer;

pub use capture::{CapturedRecord, LogCapture};
pub use charmpack_core::LogLevel;
pub use layer::{ConsoleLayer, init_logging};
