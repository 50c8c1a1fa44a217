//! Shared library modules providing error types, HTTP and file helpers, and telemetry initialization.

pub mod errors;
pub mod files;
pub mod http;
pub mod telemetry;
