//! Server configuration, startup guard, and MCP runtime.
pub mod config;
pub mod guard;
pub mod runtime;
