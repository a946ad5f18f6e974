//! # Core Module
//!
//! Configuration and the explicit context object the synchronization
//! engine is constructed with.
//!
//! ## Organization
//!
//! - **Config**: engine settings, loadable from TOML or RON
//! - **Context**: asset locations, random source, active configuration

pub mod config;
pub mod context;

pub use config::{Config, ConfigError, EngineConfig};
pub use context::SyncContext;
