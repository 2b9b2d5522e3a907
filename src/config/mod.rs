//! Configuration module for FinGrid
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FinGridPaths;
pub use settings::Settings;
