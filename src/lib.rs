//! taskbook library
//!
//! Exports the core components for testing and integration.

pub mod commands;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod format;
pub mod shell;
pub mod types;
