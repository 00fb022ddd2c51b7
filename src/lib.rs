use std::sync::OnceLock;

pub mod bundle;
pub mod bundle_index;
pub mod bundle_reader;
pub mod bundle_source;
pub mod commands;
pub mod error;

/// Application-level verbosity
pub static VERBOSE: OnceLock<bool> = OnceLock::new();
