//! # Gantry Manifest Errors
//!
//! [`ConfigError`] covers reading, parsing and checking a system manifest.
//! Wiring problems that only show up once the system is assembled (cycles,
//! dangling dependencies) are reported by the lifecycle engine instead.
use std::path::PathBuf;

use thiserror::Error;

use crate::component::{BoxError, Key};
use crate::lifecycle::error::LifecycleError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading manifest '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse {format} manifest: {source}")]
    Parse {
        format: String,
        #[source]
        source: BoxError,
    },

    #[error("Component key '{0}' appears more than once in the manifest")]
    DuplicateKey(Key),

    #[error("Manifest entry {0} has an empty component key")]
    EmptyKey(usize),

    #[error("Invalid dependencies for component '{key}': {source}")]
    Dependencies {
        key: Key,
        #[source]
        source: LifecycleError,
    },
}
