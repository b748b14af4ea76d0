//! # Gantry Kernel Errors
//!
//! [`Error`] aggregates the subsystem errors ([`LifecycleError`],
//! [`ConfigError`]) with the failures of bootstrapping an application from a
//! manifest.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::component::{BoxError, Key};
use crate::config::error::ConfigError;
use crate::lifecycle::error::LifecycleError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed lifecycle engine error
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Reading or checking the manifest failed
    #[error("Manifest error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown kind '{kind}' for component '{key}'")]
    UnknownKind { key: Key, kind: String },

    #[error("Kind '{0}' is already registered")]
    DuplicateKind(String),

    /// A kind factory refused its settings
    #[error("Failed to build component '{key}' of kind '{kind}': {source}")]
    ComponentConstruction {
        key: Key,
        kind: String,
        #[source]
        source: BoxError,
    },

    #[error("Application error during {phase}: {message}")]
    Application {
        phase: ApplicationPhase,
        message: String,
    },
}

/// Phase of the application lifecycle an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ApplicationPhase {
    #[error("start")]
    Start,
    #[error("stop")]
    Stop,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// The lifecycle error underneath, if any
    pub fn lifecycle(&self) -> Option<&LifecycleError> {
        match self {
            Error::Lifecycle(err) => Some(err),
            _ => None,
        }
    }

    /// Whether a component's own start/stop failed
    pub fn is_component_action(&self) -> bool {
        self.lifecycle().is_some_and(LifecycleError::is_component_action)
    }

    pub(crate) fn application(phase: ApplicationPhase, message: impl Into<String>) -> Self {
        Error::Application {
            phase,
            message: message.into(),
        }
    }
}
