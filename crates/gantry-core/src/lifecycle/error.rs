//! # Gantry Lifecycle Errors
//!
//! Every failure the lifecycle engine can raise. All of them abort the
//! in-progress start/stop; none are retried and nothing is rolled back.
//!
//! [`LifecycleError::ComponentAction`] carries the component and the system
//! snapshot at the moment of failure so callers can drive their own cleanup.
//! Dependency errors raised during a traversal carry the snapshot too.
//! Use [`LifecycleError::without_components`] before logging it.
use std::error::Error as StdError;

use thiserror::Error;

use crate::component::{BoxError, Key, Managed};
use crate::system::SystemMap;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Invalid dependency declaration {spec}: expected a list of keys or a map of field to key")]
    InvalidDependencySpec { spec: String },

    #[error("Component '{key}' is missing from the system")]
    MissingComponent { key: Key },

    #[error("Component '{key}' is nil in the system; did its start or stop return nothing?")]
    NilComponent { key: Key },

    #[error("Component '{key}' depends on '{dependency}' (field '{field}'), which is missing from the system")]
    MissingDependency {
        key: Key,
        field: String,
        dependency: Key,
        /// The system at the moment injection failed, when raised mid-traversal
        system: Option<Box<SystemMap>>,
    },

    #[error("Component '{key}' depends on '{dependency}' (field '{field}'), which is nil; did its start or stop return nothing?")]
    NilDependency {
        key: Key,
        field: String,
        dependency: Key,
        system: Option<Box<SystemMap>>,
    },

    #[error("Dependency cycle detected: {}", .path.iter().map(Key::as_str).collect::<Vec<_>>().join(" -> "))]
    Cycle { path: Vec<Key> },

    #[error("Error in component '{key}' in system while calling {action}: {source}")]
    ComponentAction {
        action: String,
        key: Key,
        /// The component with its dependencies injected, as passed to the operation
        component: Option<Box<Managed>>,
        /// The system as it stood immediately before the failing step
        system: Option<Box<SystemMap>>,
        #[source]
        source: BoxError,
    },
}

impl LifecycleError {
    /// The component key the error is about, if any
    pub fn key(&self) -> Option<&Key> {
        match self {
            LifecycleError::MissingComponent { key }
            | LifecycleError::NilComponent { key }
            | LifecycleError::MissingDependency { key, .. }
            | LifecycleError::NilDependency { key, .. }
            | LifecycleError::ComponentAction { key, .. } => Some(key),
            LifecycleError::InvalidDependencySpec { .. } | LifecycleError::Cycle { .. } => None,
        }
    }

    /// Whether a component's own start/stop raised this error
    pub fn is_component_action(&self) -> bool {
        matches!(self, LifecycleError::ComponentAction { .. })
    }

    /// The system snapshot attached to a failure raised mid-traversal
    pub fn system(&self) -> Option<&SystemMap> {
        match self {
            LifecycleError::ComponentAction { system, .. }
            | LifecycleError::MissingDependency { system, .. }
            | LifecycleError::NilDependency { system, .. } => system.as_deref(),
            _ => None,
        }
    }

    /// Take ownership of the attached system snapshot
    pub fn into_system(self) -> Option<SystemMap> {
        match self {
            LifecycleError::ComponentAction { system, .. }
            | LifecycleError::MissingDependency { system, .. }
            | LifecycleError::NilDependency { system, .. } => system.map(|system| *system),
            _ => None,
        }
    }

    /// The failing component, dependencies injected
    pub fn component(&self) -> Option<&Managed> {
        match self {
            LifecycleError::ComponentAction { component, .. } => component.as_deref(),
            _ => None,
        }
    }

    /// Strip the component and system snapshots, keeping everything else.
    pub fn without_components(self) -> Self {
        match self {
            LifecycleError::ComponentAction {
                action,
                key,
                source,
                ..
            } => LifecycleError::ComponentAction {
                action,
                key,
                component: None,
                system: None,
                source,
            },
            LifecycleError::MissingDependency {
                key,
                field,
                dependency,
                ..
            } => LifecycleError::MissingDependency {
                key,
                field,
                dependency,
                system: None,
            },
            LifecycleError::NilDependency {
                key,
                field,
                dependency,
                ..
            } => LifecycleError::NilDependency {
                key,
                field,
                dependency,
                system: None,
            },
            other => other,
        }
    }
}

/// Whether `err`, or anything in its source chain, was raised by the lifecycle engine.
pub fn is_lifecycle_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.is::<LifecycleError>() {
            return true;
        }
        current = err.source();
    }
    false
}
