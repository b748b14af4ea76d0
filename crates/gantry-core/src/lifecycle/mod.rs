//! # Gantry Lifecycle Engine
//!
//! Walks a system in dependency order, injecting each component's
//! dependencies from the current system state before invoking an operation
//! on it and writing the result back.
//!
//! - **[`executor`]**: [`update_system`] (dependencies first) and
//!   [`update_system_reverse`] (dependents first).
//! - **[`gate`]**: Selection predicates, including the idempotence gate.
//! - **[`error`]**: [`LifecycleError`](error::LifecycleError) and helpers for
//!   inspecting and redacting it.
pub mod error;
pub mod executor;
pub mod gate;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::component::{BoxError, Component, Dependencies, Transition};

pub use error::{is_lifecycle_error, LifecycleError};
pub use executor::{update_system, update_system_reverse};
pub use gate::Gate;

/// An operation applied to each selected component during a traversal.
///
/// Extra arguments an operation needs are carried as fields of the
/// implementing type.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Name used in logs and in [`LifecycleError::ComponentAction`]
    fn name(&self) -> &str;

    async fn apply(
        &self,
        component: &dyn Component,
        dependencies: &Dependencies,
    ) -> Result<Transition, BoxError>;
}

/// The two built-in lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    /// Whether a component is started once this action has been applied
    pub fn target_state(self) -> bool {
        matches!(self, Action::Start)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start => write!(f, "start"),
            Action::Stop => write!(f, "stop"),
        }
    }
}

#[async_trait]
impl Operation for Action {
    fn name(&self) -> &str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
        }
    }

    async fn apply(
        &self,
        component: &dyn Component,
        dependencies: &Dependencies,
    ) -> Result<Transition, BoxError> {
        match self {
            Action::Start => component.start(dependencies).await,
            Action::Stop => component.stop(dependencies).await,
        }
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
