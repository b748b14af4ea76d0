//! # Gantry Components
//!
//! A component is any value holding runtime state that a [`SystemMap`](crate::system::SystemMap)
//! starts and stops in dependency order. This module defines the capability
//! surface the lifecycle engine needs from component authors and the plumbing
//! used to wire components together.
//!
//! ## Key Types:
//!
//! - **[`Component`]**: The start/stop capability trait. Both operations default
//!   to a pass-through, so a component only overrides what it needs.
//! - **[`Transition`]**: What a lifecycle operation produced: the same value, a
//!   replacement value, or nothing at all.
//! - **[`Key`]**: The identity of a component inside a system.
//! - **[`DependencySpec`]** / **[`Declaration`]**: How a component names the
//!   keys it depends on, and under which local field each one is injected.
//! - **[`Dependencies`]**: The resolved values handed to `start`/`stop`.
//! - **[`Managed`]**: A component together with its declaration and injected
//!   dependencies. Wiring metadata lives here, never inside the component.
pub mod dependency;
pub mod key;
pub mod managed;

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

pub use dependency::{Declaration, Dependencies, DependencySpec};
pub use key::Key;
pub use managed::Managed;

/// Boxed error returned by component operations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared handle to a component value. Components are immutable once stored;
/// every transition swaps in a new handle.
pub type ComponentRef = Arc<dyn Component>;

/// Upcast helper so trait objects can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Core lifecycle capability implemented by every component.
///
/// `start` and `stop` receive the component's dependencies already resolved
/// from the system and return a [`Transition`] describing the replacement
/// value. The defaults leave the component untouched.
#[async_trait]
pub trait Component: AsAny + Send + Sync + Debug {
    /// Begin operation. Dependencies are already injected.
    async fn start(&self, _dependencies: &Dependencies) -> Result<Transition, BoxError> {
        Ok(Transition::Unchanged)
    }

    /// Cease operation. Dependents have already been stopped.
    async fn stop(&self, _dependencies: &Dependencies) -> Result<Transition, BoxError> {
        Ok(Transition::Unchanged)
    }

    /// Report whether this component is currently started.
    ///
    /// `None` means the component does not track its own state; idempotent
    /// systems then fall back to the system-level flag.
    fn is_started(&self) -> Option<bool> {
        None
    }
}

/// Result of a lifecycle operation on a single component.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Keep the current value.
    Unchanged,
    /// Replace the component with a new value.
    Replace(ComponentRef),
    /// The operation produced no value. The key stays in the system but holds nothing.
    Nil,
}

impl Transition {
    /// Wrap a concrete component as a replacement.
    pub fn replace<C: Component>(component: C) -> Self {
        Transition::Replace(Arc::new(component))
    }
}

/// Downcast a component trait object to its concrete type.
pub fn downcast_ref<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

// Test module declaration
#[cfg(test)]
mod tests;
