//! # Gantry Core
//!
//! Ordered startup and shutdown of interdependent, stateful components.
//! Components declare which other components they depend on; a
//! [`SystemMap`] starts them dependencies-first and stops them in reverse,
//! injecting each component's dependencies from the current system state
//! before invoking it.
//!
//! ```ignore
//! use gantry_core::{DependencySpec, Managed, SystemMap};
//!
//! let system = SystemMap::new()
//!     .with("db", Managed::new(Database::default()))
//!     .with("app", Managed::new(App::default()).using(DependencySpec::list(["db"])));
//! let system = system.start().await?;
//! let system = system.stop().await?;
//! ```
pub mod component;
pub mod config;
pub mod graph;
pub mod kernel;
pub mod lifecycle;
pub mod system;

// Re-export key public types for the binary and for component authors
pub use component::{
    BoxError, Component, ComponentRef, Declaration, Dependencies, DependencySpec, Key, Managed,
    Transition,
};
pub use config::SystemManifest;
pub use graph::{dependency_graph, topological_order, DependencyGraph};
pub use kernel::error::Error as KernelError;
pub use kernel::{Application, KindRegistry};
pub use lifecycle::{
    is_lifecycle_error, update_system, update_system_reverse, Action, Gate, LifecycleError,
    Operation,
};
pub use system::SystemMap;
