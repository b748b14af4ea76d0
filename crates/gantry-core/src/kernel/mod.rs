//! # Gantry Kernel
//!
//! Turns a [`SystemManifest`](crate::config::SystemManifest) into a running
//! system.
//!
//! - **[`Application`]**: Builds a [`SystemMap`](crate::system::SystemMap)
//!   from a manifest and drives start, stop and recovery after a failed start.
//! - **[`KindRegistry`]**: Maps manifest `kind` names to component factories.
//!   [`KindRegistry::with_builtin_kinds`] provides `noop` and `service`.
//! - **[`Error`]**: The crate-wide error, wrapping lifecycle and manifest
//!   errors, with its `Result` alias.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;
pub mod registry;

pub use bootstrap::Application;
pub use component::{Noop, Service};
pub use error::{Error, Result};
pub use registry::{ComponentFactory, KindRegistry};
