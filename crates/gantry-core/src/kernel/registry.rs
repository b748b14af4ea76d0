use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::{BoxError, ComponentRef};
use crate::config::ComponentConfig;
use crate::kernel::component::{Noop, Service};
use crate::kernel::constants::{KIND_NOOP, KIND_SERVICE};
use crate::kernel::error::{Error, Result};

/// Builds a component from its manifest entry
pub type ComponentFactory =
    Arc<dyn Fn(&ComponentConfig) -> std::result::Result<ComponentRef, BoxError> + Send + Sync>;

/// Maps manifest `kind` names to component factories
#[derive(Clone, Default)]
pub struct KindRegistry {
    factories: HashMap<String, ComponentFactory>,
}

impl KindRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `noop` and `service` already registered
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        registry.insert(KIND_NOOP, |config| {
            Ok(Arc::new(Noop::new(config.key.clone())) as ComponentRef)
        });
        registry.insert(KIND_SERVICE, |config| {
            Ok(Arc::new(Service::from_config(config)) as ComponentRef)
        });
        registry
    }

    /// Register a factory under `kind`. Fails if the kind is taken.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&ComponentConfig) -> std::result::Result<ComponentRef, BoxError>
            + Send
            + Sync
            + 'static,
    {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            return Err(Error::DuplicateKind(kind));
        }
        log::debug!("Registering component kind '{}'", kind);
        self.insert(kind, factory);
        Ok(())
    }

    fn insert<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&ComponentConfig) -> std::result::Result<ComponentRef, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kind names, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build the component for a manifest entry
    pub fn build(&self, config: &ComponentConfig) -> Result<ComponentRef> {
        let factory = self.factories.get(&config.kind).ok_or_else(|| Error::UnknownKind {
            key: config.key.clone(),
            kind: config.kind.clone(),
        })?;
        factory(config).map_err(|source| Error::ComponentConstruction {
            key: config.key.clone(),
            kind: config.kind.clone(),
            source,
        })
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
