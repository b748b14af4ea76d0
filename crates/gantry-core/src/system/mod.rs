//! # Gantry System Map
//!
//! [`SystemMap`] is the container: an insertion-ordered map from [`Key`] to
//! component, with aggregate `start`/`stop` implemented by the lifecycle
//! executor. Every operation consumes the system and returns a new one.
//!
//! A key may hold nothing ("nil"), which is distinct from the key being
//! absent. Nil entries appear when an operation returns [`Transition::Nil`]
//! or when a component is explicitly disabled.
use async_trait::async_trait;
use indexmap::IndexMap;

use crate::component::{
    BoxError, Component, ComponentRef, Dependencies, DependencySpec, Key, Managed, Transition,
    downcast_ref,
};
use crate::graph::{dependency_graph, topological_order};
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::{update_system, update_system_reverse, Action, Gate};

/// Ordered, keyed collection of components
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemMap {
    components: IndexMap<Key, Option<Managed>>,
    gate: Gate,
    started: bool,
}

impl SystemMap {
    /// Create an empty system
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<Key>, component: impl Into<Managed>) -> Self {
        self.insert(key, component);
        self
    }

    /// Set the selection gate used by `start`/`stop`
    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }

    /// Shorthand for `with_gate(Gate::Idempotent)`
    pub fn idempotent(self) -> Self {
        self.with_gate(Gate::Idempotent)
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    /// Insert a component, keeping the position of an existing key.
    pub fn insert(
        &mut self,
        key: impl Into<Key>,
        component: impl Into<Managed>,
    ) -> Option<Option<Managed>> {
        self.components.insert(key.into(), Some(component.into()))
    }

    /// Insert a key that holds nothing
    pub fn insert_nil(&mut self, key: impl Into<Key>) -> Option<Option<Managed>> {
        self.components.insert(key.into(), None)
    }

    /// Remove a key, preserving the order of the remaining keys
    pub fn remove(&mut self, key: &Key) -> Option<Option<Managed>> {
        self.components.shift_remove(key)
    }

    /// The component at `key`; `None` if absent or nil
    pub fn get(&self, key: &Key) -> Option<&Managed> {
        self.components.get(key).and_then(Option::as_ref)
    }

    /// Raw entry: `None` if absent, `Some(None)` if nil
    pub fn slot(&self, key: &Key) -> Option<Option<&Managed>> {
        self.components.get(key).map(Option::as_ref)
    }

    /// The component at `key`, downcast to its concrete type
    pub fn component<T: Component>(&self, key: &Key) -> Option<&T> {
        self.get(key).and_then(|managed| downcast_ref::<T>(managed.component()))
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.components.contains_key(key)
    }

    /// Whether `key` is present but holds nothing
    pub fn is_nil(&self, key: &Key) -> bool {
        matches!(self.components.get(key), Some(None))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.components.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, Option<&Managed>)> {
        self.components.iter().map(|(key, slot)| (key, slot.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether the last full `start`/`stop` left the system started
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub(crate) fn put(&mut self, key: Key, slot: Option<Managed>) {
        self.components.insert(key, slot);
    }

    pub(crate) fn set_started(&mut self, started: bool) {
        self.started = started;
    }

    fn key_vec(&self) -> Vec<Key> {
        self.components.keys().cloned().collect()
    }

    /// Attach dependency declarations to several components at once.
    ///
    /// Each named component must be present and non-nil.
    pub fn system_using<I, K>(mut self, declarations: I) -> Result<Self, LifecycleError>
    where
        I: IntoIterator<Item = (K, DependencySpec)>,
        K: Into<Key>,
    {
        for (key, spec) in declarations {
            let key = key.into();
            let managed = match self.components.get_mut(&key) {
                None => return Err(LifecycleError::MissingComponent { key }),
                Some(None) => return Err(LifecycleError::NilComponent { key }),
                Some(Some(managed)) => managed,
            };
            *managed = managed.clone().using(spec);
        }
        Ok(self)
    }

    /// A new system holding `keys` and everything they transitively depend on,
    /// in this system's insertion order.
    pub fn subsystem(&self, keys: &[Key]) -> Result<Self, LifecycleError> {
        if let Some(key) = keys.iter().find(|key| !self.contains_key(key)) {
            return Err(LifecycleError::MissingComponent { key: key.clone() });
        }
        let graph = dependency_graph(self, &self.key_vec())?;
        let keep = graph.transitive_dependencies(keys);
        let components = self
            .components
            .iter()
            .filter(|(key, _)| keep.contains(*key))
            .map(|(key, slot)| (key.clone(), slot.clone()))
            .collect();
        Ok(Self {
            components,
            gate: self.gate,
            started: self.started,
        })
    }

    /// Check the wiring without invoking any component: no cycles, no nil
    /// components, and every declared dependency present and non-nil.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        self.validate_keys(&self.key_vec())
    }

    /// Like [`validate`](Self::validate), limited to the components at `keys`.
    ///
    /// Entries outside `keys` may be nil; depending on one is still an error.
    pub fn validate_keys(&self, keys: &[Key]) -> Result<(), LifecycleError> {
        dependency_graph(self, keys)?;
        for key in keys {
            let managed = match self.slot(key) {
                None => return Err(LifecycleError::MissingComponent { key: key.clone() }),
                Some(None) => return Err(LifecycleError::NilComponent { key: key.clone() }),
                Some(Some(managed)) => managed,
            };
            for (field, dependency) in managed.declaration().iter() {
                match self.slot(dependency) {
                    None => {
                        return Err(LifecycleError::MissingDependency {
                            key: key.clone(),
                            field: field.clone(),
                            dependency: dependency.clone(),
                            system: None,
                        });
                    }
                    Some(None) => {
                        return Err(LifecycleError::NilDependency {
                            key: key.clone(),
                            field: field.clone(),
                            dependency: dependency.clone(),
                            system: None,
                        });
                    }
                    Some(Some(_)) => {}
                }
            }
        }
        Ok(())
    }

    /// The order `start` would visit components in
    pub fn start_order(&self) -> Result<Vec<Key>, LifecycleError> {
        self.order(&self.key_vec())
    }

    /// The order `stop` would visit components in
    pub fn stop_order(&self) -> Result<Vec<Key>, LifecycleError> {
        let mut order = self.start_order()?;
        order.reverse();
        Ok(order)
    }

    /// `keys` in dependency order, dependencies first
    pub fn order(&self, keys: &[Key]) -> Result<Vec<Key>, LifecycleError> {
        let graph = dependency_graph(self, keys)?;
        Ok(topological_order(&graph, keys)?.into_vec())
    }

    /// The components `action` would invoke among `keys`, in invocation order.
    ///
    /// Keys the gate skips are left out.
    pub fn plan(&self, action: Action, keys: &[Key]) -> Result<Vec<Key>, LifecycleError> {
        let mut order = self.order(keys)?;
        if action == Action::Stop {
            order.reverse();
        }
        let (gate, started) = (self.gate, self.started);
        order.retain(|key| {
            self.get(key)
                .is_some_and(|managed| gate.admits(action, managed, started))
        });
        Ok(order)
    }

    /// Start every component, dependencies first.
    pub async fn start(self) -> Result<Self, LifecycleError> {
        log::info!("Starting system ({} components)", self.len());
        let keys = self.key_vec();
        let mut system = self.start_keys(&keys).await?;
        system.set_started(true);
        log::info!("System started");
        Ok(system)
    }

    /// Stop every component, dependents first.
    pub async fn stop(self) -> Result<Self, LifecycleError> {
        log::info!("Stopping system ({} components)", self.len());
        let keys = self.key_vec();
        let mut system = self.stop_keys(&keys).await?;
        system.set_started(false);
        log::info!("System stopped");
        Ok(system)
    }

    /// Start only the components at `keys`. The system-level flag is unchanged.
    pub async fn start_keys(self, keys: &[Key]) -> Result<Self, LifecycleError> {
        let (gate, started) = (self.gate, self.started);
        update_system(self, keys, &Action::Start, move |managed: &Managed| {
            gate.admits(Action::Start, managed, started)
        })
        .await
    }

    /// Stop only the components at `keys`. The system-level flag is unchanged.
    pub async fn stop_keys(self, keys: &[Key]) -> Result<Self, LifecycleError> {
        let (gate, started) = (self.gate, self.started);
        update_system_reverse(self, keys, &Action::Stop, move |managed: &Managed| {
            gate.admits(Action::Stop, managed, started)
        })
        .await
    }
}

impl<K: Into<Key>> FromIterator<(K, Managed)> for SystemMap {
    fn from_iter<T: IntoIterator<Item = (K, Managed)>>(iter: T) -> Self {
        let mut system = SystemMap::new();
        for (key, managed) in iter {
            system.insert(key, managed);
        }
        system
    }
}

/// Systems nest: a system can be a component of a larger system.
#[async_trait]
impl Component for SystemMap {
    async fn start(&self, _dependencies: &Dependencies) -> Result<Transition, BoxError> {
        let started = self.clone().start().await?;
        Ok(Transition::replace(started))
    }

    async fn stop(&self, _dependencies: &Dependencies) -> Result<Transition, BoxError> {
        let stopped = self.clone().stop().await?;
        Ok(Transition::replace(stopped))
    }

    fn is_started(&self) -> Option<bool> {
        Some(self.started)
    }
}

impl From<SystemMap> for Managed {
    fn from(system: SystemMap) -> Self {
        let component: ComponentRef = std::sync::Arc::new(system);
        Managed::from_ref(component)
    }
}
