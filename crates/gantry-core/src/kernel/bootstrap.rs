use std::path::Path;

use crate::component::{Key, Managed};
use crate::config::SystemManifest;
use crate::kernel::constants;
use crate::kernel::error::{ApplicationPhase, Error, Result};
use crate::kernel::registry::KindRegistry;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::{Action, Gate};
use crate::system::SystemMap;

/// A named system built from a manifest, driven through start and stop.
///
/// Only the components present when the application is created take part in
/// start and stop. Disabled manifest entries stay in the system as nil
/// entries, so depending on one is reported as a nil dependency.
#[derive(Debug)]
pub struct Application {
    name: String,
    system: SystemMap,
    /// Keys driven by start and stop, in insertion order
    keys: Vec<Key>,
}

impl Application {
    /// Wrap an already assembled system
    pub fn new(name: impl Into<String>, system: SystemMap) -> Self {
        let keys = system
            .iter()
            .filter(|(_, slot)| slot.is_some())
            .map(|(key, _)| key.clone())
            .collect();
        Self {
            name: name.into(),
            system,
            keys,
        }
    }

    /// Build the system described by `manifest`, one component per entry, in manifest order.
    pub fn from_manifest(manifest: &SystemManifest, registry: &KindRegistry) -> Result<Self> {
        log::info!(
            "Initializing {} v{}: system '{}'",
            constants::APP_NAME,
            constants::APP_VERSION,
            manifest.system.name
        );
        manifest.validate()?;

        let mut system = SystemMap::new().with_gate(manifest.gate());
        for config in &manifest.components {
            if !config.enabled {
                log::debug!("Component '{}' is disabled", config.key);
                system.insert_nil(config.key.clone());
                continue;
            }
            let mut managed = Managed::from_ref(registry.build(config)?);
            if let Some(spec) = config.dependency_spec()? {
                managed = managed.using(spec);
            }
            log::debug!("Built component '{}' of kind '{}'", config.key, config.kind);
            system.insert(config.key.clone(), managed);
        }

        Ok(Self::new(manifest.system.name.clone(), system))
    }

    /// Load a manifest file and build its system
    pub fn from_path(path: impl AsRef<Path>, registry: &KindRegistry) -> Result<Self> {
        let manifest = SystemManifest::from_path(path)?;
        Self::from_manifest(&manifest, registry)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system(&self) -> &SystemMap {
        &self.system
    }

    pub fn into_system(self) -> SystemMap {
        self.system
    }

    /// Keys driven by start and stop
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn is_started(&self) -> bool {
        self.system.is_started()
    }

    pub fn start_order(&self) -> Result<Vec<Key>> {
        Ok(self.system.order(&self.keys)?)
    }

    pub fn stop_order(&self) -> Result<Vec<Key>> {
        let mut order = self.start_order()?;
        order.reverse();
        Ok(order)
    }

    /// Check wiring without starting anything
    pub fn validate(&self) -> Result<()> {
        Ok(self.system.validate_keys(&self.keys)?)
    }

    /// Start the system and return the keys that were started, in order.
    ///
    /// Wiring is validated first. If the traversal fails part way, every
    /// component it already started is stopped again before the error is
    /// returned.
    pub async fn start(&mut self) -> Result<Vec<Key>> {
        if self.is_started() {
            return Err(Error::application(
                ApplicationPhase::Start,
                format!("system '{}' is already started", self.name),
            ));
        }
        self.validate()?;
        let planned = self.system.plan(Action::Start, &self.keys)?;
        log::info!("Starting system '{}'", self.name);

        match self.system.clone().start_keys(&self.keys).await {
            Ok(mut started) => {
                started.set_started(true);
                self.system = started;
                log::info!("System '{}' started", self.name);
                Ok(planned)
            }
            Err(err) => {
                log::error!("Failed to start system '{}': {}", self.name, err);
                Err(self.recover(&planned, err).await)
            }
        }
    }

    /// Stop the system and return the keys that were stopped, in order.
    ///
    /// On failure the partially stopped system is kept.
    pub async fn stop(&mut self) -> Result<Vec<Key>> {
        if !self.is_started() {
            return Err(Error::application(
                ApplicationPhase::Stop,
                format!("system '{}' is not started", self.name),
            ));
        }
        let planned = self.system.plan(Action::Stop, &self.keys)?;
        log::info!("Stopping system '{}'", self.name);

        match self.system.clone().stop_keys(&self.keys).await {
            Ok(mut stopped) => {
                stopped.set_started(false);
                self.system = stopped;
                log::info!("System '{}' stopped", self.name);
                Ok(planned)
            }
            Err(err) => {
                log::error!("Failed to stop system '{}': {}", self.name, err);
                if let Some(partial) = err.system() {
                    self.system = partial.clone();
                }
                Err(err.without_components().into())
            }
        }
    }

    /// Start the system, then stop it again.
    pub async fn run(&mut self) -> Result<()> {
        self.start().await?;
        log::info!("System '{}' running", self.name);
        self.stop().await?;
        Ok(())
    }

    /// Stop the components a failed start already invoked and keep the result.
    ///
    /// `planned` is the start plan; everything ahead of the failing key ran.
    async fn recover(&mut self, planned: &[Key], err: LifecycleError) -> Error {
        let Some(partial) = err.system().cloned() else {
            return err.into();
        };
        let started: Vec<Key> = planned
            .iter()
            .take_while(|key| Some(*key) != err.key())
            .filter(|key| partial.get(key).is_some())
            .cloned()
            .collect();
        log::info!(
            "Stopping {} component(s) started before the failure in '{}'",
            started.len(),
            self.name
        );

        let gate = partial.gate();
        match partial.with_gate(Gate::Always).stop_keys(&started).await {
            Ok(stopped) => self.system = stopped.with_gate(gate),
            Err(stop_err) => {
                log::error!(
                    "Failed to stop partially started system '{}': {}",
                    self.name,
                    stop_err
                );
                if let Some(remaining) = stop_err.into_system() {
                    self.system = remaining.with_gate(gate);
                }
            }
        }
        err.without_components().into()
    }
}
