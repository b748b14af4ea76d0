//! Built-in component kinds available to every manifest.
use async_trait::async_trait;

use crate::component::{BoxError, Component, Dependencies, Key, Transition};
use crate::config::ComponentConfig;
use crate::kernel::constants::{SETTING_FAIL_ON_START, SETTING_FAIL_ON_STOP};

/// Does nothing on start or stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Noop {
    key: Key,
}

impl Noop {
    pub fn new(key: impl Into<Key>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }
}

impl Component for Noop {}

/// Service placeholder that tracks whether it is running.
///
/// Settings: `fail_on_start`, `fail_on_stop` (both default `false`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    key: Key,
    running: bool,
    fail_on_start: bool,
    fail_on_stop: bool,
    /// Dependency fields seen on the last transition
    wired: Vec<String>,
}

impl Service {
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            running: false,
            fail_on_start: false,
            fail_on_stop: false,
            wired: Vec::new(),
        }
    }

    pub fn from_config(config: &ComponentConfig) -> Self {
        Self {
            fail_on_start: config.setting_or(SETTING_FAIL_ON_START, false),
            fail_on_stop: config.setting_or(SETTING_FAIL_ON_STOP, false),
            ..Self::new(config.key.clone())
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn wired(&self) -> &[String] {
        &self.wired
    }

    fn transition(&self, running: bool, dependencies: &Dependencies) -> Transition {
        Transition::replace(Service {
            running,
            wired: dependencies.fields().map(String::from).collect(),
            ..self.clone()
        })
    }
}

#[async_trait]
impl Component for Service {
    async fn start(&self, dependencies: &Dependencies) -> Result<Transition, BoxError> {
        if self.fail_on_start {
            return Err(format!("service '{}' failed to start", self.key).into());
        }
        log::info!("Service '{}' started", self.key);
        Ok(self.transition(true, dependencies))
    }

    async fn stop(&self, dependencies: &Dependencies) -> Result<Transition, BoxError> {
        if self.fail_on_stop {
            return Err(format!("service '{}' failed to stop", self.key).into());
        }
        log::info!("Service '{}' stopped", self.key);
        Ok(self.transition(false, dependencies))
    }

    fn is_started(&self) -> Option<bool> {
        Some(self.running)
    }
}
