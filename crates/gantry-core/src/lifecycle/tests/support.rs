//! Shared test components that record every lifecycle call.
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::component::{BoxError, Component, Dependencies, Transition};

/// Records lifecycle calls in the order they happen
#[derive(Debug, Default)]
pub struct ExecutionTracker {
    calls: Mutex<Vec<String>>,
}

impl ExecutionTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

/// What a recorder does when a lifecycle operation reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    FailOnStart,
    FailOnStop,
    NilOnStart,
}

/// Component that records calls and tracks its own started state
#[derive(Debug, Clone)]
pub struct Recorder {
    pub name: &'static str,
    pub started: bool,
    pub behavior: Behavior,
    /// Dependency fields seen on the last call, with their started state
    pub seen: Vec<(String, bool)>,
    pub tracker: Arc<ExecutionTracker>,
}

impl Recorder {
    pub fn new(name: &'static str, tracker: &Arc<ExecutionTracker>) -> Self {
        Self {
            name,
            started: false,
            behavior: Behavior::Normal,
            seen: Vec::new(),
            tracker: Arc::clone(tracker),
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    fn observe(&self, dependencies: &Dependencies) -> Vec<(String, bool)> {
        dependencies
            .fields()
            .map(|field| {
                let started = dependencies
                    .get::<Recorder>(field)
                    .map(|dep| dep.started)
                    .unwrap_or(false);
                (field.to_string(), started)
            })
            .collect()
    }
}

#[async_trait]
impl Component for Recorder {
    async fn start(&self, dependencies: &Dependencies) -> Result<Transition, BoxError> {
        self.tracker.record(format!("start:{}", self.name)).await;
        match self.behavior {
            Behavior::FailOnStart => Err(format!("{} refused to start", self.name).into()),
            Behavior::NilOnStart => Ok(Transition::Nil),
            _ => Ok(Transition::replace(Recorder {
                started: true,
                seen: self.observe(dependencies),
                ..self.clone()
            })),
        }
    }

    async fn stop(&self, dependencies: &Dependencies) -> Result<Transition, BoxError> {
        self.tracker.record(format!("stop:{}", self.name)).await;
        match self.behavior {
            Behavior::FailOnStop => Err(format!("{} refused to stop", self.name).into()),
            _ => Ok(Transition::replace(Recorder {
                started: false,
                seen: self.observe(dependencies),
                ..self.clone()
            })),
        }
    }

    fn is_started(&self) -> Option<bool> {
        Some(self.started)
    }
}

/// Plain value component with no side effects, comparable by value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    pub name: &'static str,
    pub on: bool,
    pub transitions: u32,
}

impl Toggle {
    pub fn new(name: &'static str) -> Self {
        Self { name, on: false, transitions: 0 }
    }
}

#[async_trait]
impl Component for Toggle {
    async fn start(&self, _dependencies: &Dependencies) -> Result<Transition, BoxError> {
        Ok(Transition::replace(Toggle {
            on: true,
            transitions: self.transitions + 1,
            ..self.clone()
        }))
    }

    async fn stop(&self, _dependencies: &Dependencies) -> Result<Transition, BoxError> {
        Ok(Transition::replace(Toggle {
            on: false,
            transitions: self.transitions + 1,
            ..self.clone()
        }))
    }
}
