use serde::{Deserialize, Serialize};

use crate::component::Managed;
use crate::lifecycle::Action;

/// Decides which components a start/stop traversal actually touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gate {
    /// Invoke every component, whatever its state
    #[default]
    Always,
    /// Skip components already in the state `action` would put them in
    Idempotent,
}

impl Gate {
    /// Whether `managed` should be processed by `action`.
    ///
    /// `system_started` stands in for components that do not report their own state.
    pub fn admits(self, action: Action, managed: &Managed, system_started: bool) -> bool {
        match self {
            Gate::Always => true,
            Gate::Idempotent => {
                let current = managed.component().is_started().unwrap_or(system_started);
                current != action.target_state()
            }
        }
    }
}

/// Selection predicate that admits every component.
pub fn always(_managed: &Managed) -> bool {
    true
}
