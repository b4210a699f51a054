//! The engine's read-only view of a compute instance.

use crate::tags::TagMap;

/// EC2-style instance power state.
///
/// Only `Stopped` is eligible for a start verdict and only `Running` for a
/// stop verdict; every transient state is ignored for the tick.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum PowerState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    /// Any state name the provider returns that we do not recognize.
    Other(String),
}

impl PowerState {
    /// Map a provider state name (e.g. `"shutting-down"`) to a variant.
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => PowerState::Pending,
            "running" => PowerState::Running,
            "shutting-down" => PowerState::ShuttingDown,
            "terminated" => PowerState::Terminated,
            "stopping" => PowerState::Stopping,
            "stopped" => PowerState::Stopped,
            other => PowerState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PowerState::Pending => "pending",
            PowerState::Running => "running",
            PowerState::ShuttingDown => "shutting-down",
            PowerState::Terminated => "terminated",
            PowerState::Stopping => "stopping",
            PowerState::Stopped => "stopped",
            PowerState::Other(name) => name,
        }
    }
}

/// One instance as seen by the decision engine: identifier, power state,
/// and collapsed tags. Built fresh each tick by the provider adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    pub id: String,
    pub state: PowerState,
    pub tags: TagMap,
}

impl InstanceSpec {
    pub fn new(id: impl Into<String>, state: PowerState, tags: TagMap) -> Self {
        Self {
            id: id.into(),
            state,
            tags,
        }
    }
}
