//! Shared monitor state: the registry plus per-url status, guarded by one lock

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{ProbeResult, Status, Target, TargetState};
use crate::registry::Registry;

pub type SharedState = Arc<RwLock<MonitorState>>;

#[derive(Debug, Default)]
pub struct MonitorState {
    registry: Registry,
    states: HashMap<String, TargetState>,
    running: bool,
}

impl MonitorState {
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn add_target(&mut self, url: impl Into<String>, name: Option<String>) -> Target {
        let target = self.registry.add(url, name);
        // Duplicate urls share one state entry; registering the url again resets it.
        self.states.insert(target.url.clone(), TargetState::default());
        target
    }

    pub fn remove_target(&mut self, id: usize) -> Option<Target> {
        let removed = self.registry.remove(id)?;
        if !self.registry.contains_url(&removed.url) {
            self.states.remove(&removed.url);
        }
        Some(removed)
    }

    pub fn targets(&self) -> Vec<Target> {
        self.registry.list()
    }

    pub fn has_targets(&self) -> bool {
        !self.registry.is_empty()
    }

    pub fn state(&self, url: &str) -> Option<TargetState> {
        self.states.get(url).cloned()
    }

    pub fn all_states(&self) -> HashMap<String, TargetState> {
        self.states.clone()
    }

    pub fn history(&self, id: usize) -> Option<Vec<ProbeResult>> {
        let target = self.registry.get(id)?;
        Some(
            self.states
                .get(&target.url)
                .map(|s| s.history.snapshot())
                .unwrap_or_default(),
        )
    }

    /// Folds a probe result into the url's state. Returns the previous status,
    /// or `None` when the url is no longer registered.
    pub fn record(&mut self, url: &str, result: ProbeResult) -> Option<Status> {
        self.states.get_mut(url).map(|state| state.apply(result))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}
