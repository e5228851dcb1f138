//! Listener registry between the board's event loop and the tools.

use super::{EventKind, ToolKind};

/// Registered `(tool, event)` listeners.
///
/// Tools subscribe on attach and unsubscribe on detach; the board dispatches each
/// event to exactly the listeners registered here.
#[derive(Debug, Default)]
pub struct InputRouter {
    listeners: Vec<(ToolKind, EventKind)>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Registering the same pair twice is a no-op.
    pub fn subscribe(&mut self, owner: ToolKind, event: EventKind) {
        if self.listeners.contains(&(owner, event)) {
            log::debug!("{owner:?} already listens to {event:?}");
            return;
        }
        self.listeners.push((owner, event));
    }

    /// Remove every listener owned by `owner`. Returns how many were removed.
    pub fn unsubscribe_all(&mut self, owner: ToolKind) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|(tool, _)| *tool != owner);
        before - self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Tools listening to `event`, in subscription order.
    pub fn listeners_for(&self, event: EventKind) -> Vec<ToolKind> {
        self.listeners
            .iter()
            .filter(|(_, kind)| *kind == event)
            .map(|(tool, _)| *tool)
            .collect()
    }

    /// Distinct tools with at least one listener.
    pub fn owners(&self) -> Vec<ToolKind> {
        let mut owners: Vec<ToolKind> = Vec::new();
        for (tool, _) in &self.listeners {
            if !owners.contains(tool) {
                owners.push(*tool);
            }
        }
        owners
    }
}
