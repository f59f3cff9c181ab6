//! Resize listener binding

use crate::host::{Host, ListenerId};

/// Tracks the resize listeners bound by `init`
#[derive(Debug, Clone, Default)]
pub struct EventBinder {
    listeners: Vec<ListenerId>,
}

impl EventBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a resize listener on the host
    ///
    /// Binding again adds another listener; every resize then runs the
    /// handler once per listener.
    pub fn bind<H: Host + ?Sized>(&mut self, host: &mut H) -> ListenerId {
        if !self.listeners.is_empty() {
            tracing::warn!("Resize listener already bound {} time(s), binding again", self.listeners.len());
        }
        let id = host.add_resize_listener();
        self.listeners.push(id);
        tracing::debug!("Bound resize listener {:?}", id);
        id
    }

    /// Whether `listener` was bound here
    pub fn owns(&self, listener: ListenerId) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn bound(&self) -> &[ListenerId] {
        &self.listeners
    }
}
