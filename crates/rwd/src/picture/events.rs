//! Picture lifecycle events
//!
//! Every registered picture carries one listener list. Listeners subscribe to
//! one of four events and are called in subscription order.

use std::fmt;
use std::rc::Rc;

use rwd_dom::NodeId;

use crate::error::{Result, RwdError};
use crate::helpers::Merge;

/// Lifecycle events of a registered picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PictureEvent {
    /// Right before the rendered `src` changes
    BeforeSwap,
    /// Right after the new `src` was assigned (loading has only started)
    AfterSwap,
    /// Every completed load
    Load,
    /// The first completed load of this picture, before `Load`
    FirstLoad,
}

impl PictureEvent {
    /// Option key the event is known by
    pub fn hook_name(self) -> &'static str {
        match self {
            Self::BeforeSwap => "before",
            Self::AfterSwap => "after",
            Self::Load => "load",
            Self::FirstLoad => "loadonce",
        }
    }
}

/// What listeners receive
#[derive(Debug, Clone, PartialEq)]
pub struct SwapEvent {
    pub event: PictureEvent,
    /// The picture container
    pub element: NodeId,
    pub url: String,
    pub pixel_ratio: f64,
}

/// Lifecycle listener
pub type PictureListener = Rc<dyn Fn(&SwapEvent) -> anyhow::Result<()>>;

/// Options passed to `picture`
#[derive(Clone, Default)]
pub struct PictureOptions {
    listeners: Vec<(PictureEvent, PictureListener)>,
}

impl PictureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `f` to `event`
    pub fn on<F>(mut self, event: PictureEvent, f: F) -> Self
    where
        F: Fn(&SwapEvent) -> anyhow::Result<()> + 'static,
    {
        self.listeners.push((event, Rc::new(f)));
        self
    }

    pub fn before<F>(self, f: F) -> Self
    where
        F: Fn(&SwapEvent) -> anyhow::Result<()> + 'static,
    {
        self.on(PictureEvent::BeforeSwap, f)
    }

    pub fn after<F>(self, f: F) -> Self
    where
        F: Fn(&SwapEvent) -> anyhow::Result<()> + 'static,
    {
        self.on(PictureEvent::AfterSwap, f)
    }

    pub fn load<F>(self, f: F) -> Self
    where
        F: Fn(&SwapEvent) -> anyhow::Result<()> + 'static,
    {
        self.on(PictureEvent::Load, f)
    }

    pub fn loadonce<F>(self, f: F) -> Self
    where
        F: Fn(&SwapEvent) -> anyhow::Result<()> + 'static,
    {
        self.on(PictureEvent::FirstLoad, f)
    }

    /// Number of listeners for `event`
    pub fn listener_count(&self, event: PictureEvent) -> usize {
        self.listeners.iter().filter(|(e, _)| *e == event).count()
    }

    /// Deliver `event` to its listeners; the first error stops delivery
    pub(crate) fn emit(&self, event: &SwapEvent) -> Result<()> {
        for (_, listener) in self.listeners.iter().filter(|(e, _)| *e == event.event) {
            listener(event).map_err(|source| RwdError::Callback {
                hook: event.event.hook_name(),
                source,
            })?;
        }
        Ok(())
    }
}

impl Merge for PictureOptions {
    /// Events `other` subscribes to replace this set's listeners for them
    fn merge(mut self, other: Self) -> Self {
        self.listeners
            .retain(|(event, _)| !other.listeners.iter().any(|(e, _)| e == event));
        self.listeners.extend(other.listeners);
        self
    }
}

impl fmt::Debug for PictureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.listeners.iter().map(|(event, _)| event))
            .finish()
    }
}
