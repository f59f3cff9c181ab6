//! Breakpoints
//!
//! Named media conditions discovered from `<link data-name="..." media="...">`
//! stylesheet links, and which one of them is currently active.

use rwd_dom::Document;
use serde::Serialize;

use crate::host::Host;

/// A named media condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakpoint {
    pub name: String,
    /// Media condition; `None` when the link had no `media` attribute
    pub media: Option<String>,
}

/// Active breakpoint transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointChange {
    pub previous: Option<String>,
    pub current: String,
}

/// Test a media condition; the empty condition matches everything
pub fn media_matches<H: Host + ?Sized>(host: &H, media: &str) -> bool {
    host.match_media(media)
}

/// Discovered breakpoints plus the active one
#[derive(Debug, Clone, Default)]
pub struct BreakpointRegistry {
    breakpoints: Vec<Breakpoint>,
    active: Option<String>,
}

impl BreakpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every `<link>` carrying `attribute` to the list
    ///
    /// Nothing is de-duplicated: discovering twice lists each link twice.
    pub fn discover(&mut self, document: &Document, attribute: &str) -> usize {
        let before = self.breakpoints.len();

        for link in document.get_elements_by_tag_name("link") {
            let Some(name) = document.get_attribute(link, attribute) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            self.push(name, document.get_attribute(link, "media"));
        }

        let found = self.breakpoints.len() - before;
        tracing::debug!("Discovered {} breakpoints", found);
        found
    }

    /// Append a breakpoint by hand
    pub fn push<'a>(&mut self, name: &str, media: impl Into<Option<&'a str>>) {
        self.breakpoints.push(Breakpoint {
            name: name.to_string(),
            media: media.into().map(str::to_string),
        });
    }

    /// Re-test every breakpoint; the last matching one becomes active
    ///
    /// Returns the transition when the active name changed. When nothing
    /// matches the previous value is kept. Breakpoints without a media
    /// condition never match.
    pub fn evaluate_active<H: Host + ?Sized>(&mut self, host: &H) -> Option<BreakpointChange> {
        let current = self
            .breakpoints
            .iter()
            .rfind(|bp| bp.media.as_deref().is_some_and(|m| media_matches(host, m)))?
            .name
            .clone();

        if self.active.as_deref() == Some(current.as_str()) {
            return None;
        }

        let previous = self.active.replace(current.clone());
        tracing::info!("Breakpoint changed: {:?} -> {}", previous, current);
        Some(BreakpointChange { previous, current })
    }

    /// Media condition of the first breakpoint called `name`
    ///
    /// `None` both for unknown names and for links without `media`.
    pub fn lookup_media(&self, name: &str) -> Option<&str> {
        self.breakpoints
            .iter()
            .find(|bp| bp.name == name)
            .and_then(|bp| bp.media.as_deref())
    }

    /// Name of the active breakpoint
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Every breakpoint in discovery order
    pub fn all(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }
}
