//! Breakpoint code blocks
//!
//! Page code registered per breakpoint name: `match` callbacks run while the
//! breakpoint's media condition holds, `unmatch` callbacks while it does not.

use std::fmt;
use std::rc::Rc;

use crate::breakpoints::{media_matches, BreakpointRegistry};
use crate::error::{Result, RwdError};
use crate::helpers::Merge;
use crate::host::Host;

/// Callback receiving `(breakpoint name, media condition)`
///
/// The media condition is `None` when no breakpoint has that name or its
/// link carried no `media` attribute.
pub type CodeBlock = Rc<dyn Fn(&str, Option<&str>) -> anyhow::Result<()>>;

/// Callbacks passed to `register`
#[derive(Clone, Default)]
pub struct CodeBlockCallbacks {
    pub on_match: Option<CodeBlock>,
    pub on_unmatch: Option<CodeBlock>,
}

impl CodeBlockCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` when the breakpoint matches
    pub fn on_match<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> anyhow::Result<()> + 'static,
    {
        self.on_match = Some(Rc::new(f));
        self
    }

    /// Run `f` when the breakpoint does not match
    pub fn on_unmatch<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> anyhow::Result<()> + 'static,
    {
        self.on_unmatch = Some(Rc::new(f));
        self
    }
}

impl Merge for CodeBlockCallbacks {
    fn merge(self, other: Self) -> Self {
        Self {
            on_match: other.on_match.or(self.on_match),
            on_unmatch: other.on_unmatch.or(self.on_unmatch),
        }
    }
}

impl fmt::Debug for CodeBlockCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeBlockCallbacks")
            .field("on_match", &self.on_match.is_some())
            .field("on_unmatch", &self.on_unmatch.is_some())
            .finish()
    }
}

#[derive(Default)]
struct CodeBlockEntry {
    on_match: Vec<CodeBlock>,
    on_unmatch: Vec<CodeBlock>,
}

/// Registry of code blocks keyed by breakpoint name
#[derive(Default)]
pub struct CodeBlockDispatcher {
    /// Insertion ordered; linear lookup is fine for a handful of names
    entries: Vec<(String, CodeBlockEntry)>,
}

impl CodeBlockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add callbacks for `name`, then evaluate that breakpoint once
    pub fn register<H: Host + ?Sized>(
        &mut self,
        host: &H,
        breakpoints: &BreakpointRegistry,
        name: &str,
        callbacks: CodeBlockCallbacks,
    ) -> Result<()> {
        let index = match self.entries.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.entries.push((name.to_string(), CodeBlockEntry::default()));
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index].1;
        if let Some(f) = callbacks.on_match {
            entry.on_match.push(f);
        }
        if let Some(f) = callbacks.on_unmatch {
            entry.on_unmatch.push(f);
        }
        tracing::debug!(
            "Registered code for `{}` ({} match, {} unmatch)",
            name,
            entry.on_match.len(),
            entry.on_unmatch.len()
        );

        self.execute_one(host, breakpoints, name)
    }

    /// Run the `match` or `unmatch` list of one breakpoint
    ///
    /// The first failing callback aborts the pass.
    pub fn execute_one<H: Host + ?Sized>(
        &self,
        host: &H,
        breakpoints: &BreakpointRegistry,
        name: &str,
    ) -> Result<()> {
        let Some((_, entry)) = self.entries.iter().find(|(n, _)| n == name) else {
            return Ok(());
        };

        let media = breakpoints.lookup_media(name);
        let matched = media.is_some_and(|m| media_matches(host, m));
        let (hook, callbacks) = if matched {
            ("match", &entry.on_match)
        } else {
            ("unmatch", &entry.on_unmatch)
        };

        tracing::trace!("Running {} `{}` callbacks for `{}`", callbacks.len(), hook, name);
        for callback in callbacks {
            callback(name, media).map_err(|source| RwdError::Callback { hook, source })?;
        }
        Ok(())
    }

    /// Run every registered breakpoint, in registration order
    pub fn execute_all<H: Host + ?Sized>(&self, host: &H, breakpoints: &BreakpointRegistry) -> Result<()> {
        for (name, _) in &self.entries {
            self.execute_one(host, breakpoints, name)?;
        }
        Ok(())
    }

    /// Registered breakpoint names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CodeBlockDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
