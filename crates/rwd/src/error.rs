//! Error types

use rwd_dom::{DomError, NodeId};

/// Result alias used across the crate
pub type Result<T, E = RwdError> = std::result::Result<T, E>;

/// Everything that can go wrong while driving the helper
///
/// Missing data (no active breakpoint, no matching source, no `<img>` yet)
/// is not an error; those cases are skipped.
#[derive(Debug, thiserror::Error)]
pub enum RwdError {
    #[error("node {0:?} is not a <picture> element")]
    NotAPicture(NodeId),

    #[error("no candidate in srcset `{srcset}` fits a device pixel ratio of {pixel_ratio}")]
    NoCandidate { srcset: String, pixel_ratio: f64 },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Html(#[from] rwd_html::ParseError),

    /// A page-supplied callback failed; nothing is retried
    #[error("`{hook}` callback failed")]
    Callback {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
