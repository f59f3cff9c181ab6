//! rwd CSS - media queries and values
//!
//! Parses media query lists and inline styles with lightningcss and
//! evaluates the typed result against a viewport description.

mod media;
mod style;
mod values;

pub use media::{
    evaluate, Comparison, FeatureValue, MediaCondition, MediaEnvironment, MediaFeature, MediaQuery,
    MediaQueryList, MediaType, Orientation, RangeFeature,
};
pub use style::InlineStyle;
pub use values::{Length, LengthUnit};

/// Font size `em`/`rem` resolve against inside media queries
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// CSS parsing error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CssError {
    #[error("invalid media query `{query}`: {message}")]
    InvalidQuery { query: String, message: String },

    #[error("invalid style `{style}`: {message}")]
    InvalidStyle { style: String, message: String },

    #[error("invalid length `{0}`")]
    InvalidLength(String),
}
