//! Media Queries
//!
//! `screen and (min-width: 600px), print` style query lists. lightningcss
//! does the parsing; the result is converted into an owned condition tree
//! and evaluated here against a [`MediaEnvironment`].

use lightningcss::media_query::{
    MediaCondition as CssCondition, MediaFeature as CssFeature, MediaFeatureComparison,
    MediaFeatureId, MediaFeatureName, MediaFeatureValue, MediaQuery as CssQuery,
    MediaType as CssMediaType, Operator, Qualifier,
};
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::values::calc::Calc;
use lightningcss::values::length::Length as CssLength;
use lightningcss::values::resolution::Resolution;

use crate::values::Length;
use crate::CssError;

/// Media type of the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    All,
    Screen,
    Print,
    /// A type this engine never renders to (`tv`, `speech`, ...)
    Unknown,
}

impl MediaType {
    fn from_css(media_type: &CssMediaType<'_>) -> Self {
        match media_type {
            CssMediaType::All => Self::All,
            CssMediaType::Screen => Self::Screen,
            CssMediaType::Print => Self::Print,
            _ => Self::Unknown,
        }
    }
}

/// Viewport description queries are evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaEnvironment {
    /// Viewport width in CSS pixels
    pub width: f64,
    /// Viewport height in CSS pixels
    pub height: f64,
    /// Physical pixels per CSS pixel
    pub device_pixel_ratio: f64,
    /// Surface type; never `All` or `Unknown` in practice
    pub media_type: MediaType,
}

impl MediaEnvironment {
    pub fn screen(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
            media_type: MediaType::Screen,
        }
    }
}

impl Default for MediaEnvironment {
    fn default() -> Self {
        Self::screen(1024.0, 768.0, 1.0)
    }
}

/// Comparison operator of a range feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Comparison {
    fn from_css(op: &MediaFeatureComparison) -> Self {
        match op {
            MediaFeatureComparison::LessThan => Self::Lt,
            MediaFeatureComparison::LessThanEqual => Self::Le,
            MediaFeatureComparison::Equal => Self::Eq,
            MediaFeatureComparison::GreaterThanEqual => Self::Ge,
            MediaFeatureComparison::GreaterThan => Self::Gt,
        }
    }

    fn holds(self, actual: f64, expected: f64) -> bool {
        const EPSILON: f64 = 1e-9;
        match self {
            Self::Lt => actual < expected - EPSILON,
            Self::Le => actual <= expected + EPSILON,
            Self::Eq => (actual - expected).abs() <= EPSILON,
            Self::Ge => actual >= expected - EPSILON,
            Self::Gt => actual > expected + EPSILON,
        }
    }

    /// Operator as seen from the other side (`600px < width` is `width > 600px`)
    fn flipped(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Eq => Self::Eq,
            Self::Ge => Self::Le,
            Self::Gt => Self::Lt,
        }
    }
}

/// Numeric features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFeature {
    Width,
    Height,
    AspectRatio,
    /// Also covers `device-pixel-ratio`
    Resolution,
}

impl RangeFeature {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "aspect-ratio" => Some(Self::AspectRatio),
            "resolution" | "device-pixel-ratio" => Some(Self::Resolution),
            _ => None,
        }
    }

    fn actual(self, env: &MediaEnvironment) -> f64 {
        match self {
            Self::Width => env.width,
            Self::Height => env.height,
            Self::AspectRatio if env.height > 0.0 => env.width / env.height,
            Self::AspectRatio => f64::INFINITY,
            Self::Resolution => env.device_pixel_ratio,
        }
    }
}

/// Right-hand side of a range feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    /// Resolved per environment so `vw`/`vh` track the viewport
    Length(Length),
    /// Ratio or dots per CSS pixel
    Number(f64),
}

impl FeatureValue {
    fn from_css(feature: RangeFeature, value: &MediaFeatureValue<'_>) -> Option<Self> {
        match (feature, value) {
            (RangeFeature::Width | RangeFeature::Height, MediaFeatureValue::Length(length)) => {
                length_from_css(length).map(Self::Length)
            }
            (RangeFeature::AspectRatio, MediaFeatureValue::Ratio(ratio)) if ratio.1 > 0.0 => {
                Some(Self::Number(f64::from(ratio.0) / f64::from(ratio.1)))
            }
            (RangeFeature::Resolution, MediaFeatureValue::Resolution(resolution)) => {
                Some(Self::Number(dppx(resolution)))
            }
            (RangeFeature::AspectRatio | RangeFeature::Resolution, MediaFeatureValue::Number(n)) => {
                Some(Self::Number(f64::from(*n)))
            }
            (RangeFeature::AspectRatio | RangeFeature::Resolution, MediaFeatureValue::Integer(n)) => {
                Some(Self::Number(f64::from(*n)))
            }
            _ => None,
        }
    }

    fn resolve(&self, env: &MediaEnvironment) -> f64 {
        match self {
            Self::Length(length) => length.to_px(0.0, (env.width, env.height)),
            Self::Number(n) => *n,
        }
    }
}

fn length_from_css(length: &CssLength) -> Option<Length> {
    match length {
        CssLength::Value(value) => Length::from_css(value),
        CssLength::Calc(calc) => reduce_calc(calc),
    }
}

fn reduce_calc(calc: &Calc<CssLength>) -> Option<Length> {
    match calc {
        Calc::Value(value) => length_from_css(value),
        Calc::Sum(a, b) => reduce_calc(a)?.checked_add(reduce_calc(b)?),
        Calc::Product(factor, inner) => reduce_calc(inner).map(|l| l.scaled(f64::from(*factor))),
        _ => None,
    }
}

fn dppx(resolution: &Resolution) -> f64 {
    match resolution {
        Resolution::Dppx(v) => f64::from(*v),
        Resolution::Dpi(v) => f64::from(*v) / 96.0,
        Resolution::Dpcm(v) => f64::from(*v) * 2.54 / 96.0,
    }
}

/// Screen orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// A single parenthesised test
#[derive(Debug, Clone, PartialEq)]
pub enum MediaFeature {
    Range {
        feature: RangeFeature,
        op: Comparison,
        value: FeatureValue,
    },
    /// Boolean context: `(width)` is true when non-zero
    Present(RangeFeature),
    Orientation(Orientation),
    /// Parsed but unsupported; evaluates to unknown
    Unknown(String),
}

impl MediaFeature {
    fn evaluate(&self, env: &MediaEnvironment) -> Option<bool> {
        match self {
            Self::Range { feature, op, value } => Some(op.holds(feature.actual(env), value.resolve(env))),
            Self::Present(feature) => Some(feature.actual(env) != 0.0),
            Self::Orientation(Orientation::Portrait) => Some(env.height >= env.width),
            Self::Orientation(Orientation::Landscape) => Some(env.width > env.height),
            Self::Unknown(_) => None,
        }
    }
}

/// Boolean combination of features
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCondition {
    Feature(MediaFeature),
    Not(Box<MediaCondition>),
    And(Vec<MediaCondition>),
    Or(Vec<MediaCondition>),
}

impl MediaCondition {
    /// Three-valued: `None` when an unsupported feature decides the outcome
    pub fn evaluate(&self, env: &MediaEnvironment) -> Option<bool> {
        match self {
            Self::Feature(feature) => feature.evaluate(env),
            Self::Not(inner) => inner.evaluate(env).map(|r| !r),
            Self::And(conditions) => combine(conditions, env, false),
            Self::Or(conditions) => combine(conditions, env, true),
        }
    }

    fn from_css(condition: &CssCondition<'_>) -> Self {
        match condition {
            CssCondition::Feature(feature) => Self::from_feature(feature),
            CssCondition::Not(inner) => Self::Not(Box::new(Self::from_css(inner))),
            CssCondition::Operation { conditions, operator } => {
                let conditions = conditions.iter().map(Self::from_css).collect();
                match operator {
                    Operator::And => Self::And(conditions),
                    Operator::Or => Self::Or(conditions),
                }
            }
            #[allow(unreachable_patterns)]
            other => Self::Feature(MediaFeature::Unknown(format!("{other:?}"))),
        }
    }

    fn from_feature(feature: &CssFeature<'_>) -> Self {
        let unknown = || Self::Feature(MediaFeature::Unknown(format!("{feature:?}")));
        match feature {
            CssFeature::Plain { name, value } => match classify(name) {
                Named::Range(range, op) => range_condition(range, op, value).unwrap_or_else(unknown),
                Named::Orientation => match value {
                    MediaFeatureValue::Ident(ident) => match &*ident.0 {
                        "portrait" => Self::Feature(MediaFeature::Orientation(Orientation::Portrait)),
                        "landscape" => Self::Feature(MediaFeature::Orientation(Orientation::Landscape)),
                        _ => unknown(),
                    },
                    _ => unknown(),
                },
                Named::Unsupported => unknown(),
            },
            CssFeature::Boolean { name } => match classify(name) {
                Named::Range(range, Comparison::Eq) => Self::Feature(MediaFeature::Present(range)),
                _ => unknown(),
            },
            CssFeature::Range { name, operator, value } => match classify(name) {
                Named::Range(range, _) => {
                    range_condition(range, Comparison::from_css(operator), value).unwrap_or_else(unknown)
                }
                _ => unknown(),
            },
            // `start start_operator name end_operator end`
            CssFeature::Interval {
                name,
                start,
                start_operator,
                end,
                end_operator,
            } => match classify(name) {
                Named::Range(range, _) => {
                    let low = range_condition(range, Comparison::from_css(start_operator).flipped(), start);
                    let high = range_condition(range, Comparison::from_css(end_operator), end);
                    match (low, high) {
                        (Some(low), Some(high)) => Self::And(vec![low, high]),
                        _ => unknown(),
                    }
                }
                _ => unknown(),
            },
            #[allow(unreachable_patterns)]
            _ => unknown(),
        }
    }
}

fn combine(conditions: &[MediaCondition], env: &MediaEnvironment, any: bool) -> Option<bool> {
    let mut unknown = false;
    for condition in conditions {
        match condition.evaluate(env) {
            Some(result) if result == any => return Some(any),
            Some(_) => {}
            None => unknown = true,
        }
    }
    if unknown { None } else { Some(!any) }
}

fn range_condition(feature: RangeFeature, op: Comparison, value: &MediaFeatureValue<'_>) -> Option<MediaCondition> {
    let value = FeatureValue::from_css(feature, value)?;
    Some(MediaCondition::Feature(MediaFeature::Range { feature, op, value }))
}

/// What a feature name refers to, with the comparison a `min-`/`max-` prefix implies
enum Named {
    Range(RangeFeature, Comparison),
    Orientation,
    Unsupported,
}

fn classify(name: &MediaFeatureName<'_, MediaFeatureId>) -> Named {
    match name {
        MediaFeatureName::Standard(id) => match id {
            MediaFeatureId::Width => Named::Range(RangeFeature::Width, Comparison::Eq),
            MediaFeatureId::Height => Named::Range(RangeFeature::Height, Comparison::Eq),
            MediaFeatureId::AspectRatio => Named::Range(RangeFeature::AspectRatio, Comparison::Eq),
            MediaFeatureId::Resolution | MediaFeatureId::WebKitDevicePixelRatio => {
                Named::Range(RangeFeature::Resolution, Comparison::Eq)
            }
            MediaFeatureId::Orientation => Named::Orientation,
            _ => Named::Unsupported,
        },
        // lightningcss has no id for the unprefixed `device-pixel-ratio`
        MediaFeatureName::Unknown(ident) => {
            let name: &str = &ident.0;
            let bare = name.strip_prefix("-webkit-").unwrap_or(name);
            let (op, bare) = if let Some(rest) = bare.strip_prefix("min-") {
                (Comparison::Ge, rest)
            } else if let Some(rest) = bare.strip_prefix("max-") {
                (Comparison::Le, rest)
            } else {
                (Comparison::Eq, bare)
            };
            match RangeFeature::from_name(bare) {
                Some(feature) => Named::Range(feature, op),
                None => Named::Unsupported,
            }
        }
        _ => Named::Unsupported,
    }
}

/// One comma-separated query
#[derive(Debug, Clone, PartialEq)]
pub struct MediaQuery {
    pub negated: bool,
    pub media_type: MediaType,
    pub condition: Option<MediaCondition>,
}

impl MediaQuery {
    /// Evaluate against an environment
    pub fn matches(&self, env: &MediaEnvironment) -> bool {
        let condition = match &self.condition {
            None => true,
            Some(condition) => match condition.evaluate(env) {
                Some(result) => result,
                // Unknown stays false even under `not`
                None => return false,
            },
        };

        let type_matches = match self.media_type {
            MediaType::All => true,
            MediaType::Unknown => false,
            t => t == env.media_type,
        };

        (type_matches && condition) != self.negated
    }

    fn from_css(query: &CssQuery<'_>) -> Self {
        Self {
            negated: matches!(query.qualifier, Some(Qualifier::Not)),
            media_type: MediaType::from_css(&query.media_type),
            condition: query.condition.as_ref().map(MediaCondition::from_css),
        }
    }
}

/// A full media query list (queries joined by commas)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaQueryList {
    pub queries: Vec<MediaQuery>,
}

impl MediaQueryList {
    /// Parse a media query list; an empty string is the empty list
    pub fn parse(text: &str) -> Result<Self, CssError> {
        let lowered = text.trim().to_ascii_lowercase();
        if lowered.is_empty() {
            return Ok(Self::default());
        }

        let invalid = |message: String| CssError::InvalidQuery {
            query: lowered.clone(),
            message,
        };
        // The text is spliced into a rule prelude
        if lowered.contains(['{', '}', ';']) {
            return Err(invalid("block delimiter in query".to_string()));
        }

        let source = format!("@media {lowered} {{}}");
        let sheet = StyleSheet::parse(&source, ParserOptions::default())
            .map_err(|e| invalid(e.to_string()))?;
        let list = sheet
            .rules
            .0
            .iter()
            .find_map(|rule| match rule {
                CssRule::Media(media) => Some(&media.query),
                _ => None,
            })
            .ok_or_else(|| invalid("not a media query list".to_string()))?;

        Ok(Self {
            queries: list.media_queries.iter().map(MediaQuery::from_css).collect(),
        })
    }

    /// The empty list matches everything; otherwise any query may match
    pub fn matches(&self, env: &MediaEnvironment) -> bool {
        self.queries.is_empty() || self.queries.iter().any(|q| q.matches(env))
    }
}

/// Parse and evaluate in one go, `matchMedia` style
///
/// Queries that fail to parse behave like `not all`.
pub fn evaluate(query: &str, env: &MediaEnvironment) -> bool {
    match MediaQueryList::parse(query) {
        Ok(list) => list.matches(env),
        Err(e) => {
            tracing::debug!("Treating media query as `not all`: {}", e);
            false
        }
    }
}
