//! CSS lengths

use lightningcss::traits::Parse;
use lightningcss::values::length::{LengthPercentage, LengthValue};

use crate::{CssError, DEFAULT_FONT_SIZE};

/// Length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Vw,
    Vh,
}

/// A CSS length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    /// Parse `600px`, `37.5em`, `100%`, `0`...
    pub fn parse(s: &str) -> Result<Self, CssError> {
        let s = s.trim();
        LengthPercentage::parse_string(s)
            .ok()
            .as_ref()
            .and_then(Self::from_length_percentage)
            .ok_or_else(|| CssError::InvalidLength(s.to_string()))
    }

    /// Absolute units other than `px` are folded into pixels
    pub(crate) fn from_css(value: &LengthValue) -> Option<Self> {
        let length = |value: f32, unit| Self { value: f64::from(value), unit };
        match value {
            LengthValue::Px(v) => Some(length(*v, LengthUnit::Px)),
            LengthValue::Em(v) => Some(length(*v, LengthUnit::Em)),
            LengthValue::Rem(v) => Some(length(*v, LengthUnit::Rem)),
            LengthValue::Vw(v) => Some(length(*v, LengthUnit::Vw)),
            LengthValue::Vh(v) => Some(length(*v, LengthUnit::Vh)),
            other => other.to_px().map(|px| Self::px(f64::from(px))),
        }
    }

    /// `calc()` is only accepted once lightningcss has reduced it
    pub(crate) fn from_length_percentage(value: &LengthPercentage) -> Option<Self> {
        match value {
            LengthPercentage::Dimension(dim) => Self::from_css(dim),
            LengthPercentage::Percentage(p) => Some(Self {
                value: f64::from(p.0) * 100.0,
                unit: LengthUnit::Percent,
            }),
            _ => None,
        }
    }

    /// Sum of two lengths when it can be expressed without an environment
    pub(crate) fn checked_add(self, other: Self) -> Option<Self> {
        if self.unit == other.unit {
            return Some(Self { value: self.value + other.value, ..self });
        }
        match (self.font_relative_px(), other.font_relative_px()) {
            (Some(a), Some(b)) => Some(Self::px(a + b)),
            _ => None,
        }
    }

    pub(crate) fn scaled(self, factor: f64) -> Self {
        Self { value: self.value * factor, ..self }
    }

    fn font_relative_px(&self) -> Option<f64> {
        match self.unit {
            LengthUnit::Px => Some(self.value),
            LengthUnit::Em | LengthUnit::Rem => Some(self.value * DEFAULT_FONT_SIZE),
            _ => None,
        }
    }

    /// Resolve to CSS pixels
    ///
    /// `reference` is what percentages resolve against; `viewport` is
    /// `(width, height)` for `vw`/`vh`.
    pub fn to_px(&self, reference: f64, viewport: (f64, f64)) -> f64 {
        match self.unit {
            LengthUnit::Px => self.value,
            LengthUnit::Em | LengthUnit::Rem => self.value * DEFAULT_FONT_SIZE,
            LengthUnit::Percent => reference * self.value / 100.0,
            LengthUnit::Vw => viewport.0 * self.value / 100.0,
            LengthUnit::Vh => viewport.1 * self.value / 100.0,
        }
    }

    /// Whether the value depends on a containing size
    pub fn is_relative(&self) -> bool {
        matches!(self.unit, LengthUnit::Percent | LengthUnit::Vw | LengthUnit::Vh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lengths() {
        assert_eq!(Length::parse("600px").unwrap(), Length::px(600.0));
        assert_eq!(Length::parse(" 37.5EM ").unwrap().unit, LengthUnit::Em);
        assert_eq!(Length::parse("0").unwrap(), Length::px(0.0));
        assert_eq!(Length::parse("-100%").unwrap().value, -100.0);
        assert!(Length::parse("12").is_err());
        assert!(Length::parse("px").is_err());
        assert!(Length::parse("10furlongs").is_err());
    }

    #[test]
    fn test_absolute_units_fold_to_px() {
        assert_eq!(Length::parse("1in").unwrap(), Length::px(96.0));
        assert_eq!(Length::parse("calc(10px + 5px)").unwrap(), Length::px(15.0));
    }

    #[test]
    fn test_to_px() {
        let vp = (1024.0, 768.0);
        assert_eq!(Length::parse("40em").unwrap().to_px(0.0, vp), 640.0);
        assert_eq!(Length::parse("50%").unwrap().to_px(300.0, vp), 150.0);
        assert_eq!(Length::parse("100vh").unwrap().to_px(0.0, vp), 768.0);
    }

    #[test]
    fn test_checked_add() {
        let em = Length { value: 1.0, unit: LengthUnit::Em };
        let vw = Length { value: 10.0, unit: LengthUnit::Vw };
        assert_eq!(Length::px(4.0).checked_add(em), Some(Length::px(20.0)));
        assert_eq!(vw.checked_add(vw).map(|l| l.value), Some(20.0));
        assert_eq!(vw.checked_add(Length::px(1.0)), None);
    }
}
