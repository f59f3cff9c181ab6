//! Inline `style` attributes
//!
//! Only the handful of properties the headless layout needs survive parsing.

use lightningcss::properties::Property;
use lightningcss::properties::display::{Display, DisplayKeyword};
use lightningcss::properties::position::Position;
use lightningcss::properties::size::Size;
use lightningcss::stylesheet::{ParserOptions, StyleAttribute};

use crate::values::Length;
use crate::CssError;

/// Layout-relevant declarations of a `style` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InlineStyle {
    pub display_none: bool,
    pub fixed: bool,
    /// `None` for `auto` and anything not reducible to a length
    pub width: Option<Length>,
    pub height: Option<Length>,
}

impl InlineStyle {
    /// Parse an attribute value; invalid declarations are skipped
    pub fn parse(style: &str) -> Result<Self, CssError> {
        let options = ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        };
        let attribute = StyleAttribute::parse(style, options).map_err(|e| CssError::InvalidStyle {
            style: style.to_string(),
            message: e.to_string(),
        })?;

        let block = &attribute.declarations;
        let mut parsed = Self::default();
        // Later declarations win, `!important` ones last
        for property in block.declarations.iter().chain(block.important_declarations.iter()) {
            match property {
                Property::Display(display) => {
                    parsed.display_none = matches!(display, Display::Keyword(DisplayKeyword::None));
                }
                Property::Position(position) => parsed.fixed = matches!(position, Position::Fixed),
                Property::Width(size) => parsed.width = size_length(size),
                Property::Height(size) => parsed.height = size_length(size),
                _ => {}
            }
        }

        Ok(parsed)
    }
}

fn size_length(size: &Size) -> Option<Length> {
    match size {
        Size::LengthPercentage(lp) => Length::from_length_percentage(lp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LengthUnit;

    #[test]
    fn test_fixed_box() {
        let style = InlineStyle::parse("position:fixed;width:100%;height:100%").unwrap();
        assert!(style.fixed);
        assert!(!style.display_none);
        assert_eq!(style.width.map(|l| l.unit), Some(LengthUnit::Percent));
        assert_eq!(style.height.map(|l| l.value), Some(100.0));
    }

    #[test]
    fn test_later_declarations_win() {
        let style = InlineStyle::parse("display:none; display:block; width:10px; width:auto").unwrap();
        assert!(!style.display_none);
        assert_eq!(style.width, None);

        let style = InlineStyle::parse("width: 5em !important; width: 1px").unwrap();
        assert_eq!(style.width, Some(Length { value: 5.0, unit: LengthUnit::Em }));
    }

    #[test]
    fn test_invalid_declarations_skipped() {
        let style = InlineStyle::parse("width: banana; height: 12px; ;").unwrap();
        assert_eq!(style.width, None);
        assert_eq!(style.height, Some(Length::px(12.0)));
        assert_eq!(InlineStyle::parse("").unwrap(), InlineStyle::default());
    }
}
