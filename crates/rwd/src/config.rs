//! Helper configuration

use crate::error::Result;
use crate::helpers;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Probe id the viewport sizer looks for and creates
pub const DEFAULT_PROBE_ID: &str = "rwd-test-viewport";

/// Full-viewport, off-screen probe style
pub const DEFAULT_PROBE_STYLE: &str = "position:fixed;height:100%;width:100%;top:-100%;left:-100%";

/// Helper configuration
///
/// Every field has a default, so partial JSON documents are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RwdConfig {
    /// `<link>` attribute naming a breakpoint
    pub breakpoint_attribute: String,

    /// `<source>` attribute referring to a breakpoint by name
    pub source_breakpoint_attribute: String,

    /// Tag name of picture containers
    pub picture_tag: String,

    /// Id of the viewport probe element
    pub probe_id: String,

    /// Inline style of the viewport probe element
    pub probe_style: String,

    /// Pixel ratio used when the host does not report one
    pub default_pixel_ratio: f64,
}

impl Default for RwdConfig {
    fn default() -> Self {
        Self {
            breakpoint_attribute: "data-name".to_string(),
            source_breakpoint_attribute: "data-media".to_string(),
            picture_tag: "picture".to_string(),
            probe_id: DEFAULT_PROBE_ID.to_string(),
            probe_style: DEFAULT_PROBE_STYLE.to_string(),
            default_pixel_ratio: 1.0,
        }
    }
}

impl RwdConfig {
    /// Load from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy of this config with the top-level keys of `json` replaced
    pub fn with_overrides(&self, json: &str) -> Result<Self> {
        let mut base = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let overrides: Map<String, Value> = serde_json::from_str(json)?;
        helpers::merge(&mut base, overrides);
        Ok(serde_json::from_value(Value::Object(base))?)
    }
}
