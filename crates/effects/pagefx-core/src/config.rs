//! Core configuration for pagefx-core.

use serde::{Deserialize, Serialize};

use crate::effects::EffectKind;
use crate::error::{Error, Result};

/// Engine-wide knobs. Every field has a default so hosts can pass a partial object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra scroll padding applied on iOS, where body scrolling is touch-driven.
    pub ios_scroll_pad: f64,

    /// Effect used when a registration names an effect that is not in the catalog.
    pub fallback_effect: EffectKind,

    /// `dataset` key marking an ancestor as a shared trigger element.
    pub trigger_attribute: String,

    /// Tag name of the wrapper element created for each expanded text token.
    pub text_node_tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ios_scroll_pad: 125.0,
            fallback_effect: EffectKind::FadeIn,
            trigger_attribute: "onvisibleTrigger".to_string(),
            text_node_tag: "text-node".to_string(),
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config object.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }
}
