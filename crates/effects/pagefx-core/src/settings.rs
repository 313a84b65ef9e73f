//! Registration settings and their normalized form.
//!
//! [`Settings`] mirrors what a page author writes (milliseconds, a 0-10
//! intensity, a 1-5 threshold tier). [`Binding`] is the resolved form the
//! animator closes over: seconds, a multiplier and a geometry fraction.

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::effects::EffectKind;
use crate::error::{Error, Result};
use crate::stagger::StaggerOrder;

/// Stagger selector meaning "every direct child"; enables text-node expansion.
pub const ALL_CHILDREN: &str = ":scope > *";

pub const DEFAULT_SPEED_MS: f64 = 1000.0;
pub const DEFAULT_INTENSITY: f64 = 5.0;
pub const DEFAULT_THRESHOLD_TIER: i64 = 3;

/// Author-facing settings for one `add(selector, settings)` call. All optional.
///
/// Deserialization never rejects a field: numbers also accept numeric strings
/// (`"1000"`, `"250ms"`), and a value of the wrong type reads as unset so the
/// documented default applies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Effect name from the catalog.
    #[serde(deserialize_with = "lenient_string")]
    pub style: Option<String>,
    /// Transition duration in milliseconds.
    #[serde(deserialize_with = "lenient_number")]
    pub speed: Option<f64>,
    /// Strength on a 0-10 scale.
    #[serde(deserialize_with = "lenient_number")]
    pub intensity: Option<f64>,
    /// Delay before the enter transition, in milliseconds.
    #[serde(deserialize_with = "lenient_number")]
    pub delay: Option<f64>,
    /// Re-animate every time the element re-enters view.
    #[serde(deserialize_with = "lenient_bool")]
    pub replay: Option<bool>,
    /// Per-child delay increment in milliseconds; negative disables staggering.
    #[serde(deserialize_with = "lenient_number")]
    pub stagger: Option<f64>,
    #[serde(deserialize_with = "lenient_order")]
    pub stagger_order: Option<StaggerOrder>,
    #[serde(deserialize_with = "lenient_string")]
    pub stagger_selector: Option<String>,
    /// Detection tier 1-5.
    #[serde(deserialize_with = "lenient_number")]
    pub threshold: Option<f64>,
    /// Forced visibility for the first evaluation.
    #[serde(deserialize_with = "lenient_bool")]
    pub state: Option<bool>,
}

impl Settings {
    /// Fails only on malformed JSON or a non-object document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Settings(e.to_string()))
    }

    /// Settings from an already-parsed value; anything but an object is empty settings.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("unreadable settings ({e}), using defaults");
                Self::default()
            }),
            Value::Null => Self::default(),
            other => {
                warn!("settings must be an object, got {other}; using defaults");
                Self::default()
            }
        }
    }
}

/// Leading-integer parse of a numeric string, the way page scripts read
/// attribute values: optional sign then digits, trailing junk ignored.
fn parse_leading_int(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<f64>().ok().map(|n| sign * n)
}

fn lenient_number<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_int(&s),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_order<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<StaggerOrder>, D::Error> {
    Ok(match Value::deserialize(d)? {
        v @ Value::String(_) => Some(serde_json::from_value(v).unwrap_or_default()),
        _ => None,
    })
}

/// `selector` + `settings` pair, the unit of a page preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub selector: String,
    #[serde(default)]
    pub settings: Settings,
}

impl Registration {
    /// One registration from a parsed value; `None` when it has no string selector.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            warn!("registration must be an object, skipping");
            return None;
        };
        let selector = match map.remove("selector") {
            Some(Value::String(s)) => s,
            other => {
                warn!("registration without a string selector ({other:?}), skipping");
                return None;
            }
        };
        let settings = Settings::from_value(map.remove("settings").unwrap_or(Value::Null));
        Some(Self { selector, settings })
    }

    /// Keeps every usable entry of a batch; bad entries are logged and skipped.
    pub fn from_values(values: Vec<Value>) -> Vec<Self> {
        values.into_iter().filter_map(Self::from_value).collect()
    }

    /// Fails only when the document is not a JSON array.
    pub fn list_from_json_str(s: &str) -> Result<Vec<Self>> {
        let values: Vec<Value> =
            serde_json::from_str(s).map_err(|e| Error::Settings(e.to_string()))?;
        Ok(Self::from_values(values))
    }
}

/// Resolved settings, captured by the enter/leave closures of every watch it produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Binding {
    pub effect: EffectKind,
    /// Seconds.
    pub speed: f64,
    /// Working multiplier in `[0.25, 2.0]` for inputs in `[0, 10]`.
    pub intensity: f64,
    /// Seconds.
    pub delay: f64,
    pub replay: bool,
    /// Per-child increment in seconds, `None` when staggering is off.
    pub stagger: Option<f64>,
    pub stagger_order: StaggerOrder,
    pub stagger_selector: Option<String>,
    /// Fraction of the viewport height used by the padded detection modes.
    pub threshold: f64,
    pub state: Option<bool>,
}

impl Binding {
    pub fn resolve(settings: &Settings, fallback: EffectKind) -> Self {
        let effect = match settings.style.as_deref() {
            Some(name) => name.parse().unwrap_or_else(|_| {
                warn!("unknown effect '{name}', falling back to '{fallback}'");
                fallback
            }),
            None => {
                debug!("no effect named, using '{fallback}'");
                fallback
            }
        };

        let stagger = settings
            .stagger
            .map(f64::trunc)
            .filter(|ms| *ms >= 0.0)
            .map(|ms| ms / 1000.0);

        Self {
            effect,
            speed: settings.speed.unwrap_or(DEFAULT_SPEED_MS).trunc() / 1000.0,
            intensity: rescale_intensity(settings.intensity.unwrap_or(DEFAULT_INTENSITY)),
            delay: settings.delay.unwrap_or(0.0).trunc() / 1000.0,
            replay: settings.replay.unwrap_or(false),
            stagger,
            stagger_order: settings.stagger_order.unwrap_or_default(),
            stagger_selector: settings.stagger_selector.clone(),
            threshold: threshold_fraction(
                settings
                    .threshold
                    .map_or(DEFAULT_THRESHOLD_TIER, |t| t.trunc() as i64),
            ),
            state: settings.state,
        }
    }

    /// Staggering needs both a per-child increment and a child selector.
    pub fn stagger_selector(&self) -> Option<&str> {
        self.stagger.and(self.stagger_selector.as_deref())
    }
}

/// Map a 0-10 author intensity onto the 0.25-2.0 working multiplier.
pub fn rescale_intensity(input: f64) -> f64 {
    ((input.trunc() / 10.0) * 1.75) + 0.25
}

/// Threshold tier to viewport fraction; unknown tiers use the tier-3 default.
pub fn threshold_fraction(tier: i64) -> f64 {
    match tier {
        1 => 0.0,
        2 => 0.125,
        4 => 0.375,
        5 => 0.475,
        _ => 0.25,
    }
}
