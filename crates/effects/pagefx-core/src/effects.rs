//! Effect catalog.
//!
//! Each effect is a pair of terminal visual states (rewind = hidden/initial,
//! play = visible/final) plus the transition that interpolates between them.
//! States are returned as [`StyleWrite`] lists so the catalog stays pure; the
//! host decides how to apply them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One inline style mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum StyleWrite {
    Set {
        property: &'static str,
        value: String,
    },
    Remove {
        property: &'static str,
    },
}

impl StyleWrite {
    pub fn set(property: &'static str, value: impl Into<String>) -> Self {
        StyleWrite::Set {
            property,
            value: value.into(),
        }
    }

    pub fn remove(property: &'static str) -> Self {
        StyleWrite::Remove { property }
    }

    pub fn property(&self) -> &'static str {
        match self {
            StyleWrite::Set { property, .. } | StyleWrite::Remove { property } => *property,
        }
    }
}

/// How an effect wants its transition timing applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionSpec {
    /// Value for the inline `transition` property.
    Inline(String),
    /// Self-managed timing (custom properties consumed by a stylesheet).
    Custom(Vec<StyleWrite>),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    FadeIn,
    FadeUp,
    FadeDown,
    FadeLeft,
    FadeRight,
    ZoomIn,
    ZoomOut,
    ZoomInImage,
    ZoomOutImage,
    BlurIn,
    SlideLeft,
    SlideRight,
    FlipForward,
    FlipBackward,
    FlipLeft,
    FlipRight,
    TiltLeft,
    TiltRight,
    FocusImage,
    FadeInBackground,
    WipeUp,
    WipeDown,
    WipeLeft,
    WipeRight,
    WipeDiagonal,
    WipeReverseDiagonal,
}

/// Custom property carrying the transition duration for custom effects.
pub const SPEED_PROPERTY: &str = "--onvisible-speed";
/// Custom property carrying the transition delay for custom effects.
pub const DELAY_PROPERTY: &str = "--onvisible-delay";
/// Custom property toggled by `fade-in-background`.
pub const BACKGROUND_PROPERTY: &str = "--onvisible-background-color";

const OPACITY: &str = "opacity";
const TRANSFORM: &str = "transform";
const FILTER: &str = "filter";
const MASK_SIZE: &str = "mask-size";

impl EffectKind {
    pub const ALL: [EffectKind; 26] = [
        EffectKind::FadeIn,
        EffectKind::FadeUp,
        EffectKind::FadeDown,
        EffectKind::FadeLeft,
        EffectKind::FadeRight,
        EffectKind::ZoomIn,
        EffectKind::ZoomOut,
        EffectKind::ZoomInImage,
        EffectKind::ZoomOutImage,
        EffectKind::BlurIn,
        EffectKind::SlideLeft,
        EffectKind::SlideRight,
        EffectKind::FlipForward,
        EffectKind::FlipBackward,
        EffectKind::FlipLeft,
        EffectKind::FlipRight,
        EffectKind::TiltLeft,
        EffectKind::TiltRight,
        EffectKind::FocusImage,
        EffectKind::FadeInBackground,
        EffectKind::WipeUp,
        EffectKind::WipeDown,
        EffectKind::WipeLeft,
        EffectKind::WipeRight,
        EffectKind::WipeDiagonal,
        EffectKind::WipeReverseDiagonal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::FadeIn => "fade-in",
            EffectKind::FadeUp => "fade-up",
            EffectKind::FadeDown => "fade-down",
            EffectKind::FadeLeft => "fade-left",
            EffectKind::FadeRight => "fade-right",
            EffectKind::ZoomIn => "zoom-in",
            EffectKind::ZoomOut => "zoom-out",
            EffectKind::ZoomInImage => "zoom-in-image",
            EffectKind::ZoomOutImage => "zoom-out-image",
            EffectKind::BlurIn => "blur-in",
            EffectKind::SlideLeft => "slide-left",
            EffectKind::SlideRight => "slide-right",
            EffectKind::FlipForward => "flip-forward",
            EffectKind::FlipBackward => "flip-backward",
            EffectKind::FlipLeft => "flip-left",
            EffectKind::FlipRight => "flip-right",
            EffectKind::TiltLeft => "tilt-left",
            EffectKind::TiltRight => "tilt-right",
            EffectKind::FocusImage => "focus-image",
            EffectKind::FadeInBackground => "fade-in-background",
            EffectKind::WipeUp => "wipe-up",
            EffectKind::WipeDown => "wipe-down",
            EffectKind::WipeLeft => "wipe-left",
            EffectKind::WipeRight => "wipe-right",
            EffectKind::WipeDiagonal => "wipe-diagonal",
            EffectKind::WipeReverseDiagonal => "wipe-reverse-diagonal",
        }
    }

    /// Descendant selector the visual mutation is redirected to, if any.
    pub fn target(self) -> Option<&'static str> {
        match self {
            EffectKind::ZoomInImage | EffectKind::ZoomOutImage | EffectKind::FocusImage => {
                Some("img")
            }
            _ => None,
        }
    }

    /// Custom effects manage their own timing and skip the inline-transition wrapper.
    pub fn is_custom(self) -> bool {
        matches!(self, EffectKind::FadeInBackground)
    }

    /// Properties interpolated by the inline transition.
    pub fn animated_properties(self) -> &'static [&'static str] {
        use EffectKind::*;
        match self {
            FadeIn => &[OPACITY],
            SlideLeft | SlideRight | ZoomInImage | ZoomOutImage => &[TRANSFORM],
            BlurIn => &[OPACITY, FILTER],
            FocusImage => &[TRANSFORM, FILTER],
            WipeUp | WipeDown | WipeLeft | WipeRight | WipeDiagonal | WipeReverseDiagonal => {
                &[MASK_SIZE]
            }
            FadeInBackground => &[],
            FadeUp | FadeDown | FadeLeft | FadeRight | ZoomIn | ZoomOut | FlipForward
            | FlipBackward | FlipLeft | FlipRight | TiltLeft | TiltRight => &[OPACITY, TRANSFORM],
        }
    }

    /// Transition for a play/rewind that takes `speed` seconds after `delay` seconds.
    pub fn transition(self, speed: f64, delay: f64) -> TransitionSpec {
        if self.is_custom() {
            let mut writes = vec![StyleWrite::set(SPEED_PROPERTY, format!("{}s", num(speed)))];
            if delay != 0.0 {
                writes.push(StyleWrite::set(DELAY_PROPERTY, format!("{}s", num(delay))));
            }
            return TransitionSpec::Custom(writes);
        }
        let parts: Vec<String> = self
            .animated_properties()
            .iter()
            .map(|p| {
                if delay != 0.0 {
                    format!("{p} {}s ease {}s", num(speed), num(delay))
                } else {
                    format!("{p} {}s ease", num(speed))
                }
            })
            .collect();
        TransitionSpec::Inline(parts.join(", "))
    }

    /// Hidden/initial state. `group` is true when animating staggered children,
    /// which exaggerates rotations and zooms.
    pub fn rewind(self, intensity: f64, group: bool) -> Vec<StyleWrite> {
        use EffectKind::*;
        let hidden = || StyleWrite::set(OPACITY, "0");
        match self {
            FadeIn => vec![hidden()],
            FadeUp => vec![hidden(), translate('Y', 1.5 * intensity, "rem")],
            FadeDown => vec![hidden(), translate('Y', -1.5 * intensity, "rem")],
            FadeLeft => vec![hidden(), translate('X', 1.5 * intensity, "rem")],
            FadeRight => vec![hidden(), translate('X', -1.5 * intensity, "rem")],
            ZoomIn => vec![hidden(), scale(1.0 - pick(group, 0.25, 0.05) * intensity)],
            ZoomOut => vec![hidden(), scale(1.0 + pick(group, 0.25, 0.05) * intensity)],
            ZoomInImage => vec![scale(1.0)],
            ZoomOutImage => vec![scale(1.0 + 0.1 * intensity)],
            BlurIn => vec![hidden(), blur(0.25 * intensity)],
            SlideLeft => vec![translate('X', 100.0, "vw")],
            SlideRight => vec![translate('X', -100.0, "vw")],
            FlipForward => flip('X', pick(group, 45.0, 15.0) * intensity),
            FlipBackward => flip('X', -pick(group, 45.0, 15.0) * intensity),
            FlipLeft => flip('Y', pick(group, 45.0, 15.0) * intensity),
            FlipRight => flip('Y', -pick(group, 45.0, 15.0) * intensity),
            TiltLeft => vec![hidden(), rotate(pick(group, 45.0, 5.0) * intensity)],
            TiltRight => vec![hidden(), rotate(-pick(group, 45.0, 5.0) * intensity)],
            FocusImage => vec![scale(1.0 + 0.05 * intensity), blur(0.25 * intensity)],
            FadeInBackground => vec![StyleWrite::remove(BACKGROUND_PROPERTY)],
            WipeUp => wipe(0, "0% 100%", "100% 0%"),
            WipeDown => wipe(0, "0% 0%", "100% 0%"),
            WipeLeft => wipe(90, "100% 0%", "0% 100%"),
            WipeRight => wipe(90, "0% 0%", "0% 100%"),
            WipeDiagonal => wipe(45, "0% 100%", "0% 0%"),
            WipeReverseDiagonal => wipe(135, "100% 100%", "0% 0%"),
        }
    }

    /// Visible/final state.
    pub fn play(self, intensity: f64, _group: bool) -> Vec<StyleWrite> {
        use EffectKind::*;
        let shown = || StyleWrite::set(OPACITY, "1");
        let no_transform = || StyleWrite::set(TRANSFORM, "none");
        match self {
            FadeIn => vec![shown()],
            SlideLeft | SlideRight | ZoomOutImage => vec![no_transform()],
            ZoomInImage => vec![scale(1.0 + 0.1 * intensity)],
            BlurIn => vec![shown(), StyleWrite::set(FILTER, "none")],
            FocusImage => vec![no_transform(), StyleWrite::set(FILTER, "none")],
            FadeInBackground => vec![StyleWrite::set(BACKGROUND_PROPERTY, "rgba(0,0,0,0.001)")],
            WipeUp | WipeDown | WipeLeft | WipeRight => {
                vec![StyleWrite::set(MASK_SIZE, "110% 110%")]
            }
            WipeDiagonal | WipeReverseDiagonal => vec![StyleWrite::set(MASK_SIZE, "220% 220%")],
            FadeUp | FadeDown | FadeLeft | FadeRight | ZoomIn | ZoomOut | FlipForward
            | FlipBackward | FlipLeft | FlipRight | TiltLeft | TiltRight => {
                vec![shown(), no_transform()]
            }
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown effect '{s}'"))
    }
}

/// Shortest round-trip rendering, matching how browsers print numbers in CSS strings.
fn num(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{v}")
    }
}

fn pick(group: bool, a: f64, b: f64) -> f64 {
    if group {
        a
    } else {
        b
    }
}

fn translate(axis: char, amount: f64, unit: &str) -> StyleWrite {
    StyleWrite::set(TRANSFORM, format!("translate{axis}({}{unit})", num(amount)))
}

fn scale(factor: f64) -> StyleWrite {
    StyleWrite::set(TRANSFORM, format!("scale({})", num(factor)))
}

fn rotate(deg: f64) -> StyleWrite {
    StyleWrite::set(TRANSFORM, format!("rotate({}deg)", num(deg)))
}

fn blur(rem: f64) -> StyleWrite {
    StyleWrite::set(FILTER, format!("blur({}rem)", num(rem)))
}

fn flip(axis: char, deg: f64) -> Vec<StyleWrite> {
    vec![
        StyleWrite::set(OPACITY, "0"),
        StyleWrite::set("transform-origin", "50% 50%"),
        StyleWrite::set(
            TRANSFORM,
            format!("perspective(1000px) rotate{axis}({}deg)", num(deg)),
        ),
    ]
}

fn wipe(angle: u16, position: &str, size: &str) -> Vec<StyleWrite> {
    let gradient = match angle {
        45 => "linear-gradient(45deg, black 50%, transparent 50%)".to_string(),
        135 => "linear-gradient(135deg, transparent 50%, black 50%)".to_string(),
        a => format!("linear-gradient({a}deg, black 100%, transparent 100%)"),
    };
    vec![
        StyleWrite::set("mask-composite", "exclude"),
        StyleWrite::set("mask-repeat", "no-repeat"),
        StyleWrite::set("mask-image", gradient),
        StyleWrite::set("mask-position", position),
        StyleWrite::set(MASK_SIZE, size),
    ]
}
