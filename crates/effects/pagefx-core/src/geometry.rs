//! Viewport geometry and the four visibility detection modes.
//!
//! All coordinates are document-absolute CSS pixels growing downwards. Hosts
//! report raw scroll metrics ([`ScrollSample`]) and viewport-relative element
//! rectangles ([`Bounds`]); this module turns them into absolute spans.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::platform::{Client, Os};

/// Vertical extent of a rendered element, relative to the viewport
/// (as reported by `getBoundingClientRect`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Raw scroll metrics read from the document on every pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    /// `document.documentElement.scrollTop`
    pub document_scroll_top: f64,
    /// `document.body.scrollTop`
    pub body_scroll_top: f64,
    /// `window.scrollY`
    pub window_scroll_y: f64,
    /// `document.documentElement.clientHeight`
    pub client_height: f64,
    /// `document.body.scrollHeight`
    pub scroll_height: f64,
}

/// Visible window into the document for one evaluation pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
    /// Total scrollable document height.
    pub document_height: f64,
    /// Platform padding used by the midsection mode near the document end.
    pub scroll_pad: f64,
}

impl Viewport {
    pub fn new(top: f64, height: f64, document_height: f64) -> Self {
        Self {
            top,
            height,
            document_height,
            scroll_pad: 0.0,
        }
    }

    /// Build a viewport from raw metrics, applying the iOS scroll accounting quirk.
    pub fn measure(sample: &ScrollSample, client: &Client, cfg: &Config) -> Self {
        let (top, scroll_pad) = match client.os {
            Os::Ios => (
                sample.body_scroll_top + sample.window_scroll_y,
                cfg.ios_scroll_pad,
            ),
            _ => (sample.document_scroll_top, 0.0),
        };
        Self {
            top,
            height: sample.client_height,
            document_height: sample.scroll_height,
            scroll_pad,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Absolute span of an element given its viewport-relative bounds.
    pub fn span_of(&self, bounds: &Bounds) -> Span {
        let top = self.top + bounds.top.floor();
        Span {
            top,
            bottom: top + bounds.height,
        }
    }
}

/// Absolute vertical span of a trigger element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Span {
    pub top: f64,
    pub bottom: f64,
}

/// Geometry strategy deciding whether a trigger element counts as visible.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mode {
    /// Any overlap between the element and the viewport.
    WithinViewport,
    /// The viewport's vertical midpoint lies inside the element.
    Midpoint,
    /// A threshold-shrunken band of the viewport overlaps the element.
    Midsection,
    /// Padded-band intersection; handles elements taller than the band.
    #[default]
    Intersection,
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Mode::WithinViewport),
            2 => Ok(Mode::Midpoint),
            3 => Ok(Mode::Midsection),
            4 => Ok(Mode::Intersection),
            other => Err(Error::InvalidMode(other)),
        }
    }
}

impl From<Mode> for u8 {
    fn from(m: Mode) -> u8 {
        match m {
            Mode::WithinViewport => 1,
            Mode::Midpoint => 2,
            Mode::Midsection => 3,
            Mode::Intersection => 4,
        }
    }
}

impl Mode {
    /// Visibility verdict for `span` under this mode.
    pub fn is_visible(self, vp: &Viewport, span: Span, threshold: f64, offset: f64) -> bool {
        let top = vp.top;
        let bottom = vp.bottom();
        let height = vp.height;

        match self {
            Mode::WithinViewport => bottom > span.top - offset && top < span.bottom + offset,
            Mode::Midpoint => {
                let mid = top + height * 0.5;
                mid > span.top - offset && mid < span.bottom + offset
            }
            Mode::Midsection => {
                let mut upper = top + height * threshold;
                if upper - height * 0.375 <= 0.0 {
                    upper = 0.0;
                }
                let mut lower = top + height * (1.0 - threshold);
                if lower + height * 0.375 >= vp.document_height - vp.scroll_pad {
                    lower = vp.document_height + vp.scroll_pad;
                }
                lower > span.top - offset && upper < span.bottom + offset
            }
            Mode::Intersection => {
                let pad = height * threshold;
                let mut band_top = top + pad;
                let mut band_bottom = bottom - pad;

                // Near the document edges the band grows back to the full viewport,
                // otherwise the first/last elements could never qualify.
                if top.floor() <= pad {
                    band_top = top;
                }
                if bottom.ceil() >= vp.document_height - pad {
                    band_bottom = bottom;
                }

                let top_inside = span.top >= band_top && span.top <= band_bottom;
                let bottom_inside = span.bottom >= band_top && span.bottom <= band_bottom;

                if band_bottom - band_top >= span.bottom - span.top {
                    (span.top >= band_top && span.bottom <= band_bottom)
                        || top_inside
                        || bottom_inside
                } else {
                    (band_top >= span.top && band_bottom <= span.bottom)
                        || top_inside
                        || bottom_inside
                }
            }
        }
    }
}
