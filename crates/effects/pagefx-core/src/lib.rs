//! pagefx core (host-agnostic)
//!
//! Scroll-triggered visibility animations for static pages. The crate owns the
//! geometry and state-transition logic; adapters (the wasm/DOM crate, test fakes)
//! implement the host traits in [`host`] and drive [`VisibilityAnimator::evaluate`]
//! from load/resize/scroll signals.

pub mod animator;
pub mod config;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod host;
pub mod ids;
pub mod outputs;
pub mod platform;
pub mod settings;
pub mod stagger;
pub mod text;
pub mod tracker;
pub mod typewriter;

// Re-exports for consumers (adapters)
pub use animator::VisibilityAnimator;
pub use config::Config;
pub use effects::{EffectKind, StyleWrite, TransitionSpec};
pub use error::{Error, Result};
pub use geometry::{Bounds, Mode, ScrollSample, Viewport};
pub use host::{Host, Layout, VisualTarget};
pub use ids::WatchId;
pub use outputs::{Edge, Firing, Pass};
pub use platform::{Browser, Client, Os};
pub use settings::{Binding, Registration, Settings, ALL_CHILDREN};
pub use stagger::StaggerOrder;
pub use text::{tokenize, TextPiece};
pub use tracker::{Arming, ScrollTracker, WatchItem};
pub use typewriter::{Tick, Typewriter};
