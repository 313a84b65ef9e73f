//! Host traits.
//!
//! The core never touches a DOM directly. Adapters (the wasm crate, test fakes)
//! implement these traits and hand the host to [`crate::ScrollTracker`] /
//! [`crate::VisibilityAnimator`].

use crate::effects::StyleWrite;
use crate::geometry::{Bounds, Viewport};

/// Geometry queries needed by the tracker.
pub trait Layout {
    /// Cheap handle to a host element.
    type Node: Clone + 'static;

    /// Current viewport, platform quirks already applied.
    fn viewport(&self) -> Viewport;

    /// Viewport-relative bounds of `node`, or `None` when it is not rendered.
    fn bounds(&self, node: &Self::Node) -> Option<Bounds>;
}

/// Style mutations needed to play and rewind effects.
pub trait VisualTarget: Layout {
    /// Current inline `transition` value (empty when unset).
    fn transition(&self, node: &Self::Node) -> String;

    fn set_transition(&self, node: &Self::Node, value: &str);

    fn apply_styles(&self, node: &Self::Node, writes: &[StyleWrite]);

    fn apply_rewind_state(&self, node: &Self::Node, writes: &[StyleWrite]) {
        self.apply_styles(node, writes);
    }

    fn apply_play_state(&self, node: &Self::Node, writes: &[StyleWrite]) {
        self.apply_styles(node, writes);
    }
}

/// Everything the animator needs: document queries, deferred tasks and randomness.
///
/// Implementations are cloned into every enter/leave closure, so they should be
/// cheap handles (`Rc`, JS references).
pub trait Host: VisualTarget + Clone + 'static {
    fn select_all(&self, selector: &str) -> Vec<Self::Node>;

    fn select_within(&self, node: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` is explicitly marked as a shared trigger.
    fn is_trigger(&self, node: &Self::Node) -> bool;

    /// Replace the direct text children of `node` with token wrappers
    /// (see [`crate::text::tokenize`]).
    fn expand_text_nodes(&self, node: &Self::Node);

    /// Run `task` once after `seconds`. Fire-and-forget.
    fn defer(&self, seconds: f64, task: Box<dyn FnOnce()>);

    /// Uniform sample in `[0, 1)`.
    fn random(&self) -> f64;
}
