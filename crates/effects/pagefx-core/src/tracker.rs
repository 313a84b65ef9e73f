//! ScrollTracker: registry of watched elements and the per-signal evaluation pass.
//!
//! Hosts call [`ScrollTracker::evaluate`] on load, resize and scroll (and once at
//! setup). Each pass walks items in registration order, decides visibility from
//! the trigger element's geometry and fires enter/leave only on a state change.

use std::fmt;

use log::trace;

use crate::geometry::Mode;
use crate::host::Layout;
use crate::ids::{IdAllocator, WatchId};
use crate::outputs::{Edge, Pass};

/// Callback invoked with the watched element.
pub type Handler<N> = Box<dyn FnMut(&N)>;

/// Firing lifecycle of a watch item.
///
/// Replayable items with both handlers stay `Armed` forever. One-shot items move
/// `Armed -> FiredOnce` on enter and `FiredOnce -> Disabled` on leave; an item
/// missing the counterpart of the handler that just fired goes straight to
/// `Disabled`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Arming {
    #[default]
    Armed,
    FiredOnce,
    Disabled,
}

/// One tracked relationship between an animated element and its trigger.
pub struct WatchItem<N> {
    id: WatchId,
    element: N,
    trigger: N,
    enter: Option<Handler<N>>,
    leave: Option<Handler<N>>,
    mode: Mode,
    threshold: f64,
    offset: f64,
    initial_state: Option<bool>,
    replay: bool,
    state: bool,
    arming: Arming,
}

impl<N: Clone> WatchItem<N> {
    /// Watch `element`, using it as its own trigger.
    pub fn new(element: N) -> Self {
        Self {
            id: WatchId(u32::MAX),
            trigger: element.clone(),
            element,
            enter: None,
            leave: None,
            mode: Mode::default(),
            threshold: 0.25,
            offset: 0.0,
            initial_state: None,
            replay: false,
            state: false,
            arming: Arming::Armed,
        }
    }
}

impl<N> WatchItem<N> {
    /// Test geometry against `trigger` instead of the element itself.
    pub fn trigger(mut self, trigger: N) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn on_enter(mut self, f: impl FnMut(&N) + 'static) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn on_leave(mut self, f: impl FnMut(&N) + 'static) -> Self {
        self.leave = Some(Box::new(f));
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Forced verdict for the first evaluation only.
    pub fn initial_state(mut self, state: Option<bool>) -> Self {
        self.initial_state = state;
        self
    }

    pub fn replay(mut self, replay: bool) -> Self {
        self.replay = replay;
        self
    }

    pub fn id(&self) -> WatchId {
        self.id
    }

    pub fn element(&self) -> &N {
        &self.element
    }

    pub fn trigger_element(&self) -> &N {
        &self.trigger
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn arming(&self) -> Arming {
        self.arming
    }

    /// Items with no handlers, or whose handlers are spent, are skipped.
    pub fn is_live(&self) -> bool {
        self.arming != Arming::Disabled && (self.enter.is_some() || self.leave.is_some())
    }

    fn can_leave(&self) -> bool {
        self.leave.is_some() && self.arming != Arming::Disabled
    }

    fn fire_enter(&mut self) -> bool {
        if self.arming != Arming::Armed {
            return false;
        }
        let Some(enter) = self.enter.as_mut() else {
            return false;
        };
        enter(&self.element);
        self.arming = if self.leave.is_none() {
            Arming::Disabled
        } else if !self.replay {
            Arming::FiredOnce
        } else {
            Arming::Armed
        };
        true
    }

    fn fire_leave(&mut self) -> bool {
        if !self.can_leave() {
            return false;
        }
        if let Some(leave) = self.leave.as_mut() {
            leave(&self.element);
        }
        if self.enter.is_none() || self.arming == Arming::FiredOnce {
            self.arming = Arming::Disabled;
        }
        true
    }
}

impl<N> fmt::Debug for WatchItem<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchItem")
            .field("id", &self.id)
            .field("enter", &self.enter.is_some())
            .field("leave", &self.leave.is_some())
            .field("mode", &self.mode)
            .field("threshold", &self.threshold)
            .field("offset", &self.offset)
            .field("initial_state", &self.initial_state)
            .field("replay", &self.replay)
            .field("state", &self.state)
            .field("arming", &self.arming)
            .finish()
    }
}

/// Owned registry of watch items.
pub struct ScrollTracker<N> {
    ids: IdAllocator,
    items: Vec<WatchItem<N>>,
    pass: Pass,
}

impl<N> Default for ScrollTracker<N> {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            items: Vec::new(),
            pass: Pass::default(),
        }
    }
}

impl<N> fmt::Debug for ScrollTracker<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollTracker")
            .field("items", &self.items)
            .finish()
    }
}

impl<N> ScrollTracker<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. Items without handlers are accepted and never fire.
    pub fn add(&mut self, mut item: WatchItem<N>) -> WatchId {
        let id = self.ids.alloc_watch();
        item.id = id;
        item.state = false;
        self.items.push(item);
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: WatchId) -> Option<&WatchItem<N>> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &WatchItem<N>> {
        self.items.iter()
    }

    /// Recompute every item's visibility and fire handlers on transitions.
    ///
    /// Idempotent for unchanged geometry: a second call with the same layout
    /// produces an empty pass.
    pub fn evaluate<L>(&mut self, layout: &L) -> &Pass
    where
        L: Layout<Node = N> + ?Sized,
        N: Clone + 'static,
    {
        self.pass.clear();
        let viewport = layout.viewport();

        for item in &mut self.items {
            if !item.is_live() {
                continue;
            }

            let Some(bounds) = layout.bounds(&item.trigger) else {
                // Trigger not rendered: treat as hidden.
                if item.state && item.can_leave() {
                    item.state = false;
                    item.fire_leave();
                    trace!("watch {:?} left (trigger not rendered)", item.id);
                    self.pass.push(item.id, Edge::Leave);
                }
                continue;
            };

            let span = viewport.span_of(&bounds);
            let visible = match item.initial_state.take() {
                Some(forced) => forced,
                None => item
                    .mode
                    .is_visible(&viewport, span, item.threshold, item.offset),
            };

            if visible == item.state {
                continue;
            }
            item.state = visible;

            let (fired, edge) = if visible {
                (item.fire_enter(), Edge::Enter)
            } else {
                (item.fire_leave(), Edge::Leave)
            };
            if fired {
                trace!("watch {:?} fired {:?}", item.id, edge);
                self.pass.push(item.id, edge);
            }
        }

        &self.pass
    }
}
