//! VisibilityAnimator: binds `(selector, settings)` registrations to effects.
//!
//! For every matched element the animator:
//! - expands text nodes and collects stagger children when grouping is on,
//! - applies the effect's rewind state right away,
//! - picks the trigger element (self, or a marked parent/grandparent),
//! - registers a watch whose enter/leave closures play/rewind the effect.

use std::rc::Rc;

use log::debug;

use crate::config::Config;
use crate::effects::{EffectKind, StyleWrite, TransitionSpec};
use crate::host::Host;
use crate::ids::WatchId;
use crate::outputs::Pass;
use crate::settings::{Binding, Registration, Settings, ALL_CHILDREN};
use crate::stagger;
use crate::tracker::{ScrollTracker, WatchItem};

/// Rendering hint held while a non-custom transition runs.
const ISOLATION_HINT: &str = "backface-visibility";

pub struct VisibilityAnimator<H: Host> {
    host: H,
    cfg: Config,
    tracker: ScrollTracker<H::Node>,
}

impl<H: Host> VisibilityAnimator<H> {
    pub fn new(host: H, cfg: Config) -> Self {
        Self {
            host,
            cfg,
            tracker: ScrollTracker::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn tracker(&self) -> &ScrollTracker<H::Node> {
        &self.tracker
    }

    /// Register every element matched by `selector`. Returns one watch per element.
    pub fn add(&mut self, selector: &str, settings: &Settings) -> Vec<WatchId> {
        let binding = Rc::new(Binding::resolve(settings, self.cfg.fallback_effect));
        let elements = self.host.select_all(selector);
        debug!(
            "onvisible '{selector}': {} element(s), effect '{}'",
            elements.len(),
            binding.effect
        );
        elements
            .into_iter()
            .map(|element| self.watch(element, Rc::clone(&binding)))
            .collect()
    }

    pub fn add_all(&mut self, registrations: &[Registration]) -> Vec<WatchId> {
        registrations
            .iter()
            .flat_map(|r| self.add(&r.selector, &r.settings))
            .collect()
    }

    /// Run one tracker pass against the host's current layout.
    pub fn evaluate(&mut self) -> &Pass {
        self.tracker.evaluate(&self.host)
    }

    fn watch(&mut self, element: H::Node, binding: Rc<Binding>) -> WatchId {
        let host = &self.host;

        let children: Option<Rc<Vec<H::Node>>> = binding.stagger_selector().map(|selector| {
            if selector == ALL_CHILDREN {
                host.expand_text_nodes(&element);
            }
            Rc::new(host.select_within(&element, selector))
        });

        // Start hidden so nothing flashes before the first pass.
        match &children {
            Some(kids) => {
                for kid in kids.iter() {
                    rewind_now(host, kid, &binding, true);
                }
            }
            None => rewind_now(host, &element, &binding, false),
        }

        let trigger = self.trigger_for(&element);
        let item = WatchItem::new(element)
            .trigger(trigger)
            .threshold(binding.threshold)
            .initial_state(binding.state)
            .replay(binding.replay);

        let item = match children {
            Some(kids) => {
                let (h, b, k) = (host.clone(), Rc::clone(&binding), Rc::clone(&kids));
                let item = item.on_enter(move |_| {
                    let step = b.stagger.unwrap_or_default();
                    for (index, delay) in stagger::plan(k.len(), b.stagger_order, step, || h.random()) {
                        play(&h, &k[index], &b, delay, true);
                    }
                });
                if binding.replay {
                    let (h, b) = (host.clone(), Rc::clone(&binding));
                    item.on_leave(move |_| {
                        for kid in kids.iter() {
                            rewind(&h, kid, &b, true);
                        }
                    })
                } else {
                    item
                }
            }
            None => {
                let (h, b) = (host.clone(), Rc::clone(&binding));
                let item = item.on_enter(move |el| play(&h, el, &b, 0.0, false));
                if binding.replay {
                    let (h, b) = (host.clone(), Rc::clone(&binding));
                    item.on_leave(move |el| rewind(&h, el, &b, false))
                } else {
                    item
                }
            }
        };

        self.tracker.add(item)
    }

    /// A parent or grandparent marked as trigger takes over the geometry check.
    fn trigger_for(&self, element: &H::Node) -> H::Node {
        let Some(parent) = self.host.parent(element) else {
            return element.clone();
        };
        if self.host.is_trigger(&parent) {
            return parent;
        }
        match self.host.parent(&parent) {
            Some(grandparent) if self.host.is_trigger(&grandparent) => grandparent,
            _ => element.clone(),
        }
    }
}

/// The node that actually receives style writes for `effect`.
fn visual_target<H: Host>(host: &H, node: &H::Node, effect: EffectKind) -> Option<H::Node> {
    match effect.target() {
        Some(selector) => host.select_within(node, selector).into_iter().next(),
        None => Some(node.clone()),
    }
}

fn rewind_now<H: Host>(host: &H, node: &H::Node, b: &Binding, group: bool) {
    if let Some(target) = visual_target(host, node, b.effect) {
        host.apply_rewind_state(&target, &b.effect.rewind(b.intensity, group));
    }
}

fn play<H: Host>(host: &H, node: &H::Node, b: &Binding, stagger_delay: f64, group: bool) {
    let Some(target) = visual_target(host, node, b.effect) else {
        debug!("effect '{}' target missing, skipping play", b.effect);
        return;
    };
    let delay = b.delay + stagger_delay;
    let original = begin_transition(host, &target, b.effect.transition(b.speed, delay));
    host.apply_play_state(&target, &b.effect.play(b.intensity, group));
    if let Some(original) = original {
        restore_later(host, target, original, (b.speed + delay) * 2.0);
    }
}

fn rewind<H: Host>(host: &H, node: &H::Node, b: &Binding, group: bool) {
    let Some(target) = visual_target(host, node, b.effect) else {
        debug!("effect '{}' target missing, skipping rewind", b.effect);
        return;
    };
    let original = begin_transition(host, &target, b.effect.transition(b.speed, 0.0));
    host.apply_rewind_state(&target, &b.effect.rewind(b.intensity, group));
    if let Some(original) = original {
        restore_later(host, target, original, b.speed * 2.0);
    }
}

/// Apply the transition. Returns the inline transition to restore afterwards,
/// or `None` for custom effects that manage their own timing.
fn begin_transition<H: Host>(host: &H, target: &H::Node, spec: TransitionSpec) -> Option<String> {
    match spec {
        TransitionSpec::Custom(writes) => {
            host.apply_styles(target, &writes);
            None
        }
        TransitionSpec::Inline(value) => {
            let original = host.transition(target);
            host.apply_styles(target, &[StyleWrite::set(ISOLATION_HINT, "hidden")]);
            host.set_transition(target, &value);
            Some(original)
        }
    }
}

// Not cancelled on re-entry; overlapping cleanups on one node are last-write-wins.
fn restore_later<H: Host>(host: &H, target: H::Node, original: String, after: f64) {
    let h = host.clone();
    host.defer(
        after,
        Box::new(move || {
            h.apply_styles(&target, &[StyleWrite::remove(ISOLATION_HINT)]);
            h.set_transition(&target, &original);
        }),
    );
}
