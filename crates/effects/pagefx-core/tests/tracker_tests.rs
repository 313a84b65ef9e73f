mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{FakeHost, NodeId};
use pagefx_core::{Arming, Edge, Mode, ScrollTracker, WatchId, WatchItem};

type Log = Rc<RefCell<Vec<(Edge, NodeId)>>>;

fn recorder() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn watch(el: NodeId, log: &Log, enter: bool, leave: bool) -> WatchItem<NodeId> {
    let mut item = WatchItem::new(el);
    if enter {
        let log = Rc::clone(log);
        item = item.on_enter(move |n| log.borrow_mut().push((Edge::Enter, *n)));
    }
    if leave {
        let log = Rc::clone(log);
        item = item.on_leave(move |n| log.borrow_mut().push((Edge::Leave, *n)));
    }
    item
}

fn count(log: &Log, edge: Edge) -> usize {
    log.borrow().iter().filter(|(e, _)| *e == edge).count()
}

/// Page 5000 tall, viewport 800, one 100px element at y=1000.
fn page() -> (FakeHost, NodeId) {
    let host = FakeHost::new(800.0, 5000.0);
    let el = host.element(host.body(), "div", Some("a"), 1000.0, 100.0);
    (host, el)
}

const IN_VIEW: f64 = 700.0;
const OUT_OF_VIEW: f64 = 3000.0;

#[test]
fn evaluate_is_idempotent_without_geometry_change() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    tracker.add(watch(el, &log, true, true).replay(true));

    host.scroll_to(IN_VIEW);
    assert_eq!(tracker.evaluate(&host).firings.len(), 1);
    assert!(tracker.evaluate(&host).is_empty());
    assert!(tracker.evaluate(&host).is_empty());
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn one_shot_fires_enter_and_leave_once() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let id = tracker.add(watch(el, &log, true, true));

    for top in [0.0, IN_VIEW, OUT_OF_VIEW, IN_VIEW, OUT_OF_VIEW, IN_VIEW] {
        host.scroll_to(top);
        tracker.evaluate(&host);
    }

    assert_eq!(count(&log, Edge::Enter), 1);
    assert_eq!(count(&log, Edge::Leave), 1);
    assert_eq!(tracker.get(id).unwrap().arming(), Arming::Disabled);
}

#[test]
fn one_shot_moves_through_arming_states() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let id = tracker.add(watch(el, &log, true, true));
    assert_eq!(tracker.get(id).unwrap().arming(), Arming::Armed);

    host.scroll_to(IN_VIEW);
    tracker.evaluate(&host);
    assert_eq!(tracker.get(id).unwrap().arming(), Arming::FiredOnce);

    host.scroll_to(OUT_OF_VIEW);
    tracker.evaluate(&host);
    assert_eq!(tracker.get(id).unwrap().arming(), Arming::Disabled);
    assert!(!tracker.get(id).unwrap().is_live());
}

#[test]
fn replay_alternates_for_every_crossing() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    tracker.add(watch(el, &log, true, true).replay(true));

    const N: usize = 4;
    for _ in 0..N {
        host.scroll_to(IN_VIEW);
        tracker.evaluate(&host);
        host.scroll_to(OUT_OF_VIEW);
        tracker.evaluate(&host);
    }

    let edges: Vec<Edge> = log.borrow().iter().map(|(e, _)| *e).collect();
    assert_eq!(edges.len(), 2 * N);
    for (i, e) in edges.iter().enumerate() {
        let want = if i % 2 == 0 { Edge::Enter } else { Edge::Leave };
        assert_eq!(*e, want, "firing #{i}");
    }
}

#[test]
fn enter_only_item_disables_itself() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let id = tracker.add(watch(el, &log, true, false).replay(true));

    for top in [IN_VIEW, OUT_OF_VIEW, IN_VIEW] {
        host.scroll_to(top);
        tracker.evaluate(&host);
    }
    assert_eq!(count(&log, Edge::Enter), 1);
    assert_eq!(tracker.get(id).unwrap().arming(), Arming::Disabled);
}

#[test]
fn leave_only_item_tracks_state_silently_until_it_leaves() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let id = tracker.add(watch(el, &log, false, true));

    host.scroll_to(IN_VIEW);
    assert!(tracker.evaluate(&host).is_empty());
    assert!(tracker.get(id).unwrap().state());

    host.scroll_to(OUT_OF_VIEW);
    let pass = tracker.evaluate(&host);
    assert_eq!(pass.left().collect::<Vec<_>>(), vec![id]);

    host.scroll_to(IN_VIEW);
    tracker.evaluate(&host);
    host.scroll_to(OUT_OF_VIEW);
    tracker.evaluate(&host);
    assert_eq!(count(&log, Edge::Leave), 1);
}

#[test]
fn item_without_handlers_is_inert() {
    let (host, el) = page();
    let mut tracker = ScrollTracker::new();
    let id = tracker.add(WatchItem::new(el));
    host.scroll_to(IN_VIEW);
    assert!(tracker.evaluate(&host).is_empty());
    assert!(!tracker.get(id).unwrap().state());
    assert!(!tracker.get(id).unwrap().is_live());
}

#[test]
fn intersection_band_boundary_is_inclusive() {
    let host = FakeHost::new(800.0, 5000.0);
    let exact = host.element(host.body(), "div", None, 1200.0, 400.0);
    let beyond = host.element(host.body(), "div", None, 1601.0, 0.0);
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let exact_id = tracker.add(watch(exact, &log, true, false).threshold(0.25));
    let beyond_id = tracker.add(watch(beyond, &log, true, false).threshold(0.25));

    // pad = 200, band = [1200, 1600].
    host.scroll_to(1000.0);
    let entered: Vec<WatchId> = tracker.evaluate(&host).entered().collect();
    assert_eq!(entered, vec![exact_id]);
    assert!(!tracker.get(beyond_id).unwrap().state());
}

#[test]
fn hidden_trigger_counts_as_leaving() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let id = tracker.add(watch(el, &log, true, true).replay(true));

    host.scroll_to(IN_VIEW);
    tracker.evaluate(&host);

    host.set_layout(el, None);
    let left: Vec<WatchId> = tracker.evaluate(&host).left().collect();
    assert_eq!(left, vec![id]);
    assert!(!tracker.get(id).unwrap().state());
    // Still hidden: nothing more.
    assert!(tracker.evaluate(&host).is_empty());

    host.set_layout(el, Some((1000.0, 100.0)));
    let entered: Vec<WatchId> = tracker.evaluate(&host).entered().collect();
    assert_eq!(entered, vec![id]);
}

#[test]
fn hidden_trigger_fires_leave_only_item() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let id = tracker.add(watch(el, &log, false, true));
    host.scroll_to(IN_VIEW);
    tracker.evaluate(&host);
    assert!(tracker.get(id).unwrap().state());

    host.set_layout(el, None);
    let pass = tracker.evaluate(&host);
    assert_eq!(pass.firings.len(), 1);
    assert_eq!(count(&log, Edge::Leave), 1);
    assert_eq!(tracker.get(id).unwrap().arming(), Arming::Disabled);
}

#[test]
fn initial_state_overrides_first_verdict_only() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    tracker.add(watch(el, &log, true, true).replay(true).initial_state(Some(true)));

    host.scroll_to(OUT_OF_VIEW);
    tracker.evaluate(&host);
    assert_eq!(count(&log, Edge::Enter), 1);

    tracker.evaluate(&host);
    assert_eq!(count(&log, Edge::Leave), 1);
}

#[test]
fn firings_follow_registration_order() {
    let host = FakeHost::new(800.0, 5000.0);
    let lower = host.element(host.body(), "div", None, 1300.0, 50.0);
    let upper = host.element(host.body(), "div", None, 1000.0, 50.0);
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let first = tracker.add(watch(lower, &log, true, false));
    let second = tracker.add(watch(upper, &log, true, false));

    host.scroll_to(IN_VIEW);
    let order: Vec<WatchId> = tracker.evaluate(&host).entered().collect();
    assert_eq!(order, vec![first, second]);
    let nodes: Vec<NodeId> = log.borrow().iter().map(|(_, n)| *n).collect();
    assert_eq!(nodes, vec![lower, upper]);
}

#[test]
fn geometry_comes_from_the_trigger() {
    let host = FakeHost::new(800.0, 5000.0);
    let container = host.element(host.body(), "section", None, 1000.0, 200.0);
    let inner = host.element(container, "p", None, 3000.0, 20.0);
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    tracker.add(watch(inner, &log, true, false).trigger(container));

    host.scroll_to(IN_VIEW);
    tracker.evaluate(&host);
    assert_eq!(log.borrow().as_slice(), &[(Edge::Enter, inner)]);
}

#[test]
fn other_modes_drive_visibility() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    let within = tracker.add(watch(el, &log, true, false).mode(Mode::WithinViewport));
    let midpoint = tracker.add(watch(el, &log, true, false).mode(Mode::Midpoint));

    // Viewport [250, 1050]: overlaps the element, midpoint 650 is above it.
    host.scroll_to(250.0);
    let entered: Vec<WatchId> = tracker.evaluate(&host).entered().collect();
    assert_eq!(entered, vec![within]);

    // Viewport [640, 1440]: midpoint 1040 inside [1000, 1100].
    host.scroll_to(640.0);
    let entered: Vec<WatchId> = tracker.evaluate(&host).entered().collect();
    assert_eq!(entered, vec![midpoint]);
}

#[test]
fn offset_widens_the_element() {
    let (host, el) = page();
    let log = recorder();
    let mut tracker = ScrollTracker::new();
    tracker.add(
        watch(el, &log, true, false)
            .mode(Mode::WithinViewport)
            .offset(50.0),
    );
    // Viewport bottom at 900 stays clear of 1000 - 50; 951 reaches it.
    host.scroll_to(100.0);
    assert!(tracker.evaluate(&host).is_empty());
    host.scroll_to(151.0);
    assert_eq!(tracker.evaluate(&host).firings.len(), 1);
}
