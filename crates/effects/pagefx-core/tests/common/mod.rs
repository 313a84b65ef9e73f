//! In-memory host used by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use pagefx_core::text::{tokenize, TextPiece};
use pagefx_core::{Bounds, Host, Layout, StyleWrite, Viewport, VisualTarget};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Debug)]
pub enum Content {
    Element {
        tag: String,
        id: Option<String>,
        trigger: bool,
    },
    Text(String),
}

#[derive(Clone, Debug)]
pub struct FakeNode {
    pub content: Content,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Absolute document top/height; `None` means not rendered.
    pub layout: Option<(f64, f64)>,
    pub styles: BTreeMap<String, String>,
    pub transition: String,
}

pub struct Deferred {
    pub at: f64,
    pub task: Box<dyn FnOnce()>,
}

#[derive(Default)]
pub struct FakeDoc {
    pub nodes: Vec<FakeNode>,
    pub viewport: Viewport,
    pub now: f64,
    pub deferred: Vec<Deferred>,
    pub randoms: Vec<f64>,
    /// Every transition value ever set, per node, in order.
    pub transition_log: Vec<(NodeId, String)>,
}

/// Cheap cloneable handle, like a JS document reference.
#[derive(Clone, Default)]
pub struct FakeHost(pub Rc<RefCell<FakeDoc>>);

impl FakeHost {
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        let host = FakeHost::default();
        host.0.borrow_mut().viewport = Viewport::new(0.0, viewport_height, document_height);
        host.0.borrow_mut().nodes.push(FakeNode {
            content: Content::Element {
                tag: "body".into(),
                id: None,
                trigger: false,
            },
            parent: None,
            children: Vec::new(),
            layout: Some((0.0, document_height)),
            styles: BTreeMap::new(),
            transition: String::new(),
        });
        host
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    pub fn element(&self, parent: NodeId, tag: &str, id: Option<&str>, top: f64, height: f64) -> NodeId {
        self.push(
            parent,
            Content::Element {
                tag: tag.into(),
                id: id.map(str::to_string),
                trigger: false,
            },
            Some((top, height)),
        )
    }

    pub fn text(&self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, Content::Text(text.into()), None)
    }

    fn push(&self, parent: NodeId, content: Content, layout: Option<(f64, f64)>) -> NodeId {
        let mut doc = self.0.borrow_mut();
        let id = NodeId(doc.nodes.len());
        doc.nodes.push(FakeNode {
            content,
            parent: Some(parent),
            children: Vec::new(),
            layout,
            styles: BTreeMap::new(),
            transition: String::new(),
        });
        doc.nodes[parent.0].children.push(id);
        id
    }

    pub fn mark_trigger(&self, node: NodeId) {
        if let Content::Element { trigger, .. } = &mut self.0.borrow_mut().nodes[node.0].content {
            *trigger = true;
        }
    }

    pub fn set_layout(&self, node: NodeId, layout: Option<(f64, f64)>) {
        self.0.borrow_mut().nodes[node.0].layout = layout;
    }

    pub fn scroll_to(&self, top: f64) {
        self.0.borrow_mut().viewport.top = top;
    }

    pub fn style(&self, node: NodeId, prop: &str) -> Option<String> {
        self.0.borrow().nodes[node.0].styles.get(prop).cloned()
    }

    pub fn inline_transition(&self, node: NodeId) -> String {
        self.0.borrow().nodes[node.0].transition.clone()
    }

    pub fn set_inline_transition(&self, node: NodeId, value: &str) {
        self.0.borrow_mut().nodes[node.0].transition = value.to_string();
    }

    pub fn transitions_of(&self, node: NodeId) -> Vec<String> {
        self.0
            .borrow()
            .transition_log
            .iter()
            .filter(|(n, _)| *n == node)
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn queue_randoms(&self, values: &[f64]) {
        self.0.borrow_mut().randoms.extend_from_slice(values);
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.0.borrow().nodes[node.0].children.clone()
    }

    pub fn content(&self, node: NodeId) -> Content {
        self.0.borrow().nodes[node.0].content.clone()
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().deferred.len()
    }

    /// Advance the fake clock and run every task that came due, in due order.
    pub fn advance(&self, seconds: f64) {
        let now = {
            let mut doc = self.0.borrow_mut();
            doc.now += seconds;
            doc.now
        };
        loop {
            let next = {
                let mut doc = self.0.borrow_mut();
                let due = doc
                    .deferred
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.at <= now + 1e-9)
                    .min_by(|a, b| a.1.at.total_cmp(&b.1.at))
                    .map(|(i, _)| i);
                due.map(|i| doc.deferred.remove(i))
            };
            match next {
                Some(d) => (d.task)(),
                None => break,
            }
        }
    }

    fn tag_of(&self, node: NodeId) -> Option<String> {
        match &self.0.borrow().nodes[node.0].content {
            Content::Element { tag, .. } => Some(tag.clone()),
            Content::Text(_) => None,
        }
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        let doc = self.0.borrow();
        let Content::Element { tag, id, .. } = &doc.nodes[node.0].content else {
            return false;
        };
        match selector.strip_prefix('#') {
            Some(want) => id.as_deref() == Some(want),
            None => tag == selector,
        }
    }

    fn descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            out.push(child);
            self.descendants(child, out);
        }
    }
}

impl Layout for FakeHost {
    type Node = NodeId;

    fn viewport(&self) -> Viewport {
        self.0.borrow().viewport
    }

    fn bounds(&self, node: &NodeId) -> Option<Bounds> {
        let doc = self.0.borrow();
        let (top, height) = doc.nodes[node.0].layout?;
        Some(Bounds::new(top - doc.viewport.top, height))
    }
}

impl VisualTarget for FakeHost {
    fn transition(&self, node: &NodeId) -> String {
        self.inline_transition(*node)
    }

    fn set_transition(&self, node: &NodeId, value: &str) {
        let mut doc = self.0.borrow_mut();
        doc.nodes[node.0].transition = value.to_string();
        doc.transition_log.push((*node, value.to_string()));
    }

    fn apply_styles(&self, node: &NodeId, writes: &[StyleWrite]) {
        let mut doc = self.0.borrow_mut();
        let styles = &mut doc.nodes[node.0].styles;
        for w in writes {
            match w {
                StyleWrite::Set { property, value } => {
                    styles.insert(property.to_string(), value.clone());
                }
                StyleWrite::Remove { property } => {
                    styles.remove(*property);
                }
            }
        }
    }
}

impl Host for FakeHost {
    fn select_all(&self, selector: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(self.body(), &mut all);
        all.into_iter().filter(|n| self.matches(*n, selector)).collect()
    }

    fn select_within(&self, node: &NodeId, selector: &str) -> Vec<NodeId> {
        if selector == ":scope > *" {
            return self
                .children(*node)
                .into_iter()
                .filter(|c| self.tag_of(*c).is_some())
                .collect();
        }
        let mut all = Vec::new();
        self.descendants(*node, &mut all);
        all.into_iter().filter(|n| self.matches(*n, selector)).collect()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.0.borrow().nodes[node.0].parent
    }

    fn is_trigger(&self, node: &NodeId) -> bool {
        matches!(
            self.0.borrow().nodes[node.0].content,
            Content::Element { trigger: true, .. }
        )
    }

    fn expand_text_nodes(&self, node: &NodeId) {
        let layout = self.0.borrow().nodes[node.0].layout;
        let mut rebuilt = Vec::new();
        for child in self.children(*node) {
            let Content::Text(text) = self.content(child) else {
                rebuilt.push(child);
                continue;
            };
            for piece in tokenize(&text) {
                let content = match piece {
                    // Token wrappers carry their text in `id` so tests can read it back.
                    TextPiece::Token(t) => Content::Element {
                        tag: "text-node".into(),
                        id: Some(t.to_string()),
                        trigger: false,
                    },
                    TextPiece::Gap(g) => Content::Text(g.to_string()),
                };
                let mut doc = self.0.borrow_mut();
                let id = NodeId(doc.nodes.len());
                doc.nodes.push(FakeNode {
                    content,
                    parent: Some(*node),
                    children: Vec::new(),
                    layout,
                    styles: BTreeMap::new(),
                    transition: String::new(),
                });
                rebuilt.push(id);
            }
            self.0.borrow_mut().nodes[child.0].parent = None;
        }
        self.0.borrow_mut().nodes[node.0].children = rebuilt;
    }

    fn defer(&self, seconds: f64, task: Box<dyn FnOnce()>) {
        let mut doc = self.0.borrow_mut();
        let at = doc.now + seconds;
        doc.deferred.push(Deferred { at, task });
    }

    fn random(&self) -> f64 {
        let mut doc = self.0.borrow_mut();
        if doc.randoms.is_empty() {
            0.0
        } else {
            doc.randoms.remove(0)
        }
    }
}
