//! `web-sys` implementation of the core host traits.

use std::rc::Rc;

use log::warn;
use pagefx_core::text::{tokenize, TextPiece};
use pagefx_core::{
    Bounds, Client, Config, Host, Layout, ScrollSample, StyleWrite, Viewport, VisualTarget,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node, Window};

struct DomState {
    window: Window,
    document: Document,
    client: Client,
    cfg: Config,
}

/// Live document handle. Clones share the same window and detected client.
#[derive(Clone)]
pub struct DomHost {
    state: Rc<DomState>,
}

impl DomHost {
    pub fn new(cfg: Config) -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("window has no document"))?;
        let client = detect_client(&window);
        Ok(Self {
            state: Rc::new(DomState {
                window,
                document,
                client,
                cfg,
            }),
        })
    }

    pub fn client(&self) -> &Client {
        &self.state.client
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    fn sample(&self) -> ScrollSample {
        let s = &self.state;
        let root = s.document.document_element();
        let body = s.document.body();
        ScrollSample {
            document_scroll_top: root.as_ref().map_or(0, |r| r.scroll_top()) as f64,
            body_scroll_top: body.as_ref().map_or(0, |b| b.scroll_top()) as f64,
            window_scroll_y: s.window.scroll_y().unwrap_or(0.0),
            client_height: root.as_ref().map_or(0, |r| r.client_height()) as f64,
            scroll_height: body.as_ref().map_or(0, |b| b.scroll_height()) as f64,
        }
    }

    fn expand_into(&self, element: &Element, text: &Node) -> Result<(), JsValue> {
        let content = text.node_value().unwrap_or_default();
        for piece in tokenize(&content) {
            let node: Node = match piece {
                TextPiece::Token(word) => {
                    let wrapper = self.state.document.create_element(&self.state.cfg.text_node_tag)?;
                    wrapper.set_text_content(Some(word));
                    wrapper.into()
                }
                TextPiece::Gap(gap) => self.state.document.create_text_node(gap).into(),
            };
            element.insert_before(&node, Some(text))?;
        }
        element.remove_child(text)?;
        Ok(())
    }
}

fn detect_client(window: &Window) -> Client {
    let nav = window.navigator();
    let ua = nav.user_agent().unwrap_or_default();
    let has_touch = nav.max_touch_points() > 0;
    let (w, h) = window
        .screen()
        .map(|s| (s.width().unwrap_or(0), s.height().unwrap_or(0)))
        .unwrap_or((0, 0));
    Client::detect(&ua, has_touch, w.max(0) as u32, h.max(0) as u32)
}

fn nodes_to_elements(list: web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

fn style_of(node: &Element) -> Option<web_sys::CssStyleDeclaration> {
    node.dyn_ref::<HtmlElement>().map(HtmlElement::style)
}

impl Layout for DomHost {
    type Node = Element;

    fn viewport(&self) -> Viewport {
        Viewport::measure(&self.sample(), &self.state.client, &self.state.cfg)
    }

    fn bounds(&self, node: &Element) -> Option<Bounds> {
        // No offset parent: detached or display:none.
        node.dyn_ref::<HtmlElement>()?.offset_parent()?;
        let rect = node.get_bounding_client_rect();
        Some(Bounds::new(rect.top(), rect.height()))
    }
}

impl VisualTarget for DomHost {
    fn transition(&self, node: &Element) -> String {
        style_of(node)
            .and_then(|s| s.get_property_value("transition").ok())
            .unwrap_or_default()
    }

    fn set_transition(&self, node: &Element, value: &str) {
        if let Some(style) = style_of(node) {
            if let Err(e) = style.set_property("transition", value) {
                warn!("set transition failed: {e:?}");
            }
        }
    }

    fn apply_styles(&self, node: &Element, writes: &[StyleWrite]) {
        let Some(style) = style_of(node) else {
            return;
        };
        for w in writes {
            let res = match w {
                StyleWrite::Set { property, value } => style.set_property(property, value),
                StyleWrite::Remove { property } => style.remove_property(property).map(drop),
            };
            if let Err(e) = res {
                warn!("style write to '{}' failed: {e:?}", w.property());
            }
        }
    }
}

impl Host for DomHost {
    fn select_all(&self, selector: &str) -> Vec<Element> {
        match self.state.document.query_selector_all(selector) {
            Ok(list) => nodes_to_elements(list),
            Err(e) => {
                warn!("bad selector '{selector}': {e:?}");
                Vec::new()
            }
        }
    }

    fn select_within(&self, node: &Element, selector: &str) -> Vec<Element> {
        match node.query_selector_all(selector) {
            Ok(list) => nodes_to_elements(list),
            Err(e) => {
                warn!("bad selector '{selector}': {e:?}");
                Vec::new()
            }
        }
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn is_trigger(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlElement>()
            .and_then(|h| h.dataset().get(&self.state.cfg.trigger_attribute))
            .is_some_and(|v| !v.is_empty())
    }

    fn expand_text_nodes(&self, node: &Element) {
        let children = node.child_nodes();
        let texts: Vec<Node> = (0..children.length())
            .filter_map(|i| children.get(i))
            .filter(|c| c.node_type() == Node::TEXT_NODE)
            .collect();
        for text in texts {
            if let Err(e) = self.expand_into(node, &text) {
                warn!("text node expansion failed: {e:?}");
            }
        }
    }

    fn defer(&self, seconds: f64, task: Box<dyn FnOnce()>) {
        let cb = Closure::once_into_js(move || task());
        let ms = (seconds * 1000.0).round() as i32;
        if let Err(e) = self
            .state
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms)
        {
            warn!("setTimeout failed: {e:?}");
        }
    }

    fn random(&self) -> f64 {
        js_sys::Math::random()
    }
}
