//! Drives the rotating `.typewrite` captions.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use pagefx_core::Typewriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

const SELECTOR: &str = ".typewrite";
const CURSOR_CSS: &str = ".typewrite > .wrap { border-right: 0.08em solid #fff }";

struct Caption {
    window: Window,
    element: Element,
    machine: RefCell<Typewriter>,
}

impl Caption {
    fn step(self: Rc<Self>) {
        let tick = self.machine.borrow_mut().tick(js_sys::Math::random);
        // Rebuilt through the DOM so the phrase text is never parsed as markup.
        self.element.set_inner_html("");
        if let Ok(wrap) = self
            .window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))
            .and_then(|d| d.create_element("span"))
        {
            wrap.set_class_name("wrap");
            wrap.set_text_content(Some(&tick.text));
            if let Err(e) = self.element.append_child(&wrap) {
                warn!("typewriter render failed: {e:?}");
            }
        }

        let next = Rc::clone(&self);
        let cb = Closure::once_into_js(move || next.step());
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.unchecked_ref(),
                tick.delay_ms.round() as i32,
            )
        {
            warn!("typewriter timer failed: {e:?}");
        }
    }
}

/// Parse `data-type` (JSON string array) and `data-period` (ms).
fn read_phrases(element: &Element) -> Option<(Vec<String>, Option<f64>)> {
    let raw = element.get_attribute("data-type")?;
    let phrases: Vec<String> = match serde_json::from_str(&raw) {
        Ok(p) => p,
        Err(e) => {
            warn!("typewriter data-type is not a string array: {e}");
            return None;
        }
    };
    let period = element
        .get_attribute("data-period")
        .and_then(|p| p.trim().parse::<f64>().ok());
    Some((phrases, period))
}

fn install_cursor_style(document: &web_sys::Document) -> Result<(), JsValue> {
    let style = document.create_element("style")?;
    style.set_text_content(Some(CURSOR_CSS));
    if let Some(body) = document.body() {
        body.append_child(&style)?;
    }
    Ok(())
}

/// Start every `.typewrite` caption on the page. Returns how many were started.
#[wasm_bindgen(js_name = start_typewriters)]
pub fn start_typewriters() -> Result<u32, JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("window has no document"))?;
    let list = document
        .query_selector_all(SELECTOR)
        .map_err(|e| JsError::new(&format!("typewriter query error: {e:?}")))?;

    let mut started = 0;
    for element in (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
    {
        let Some((phrases, period)) = read_phrases(&element) else {
            continue;
        };
        Rc::new(Caption {
            window: window.clone(),
            element,
            machine: RefCell::new(Typewriter::new(phrases, period)),
        })
        .step();
        started += 1;
    }
    if started > 0 {
        if let Err(e) = install_cursor_style(&document) {
            warn!("typewriter cursor style failed: {e:?}");
        }
    }
    debug!("started {started} typewriter caption(s)");
    Ok(started)
}
