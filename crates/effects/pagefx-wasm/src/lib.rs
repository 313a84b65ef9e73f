use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use serde_json::Value;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use pagefx_core::{Config, Registration, Settings, VisibilityAnimator, WatchId};

mod dom;
mod logging;
mod typewriter;

pub use dom::DomHost;
pub use logging::init_logging;
pub use typewriter::start_typewriters;

/// Window events that trigger an evaluation pass.
const EVENTS: [&str; 3] = ["load", "resize", "scroll"];

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn ids(list: Vec<WatchId>) -> Vec<u32> {
    list.into_iter().map(|id| id.0).collect()
}

/// Scroll-triggered visibility animations for the current document.
#[wasm_bindgen]
pub struct OnVisible {
    inner: Rc<RefCell<VisibilityAnimator<DomHost>>>,
    handler: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl OnVisible {
    /// Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new OnVisible({ fallback_effect: "fade-up" })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OnVisible, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let host = DomHost::new(cfg.clone())?;
        debug!("onvisible client: {:?}", host.client());

        Ok(OnVisible {
            inner: Rc::new(RefCell::new(VisibilityAnimator::new(host, cfg))),
            handler: None,
        })
    }

    /// Register every element matching `selector`. Returns one watch id per element.
    #[wasm_bindgen]
    pub fn add(&mut self, selector: &str, settings: JsValue) -> Result<Vec<u32>, JsError> {
        let settings = if jsvalue_is_undefined_or_null(&settings) {
            Settings::default()
        } else {
            swb::from_value::<Value>(settings)
                .map(Settings::from_value)
                .unwrap_or_else(|e| {
                    warn!("unreadable settings for '{selector}' ({e}), using defaults");
                    Settings::default()
                })
        };
        Ok(ids(self.animator()?.add(selector, &settings)))
    }

    /// Register an array of `{ selector, settings }` objects. Entries without a
    /// string selector are skipped; the rest still register.
    #[wasm_bindgen(js_name = add_all)]
    pub fn add_all(&mut self, registrations: JsValue) -> Result<Vec<u32>, JsError> {
        let values: Vec<Value> = swb::from_value(registrations)
            .map_err(|e| JsError::new(&format!("registrations error: {e}")))?;
        let regs = Registration::from_values(values);
        Ok(ids(self.animator()?.add_all(&regs)))
    }

    /// Same as `add_all`, from a JSON string.
    #[wasm_bindgen(js_name = add_json)]
    pub fn add_json(&mut self, json: &str) -> Result<Vec<u32>, JsError> {
        let regs = Registration::list_from_json_str(json)
            .map_err(|e| JsError::new(&format!("add_json: {e}")))?;
        Ok(ids(self.animator()?.add_all(&regs)))
    }

    /// Run one pass now. Returns `{ firings: [{ watch, edge }] }`.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<JsValue, JsError> {
        let mut anim = self.animator()?;
        let pass = anim.evaluate();
        swb::to_value(pass).map_err(|e| JsError::new(&format!("pass error: {e}")))
    }

    /// Evaluate on load/resize/scroll, plus once immediately. Calling twice is a no-op.
    #[wasm_bindgen]
    pub fn attach(&mut self) -> Result<(), JsError> {
        if self.handler.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;

        let inner = Rc::clone(&self.inner);
        let handler = Closure::wrap(Box::new(move || match inner.try_borrow_mut() {
            Ok(mut anim) => {
                anim.evaluate();
            }
            Err(_) => debug!("pass already running, event skipped"),
        }) as Box<dyn FnMut()>);

        for event in EVENTS {
            window
                .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
                .map_err(|e| JsError::new(&format!("attach {event}: {e:?}")))?;
        }
        self.handler = Some(handler);
        self.animator()?.evaluate();
        Ok(())
    }

    /// Remove the listeners installed by `attach`.
    #[wasm_bindgen]
    pub fn detach(&mut self) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            for event in EVENTS {
                let _ = window
                    .remove_event_listener_with_callback(event, handler.as_ref().unchecked_ref());
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn attached(&self) -> bool {
        self.handler.is_some()
    }

    /// Detected `{ browser, browser_version, os, os_version, mobile }` for page-side
    /// branching (viewport fixes, touch classes).
    #[wasm_bindgen(getter)]
    pub fn client(&self) -> Result<JsValue, JsError> {
        let anim = self
            .inner
            .try_borrow()
            .map_err(|_| JsError::new("onvisible is busy evaluating"))?;
        swb::to_value(anim.host().client())
            .map_err(|e| JsError::new(&format!("client error: {e}")))
    }

    #[wasm_bindgen(js_name = watch_count)]
    pub fn watch_count(&self) -> u32 {
        self.inner.borrow().tracker().len() as u32
    }
}

impl OnVisible {
    fn animator(&self) -> Result<std::cell::RefMut<'_, VisibilityAnimator<DomHost>>, JsError> {
        self.inner
            .try_borrow_mut()
            .map_err(|_| JsError::new("onvisible is busy evaluating"))
    }
}

impl Drop for OnVisible {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
