//! `log` backend that writes to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.target(), record.args());
        let msg = JsValue::from_str(&line);
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.parse().ok()
}

/// Route `log` records to the console. `level` is one of
/// `off|error|warn|info|debug|trace` (default `warn`). Safe to call repeatedly;
/// later calls only change the level.
#[wasm_bindgen(js_name = init_logging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsError> {
    let filter = match level.as_deref() {
        None => LevelFilter::Warn,
        Some(s) => parse_level(s).ok_or_else(|| JsError::new(&format!("unknown log level '{s}'")))?,
    };
    // Already installed on a previous call.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}
