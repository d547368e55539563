//! Error sink writing to the browser console.

use imagegeom_core::LogSink;
use wasm_bindgen::JsValue;

/// Reports failures with `console.error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn error(&self, message: &str, cause: &dyn std::error::Error) {
        let text = format!("{}: {}", message, cause);
        web_sys::console::error_1(&JsValue::from_str(&text));
    }
}
