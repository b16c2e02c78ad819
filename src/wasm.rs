//! WASM bindings for a JavaScript plugin host.
//!
//! The host keeps the plugin state (scene, saved templates, and draft) and
//! passes it in as JSON with every call; the updated state comes back
//! alongside the UI replies.

use wasm_bindgen::prelude::*;

use crate::apply::ApplyOptions;
use crate::controller::{HostState, handle_host_message};
use crate::message::ApplyRequest;
use crate::style::resolve_styles;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Handle one UI message against the host's state.
///
/// Takes `{ "scene": {...}, "templates": [...], "draft": {...} }` (every key
/// optional) and the message, both as JSON. Returns
/// `{ "replies": [...], "scene": {...}, "templates": [...], "draft": {...} }`;
/// the host stores everything but `replies` and passes it to the next call.
#[wasm_bindgen]
pub fn handle_message(state: &str, message: &str) -> Result<String, JsValue> {
    let state: HostState = serde_json::from_str(state).map_err(js_error)?;
    let reply = handle_host_message(state, message, ApplyOptions::default());
    serde_json::to_string(&reply).map_err(js_error)
}

/// Resolve the styles of an apply request.
///
/// Takes the request as JSON and returns the resolved styles as JSON.
#[wasm_bindgen]
pub fn resolve(request: &str) -> Result<String, JsValue> {
    let request = ApplyRequest::parse(request).map_err(js_error)?;
    let extracted = request.extracted().cloned().unwrap_or_default();
    let resolved = resolve_styles(&request.explicit(), &extracted, request.chart.series_count());
    serde_json::to_string(&resolved).map_err(js_error)
}
