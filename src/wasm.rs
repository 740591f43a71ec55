//! Browser bindings. Results cross the boundary as plain JS objects built
//! from the crate's JSON encoding.

use js_sys::{JSON, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::export::{self, ExportError};

fn to_js_object(json: &str) -> Result<JsValue, JsValue> {
    JSON::parse(json)
}

/// Extract a palette from encoded image bytes.
///
/// Resolves to a `ColorPalette` object; rejects with a message on decode or
/// empty-sample failures.
#[wasm_bindgen]
pub fn extract_palette(input: Vec<u8>, seed: Option<u64>) -> Result<JsValue, JsValue> {
    let palette = crate::extract_palette_bytes(&input, seed)
        .map_err(|e| JsValue::from_str(&format!("Unable to extract palette: {e}")))?;
    let json = serde_json::to_string(&palette)
        .map_err(|e| JsValue::from_str(&format!("Palette encode error: {e}")))?;
    to_js_object(&json)
}

/// Build the design-system export for a palette given as JSON text.
///
/// Returns `{ document, json }` on success or `{ error: { code, message, details } }`;
/// it never throws for invalid palettes.
#[wasm_bindgen]
pub fn export_palette(palette_json: &str, display_name: Option<String>) -> Result<Object, JsValue> {
    let result = Object::new();
    let outcome = export::export_palette_json(palette_json, display_name.as_deref())
        .and_then(|doc| doc.to_json_pretty());

    match outcome {
        Ok(json) => {
            Reflect::set(&result, &JsValue::from_str("document"), &to_js_object(&json)?)?;
            Reflect::set(&result, &JsValue::from_str("json"), &JsValue::from_str(&json))?;
        }
        Err(err) => {
            Reflect::set(&result, &JsValue::from_str("error"), &error_to_js(&err)?)?;
        }
    }
    Ok(result)
}

fn error_to_js(err: &ExportError) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(err)
        .map_err(|e| JsValue::from_str(&format!("Error encode failure: {e}")))?;
    to_js_object(&json)
}
