//! Thin wrappers over the browser APIs the tracker needs.

use js_sys::{Array, Reflect};
use shared::PixelPoint;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, Url};

const ROUTE_COLOR: &str = "#2ecc71";
const ROUTE_WIDTH: f64 = 2.0;

pub fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

pub fn read_number(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key)).ok()?.as_f64()
}

pub fn read_string(target: &JsValue, key: &str) -> Option<String> {
    Reflect::get(target, &JsValue::from_str(key)).ok()?.as_string()
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn store(key: &str, value: &str) -> Result<(), String> {
    let storage = web_sys::window()
        .ok_or("no browser window")?
        .local_storage()
        .map_err(js_error)?
        .ok_or("local storage unavailable")?;
    storage.set_item(key, value).map_err(js_error)
}

/// Offer `contents` as a file download named `file_name`.
pub fn download(file_name: &str, contents: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;

    let parts = Array::of1(&JsValue::from_str(contents));
    let blob = Blob::new_with_str_sequence(&parts).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let anchor = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| "anchor element has unexpected type".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(js_error)
}

/// Start point and remaining vertices of a drawable line, if there is one.
fn polyline(pixels: &[PixelPoint]) -> Option<(&PixelPoint, &[PixelPoint])> {
    pixels.split_first().filter(|(_, rest)| !rest.is_empty())
}

/// Replace the canvas contents with the projected path. Fewer than two
/// points leaves the canvas blank.
pub fn draw_path(canvas: &HtmlCanvasElement, pixels: &[PixelPoint]) -> Result<(), String> {
    let ctx = canvas
        .get_context("2d")
        .map_err(js_error)?
        .ok_or("canvas has no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "2d context has unexpected type".to_string())?;

    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    let Some((first, rest)) = polyline(pixels) else {
        return Ok(());
    };

    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    #[allow(deprecated)]
    ctx.set_stroke_style(&JsValue::from_str(ROUTE_COLOR));
    ctx.set_line_width(ROUTE_WIDTH);
    ctx.stroke();
    Ok(())
}
