use chrono::{DateTime, NaiveDateTime};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::{ClientError, ClientResult};

pub fn window() -> ClientResult<Window> {
    web_sys::window().ok_or(ClientError::NoWindow)
}

pub fn document() -> ClientResult<Document> {
    window()?.document().ok_or(ClientError::NoDocument)
}

pub fn body(document: &Document) -> ClientResult<HtmlElement> {
    document
        .body()
        .ok_or_else(|| ClientError::Dom("document has no <body>".into()))
}

/// Create `<tag class="...">` and cast it to the requested element type.
pub fn create<T: JsCast>(document: &Document, tag: &str, class: &str) -> ClientResult<T> {
    let el = document.create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    el.dyn_into::<T>()
        .map_err(|_| ClientError::Dom(format!("<{tag}> has an unexpected type")))
}

/// Append a plain `<div class="...">` to `parent`.
pub fn append_div(document: &Document, parent: &Element, class: &str) -> ClientResult<HtmlElement> {
    let div: HtmlElement = create(document, "div", class)?;
    parent.append_child(&div)?;
    Ok(div)
}

/// Page-relative milliseconds, for timing comparisons.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Current wall-clock time in UTC.
pub fn utc_now() -> NaiveDateTime {
    let ms = js_sys::Date::now() as i64;
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        crate::diag::console_warn!("Failed to set {property}: {e:?}");
    }
}
