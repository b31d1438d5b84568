//! Browser bindings for rinse.
//!
//! JavaScript callers can hand any value to these functions. Anything that is
//! not a string is treated as empty input, and anything that is not an
//! `Element` is not a render target, so the setters do nothing.

use rinse::RenderTarget;
use tracing::trace;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// A DOM element used as a [`RenderTarget`].
pub struct ElementTarget(pub Element);

impl RenderTarget for ElementTarget {
    fn set_text(&mut self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_markup(&mut self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }
}

fn as_element(target: JsValue) -> Option<ElementTarget> {
    match target.dyn_into::<Element>() {
        Ok(element) => Some(ElementTarget(element)),
        Err(_) => {
            trace!("target is not an Element");
            None
        }
    }
}

#[wasm_bindgen(js_name = sanitizeHtml)]
pub fn sanitize_html(input: JsValue) -> String {
    rinse::sanitize_html(input.as_string().as_deref())
}

#[wasm_bindgen(js_name = escapeHtml)]
pub fn escape_html(input: JsValue) -> String {
    rinse::escape_html(input.as_string().as_deref())
}

/// Assign `text` to `target` as literal text.
#[wasm_bindgen(js_name = setTextContent)]
pub fn set_text_content(target: JsValue, text: JsValue) {
    let text = text.as_string().unwrap_or_default();
    rinse::set_text_content(as_element(target).as_mut(), &text);
}

/// Assign the sanitized form of `html` to `target`'s markup.
#[wasm_bindgen(js_name = setSafeHtml)]
pub fn set_safe_html(target: JsValue, html: JsValue) {
    let html = html.as_string().unwrap_or_default();
    rinse::set_safe_html(as_element(target).as_mut(), &html);
}
