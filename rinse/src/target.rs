//! Safe assignment into render targets.
//!
//! A render target is whatever eventually displays the content: a browser
//! element, a template slot, a buffer. The sanitizer only ever writes to it.

use crate::serialize::{Escape, escape_into};
use crate::trace;

/// A destination that can receive literal text or markup.
pub trait RenderTarget {
    /// Replace the content with `text`, taken literally.
    fn set_text(&mut self, text: &str);

    /// Replace the content with `html`, interpreted as markup.
    fn set_markup(&mut self, html: &str);

    /// Whether the handle still refers to a live destination. Assignments to
    /// a disconnected target are skipped.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Assign `text` as literal content. No markup in it is interpreted.
///
/// No-op when `target` is `None` or disconnected.
pub fn set_text_content<T: RenderTarget + ?Sized>(target: Option<&mut T>, text: &str) {
    match target {
        Some(target) if target.is_connected() => target.set_text(text),
        _ => trace!("set_text_content: no usable target"),
    }
}

/// Assign the sanitized form of `html` as markup, using the default policy.
///
/// No-op when `target` is `None` or disconnected.
pub fn set_safe_html<T: RenderTarget + ?Sized>(target: Option<&mut T>, html: &str) {
    crate::default_sanitizer().set_safe_html(target, html);
}

/// In-memory render target holding markup.
///
/// Text assignments are stored escaped, so [`MarkupBuffer::markup`] is always
/// something that can be handed to an HTML consumer as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkupBuffer {
    markup: String,
    detached: bool,
}

impl MarkupBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer that reports itself disconnected and ignores assignments.
    pub fn detached() -> Self {
        Self {
            markup: String::new(),
            detached: true,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }
}

impl RenderTarget for MarkupBuffer {
    fn set_text(&mut self, text: &str) {
        self.markup.clear();
        escape_into(&mut self.markup, text, Escape::Text);
    }

    fn set_markup(&mut self, html: &str) {
        self.markup.clear();
        self.markup.push_str(html);
    }

    fn is_connected(&self) -> bool {
        !self.detached
    }
}

impl RenderTarget for String {
    fn set_text(&mut self, text: &str) {
        self.clear();
        escape_into(self, text, Escape::Text);
    }

    fn set_markup(&mut self, html: &str) {
        self.clear();
        self.push_str(html);
    }
}
