//! Escaping arbitrary text for use as HTML text content.

use std::fmt::Display;

use crate::serialize::{Escape, escape_into};

/// Escape `input` so that it renders as literal text when placed in HTML.
///
/// Every `&`, `<`, `>`, `"` and `'` becomes a character reference, so the
/// result is also safe inside either kind of quoted attribute value. `None`
/// (a non-text input) yields an empty string.
///
/// ```rust
/// assert_eq!(rinse::escape_html("<b>"), "&lt;b&gt;");
/// assert_eq!(rinse::escape_html(None), "");
/// ```
pub fn escape_html<'a>(input: impl Into<Option<&'a str>>) -> String {
    let Some(input) = input.into() else {
        return String::new();
    };

    let mut out = String::with_capacity(input.len());
    escape_into(&mut out, input, Escape::All);
    out
}

/// Escape the textual form of any displayable value.
pub fn escape_display(value: &impl Display) -> String {
    escape_html(value.to_string().as_str())
}
