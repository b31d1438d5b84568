//! Whitelist HTML sanitizer built on html5ever.
//!
//! rinse provides:
//! - **Sanitizing**: untrusted fragments are parsed the way a browser parses
//!   them, rewritten against a [`Policy`], and serialized back. Disallowed
//!   elements are unwrapped (their content stays), `script` and `style` are
//!   removed with everything inside them, and event-handler or `javascript:`
//!   attributes are stripped.
//! - **Escaping**: arbitrary text turned into inert HTML text.
//! - **Safe assignment**: helpers that write either of the above into a
//!   [`RenderTarget`].
//!
//! # Example
//!
//! ```rust
//! use rinse::{Policy, Sanitizer, escape_html, sanitize_html};
//!
//! assert_eq!(
//!     sanitize_html("<p>a<script>alert(1)</script>b</p>"),
//!     "<p>ab</p>"
//! );
//! assert_eq!(sanitize_html(r#"<span onclick="evil()">x</span>"#), "<span>x</span>");
//! assert_eq!(sanitize_html("<marquee>hi</marquee>"), "hi");
//! assert_eq!(escape_html("<b>"), "&lt;b&gt;");
//!
//! // Custom policies are injected at construction
//! let sanitizer = Sanitizer::new(Policy::default().allow_tag("a"));
//! assert_eq!(
//!     sanitizer.sanitize(r#"<a href="javascript:x()">link</a>"#),
//!     "<a>link</a>"
//! );
//! ```

use std::sync::LazyLock;

mod tracing_macros;
#[allow(unused_imports)]
pub(crate) use tracing_macros::{debug, trace};

pub mod arena_dom;
mod error;
mod escape;
mod policy;
mod sanitize;
pub mod serialize;
mod target;

pub use error::SanitizeError;
pub use escape::{escape_display, escape_html};
pub use policy::{DEFAULT_ALLOWED_TAGS, Policy, PolicyConfig};
pub use sanitize::Sanitizer;
pub use target::{MarkupBuffer, RenderTarget, set_safe_html, set_text_content};

// Re-export parsing for callers that want the tree itself
pub use arena_dom::{Fragment, parse_fragment};

static DEFAULT_SANITIZER: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::default);

/// The shared sanitizer used by the free functions, with [`Policy::default`].
pub fn default_sanitizer() -> &'static Sanitizer {
    &DEFAULT_SANITIZER
}

/// Sanitize an untrusted fragment with the default policy.
///
/// `None` (a non-text input) yields an empty string. Never fails; see
/// [`Sanitizer::sanitize`].
pub fn sanitize_html<'a>(input: impl Into<Option<&'a str>>) -> String {
    match input.into() {
        Some(html) => DEFAULT_SANITIZER.sanitize(html),
        None => String::new(),
    }
}
