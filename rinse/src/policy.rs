//! Sanitization policy: which tags survive and which attributes are rejected.

use facet::Facet;

use crate::SanitizeError;

/// Tags kept by [`Policy::default`].
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "p", "br", "span", "div", "ul", "ol", "li",
];

/// Elements whose entire subtree is deleted. Not configurable.
pub(crate) const EXCISED_TAGS: &[&str] = &["script", "style"];

/// Elements whose content a browser parses as raw text or RCDATA. Escaped
/// text and comments written inside them come back as live markup on
/// reparse, so they are always unwrapped, whatever the policy says.
pub(crate) const RAW_TEXT_TAGS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "textarea",
    "title",
    "xmp",
];

fn never_allowed(tag: &str) -> bool {
    EXCISED_TAGS.contains(&tag) || RAW_TEXT_TAGS.contains(&tag)
}

/// Immutable sanitization policy handed to a [`crate::Sanitizer`].
///
/// Build one from [`Policy::default`] with the builder methods, or load a
/// partial JSON configuration with [`Policy::from_json`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    allowed_tags: Vec<String>,
    event_handler_prefix: String,
    executable_uri_markers: Vec<String>,
    keep_comments: bool,
    max_depth: usize,
    stabilize_passes: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            event_handler_prefix: "on".to_string(),
            executable_uri_markers: vec!["javascript:".to_string()],
            keep_comments: false,
            max_depth: 512,
            stabilize_passes: 3,
        }
    }
}

/// Partial policy as read from JSON. Missing fields keep their defaults.
///
/// ```json
/// { "allowed_tags": ["p", "em"], "keep_comments": true }
/// ```
#[derive(Facet, Debug, Clone, Default)]
pub struct PolicyConfig {
    #[facet(default)]
    pub allowed_tags: Option<Vec<String>>,
    #[facet(default)]
    pub event_handler_prefix: Option<String>,
    #[facet(default)]
    pub executable_uri_markers: Option<Vec<String>>,
    #[facet(default)]
    pub keep_comments: Option<bool>,
    #[facet(default)]
    pub max_depth: Option<usize>,
    #[facet(default)]
    pub stabilize_passes: Option<usize>,
}

fn normalize(items: impl IntoIterator<Item = impl AsRef<str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.as_ref().trim().to_ascii_lowercase();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

impl Policy {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON [`PolicyConfig`] and layer it over the defaults.
    pub fn from_json(json: &str) -> Result<Self, SanitizeError> {
        let config: PolicyConfig =
            facet_json::from_str(json).map_err(|e| SanitizeError::InvalidPolicy {
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// Layer a [`PolicyConfig`] over the defaults.
    pub fn from_config(config: PolicyConfig) -> Result<Self, SanitizeError> {
        let mut policy = Self::default();
        if let Some(tags) = config.allowed_tags {
            policy = policy.with_allowed_tags(tags);
        }
        if let Some(prefix) = config.event_handler_prefix {
            if prefix.trim().is_empty() {
                return Err(SanitizeError::InvalidPolicy {
                    message: "event_handler_prefix must not be empty".to_string(),
                });
            }
            policy = policy.with_event_handler_prefix(prefix);
        }
        if let Some(markers) = config.executable_uri_markers {
            policy = policy.with_executable_uri_markers(markers);
        }
        if let Some(keep) = config.keep_comments {
            policy.keep_comments = keep;
        }
        if let Some(depth) = config.max_depth {
            if depth == 0 {
                return Err(SanitizeError::InvalidPolicy {
                    message: "max_depth must be at least 1".to_string(),
                });
            }
            policy = policy.with_max_depth(depth);
        }
        if let Some(passes) = config.stabilize_passes {
            policy = policy.with_stabilize_passes(passes);
        }
        Ok(policy)
    }

    /// Replace the allowed tag set.
    ///
    /// `script`, `style`, and the raw-text elements (`xmp`, `iframe`,
    /// `noscript`, `textarea`, `title` and friends) are never allowed and are
    /// dropped from the list. Their serialized content does not survive a
    /// reparse as text.
    pub fn with_allowed_tags(mut self, tags: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.allowed_tags = normalize(tags);
        self.allowed_tags.retain(|t| !never_allowed(t));
        self
    }

    /// Add one tag to the allowed set.
    pub fn allow_tag(self, tag: &str) -> Self {
        let mut tags = self.allowed_tags.clone();
        tags.push(tag.to_string());
        self.with_allowed_tags(tags)
    }

    /// Remove one tag from the allowed set.
    pub fn deny_tag(mut self, tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        self.allowed_tags.retain(|t| *t != tag);
        self
    }

    /// Set the attribute-name prefix that marks event handlers. Empty
    /// prefixes are ignored, since they would match every attribute.
    pub fn with_event_handler_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        let prefix = prefix.as_ref().trim().to_ascii_lowercase();
        if !prefix.is_empty() {
            self.event_handler_prefix = prefix;
        }
        self
    }

    /// Replace the list of value substrings that mark executable URIs.
    pub fn with_executable_uri_markers(
        mut self,
        markers: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        self.executable_uri_markers = normalize(markers);
        self
    }

    /// Keep comments in the output instead of dropping them.
    pub fn keep_comments(mut self) -> Self {
        self.keep_comments = true;
        self
    }

    /// Set the maximum element nesting depth (at least 1).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Set how many reparse passes may be spent making output a fixed point.
    ///
    /// Zero disables stabilization, and with it the reparse check that
    /// catches markup a browser would restructure (a `<p>` that closes an
    /// enclosing `<p>`, foreign content breaking out of `<svg>`). Output is
    /// then a single pass over the tree as parsed, and sanitizing it again
    /// may give a different result.
    pub fn with_stabilize_passes(mut self, passes: usize) -> Self {
        self.stabilize_passes = passes;
        self
    }

    pub fn allowed_tags(&self) -> impl Iterator<Item = &str> {
        self.allowed_tags.iter().map(String::as_str)
    }

    pub fn event_handler_prefix(&self) -> &str {
        &self.event_handler_prefix
    }

    pub fn executable_uri_markers(&self) -> impl Iterator<Item = &str> {
        self.executable_uri_markers.iter().map(String::as_str)
    }

    pub fn keeps_comments(&self) -> bool {
        self.keep_comments
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn stabilize_passes(&self) -> usize {
        self.stabilize_passes
    }

    /// Whether `tag` (any case) is in the allowed set.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether `tag` (any case) names an element that is deleted with its
    /// whole subtree.
    pub fn excises_tag(&self, tag: &str) -> bool {
        EXCISED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether an attribute must be stripped: an event-handler name, or a
    /// value containing an executable-URI marker (both ASCII case-insensitive).
    ///
    /// The value check is a plain substring match. Encoded or whitespace-split
    /// schemes that the HTML parser does not itself normalize are not caught,
    /// and benign values that merely contain a marker are stripped.
    pub fn rejects_attribute(&self, name: &str, value: &str) -> bool {
        let prefix = self.event_handler_prefix.as_bytes();
        let name = name.as_bytes();
        if name.len() >= prefix.len() && name[..prefix.len()].eq_ignore_ascii_case(prefix) {
            return true;
        }

        if self.executable_uri_markers.is_empty() {
            return false;
        }
        let value = value.to_ascii_lowercase();
        self.executable_uri_markers
            .iter()
            .any(|marker| value.contains(marker.as_str()))
    }
}
