//! Whitelist tree sanitizer.
//!
//! A fragment is parsed into an arena, rewritten bottom-up, and serialized:
//!
//! 1. Every node's children are cleaned before the node itself is judged.
//! 2. `script` and `style` elements are detached with their whole subtree.
//! 3. Surviving elements lose event-handler attributes and attributes whose
//!    value carries an executable-URI marker.
//! 4. Elements outside the allowed set are unwrapped: their (already clean)
//!    children take their place, in order.
//!
//! Because children are settled first, arbitrarily nested disallowed wrappers
//! collapse in one walk.

use indextree::NodeId;

use crate::arena_dom::{Fragment, NodeKind, parse_fragment};
use crate::policy::EXCISED_TAGS;
use crate::serialize::{Escape, escape_into};
use crate::target::RenderTarget;
use crate::{Policy, SanitizeError, debug, trace};

/// What happens to a node once its children are clean.
enum Action {
    Keep,
    Remove,
    Unwrap,
}

/// Sanitizes HTML fragments against an immutable [`Policy`].
///
/// Holds no per-call state, so one instance can be shared freely.
#[derive(Clone, Debug, Default)]
pub struct Sanitizer {
    policy: Policy,
}

fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_whitespace())
}

impl Sanitizer {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Sanitize `html`, never failing.
    ///
    /// If sanitization cannot complete (nesting too deep, output that will
    /// not settle), the result is the escaped text of the input with
    /// `script`/`style` content left out.
    pub fn sanitize(&self, html: &str) -> String {
        match self.try_sanitize(html) {
            Ok(out) => out,
            Err(_err) => {
                debug!(error = %_err, "sanitization failed, falling back to text-only rendering");
                self.text_only(html)
            }
        }
    }

    /// Sanitize `html`, reporting why it could not be done.
    ///
    /// The output is reparsed and re-sanitized until it is a fixed point, so
    /// `try_sanitize(try_sanitize(s)?)? == try_sanitize(s)?`.
    pub fn try_sanitize(&self, html: &str) -> Result<String, SanitizeError> {
        let mut out = self.sanitize_once(html)?;

        let passes = self.policy.stabilize_passes();
        if passes == 0 {
            return Ok(out);
        }

        for pass in 1..=passes {
            let again = self.sanitize_once(&out)?;
            if again == out {
                trace!(pass, "output is stable");
                return Ok(out);
            }
            debug!(pass, "reparse changed the output, sanitizing again");
            out = again;
        }

        Err(SanitizeError::Unstable { passes })
    }

    /// Assign `sanitize(html)` to the target's markup slot. No-op when the
    /// target is absent or disconnected.
    pub fn set_safe_html<T: RenderTarget + ?Sized>(&self, target: Option<&mut T>, html: &str) {
        match target {
            Some(target) if target.is_connected() => target.set_markup(&self.sanitize(html)),
            _ => trace!("set_safe_html: no usable target"),
        }
    }

    /// One parse, clean, serialize round.
    fn sanitize_once(&self, html: &str) -> Result<String, SanitizeError> {
        if is_blank(html) {
            return Ok(String::new());
        }

        let mut frag = parse_fragment(html);
        let root = frag.root;
        self.clean(&mut frag, root, 0)?;

        let out = frag.to_html();
        if is_blank(&out) {
            return Ok(String::new());
        }
        Ok(out)
    }

    /// Escaped text of `html`, without script/style content.
    fn text_only(&self, html: &str) -> String {
        if is_blank(html) {
            return String::new();
        }

        let text = parse_fragment(html).text_content(EXCISED_TAGS);
        if is_blank(&text) {
            return String::new();
        }

        let mut out = String::with_capacity(text.len());
        escape_into(&mut out, &text, Escape::Text);
        out
    }

    /// Post-order walk. Depth is bounded by the policy, which also bounds
    /// recursion.
    fn clean(&self, frag: &mut Fragment, node: NodeId, depth: usize) -> Result<(), SanitizeError> {
        let limit = self.policy.max_depth();
        if depth > limit {
            debug!(limit, "nesting depth limit exceeded");
            return Err(SanitizeError::DepthExceeded { limit });
        }

        // Snapshot: removing or unwrapping a child rewrites the live list.
        let children: Vec<NodeId> = frag.children(node).collect();
        for child in children {
            self.clean(frag, child, depth + 1)?;
        }

        if node != frag.root {
            self.rewrite(frag, node);
        }
        Ok(())
    }

    fn rewrite(&self, frag: &mut Fragment, node: NodeId) {
        let policy = &self.policy;

        let action = match &mut frag.get_mut(node).kind {
            NodeKind::Comment(_) if !policy.keeps_comments() => Action::Remove,
            NodeKind::Element(elem) => {
                if policy.excises_tag(elem.tag()) {
                    debug!(tag = elem.tag(), "removing element and its subtree");
                    Action::Remove
                } else {
                    elem.attrs.retain(|name, value| {
                        let rejected = policy.rejects_attribute(name, value);
                        if rejected {
                            trace!(attr = %name, "stripping attribute");
                        }
                        !rejected
                    });

                    if policy.allows_tag(elem.tag()) {
                        Action::Keep
                    } else {
                        trace!(tag = elem.tag(), "unwrapping disallowed element");
                        Action::Unwrap
                    }
                }
            }
            _ => Action::Keep,
        };

        let arena = &mut frag.arena;
        match action {
            Action::Keep => {}
            Action::Remove => node.detach(arena),
            Action::Unwrap => {
                let children: Vec<NodeId> = node.children(arena).collect();
                for child in children {
                    child.detach(arena);
                    node.insert_before(child, arena);
                }
                node.detach(arena);
            }
        }
    }
}
