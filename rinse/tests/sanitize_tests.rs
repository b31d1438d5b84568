//! End-to-end properties of the public sanitizing API.

use facet_testhelpers::test;
use rinse::arena_dom::NodeKind;
use rinse::{
    DEFAULT_ALLOWED_TAGS, MarkupBuffer, Policy, RenderTarget, SanitizeError, Sanitizer,
    escape_html, parse_fragment, sanitize_html, set_safe_html, set_text_content,
};

/// Hostile and awkward inputs shared by the property tests below.
const CORPUS: &[&str] = &[
    "",
    "plain text",
    "<div>hi</div>",
    "<marquee>hi</marquee>",
    "<p>a<script>alert(1)</script>b</p>",
    r#"<span onclick="evil()">x</span>"#,
    r#"<div data-href="javascript:evil()">x</div>"#,
    "<SCRIPT SRC=//evil.example/x.js></SCRIPT>",
    r#"<img src=x onerror=alert(1)>"#,
    r#"<svg><script>alert(1)</script><g onload="x()">t</g></svg>"#,
    r#"<math><mi xlink:href="javascript:x()">m</mi></math>"#,
    "<noscript><p title=\"</noscript><img src=x onerror=alert(1)>\"></noscript>",
    "<xmp><script>alert(1)</script></xmp>",
    "<textarea><script>alert(1)</script></textarea>",
    "<template><script>alert(1)</script>in template</template>",
    "<table><tr><td>cell<script>x()</script></td></tr></table>",
    "<p>a<marquee><p>b</p></marquee>c</p>",
    "<ul><li>one<li>two</ul>",
    "<b><i>mis</b>nested</i>",
    "<style>@import 'x';</style><div style=\"color:red\">styled</div>",
    "<div><!-- <script>alert(1)</script> -->after</div>",
    "<a href=\"JaVaScRiPt:alert(1)\">click</a>",
    "<div title=\"&#x6A;avascript:alert(1)\">entity</div>",
    "<scr<script>ipt>alert(1)</script>",
    "<<script>script>alert(1)<</script>/script>",
    "<iframe srcdoc=\"<script>alert(1)</script>\"></iframe>",
    "<object data=\"javascript:x()\"><param name=x value=y>fallback</object>",
    "<div\tonmouseover\n=\"x()\">ws</div>",
    "<p>1 < 2 && 3 > 2</p>",
    "\u{a0}<span>nbsp</span>\u{a0}",
];

fn elements_in(html: &str) -> Vec<(String, Vec<(String, String)>)> {
    let frag = parse_fragment(html);
    frag.root
        .descendants(&frag.arena)
        .skip(1)
        .filter_map(|id| match &frag.get(id).kind {
            NodeKind::Element(elem) => Some((
                elem.tag().to_string(),
                elem.attrs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_string()))
                    .collect(),
            )),
            _ => None,
        })
        .collect()
}

#[test]
fn idempotence() {
    for input in CORPUS {
        let once = sanitize_html(*input);
        let twice = sanitize_html(once.as_str());
        assert_eq!(once, twice, "not idempotent for {input:?}");
    }
}

#[test]
fn no_executable_survivors() {
    for input in CORPUS {
        let out = sanitize_html(*input);
        let lower = out.to_ascii_lowercase();
        assert!(!lower.contains("<script"), "{input:?} -> {out:?}");
        for (tag, attrs) in elements_in(&out) {
            for (name, value) in attrs {
                assert!(
                    !name.to_ascii_lowercase().starts_with("on"),
                    "event handler {name} on <{tag}> from {input:?}"
                );
                assert!(
                    !value.to_ascii_lowercase().contains("javascript:"),
                    "executable value on <{tag}> from {input:?}"
                );
            }
        }
    }
}

#[test]
fn whitelist_closure() {
    for input in CORPUS {
        let out = sanitize_html(*input);
        for (tag, _) in elements_in(&out) {
            assert!(
                DEFAULT_ALLOWED_TAGS.contains(&tag.as_str()),
                "<{tag}> survived from {input:?}: {out:?}"
            );
        }
    }
}

#[test]
fn content_preservation_for_disallowed_wrappers() {
    assert_eq!(sanitize_html("<div>hi</div>"), "<div>hi</div>");
    assert_eq!(sanitize_html("<marquee>hi</marquee>"), "hi");
    assert_eq!(
        sanitize_html("<div>a<font>b<blink>c</blink>d</font>e</div>"),
        "<div>abcde</div>"
    );
}

#[test]
fn script_and_style_excision() {
    assert_eq!(
        sanitize_html("<p>a<script>alert(1)</script>b</p>"),
        "<p>ab</p>"
    );
    assert_eq!(
        sanitize_html("<div>x<style>body{display:none}</style>y</div>"),
        "<div>xy</div>"
    );
}

#[test]
fn svg_script_is_excised_too() {
    assert_eq!(
        sanitize_html("<svg><script>alert(1)</script><text>t</text></svg>"),
        "t"
    );
}

#[test]
fn attribute_stripping_on_allowed_tags() {
    assert_eq!(
        sanitize_html(r#"<span onclick="evil()">x</span>"#),
        "<span>x</span>"
    );
    assert_eq!(
        sanitize_html(r#"<div data-href="javascript:evil()">x</div>"#),
        "<div>x</div>"
    );
    assert_eq!(
        sanitize_html(r#"<span class="a" onclick="x()" title="t">x</span>"#),
        r#"<span class="a" title="t">x</span>"#
    );
}

#[test]
fn raw_text_wrappers_degrade_to_escaped_text() {
    assert_eq!(
        sanitize_html("<xmp><b>x</b></xmp>"),
        "&lt;b&gt;x&lt;/b&gt;"
    );
}

#[test]
fn escaper_round_trip() {
    assert_eq!(escape_html("no markup here"), "no markup here");

    let escaped = escape_html("<b>");
    let frag = parse_fragment(&escaped);
    let children: Vec<_> = frag.children(frag.root).collect();
    assert_eq!(children.len(), 1);
    match &frag.get(children[0]).kind {
        NodeKind::Text(t) => assert_eq!(t.as_ref(), "<b>"),
        other => panic!("expected literal text, got {other:?}"),
    }
}

#[test]
fn non_string_input_safety() {
    assert_eq!(sanitize_html(None), "");
    assert_eq!(escape_html(None), "");
}

#[test]
fn whitespace_only_input() {
    assert_eq!(sanitize_html("   \n\t"), "");
}

#[test]
fn custom_policy_via_json() {
    let policy = Policy::from_json(r#"{"allowed_tags": ["em"], "keep_comments": true}"#)
        .expect("policy should load");
    let sanitizer = Sanitizer::new(policy);
    assert_eq!(
        sanitizer.sanitize("<p><em>x</em><!--c--></p>"),
        "<em>x</em><!--c-->"
    );
}

#[test]
fn try_sanitize_reports_depth() {
    let sanitizer = Sanitizer::new(Policy::default().with_max_depth(3));
    let err = sanitizer
        .try_sanitize("<div><div><div><div>x</div></div></div></div>")
        .unwrap_err();
    assert_eq!(err, SanitizeError::DepthExceeded { limit: 3 });
    assert_eq!(
        sanitizer.sanitize("<div><div><div><div>x</div></div></div></div>"),
        "x"
    );
}

#[test]
fn render_target_helpers() {
    let mut buf = MarkupBuffer::new();
    set_safe_html(Some(&mut buf), "<p>ok<script>no()</script></p>");
    assert_eq!(buf.markup(), "<p>ok</p>");

    set_text_content(Some(&mut buf), "<p>literal</p>");
    assert_eq!(buf.markup(), "&lt;p&gt;literal&lt;/p&gt;");

    let sanitizer = Sanitizer::new(Policy::default().allow_tag("a"));
    sanitizer.set_safe_html(Some(&mut buf), r#"<a href="/x" onclick="y()">l</a>"#);
    assert_eq!(buf.into_markup(), r#"<a href="/x">l</a>"#);
}

struct Recorder {
    calls: Vec<String>,
    connected: bool,
}

impl RenderTarget for Recorder {
    fn set_text(&mut self, text: &str) {
        self.calls.push(format!("text:{text}"));
    }

    fn set_markup(&mut self, html: &str) {
        self.calls.push(format!("markup:{html}"));
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[test]
fn custom_render_target() {
    let mut target = Recorder {
        calls: Vec::new(),
        connected: true,
    };
    set_text_content(Some(&mut target), "<i>");
    set_safe_html(Some(&mut target), "<i>x</i><b onclick=1>y</b>");
    assert_eq!(target.calls, ["text:<i>", "markup:<i>x</i><b>y</b>"]);

    target.connected = false;
    set_safe_html(Some(&mut target), "<b>z</b>");
    assert_eq!(target.calls.len(), 2);
}
