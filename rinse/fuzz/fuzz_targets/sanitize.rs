#![no_main]

use libfuzzer_sys::fuzz_target;
use rinse::arena_dom::NodeKind;
use rinse::{DEFAULT_ALLOWED_TAGS, parse_fragment, sanitize_html};

fuzz_target!(|input: &str| {
    let out = sanitize_html(input);

    assert!(
        !out.to_ascii_lowercase().contains("<script"),
        "script survived: {input:?} -> {out:?}"
    );

    let frag = parse_fragment(&out);
    for id in frag.root.descendants(&frag.arena).skip(1) {
        if let NodeKind::Element(elem) = &frag.get(id).kind {
            assert!(
                DEFAULT_ALLOWED_TAGS.contains(&elem.tag()),
                "disallowed <{}> survived: {input:?} -> {out:?}",
                elem.tag()
            );
            for (name, value) in &elem.attrs {
                assert!(!name.to_ascii_lowercase().starts_with("on"), "{input:?} -> {out:?}");
                assert!(
                    !value.to_ascii_lowercase().contains("javascript:"),
                    "{input:?} -> {out:?}"
                );
            }
        }
    }

    assert_eq!(sanitize_html(out.as_str()), out, "not idempotent for {input:?}");
});
