//! Fixture-driven sanitizer cases using datatest-stable.
//!
//! Each case is a file in `tests/sanitize-cases/` with format:
//! ```text
//! <input HTML>
//! ===
//! <expected output>
//! ```
//!
//! The test verifies both `sanitize(input) == expected` and that the expected
//! output is a fixed point.

use rinse::sanitize_html;
use std::path::Path;

fn run_case(path: &Path) -> datatest_stable::Result<()> {
    facet_testhelpers::setup();

    let content = std::fs::read_to_string(path)?;
    let parts: Vec<&str> = content.split("\n===\n").collect();

    if parts.len() != 2 {
        return Err(format!(
            "Case file must have exactly one '===' separator, found {} parts",
            parts.len()
        )
        .into());
    }

    let input = parts[0].trim();
    let expected = parts[1].trim();

    let result = sanitize_html(input);
    if result != expected {
        return Err(format!(
            "Sanitize mismatch!\nInput: {input}\nResult: {result}\nExpected: {expected}"
        )
        .into());
    }

    let again = sanitize_html(result.as_str());
    if again != result {
        return Err(format!("Output is not a fixed point!\nFirst: {result}\nSecond: {again}").into());
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_case, root = "tests/sanitize-cases", pattern = r".*\.html$" },
}
