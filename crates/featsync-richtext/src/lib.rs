//! Step text extraction from the rich-text blob of a test case.
//!
//! The source renderer stores steps as markup-within-markup: an outer XML
//! document whose text nodes are themselves HTML-encoded. Extraction strips
//! both layers, reconstructs line breaks from the renderer's fixed-width
//! indentation, and rewrites `@name` parameter tokens into the angle-bracket
//! placeholders a scenario outline expects.
//!
//! Extraction is best-effort by contract: malformed markup degrades to
//! whatever text the parser can recover, it never fails.

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Run length of spaces that marks an original line boundary.
///
/// This is a positional artifact of the upstream renderer's indentation, not
/// whitespace normalization: a run of exactly this many spaces becomes a
/// newline, shorter and longer runs are left untouched.
const LINE_BREAK_RUN: usize = 5;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("hardcoded regex is valid"));

/// Extract plain multi-line step text from a raw steps blob.
pub fn extract(raw_markup: &str) -> String {
    // Two stripping passes: the first unwraps the outer document and decodes
    // the entities, revealing the inner markup for the second.
    let flattened = flatten(&flatten(raw_markup));
    rewrite_placeholders(&reconstruct_line_breaks(&flattened))
}

/// Strip one layer of markup, joining text nodes with single spaces.
fn flatten(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace each run of exactly [`LINE_BREAK_RUN`] spaces with a newline.
fn reconstruct_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == ' ' {
            run += 1;
            continue;
        }
        flush_space_run(&mut out, run);
        run = 0;
        out.push(ch);
    }
    flush_space_run(&mut out, run);
    out
}

fn flush_space_run(out: &mut String, run: usize) {
    if run == LINE_BREAK_RUN {
        out.push('\n');
    } else {
        for _ in 0..run {
            out.push(' ');
        }
    }
}

/// Rewrite `@word` tokens to `<word>` scenario-outline placeholders.
fn rewrite_placeholders(text: &str) -> String {
    PLACEHOLDER_RE.replace_all(text, "<$1>").into_owned()
}
