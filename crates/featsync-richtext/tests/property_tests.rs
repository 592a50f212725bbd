//! Property tests for step text extraction invariants.

use featsync_richtext::extract;
use proptest::prelude::*;

proptest! {
    /// Extraction is total: arbitrary input never panics.
    #[test]
    fn prop_extract_never_panics(input in ".{0,200}") {
        let _ = extract(&input);
    }

    /// No `@word` token survives extraction.
    #[test]
    fn prop_no_placeholder_tokens_survive(input in "[a-zA-Z0-9@ .,]{0,120}") {
        let out = extract(&input);
        let bytes = out.as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if *b == b'@' {
                let next = bytes.get(i + 1);
                prop_assert!(
                    !next.is_some_and(|n| n.is_ascii_alphanumeric() || *n == b'_'),
                    "unrewritten token in {out:?}"
                );
            }
        }
    }

    /// Markup-free text with sub-break space runs and no tokens is a fixpoint.
    #[test]
    fn prop_plain_text_is_unchanged(
        words in proptest::collection::vec("[a-zA-Z0-9]{1,8}", 1..6),
        gaps in proptest::collection::vec(1usize..5, 0..5),
    ) {
        let mut text = String::new();
        for (i, w) in words.iter().enumerate() {
            if i > 0 {
                let gap = gaps.get(i - 1).copied().unwrap_or(1);
                text.push_str(&" ".repeat(gap));
            }
            text.push_str(w);
        }
        prop_assert_eq!(extract(&text), text);
    }

    /// Exactly-five-space runs between words always become newlines.
    #[test]
    fn prop_five_space_runs_break(a in "[a-z]{1,10}", b in "[a-z]{1,10}") {
        let text = format!("{a}     {b}");
        prop_assert_eq!(extract(&text), format!("{a}\n{b}"));
    }
}
