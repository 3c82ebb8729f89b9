//! Text normalization applied to extracted document text before matching.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[ \t]+").unwrap();
    static ref HYPHEN_BREAK: Regex = Regex::new(r"-\n").unwrap();
    static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Map raw extracted text to canonical text.
///
/// Steps, in order:
/// 1. collapse runs of spaces/tabs to a single space
/// 2. drop a newline that follows a hyphen (line-wrapped words)
/// 3. collapse three or more newlines to exactly two
/// 4. trim leading/trailing whitespace
///
/// The sequence repeats until the text stops changing, so the result is a
/// fixpoint: `normalize(&normalize(s)) == normalize(s)`. Joining a wrapped
/// hyphen can expose a new space run or another hyphen-newline pair, which a
/// single pass would leave behind.
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_pass(raw);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let text = HORIZONTAL_WS.replace_all(text, " ");
    let text = HYPHEN_BREAK.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_spaces_and_tabs() {
        assert_eq!(normalize("a  \t b\t\tc"), "a b c");
    }

    #[test]
    fn test_joins_hyphenated_line_wraps() {
        assert_eq!(normalize("super-\nvisory authority"), "supervisory authority");
    }

    #[test]
    fn test_caps_blank_lines() {
        assert_eq!(normalize("one\n\n\n\n\ntwo"), "one\n\ntwo");
        assert_eq!(normalize("one\n\ntwo"), "one\n\ntwo");
    }

    #[test]
    fn test_trims() {
        assert_eq!(normalize("  \n\n hello \n "), "hello");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n\n\n"), "");
    }

    #[test]
    fn test_nested_hyphen_breaks_reach_fixpoint() {
        // one pass would leave "x-\nb"
        assert_eq!(normalize("x--\n\nb"), "xb");
        // one pass would leave a double space
        assert_eq!(normalize("a -\n b"), "a b");
    }

    #[test]
    fn test_preserves_single_newlines() {
        assert_eq!(normalize("line one\nline two"), "line one\nline two");
    }

    proptest! {
        #[test]
        fn prop_idempotent(s in "[a-z \\t\\n-]{0,64}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_no_hyphen_newline_or_blank_runs(s in "[a-z \\t\\n-]{0,64}") {
            let out = normalize(&s);
            prop_assert!(!out.contains("-\n"));
            prop_assert!(!out.contains("\n\n\n"));
        }

        #[test]
        fn prop_total_over_any_string(s in any::<String>()) {
            let _ = normalize(&s);
        }
    }
}
