//! Text Sanitizer
//!
//! Strips markdown-style links and bare URLs from user-supplied text before it
//! is inserted into a document. Rules run as an ordered sequence of deletions:
//!
//! 1. Parenthesized markdown link: `([label](url))`
//! 2. Standalone markdown link: `[label](url)`
//! 3. Bare URL: `http://...` / `https://...` up to the next whitespace
//! 4. Parenthesized bare domain: `(example.com)`, `(www.example.org)`
//! 5. Remaining stray `(`, `)`, `[`, `]` characters
//! 6. Bare URL again: bracket deletion can splice characters into a fresh
//!    `http://` prefix (e.g. `h(t)tp://...`), so rule 3 runs once more
//! 7. Leading/trailing whitespace trim
//!
//! Rules 1-4 consume leading whitespace so removing an embedded link does not
//! leave a doubled space behind. The function is idempotent: after rule 5 no
//! brackets remain, so the bracket-based rules cannot re-fire, and rule 6
//! clears any URL that bracket deletion reassembled.

use once_cell::sync::Lazy;
use regex::Regex;

static PAREN_MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\s*\[[^\]]*\]\([^)]*\)\s*\)").expect("valid regex"));

static MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[[^\]]*\]\([^)]*\)").expect("valid regex"));

static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*https?://\S+").expect("valid regex"));

static PAREN_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(\s*(?:www\.)?[A-Za-z0-9][A-Za-z0-9-]*(?:\.[A-Za-z0-9-]+)*\.(?:com|org|net|edu|gov|io|co|uk|de)\s*\)")
        .expect("valid regex")
});

static STRAY_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()\[\]]").expect("valid regex"));

/// Remove link-like substrings and stray brackets from `text`.
///
/// Pure function, no side effects. Applying it twice yields the same result as
/// applying it once.
pub fn sanitize(text: &str) -> String {
    let pass = PAREN_MD_LINK.replace_all(text, "");
    let pass = MD_LINK.replace_all(&pass, "");
    let pass = BARE_URL.replace_all(&pass, "");
    let pass = PAREN_DOMAIN.replace_all(&pass, "");
    let pass = STRAY_BRACKETS.replace_all(&pass, "");
    // Deleting brackets can reassemble a URL out of its fragments; strip any
    // such leftovers so a single call reaches the fixpoint.
    let pass = BARE_URL.replace_all(&pass, "");
    pass.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize("Hello world"), "Hello world");
        assert_eq!(sanitize("No links here, just text."), "No links here, just text.");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize("  padded text  "), "padded text");
    }

    #[test]
    fn strips_parenthesized_markdown_link() {
        assert_eq!(
            sanitize("Hello ([see](http://example.com)) world"),
            "Hello world"
        );
    }

    #[test]
    fn strips_standalone_markdown_link() {
        assert_eq!(sanitize("Read [the docs](https://docs.rs) today"), "Read today");
    }

    #[test]
    fn strips_bare_urls() {
        assert_eq!(sanitize("Visit https://example.com for info"), "Visit for info");
        assert_eq!(sanitize("http://a.b/c?d=e"), "");
    }

    #[test]
    fn strips_parenthesized_domains() {
        assert_eq!(sanitize("See our site (example.com) for details"), "See our site for details");
        assert_eq!(sanitize("Hosted (www.example.org) mirror"), "Hosted mirror");
    }

    #[test]
    fn strips_stray_brackets() {
        assert_eq!(sanitize("left (over] brackets)"), "left over brackets");
    }

    #[test]
    fn link_at_start_of_text() {
        assert_eq!(sanitize("([ref](http://x.io)) trailing text"), "trailing text");
    }

    #[test]
    fn strips_urls_reassembled_by_bracket_removal() {
        // Bracket deletion splices these fragments into a live URL; it must
        // still be gone after one pass.
        assert_eq!(sanitize("h(t)tp://example.com/page"), "");
        assert_eq!(sanitize("https:/(/)example.com/x"), "");
        assert_eq!(sanitize("see h(t)tp://example.com/page now"), "see now");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "Hello ([see](http://example.com)) world",
            "Visit https://example.com for info",
            "plain text",
            "  padded  ",
            "mixed [a](b) and (c.com) and http://d.e and ) [",
            "h(t)tp://example.com/page",
            "https:/(/)example.com/x",
            "before h(t)tps://split.example/path after",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "sanitize not idempotent for {:?}", input);
        }
    }
}
