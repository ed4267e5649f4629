//! Textual matching over rendered source.
//!
//! Rules use these only where the tree has no structural signal, e.g. when a
//! callee is an arbitrary expression and the question is whether it names
//! `SqlCommand` somewhere. Matches are plain, case-sensitive substring tests
//! and can hit unrelated identifiers (`ProfileFile` mentions `File`).

/// Whether `text` contains `needle` anywhere.
pub fn mentions(text: &str, needle: &str) -> bool {
    text.contains(needle)
}

/// Whether `text` contains any of `needles`.
pub fn mentions_any<S: AsRef<str>>(text: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| mentions(text, n.as_ref()))
}
