//! Splitting task descriptions into plain text and web links.
//!
//! Descriptions may contain bare `http://` or `https://` URLs. A link runs
//! up to the next whitespace character; the front end decides how to
//! render each part.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[^\s]+").expect("URL pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Link(s) => s,
        }
    }
}

/// Splits `text` into alternating text and link segments, in order.
///
/// Text without links comes back as a single text segment, and the empty
/// string as one empty text segment.
///
/// ```
/// # use nowruz_countdown::linkify::{linkify, Segment};
/// let parts = linkify("See https://example.org/guide for details");
/// assert_eq!(
///     parts,
///     vec![
///         Segment::Text("See "),
///         Segment::Link("https://example.org/guide"),
///         Segment::Text(" for details"),
///     ]
/// );
/// ```
pub fn linkify(text: &str) -> Vec<Segment<'_>> {
    let mut parts = Vec::new();
    let mut last = 0;
    for found in URL_REGEX.find_iter(text) {
        if found.start() > last {
            parts.push(Segment::Text(&text[last..found.start()]));
        }
        parts.push(Segment::Link(found.as_str()));
        last = found.end();
    }
    if last < text.len() {
        parts.push(Segment::Text(&text[last..]));
    }
    if parts.is_empty() {
        parts.push(Segment::Text(text));
    }
    parts
}

/// Returns every link in `text`.
pub fn links(text: &str) -> Vec<&str> {
    URL_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(linkify("Wash the windows"), vec![Segment::Text("Wash the windows")]);
        assert_eq!(linkify(""), vec![Segment::Text("")]);
    }

    #[test]
    fn test_link_only() {
        assert_eq!(
            linkify("http://a.example"),
            vec![Segment::Link("http://a.example")]
        );
    }

    #[test]
    fn test_adjacent_links() {
        let parts = linkify("https://a.example https://b.example/x?y=1");
        assert_eq!(
            parts,
            vec![
                Segment::Link("https://a.example"),
                Segment::Text(" "),
                Segment::Link("https://b.example/x?y=1"),
            ]
        );
        let joined: String = parts.iter().map(Segment::as_str).collect();
        assert_eq!(joined, "https://a.example https://b.example/x?y=1");
    }

    #[test]
    fn test_non_ascii_text_around_links() {
        let text = "ببینید https://fa.example/راهنما را";
        let parts = linkify(text);
        assert_eq!(parts[0], Segment::Text("ببینید "));
        assert_eq!(parts[1], Segment::Link("https://fa.example/راهنما"));
        assert_eq!(links(text), vec!["https://fa.example/راهنما"]);
    }

    #[test]
    fn test_ftp_is_not_a_link() {
        assert_eq!(links("ftp://old.example and mailto:x@y"), Vec::<&str>::new());
    }
}
