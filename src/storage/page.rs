//! Page and title value types

use std::fmt;

/// Validated page title
///
/// A title is a non-empty run of ASCII letters and digits. It doubles as the
/// URL segment and the filename stem, so nothing else may get through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title(String);

impl Title {
    /// Parse a raw path segment, returning `None` for anything that is not alphanumeric
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A titled text document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub const fn new(title: Title, body: Vec<u8>) -> Self {
        Self { title, body }
    }

    /// Blank page used when authoring a title that does not exist yet
    pub const fn empty(title: Title) -> Self {
        Self {
            title,
            body: Vec::new(),
        }
    }

    /// Body as text for templates; invalid UTF-8 is replaced, not rejected
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_accepts_alphanumeric() {
        assert_eq!(Title::parse("FrontPage").unwrap().as_str(), "FrontPage");
        assert!(Title::parse("Page2").is_some());
        assert!(Title::parse("42").is_some());
    }

    #[test]
    fn test_title_rejects_invalid() {
        assert!(Title::parse("").is_none());
        assert!(Title::parse("bad title!").is_none());
        assert!(Title::parse("../etc").is_none());
        assert!(Title::parse("a/b").is_none());
        assert!(Title::parse("under_score").is_none());
        assert!(Title::parse("café").is_none());
    }

    #[test]
    fn test_body_text_lossy() {
        let title = Title::parse("Bytes").unwrap();
        let page = Page::new(title, vec![b'o', b'k', 0xff]);
        assert!(page.body_text().starts_with("ok"));
    }
}
