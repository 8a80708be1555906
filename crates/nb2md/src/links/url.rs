//! Splitting of link URLs into path, query and fragment.

use std::sync::LazyLock;

use regex::Regex;

/// URI scheme prefix: a letter followed by letters, digits, `+`, `.` or `-`, then `:`.
static SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").expect("scheme pattern is valid")
});

/// Returns true if the URL starts with a URI scheme (`http:`, `data:`, `mailto:`, ...).
pub fn has_scheme(url: &str) -> bool {
    SCHEME.is_match(url)
}

/// A relative URL reference split into its parts.
///
/// Query and fragment keep their presence even when empty, so `a.png?#`
/// reassembles to exactly the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    /// Split a relative reference. The fragment starts at the first `#`,
    /// the query at the first `?` before it.
    pub fn split(url: &'a str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        Self {
            path,
            query,
            fragment,
        }
    }

    /// Reassemble the URL around a replacement path, keeping query and fragment untouched.
    pub fn with_path(&self, path: &str) -> String {
        let mut url = String::with_capacity(
            path.len()
                + self.query.map_or(0, |q| q.len() + 1)
                + self.fragment.map_or(0, |f| f.len() + 1),
        );
        url.push_str(path);
        if let Some(query) = self.query {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}
