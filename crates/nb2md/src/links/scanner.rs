//! Link-form scanner.
//!
//! Finds every URL mentioned through one of the supported syntaxes and lets a
//! caller replace each URL span, leaving all other bytes of the text alone.
//!
//! # Supported Syntax
//!
//! - Markdown links: `[text](url)` and `[text](url "title")`
//! - Markdown images: `![alt](url)` and `![alt](url "title")`
//! - HTML attributes: `src="url"` and `href="url"`
//!
//! Markdown destinations are found by their `](` shape; the link kind comes
//! from the balanced `[` opener, which also makes nested badge links such as
//! `[![ci](badge.svg)](ci.ipynb)` yield both URLs.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Markdown destination: `](url)` or `](url "title")`. A backslash escapes the next character.
static MARKDOWN_DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\]\((?P<url>(?:[^)\s\\]|\\.)+)(?P<title>\s+"[^"]*")?\)"#)
        .expect("markdown destination pattern is valid")
});

/// Double-quoted `src` or `href` attribute.
static HTML_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?P<attr>src|href)="(?P<url>[^"]+)""#).expect("attribute pattern is valid")
});

/// Syntax through which a URL was mentioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkForm {
    MarkdownLink,
    MarkdownImage,
    HtmlAttribute,
}

/// One URL mention inside a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence<'a> {
    pub form: LinkForm,
    /// The URL exactly as written.
    pub url: &'a str,
    /// Byte range of `url` within the scanned text.
    pub span: Range<usize>,
    /// Markdown title including its leading whitespace and quotes.
    pub title: Option<&'a str>,
}

/// Scan text for every supported link occurrence, in text order.
///
/// When two forms claim overlapping URL spans, the one starting first wins,
/// so each byte of the text belongs to at most one occurrence.
pub fn scan(text: &str) -> Vec<LinkOccurrence<'_>> {
    let mut found = Vec::new();
    let openers = bracket_openers(text);

    for caps in MARKDOWN_DESTINATION.captures_iter(text) {
        let (Some(whole), Some(url)) = (caps.get(0), caps.name("url")) else {
            continue;
        };
        let Some(&opener) = openers.get(&whole.start()) else {
            continue;
        };
        let form = if opener > 0 && text.as_bytes()[opener - 1] == b'!' {
            LinkForm::MarkdownImage
        } else {
            LinkForm::MarkdownLink
        };
        found.push(LinkOccurrence {
            form,
            url: url.as_str(),
            span: url.range(),
            title: caps.name("title").map(|t| t.as_str()),
        });
    }

    for caps in HTML_ATTRIBUTE.captures_iter(text) {
        if let Some(url) = caps.name("url") {
            found.push(LinkOccurrence {
                form: LinkForm::HtmlAttribute,
                url: url.as_str(),
                span: url.range(),
                title: None,
            });
        }
    }

    found.sort_by_key(|occurrence| occurrence.span.start);

    let mut occurrences: Vec<LinkOccurrence> = Vec::with_capacity(found.len());
    for occurrence in found {
        let overlaps = occurrences
            .last()
            .is_some_and(|previous| occurrence.span.start < previous.span.end);
        if !overlaps {
            occurrences.push(occurrence);
        }
    }
    occurrences
}

/// Replace URL spans in `text`.
///
/// `replace` is called once per occurrence; returning `None` keeps that URL
/// as written. Bytes outside the replaced spans are copied verbatim.
pub fn rewrite_text<F>(text: &str, mut replace: F) -> String
where
    F: FnMut(&LinkOccurrence) -> Option<String>,
{
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for occurrence in scan(text) {
        if let Some(replacement) = replace(&occurrence) {
            output.push_str(&text[cursor..occurrence.span.start]);
            output.push_str(&replacement);
            cursor = occurrence.span.end;
        }
    }

    output.push_str(&text[cursor..]);
    output
}

/// Map each unescaped `]` to the `[` it closes, in one forward pass.
///
/// A backslash escapes the byte after it, so `\\]` is a real bracket. A
/// blank or whitespace-only line ends the paragraph and forgets every open
/// bracket, since link text cannot span paragraphs.
fn bracket_openers(text: &str) -> HashMap<usize, usize> {
    let bytes = text.as_bytes();
    let mut openers = HashMap::new();
    let mut open: Vec<usize> = Vec::new();
    let mut line_has_content = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                line_has_content = true;
                i += 2;
                continue;
            }
            b'\n' => {
                if !line_has_content {
                    open.clear();
                }
                line_has_content = false;
            }
            b'[' => {
                line_has_content = true;
                open.push(i);
            }
            b']' => {
                line_has_content = true;
                if let Some(opener) = open.pop() {
                    openers.insert(i, opener);
                }
            }
            b' ' | b'\t' | b'\r' => {}
            _ => line_has_content = true,
        }
        i += 1;
    }
    openers
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn urls(text: &str) -> Vec<(LinkForm, &str)> {
        scan(text).into_iter().map(|o| (o.form, o.url)).collect()
    }

    #[test]
    fn test_scan_markdown_link_and_image() {
        let text = "See [doc](sub/b.ipynb) and ![plot](img/p.png).";
        assert_eq!(
            urls(text),
            vec![
                (LinkForm::MarkdownLink, "sub/b.ipynb"),
                (LinkForm::MarkdownImage, "img/p.png"),
            ]
        );
    }

    #[test]
    fn test_scan_title_is_kept_separately() {
        let text = r#"![x](a.png "A title") and [y](b.md  "other")"#;
        let found = scan(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].url, "a.png");
        assert_eq!(found[0].title, Some(r#" "A title""#));
        assert_eq!(found[1].url, "b.md");
        assert_eq!(found[1].title, Some(r#"  "other""#));
    }

    #[test]
    fn test_scan_html_attributes() {
        let text = r#"<img src="assets/pic.png#frag"> <a href="other.ipynb">x</a>"#;
        assert_eq!(
            urls(text),
            vec![
                (LinkForm::HtmlAttribute, "assets/pic.png#frag"),
                (LinkForm::HtmlAttribute, "other.ipynb"),
            ]
        );
    }

    #[test]
    fn test_scan_ignores_single_quoted_and_empty_attributes() {
        let text = r#"<img src='a.png'> <a href="">x</a>"#;
        assert!(scan(text).is_empty());
    }

    #[test]
    fn test_scan_nested_badge_link() {
        let text = "[![ci](badges/ci.svg)](ci.ipynb)";
        assert_eq!(
            urls(text),
            vec![
                (LinkForm::MarkdownImage, "badges/ci.svg"),
                (LinkForm::MarkdownLink, "ci.ipynb"),
            ]
        );
    }

    #[test]
    fn test_scan_html_inside_link_text() {
        let text = r#"[<img src="logo.png">](home.ipynb)"#;
        assert_eq!(
            urls(text),
            vec![
                (LinkForm::HtmlAttribute, "logo.png"),
                (LinkForm::MarkdownLink, "home.ipynb"),
            ]
        );
    }

    #[test]
    fn test_scan_escaped_characters_in_url() {
        let text = r"[x](a\)b.png)";
        assert_eq!(urls(text), vec![(LinkForm::MarkdownLink, r"a\)b.png")]);
    }

    #[test]
    fn test_scan_stray_bracket_is_not_a_link() {
        assert!(scan("a stray ](here) bracket").is_empty());
        assert!(scan("[open\n\nlater](x.png)").is_empty());
        assert!(scan("[open\r\n\r\nlater](x.png)").is_empty());
        assert!(scan("[open\n   \nlater](x.png)").is_empty());
    }

    #[test]
    fn test_scan_link_text_may_span_lines() {
        assert_eq!(
            urls("[two\r\nlines](x.png)"),
            vec![(LinkForm::MarkdownLink, "x.png")]
        );
    }

    #[test]
    fn test_scan_escaped_brackets() {
        // `\]` does not close the link text, `\\]` is a backslash then a real bracket
        assert!(scan(r"[x\](a.png)").is_empty());
        assert_eq!(urls(r"[x\\](a.png)"), vec![(LinkForm::MarkdownLink, "a.png")]);
        assert_eq!(urls(r"[\[x](a.png)"), vec![(LinkForm::MarkdownLink, "a.png")]);
        assert!(scan(r"\[x](a.png)").is_empty());
    }

    #[test]
    fn test_scan_long_line_is_linear() {
        let noise = "](x) ".repeat(100_000);
        let started = Instant::now();
        assert!(scan(&noise).is_empty());

        let links = "[a](b.png) ".repeat(50_000);
        assert_eq!(scan(&links).len(), 50_000);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_scan_url_stops_at_space() {
        // a space not followed by a quoted title is not a destination
        assert!(scan("[x](a b.png)").is_empty());
    }

    #[test]
    fn test_scan_spans_point_at_urls() {
        let text = "pre [t](u.png) post";
        let found = scan(text);
        assert_eq!(&text[found[0].span.clone()], "u.png");
    }

    #[test]
    fn test_rewrite_text_touches_only_url_spans() {
        let text = r#"# Title [t](a.png "keep me") <img src="b.png"> tail"#;
        let rewritten = rewrite_text(text, |o| Some(format!("X/{}", o.url)));
        assert_eq!(
            rewritten,
            r#"# Title [t](X/a.png "keep me") <img src="X/b.png"> tail"#
        );
    }

    #[test]
    fn test_rewrite_text_none_keeps_url() {
        let text = "[a](keep.png) [b](change.png)";
        let rewritten = rewrite_text(text, |o| {
            (o.url == "change.png").then(|| "changed.png".to_string())
        });
        assert_eq!(rewritten, "[a](keep.png) [b](changed.png)");
    }
}
