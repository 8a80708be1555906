//! Property-based tests for link rewriting invariants
//!
//! These tests use `proptest` to check the path algebra and the scanner over
//! randomly generated trees, URLs and surrounding prose.

use super::*;
use crate::config::RewriteSettings;
use crate::document::Document;
use crate::paths::{join_url_path, normalize};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

// Generator for a single path segment
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_map(|s| s.to_string())
}

// Generator for an absolute directory such as /w/src/nb
fn dir_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(segment_strategy(), 0..4).prop_map(|segments| {
        let mut dir = PathBuf::from("/w");
        dir.extend(segments);
        dir
    })
}

// Generator for relative URL paths, with parent traversal mixed in
fn url_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => segment_strategy(),
            1 => Just("..".to_string()),
            1 => Just(".".to_string()),
        ],
        1..5,
    )
    .prop_map(|segments| format!("{}/file.png", segments.join("/")))
}

// Generator for URLs that must never be rewritten
fn pass_through_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "#[a-z0-9-]{0,8}",
        "/[a-z/]{0,12}",
        "(http|https|mailto|data|ftp)[+.a-z]{0,3}:[a-z/.]{0,12}",
    ]
}

// Generator for prose that contains no link syntax
fn prose_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.;:\n#*_-]{0,30}".prop_map(|s| s.to_string())
}

// Property 1: pass-through URLs pass through whichever document holds them
proptest! {
    #[test]
    fn prop_classification_independent_of_document(
        url in pass_through_strategy(),
        base_name in segment_strategy(),
    ) {
        let classifier = UrlClassifier::for_document(&base_name, "_files/");
        prop_assert_eq!(classifier.classify(&url), UrlClass::PassThrough);
    }
}

// Property 2: following the rewritten link from the new location reaches
// the same file the original link reached from the original location
proptest! {
    #[test]
    fn prop_resolution_round_trip(
        mirror in dir_strategy(),
        new_dir in dir_strategy(),
        url_path in url_path_strategy(),
    ) {
        let location = new_dir.join("doc.md");
        let expected = normalize(&join_url_path(&mirror, &url_path));

        let rewritten = resolve_path(&url_path, &location, &mirror)
            .expect("absolute frames always have a relative path");
        let reached = normalize(&join_url_path(&new_dir, &rewritten));

        prop_assert_eq!(reached, expected);
    }
}

// Property 3: query and fragment survive remapping unchanged
proptest! {
    #[test]
    fn prop_query_and_fragment_preserved(
        url_path in url_path_strategy(),
        query in prop::option::of("[a-z0-9=&]{0,10}"),
        fragment in prop::option::of("[a-z0-9?=-]{0,10}"),
    ) {
        let mut url = url_path;
        if let Some(q) = &query {
            url.push('?');
            url.push_str(q);
        }
        if let Some(f) = &fragment {
            url.push('#');
            url.push_str(f);
        }

        let rewritten = resolve(&url, Path::new("/w/md/sub/doc.md"), Path::new("/w/src/sub"))
            .expect("absolute frames always have a relative path");
        let parts = UrlParts::split(&rewritten);

        prop_assert_eq!(parts.query, query.as_deref());
        prop_assert_eq!(parts.fragment, fragment.as_deref());
    }
}

// Property 4: a second extension pass changes nothing
proptest! {
    #[test]
    fn prop_extension_pass_idempotent(
        names in prop::collection::vec(segment_strategy(), 1..5),
        prose in prose_strategy(),
    ) {
        let text: String = names
            .iter()
            .map(|n| format!("{prose}[{n}]({n}.ipynb#{n}) <a href=\"{n}.ipynb\">x</a>\n"))
            .collect();

        let rename = ExtensionRename::new("ipynb", "md");
        let once = rename.rename_extensions(&text);
        prop_assert_eq!(rename.rename_extensions(&once), once);
    }
}

// Property 5: bytes outside URL spans are untouched
proptest! {
    #[test]
    fn prop_non_interference(
        before in prose_strategy(),
        link_text in "[a-zA-Z0-9 *_]{0,12}",
        title in prop::option::of("[a-zA-Z0-9 ]{0,12}"),
        url_path in url_path_strategy(),
        after in prose_strategy(),
    ) {
        let title_text = title.map(|t| format!(" \"{}\"", t)).unwrap_or_default();
        let text = format!("{before}![{link_text}]({url_path}{title_text}){after}");

        let settings = RewriteSettings::new("/w/src", "/w/md");
        let document = Document::new(&settings.destination_root, "/w/md/nb/doc.md");
        let rewriter = DocumentRewriter::new(&document, Path::new("/w/src/nb"), &settings);
        let (rewritten, _) = rewriter.rewrite(&text);
        let new_url = match rewriter.action(&url_path) {
            RewriteAction::RenameExtension(url) | RewriteAction::RemapPath(url) => url,
            RewriteAction::PassThrough => url_path.clone(),
        };

        prop_assert_eq!(
            rewritten,
            format!("{before}![{link_text}]({new_url}{title_text}){after}")
        );
    }
}
