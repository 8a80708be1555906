//! Library-level tests for rewriting a converted tree in place.

use nb2md::{RewriteSettings, TreeRewriter};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A source tree `proj/` and its converted mirror `md/` side by side.
struct TreeFixture {
    #[allow(dead_code)]
    temp_dir: TempDir,
    source: PathBuf,
    destination: PathBuf,
}

impl TreeFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let source = temp_dir.path().join("proj");
        let destination = temp_dir.path().join("md");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::create_dir_all(destination.join("sub")).unwrap();
        fs::write(source.join("a.ipynb"), "{}").unwrap();
        fs::write(source.join("sub/b.ipynb"), "{}").unwrap();
        fs::write(source.join("sub/img.png"), [0u8; 4]).unwrap();
        Self {
            temp_dir,
            source,
            destination,
        }
    }

    fn write_doc(&self, relative: &str, text: &str) {
        let path = self.destination.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn read_doc(&self, relative: &str) -> String {
        fs::read_to_string(self.destination.join(relative)).unwrap()
    }

    fn rewriter(&self) -> TreeRewriter {
        TreeRewriter::new(RewriteSettings::new(&self.source, &self.destination))
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cross_document_link_and_image_are_repaired() {
    let tree = TreeFixture::new();
    tree.write_doc("a.md", "# A\n\n[see](sub/b.ipynb)\n\n![x](sub/img.png)\n");
    tree.write_doc("sub/b.md", "# B\n");

    let report = tree.rewriter().run().unwrap();

    assert_eq!(
        tree.read_doc("a.md"),
        "# A\n\n[see](sub/b.md)\n\n![x](../proj/sub/img.png)\n"
    );
    assert!(report.is_clean());
    assert_eq!(report.documents, 2);
    assert_eq!(report.changed, 1);
    assert_eq!(report.renamed_links, 1);
    assert_eq!(report.remapped_links, 1);
}

#[test]
fn test_nested_document_resolves_against_its_own_mirror() {
    let tree = TreeFixture::new();
    tree.write_doc("a.md", "# A\n");
    tree.write_doc(
        "sub/b.md",
        "[up](../a.ipynb#intro)\n![y](img.png)\n![plot](b_files/b_1_0.png)\n",
    );

    tree.rewriter().run().unwrap();

    assert_eq!(
        tree.read_doc("sub/b.md"),
        "[up](../a.md#intro)\n![y](../../proj/sub/img.png)\n![plot](b_files/b_1_0.png)\n"
    );
}

#[test]
fn test_html_attributes_keep_fragment_and_query() {
    let tree = TreeFixture::new();
    tree.write_doc(
        "a.md",
        "<img src=\"assets/pic.png#frag\">\n<a href=\"data/table.csv?raw=1\">table</a>\n",
    );

    tree.rewriter().run().unwrap();

    assert_eq!(
        tree.read_doc("a.md"),
        "<img src=\"../proj/assets/pic.png#frag\">\n<a href=\"../proj/data/table.csv?raw=1\">table</a>\n"
    );
}

#[test]
fn test_external_and_anchor_links_are_byte_identical() {
    let tree = TreeFixture::new();
    let text = "[ext](http://example.com/a.ipynb)\n[mail](mailto:me@example.com)\n[top](#top)\n[abs](/etc/hosts)\n";
    tree.write_doc("a.md", text);

    let report = tree.rewriter().run().unwrap();

    assert_eq!(tree.read_doc("a.md"), text);
    assert_eq!(report.changed, 0);
}

#[test]
fn test_document_without_source_directory_is_reported() {
    let tree = TreeFixture::new();
    tree.write_doc("a.md", "[see](sub/b.ipynb)\n");
    tree.write_doc("orphan/c.md", "![x](img.png)\n");

    let report = tree.rewriter().run().unwrap();

    assert_eq!(report.documents, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, "tree_asymmetry");
    assert!(path_str(&report.failures[0].path).ends_with("c.md"));
    assert_eq!(tree.read_doc("orphan/c.md"), "![x](img.png)\n");
    assert_eq!(tree.read_doc("a.md"), "[see](sub/b.md)\n");
}

#[test]
fn test_best_effort_mode_rewrites_orphans() {
    let tree = TreeFixture::new();
    tree.write_doc("orphan/c.md", "![x](img.png)\n");

    let mut settings = RewriteSettings::new(&tree.source, &tree.destination);
    settings.strict_mirror = false;
    let report = TreeRewriter::new(settings).run().unwrap();

    assert!(report.is_clean());
    assert_eq!(
        tree.read_doc("orphan/c.md"),
        "![x](../../proj/orphan/img.png)\n"
    );
}

#[test]
fn test_asset_directories_are_not_walked() {
    let tree = TreeFixture::new();
    tree.write_doc("a.md", "# A\n");
    tree.write_doc("a_files/notes.md", "[see](b.ipynb)\n");

    let report = tree.rewriter().run().unwrap();

    assert_eq!(report.documents, 1);
    assert_eq!(tree.read_doc("a_files/notes.md"), "[see](b.ipynb)\n");
}
