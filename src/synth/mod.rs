//! SCORM package synthesis.
//!
//! Writes the two generated files of a package into the package tree:
//! the `index.html` wrapper page, which is the single SCO entry point, and
//! the SCORM 1.2 `imsmanifest.xml` that declares it.
//!
//! # Example
//!
//! ```
//! use icf2scorm::synth::{render_index, render_manifest};
//! use icf2scorm::{ContentRef, PackageOptions};
//!
//! let options = PackageOptions::default();
//! let page = render_index(&ContentRef::new("chapter1.html"), &options);
//! assert!(page.contains(r#"<iframe src="chapter1.html"></iframe>"#));
//!
//! let manifest = render_manifest(&options)?;
//! assert!(manifest.contains(r#"href="index.html""#));
//! # Ok::<(), icf2scorm::Error>(())
//! ```

mod manifest;
mod page;

pub use manifest::render_manifest;
pub use page::{render_index, POSTTEST_PATH, PRETEST_PATH};

use crate::error::Result;
use crate::locate::ContentRef;
use crate::options::PackageOptions;
use crate::tree::WorkTree;

/// File name of the generated wrapper page.
pub const INDEX_FILE: &str = "index.html";

/// File name of the generated SCORM manifest.
pub const MANIFEST_FILE: &str = "imsmanifest.xml";

/// Write `index.html` and `imsmanifest.xml` at the root of `tree`.
///
/// Existing files with those names are replaced.
pub fn synthesize<T: WorkTree + ?Sized>(
    tree: &mut T,
    content: &ContentRef,
    options: &PackageOptions,
) -> Result<()> {
    for name in [INDEX_FILE, MANIFEST_FILE] {
        if tree.is_file(name) {
            log::debug!("replacing {} from the input archive", name);
        }
    }

    let page = render_index(content, options);
    tree.write_file(INDEX_FILE, page.as_bytes())?;

    let manifest = render_manifest(options)?;
    tree.write_file(MANIFEST_FILE, manifest.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    #[test]
    fn test_synthesize_writes_both_files() {
        let mut tree = MemoryTree::new();
        tree.write_file("chapter1.html", b"<p>content</p>").unwrap();

        synthesize(
            &mut tree,
            &ContentRef::new("chapter1.html"),
            &PackageOptions::default(),
        )
        .unwrap();

        let page = String::from_utf8(tree.read_file(INDEX_FILE).unwrap()).unwrap();
        assert!(page.contains(r#"<iframe src="chapter1.html"></iframe>"#));

        let manifest = String::from_utf8(tree.read_file(MANIFEST_FILE).unwrap()).unwrap();
        assert!(manifest.starts_with("<?xml"));
        assert_eq!(tree.read_file("chapter1.html").unwrap(), b"<p>content</p>");
    }

    #[test]
    fn test_synthesize_overwrites_existing() {
        let mut tree = MemoryTree::new();
        tree.write_file(INDEX_FILE, b"old index").unwrap();
        tree.write_file(MANIFEST_FILE, b"old manifest").unwrap();

        synthesize(
            &mut tree,
            &ContentRef::new("pages/chapter2.html"),
            &PackageOptions::default(),
        )
        .unwrap();

        assert_ne!(tree.read_file(INDEX_FILE).unwrap(), b"old index");
        assert_ne!(tree.read_file(MANIFEST_FILE).unwrap(), b"old manifest");
    }
}
