//! # icf2scorm
//!
//! Repackage ICF content bundles as SCORM 1.2 zip packages.
//!
//! An ICF bundle is a zip of instructional HTML, JavaScript and JSON assets.
//! Conversion unpacks the bundle, finds the primary `chapter*.html` page,
//! writes an `index.html` wrapper and an `imsmanifest.xml`, and zips the
//! result back up.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Convert raw archive bytes
//! let input = std::fs::read("course.icf")?;
//! let package = icf2scorm::convert(&input)?;
//! std::fs::write("scorm_package.zip", package)?;
//! # Ok::<(), icf2scorm::Error>(())
//! ```
//!
//! ## Options and Reports
//!
//! ```no_run
//! use icf2scorm::{convert_file, PackageOptions, TestLoadFailure};
//!
//! let options = PackageOptions::new()
//!     .with_organization_title("Forklift Safety")
//!     .with_test_load_failure(TestLoadFailure::Visible)
//!     .with_disk_scratch(None);
//!
//! let conversion = convert_file("course.zip", &options)?;
//! println!("Main content: {}", conversion.report.content);
//! std::fs::write("scorm_package.zip", &conversion.bytes)?;
//! # Ok::<(), icf2scorm::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: Async file conversion with Tokio
//! - `ffi`: C-ABI bindings for foreign language integration

pub mod archive;
pub mod error;
pub mod extract;
pub mod locate;
pub mod options;
pub mod synth;
pub mod tree;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-exports
pub use archive::build_archive;
pub use error::{Error, ErrorKind, Result};
pub use extract::{extract_archive, extract_into, is_supported_extension, looks_like_zip, Extracted};
pub use locate::{locate_content, ContentRef};
pub use options::{PackageOptions, ScratchMode, TestLoadFailure};
pub use synth::synthesize;
pub use tree::{DiskTree, MemoryTree, Scratch, WorkTree};

use serde::Serialize;
use std::path::Path;

/// Summary of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Primary content page embedded by the wrapper
    pub content: ContentRef,
    /// Wrapper folder removed during extraction, if any
    pub unwrapped: Option<String>,
    /// Number of files in the package, generated files included
    pub files: usize,
    /// Whether `test/pretest.json` is present
    pub has_pretest: bool,
    /// Whether `test/posttest.json` is present
    pub has_posttest: bool,
    /// Size of the output archive in bytes (0 when nothing was built)
    pub output_size: usize,
}

/// A finished conversion: the package bytes and a report.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The SCORM package as zip bytes
    pub bytes: Vec<u8>,
    /// Conversion summary
    pub report: ConversionReport,
}

/// Convert an ICF archive into a SCORM 1.2 package with default options.
///
/// # Example
///
/// ```no_run
/// let input = std::fs::read("course.icf")?;
/// let package = icf2scorm::convert(&input)?;
/// # Ok::<(), icf2scorm::Error>(())
/// ```
pub fn convert(data: &[u8]) -> Result<Vec<u8>> {
    convert_with_options(data, &PackageOptions::default()).map(|c| c.bytes)
}

/// Convert an ICF archive into a SCORM 1.2 package.
///
/// The working tree is dropped before this function returns, whether the
/// conversion succeeded or not; nothing is left behind in the scratch area.
pub fn convert_with_options(data: &[u8], options: &PackageOptions) -> Result<Conversion> {
    match &options.scratch {
        ScratchMode::Memory => {
            let mut staging = MemoryTree::new();
            let mut package = MemoryTree::new();
            run_pipeline(data, &mut staging, &mut package, options)
        }
        ScratchMode::Disk { base } => {
            let scratch = Scratch::create(base.as_deref(), &std::process::id().to_string())?;
            let mut staging = scratch.subtree("extracted")?;
            let mut package = scratch.subtree("scorm_package")?;
            run_pipeline(data, &mut staging, &mut package, options)
        }
    }
}

/// Read an ICF archive from disk and convert it.
pub fn convert_file(path: impl AsRef<Path>, options: &PackageOptions) -> Result<Conversion> {
    let path = path.as_ref();
    if !is_supported_extension(path) {
        log::warn!(
            "{} does not have a .zip or .icf extension; converting anyway",
            path.display()
        );
    }
    let data = std::fs::read(path)?;
    convert_with_options(&data, options)
}

/// Convert an ICF archive file on a blocking thread.
#[cfg(feature = "async")]
pub async fn convert_file_async(
    path: impl AsRef<Path>,
    options: PackageOptions,
) -> Result<Conversion> {
    let data = tokio::fs::read(path.as_ref()).await?;
    tokio::task::spawn_blocking(move || convert_with_options(&data, &options))
        .await
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}

/// Extract and locate without building a package.
///
/// The returned report has `output_size` 0 and counts only input files.
pub fn inspect(data: &[u8]) -> Result<ConversionReport> {
    let mut staging = MemoryTree::new();
    let mut package = MemoryTree::new();
    let extracted = extract_into(data, &mut staging, &mut package)?;
    let content = locate_content(&package)?;

    Ok(ConversionReport {
        content,
        unwrapped: extracted.wrapper().map(String::from),
        files: package.file_count(),
        has_pretest: package.is_file(synth::PRETEST_PATH),
        has_posttest: package.is_file(synth::POSTTEST_PATH),
        output_size: 0,
    })
}

/// Extractor → Locator → Synthesizer → Builder.
fn run_pipeline<S, P>(
    data: &[u8],
    staging: &mut S,
    package: &mut P,
    options: &PackageOptions,
) -> Result<Conversion>
where
    S: WorkTree + ?Sized,
    P: WorkTree + ?Sized,
{
    log::debug!("extracting {} byte archive", data.len());
    let extracted = extract_into(data, staging, package)?;

    let content = locate_content(&*package)?;

    let has_pretest = package.is_file(synth::PRETEST_PATH);
    let has_posttest = package.is_file(synth::POSTTEST_PATH);
    if !has_pretest {
        log::warn!("{} is missing; the pre-test section will be empty", synth::PRETEST_PATH);
    }
    if !has_posttest {
        log::warn!("{} is missing; the post-test section will be empty", synth::POSTTEST_PATH);
    }

    synthesize(package, &content, options)?;

    let files = tree::walk_files(&*package, "")?.len();
    let bytes = build_archive(&*package)?;
    log::info!(
        "built SCORM package: {} files, {} bytes, content {}",
        files,
        bytes.len(),
        content
    );

    let report = ConversionReport {
        content,
        unwrapped: extracted.wrapper().map(String::from),
        files,
        has_pretest,
        has_posttest,
        output_size: bytes.len(),
    };
    Ok(Conversion { bytes, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_inspect_reports_layout() {
        let data = make_zip(&[
            ("course/chapter1.html", b"<p>1</p>"),
            ("course/test/pretest.json", b"{}"),
        ]);
        let report = inspect(&data).unwrap();
        assert_eq!(report.content.as_str(), "chapter1.html");
        assert_eq!(report.unwrapped.as_deref(), Some("course"));
        assert_eq!(report.files, 2);
        assert!(report.has_pretest);
        assert!(!report.has_posttest);
        assert_eq!(report.output_size, 0);
    }

    #[test]
    fn test_report_counts_generated_files() {
        let data = make_zip(&[("chapter1.html", b"<p>1</p>")]);
        let conversion = convert_with_options(&data, &PackageOptions::default()).unwrap();
        assert_eq!(conversion.report.files, 3);
        assert_eq!(conversion.report.unwrapped, None);
        assert_eq!(conversion.report.output_size, conversion.bytes.len());
    }

    #[test]
    fn test_report_serializes() {
        let data = make_zip(&[("chapter1.html", b"<p>1</p>")]);
        let report = inspect(&data).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"content\":\"chapter1.html\""));
        assert!(json.contains("\"unwrapped\":null"));
    }
}
