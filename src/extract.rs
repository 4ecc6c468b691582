//! Archive extraction with single-level unwrap.

use crate::error::{Error, Result};
use crate::tree::{copy_tree, WorkTree};
use std::io::{Cursor, Read};
use std::path::Component;

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// ZIP end-of-central-directory magic, the first bytes of an empty archive.
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// File extensions accepted as ICF input.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["zip", "icf"];

/// Quick check whether `data` starts like a zip archive.
///
/// Advisory only: archives with leading bytes (self-extracting stubs, shell
/// preambles) fail this check but still extract.
pub fn looks_like_zip(data: &[u8]) -> bool {
    data.len() >= 4 && (data[..4] == ZIP_MAGIC || data[..4] == ZIP_EMPTY_MAGIC)
}

/// Check whether a path has an accepted input extension (`.zip` or `.icf`).
///
/// Only the name is checked; `.icf` and `.zip` inputs are handled identically.
pub fn is_supported_extension(path: impl AsRef<std::path::Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| e.eq_ignore_ascii_case(s))
        })
        .unwrap_or(false)
}

/// Result of unpacking an input archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Path of the content root inside the staging tree ("" for the root)
    pub content_root: String,
}

impl Extracted {
    /// Name of the wrapper folder that was unwrapped, if any.
    pub fn wrapper(&self) -> Option<&str> {
        if self.content_root.is_empty() {
            None
        } else {
            Some(&self.content_root)
        }
    }
}

/// Unpack `data` into `staging` and resolve the content root.
///
/// Directory entries create directories and file entries create their
/// parents as needed. Entries whose names would escape the tree root are
/// skipped, and `.` components are dropped from the rest. If the staging
/// root then holds exactly one entry and that entry is a directory, it
/// becomes the content root; nested wrapping beyond that single level is
/// left alone.
pub fn extract_archive<T: WorkTree + ?Sized>(data: &[u8], staging: &mut T) -> Result<Extracted> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| Error::InvalidArchive(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::InvalidArchive(format!("entry {}: {}", i, e)))?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p,
            None => {
                log::warn!("skipping unsafe archive entry: {}", entry.name());
                continue;
            }
        };
        let path = entry_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        if path.is_empty() {
            continue;
        }

        if entry.is_dir() {
            staging.create_dir_all(&path)?;
        } else {
            let mut contents = Vec::new();
            entry
                .read_to_end(&mut contents)
                .map_err(|e| Error::InvalidArchive(format!("{}: {}", path, e)))?;
            staging.write_file(&path, &contents)?;
        }
    }

    let content_root = unwrap_root(staging)?;
    if !content_root.is_empty() {
        log::debug!("unwrapping single top-level folder '{}'", content_root);
    }

    Ok(Extracted { content_root })
}

/// Determine the content root of a freshly extracted tree.
fn unwrap_root<T: WorkTree + ?Sized>(tree: &T) -> Result<String> {
    let top = tree.read_dir("")?;
    match top.as_slice() {
        [only] if only.is_dir => Ok(only.name.clone()),
        _ => Ok(String::new()),
    }
}

/// Unpack `data` into `staging`, then copy the content root into `package`.
pub fn extract_into<S, P>(data: &[u8], staging: &mut S, package: &mut P) -> Result<Extracted>
where
    S: WorkTree + ?Sized,
    P: WorkTree + ?Sized,
{
    let extracted = extract_archive(data, staging)?;
    copy_tree(&*staging, &extracted.content_root, package)?;
    Ok(extracted)
}
