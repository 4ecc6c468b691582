//! Output archive construction.

use crate::error::{Error, Result};
use crate::tree::{walk_files, WorkTree};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip every file of `tree` into an in-memory deflate archive.
///
/// Entry names are the files' tree paths (`/`-separated), written in walk
/// order. File contents are stored unchanged.
pub fn build_archive<T: WorkTree + ?Sized>(tree: &T) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for path in walk_files(tree, "")? {
        let data = tree.read_file(&path)?;
        zip.start_file(path.as_str(), options).map_err(write_error)?;
        zip.write_all(&data)?;
    }

    let cursor = zip.finish().map_err(write_error)?;
    Ok(cursor.into_inner())
}

/// Zip writer failures are local I/O failures, never input problems.
fn write_error(err: zip::result::ZipError) -> Error {
    match err {
        zip::result::ZipError::Io(e) => Error::Io(e),
        other => Error::Io(std::io::Error::new(std::io::ErrorKind::Other, other)),
    }
}
