//! Error types for the icf2scorm library.

use std::io;
use thiserror::Error;

/// Result type alias for icf2scorm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a well-formed zip archive.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// No `chapter*.html` file exists anywhere in the content tree.
    #[error("Main HTML file not found (expected a chapter*.html file)")]
    MainContentNotFound,

    /// I/O error while reading or writing the working tree.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while writing the SCORM manifest.
    #[error("XML write error: {0}")]
    Xml(String),
}

/// Coarse failure category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unreadable input archive.
    InvalidArchive,
    /// No primary content page in the archive.
    MainContentNotFound,
    /// Local read/write failure.
    Io,
}

impl Error {
    /// Returns the failure category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArchive(_) => ErrorKind::InvalidArchive,
            Error::MainContentNotFound => ErrorKind::MainContentNotFound,
            Error::Io(_) | Error::Xml(_) => ErrorKind::Io,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::InvalidArchive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MainContentNotFound;
        assert_eq!(
            err.to_string(),
            "Main HTML file not found (expected a chapter*.html file)"
        );

        let err = Error::InvalidArchive("bad magic".to_string());
        assert_eq!(err.to_string(), "Invalid archive: bad magic");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_zip_error_mapping() {
        let err: Error = zip::result::ZipError::InvalidArchive("no central directory".into()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidArchive);

        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert_eq!(err.kind(), ErrorKind::InvalidArchive);
    }

    #[test]
    fn test_xml_error_is_io_kind() {
        let err = Error::Xml("writer closed".to_string());
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
