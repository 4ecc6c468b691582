//! C-ABI Foreign Function Interface for icf2scorm.
//!
//! # Memory Management
//!
//! Buffers returned by `icf2scorm_convert` must be freed with
//! `icf2scorm_free_buffer`, passing the length reported through `out_len`.
//!
//! # Error Handling
//!
//! Functions that can fail return a null pointer on error. Use
//! `icf2scorm_last_error` to retrieve the message and
//! `icf2scorm_last_error_kind` to branch on the failure category.
//!
//! # Example (C)
//!
//! ```c
//! size_t out_len = 0;
//! uint8_t* package = icf2scorm_convert(input, input_len, &out_len);
//! if (!package) {
//!     fprintf(stderr, "Error: %s\n", icf2scorm_last_error());
//!     return 1;
//! }
//! fwrite(package, 1, out_len, out);
//! icf2scorm_free_buffer(package, out_len);
//! ```

use std::cell::{Cell, RefCell};
use std::ffi::{c_char, c_int, CString};
use std::panic::catch_unwind;
use std::ptr;

use crate::error::ErrorKind;

/// No error recorded.
pub const ICF2SCORM_OK: c_int = 0;
/// Malformed or unreadable input archive.
pub const ICF2SCORM_INVALID_ARCHIVE: c_int = 1;
/// No `chapter*.html` page in the archive.
pub const ICF2SCORM_MAIN_CONTENT_NOT_FOUND: c_int = 2;
/// Local read/write failure.
pub const ICF2SCORM_IO_ERROR: c_int = 3;
/// Invalid arguments or internal failure.
pub const ICF2SCORM_INTERNAL_ERROR: c_int = 4;

// Thread-local storage for the last error.
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
    static LAST_ERROR_KIND: Cell<c_int> = const { Cell::new(ICF2SCORM_OK) };
}

fn set_last_error(msg: &str, kind: c_int) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
    LAST_ERROR_KIND.with(|k| k.set(kind));
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
    LAST_ERROR_KIND.with(|k| k.set(ICF2SCORM_OK));
}

fn kind_code(kind: ErrorKind) -> c_int {
    match kind {
        ErrorKind::InvalidArchive => ICF2SCORM_INVALID_ARCHIVE,
        ErrorKind::MainContentNotFound => ICF2SCORM_MAIN_CONTENT_NOT_FOUND,
        ErrorKind::Io => ICF2SCORM_IO_ERROR,
    }
}

/// Get the version of the library.
///
/// # Safety
///
/// Returns a static string that must not be freed.
#[no_mangle]
pub extern "C" fn icf2scorm_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Get the last error message.
///
/// # Safety
///
/// Returns a pointer to a thread-local error string. The pointer is valid until
/// the next call to any icf2scorm function on the same thread.
#[no_mangle]
pub extern "C" fn icf2scorm_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Get the category of the last error as one of the `ICF2SCORM_*` codes.
#[no_mangle]
pub extern "C" fn icf2scorm_last_error_kind() -> c_int {
    LAST_ERROR_KIND.with(|k| k.get())
}

/// Convert an ICF archive held in memory into a SCORM package.
///
/// # Safety
///
/// - `data` must be a valid pointer to a byte buffer of at least `len` bytes.
/// - `out_len` must be a valid pointer; it receives the output length.
/// - Returns null on error. Use `icf2scorm_last_error` to get the error message.
/// - The returned buffer must be freed with `icf2scorm_free_buffer`.
#[no_mangle]
pub unsafe extern "C" fn icf2scorm_convert(
    data: *const u8,
    len: usize,
    out_len: *mut usize,
) -> *mut u8 {
    clear_last_error();

    if data.is_null() {
        set_last_error("data is null", ICF2SCORM_INTERNAL_ERROR);
        return ptr::null_mut();
    }
    if out_len.is_null() {
        set_last_error("out_len is null", ICF2SCORM_INTERNAL_ERROR);
        return ptr::null_mut();
    }

    let result = catch_unwind(|| {
        let bytes = std::slice::from_raw_parts(data, len);
        crate::convert(bytes)
    });

    match result {
        Ok(Ok(package)) => {
            let boxed = package.into_boxed_slice();
            *out_len = boxed.len();
            Box::into_raw(boxed) as *mut u8
        }
        Ok(Err(e)) => {
            set_last_error(&e.to_string(), kind_code(e.kind()));
            ptr::null_mut()
        }
        Err(_) => {
            set_last_error("panic occurred during conversion", ICF2SCORM_INTERNAL_ERROR);
            ptr::null_mut()
        }
    }
}

/// Free a buffer returned by `icf2scorm_convert`.
///
/// # Safety
///
/// - `buf` must be a pointer returned by `icf2scorm_convert`, and `len` the
///   length reported for it.
/// - After calling this function, the buffer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn icf2scorm_free_buffer(buf: *mut u8, len: usize) {
    if !buf.is_null() {
        let slice = ptr::slice_from_raw_parts_mut(buf, len);
        let _ = Box::from_raw(slice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::io::{Cursor, Write};

    fn sample_archive() -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("chapter1.html", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<p>hello</p>").unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(icf2scorm_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_convert_null_data() {
        let mut out_len = 0usize;
        let result = unsafe { icf2scorm_convert(ptr::null(), 0, &mut out_len) };
        assert!(result.is_null());
        assert_eq!(icf2scorm_last_error_kind(), ICF2SCORM_INTERNAL_ERROR);
        assert!(!icf2scorm_last_error().is_null());
    }

    #[test]
    fn test_convert_invalid_archive() {
        let data = b"not a zip";
        let mut out_len = 0usize;
        let result = unsafe { icf2scorm_convert(data.as_ptr(), data.len(), &mut out_len) };
        assert!(result.is_null());
        assert_eq!(icf2scorm_last_error_kind(), ICF2SCORM_INVALID_ARCHIVE);
        let msg = unsafe { CStr::from_ptr(icf2scorm_last_error()) };
        assert!(msg.to_str().unwrap().starts_with("Invalid archive"));
    }

    #[test]
    fn test_convert_and_free() {
        let data = sample_archive();
        let mut out_len = 0usize;
        let result = unsafe { icf2scorm_convert(data.as_ptr(), data.len(), &mut out_len) };
        assert!(!result.is_null());
        assert!(out_len > 0);
        assert_eq!(icf2scorm_last_error_kind(), ICF2SCORM_OK);
        assert!(icf2scorm_last_error().is_null());

        let output = unsafe { std::slice::from_raw_parts(result, out_len) };
        assert_eq!(&output[..2], b"PK");

        unsafe { icf2scorm_free_buffer(result, out_len) };
    }

    #[test]
    fn test_free_null() {
        unsafe { icf2scorm_free_buffer(ptr::null_mut(), 0) };
    }
}
