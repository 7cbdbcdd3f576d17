//! Sysfs parameter reader.
//!
//! Kernel attributes under `/sys` are small text files whose content changes
//! in place. A [`SysfsParam`] keeps the file open and rewinds it before each
//! read instead of reopening the path on every render.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::error;

use crate::error::{Error, Result};

/// Largest attribute value read, in bytes.
pub const MAX_VALUE_SIZE: usize = 16;

/// An open sysfs attribute.
#[derive(Debug)]
pub struct SysfsParam {
    path: PathBuf,
    file: File,
}

impl SysfsParam {
    /// Open the attribute at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match File::open(&path) {
            Ok(file) => Ok(Self { path, file }),
            Err(source) => Err(Error::Sysfs { path, source }),
        }
    }

    /// Attribute path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the attribute as a base-10 integer.
    ///
    /// Leading whitespace is skipped and parsing stops at the first
    /// non-digit. Read failures are logged and yield `0`.
    pub fn read_int(&self) -> i64 {
        let mut buf = [0u8; MAX_VALUE_SIZE];
        match self.read_into(&mut buf) {
            Ok(n) => parse_leading_int(&buf[..n]),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read int");
                0
            }
        }
    }

    /// Read the first byte of the attribute.
    ///
    /// Read failures are logged and yield `'\0'`.
    pub fn read_char(&self) -> char {
        let mut buf = [0u8; 1];
        match self.read_into(&mut buf) {
            Ok(1) => char::from(buf[0]),
            Ok(_) => '\0',
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read char");
                '\0'
            }
        }
    }

    fn read_into(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut file = &self.file;
        file.seek(SeekFrom::Start(0))?;
        file.read(buf)
    }
}

fn parse_leading_int(bytes: &[u8]) -> i64 {
    let mut iter = bytes
        .iter()
        .copied()
        .skip_while(u8::is_ascii_whitespace)
        .peekable();

    let negative = match iter.peek() {
        Some(b'-') => {
            iter.next();
            true
        }
        Some(b'+') => {
            iter.next();
            false
        }
        _ => false,
    };

    let magnitude = iter
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn attr(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_int() {
        let file = attr("87\n");
        let param = SysfsParam::open(file.path()).unwrap();
        assert_eq!(param.read_int(), 87);
        // Rewinds on every read
        assert_eq!(param.read_int(), 87);
    }

    #[test]
    fn test_read_int_sees_updates() {
        let file = attr("40\n");
        let param = SysfsParam::open(file.path()).unwrap();
        assert_eq!(param.read_int(), 40);

        std::fs::write(file.path(), "41\n").unwrap();
        assert_eq!(param.read_int(), 41);
    }

    #[test]
    fn test_read_char() {
        let file = attr("1\n");
        let param = SysfsParam::open(file.path()).unwrap();
        assert_eq!(param.read_char(), '1');

        let empty = attr("");
        let param = SysfsParam::open(empty.path()).unwrap();
        assert_eq!(param.read_char(), '\0');
    }

    #[test]
    fn test_open_missing_is_fatal() {
        let err = SysfsParam::open("/nonexistent/sysfs/attr").unwrap_err();
        assert!(matches!(err, Error::Sysfs { .. }));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int(b"  42abc"), 42);
        assert_eq!(parse_leading_int(b"-7\n"), -7);
        assert_eq!(parse_leading_int(b"x1"), 0);
        assert_eq!(parse_leading_int(b""), 0);
    }
}
