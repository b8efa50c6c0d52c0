//! Downloaded license files.
//!
//! The body of `GET /licenses/download` is kept as opaque bytes; only the
//! filename is interpreted.

use crate::error::{LicenseError, LicenseResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension used for fallback license filenames.
pub const LICENSE_EXTENSION: &str = "lic";

/// Upper bound on `name (n).ext` candidates tried before giving up.
const MAX_DUPLICATE_SUFFIX: u32 = 999;

/// Filename used when the service does not name the download:
/// `license_<username>.lic`.
#[must_use]
pub fn fallback_filename(username: &str) -> String {
    let username = replace_unsafe_chars(username.trim());
    format!("license_{username}.{LICENSE_EXTENSION}")
}

/// Extracts a filename from a `Content-Disposition` header value.
///
/// Handles bare, quoted and RFC 5987 (`filename*=UTF-8''...`) forms, the
/// extended form winning when both are present. Directory components are
/// stripped. Returns `None` when no usable name is present.
#[must_use]
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in header.split(';') {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.eq_ignore_ascii_case("filename*") {
            extended = decode_extended(value.trim());
        } else if name.eq_ignore_ascii_case("filename") {
            plain = Some(unquote(value.trim()));
        }
    }

    extended
        .or(plain)
        .and_then(|name| single_component(&name))
}

/// Decodes `charset'lang'percent-encoded` values.
fn decode_extended(value: &str) -> Option<String> {
    let encoded = value.splitn(3, '\'').nth(2)?;
    urlencoding::decode(encoded).ok().map(|s| s.into_owned())
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].replace("\\\"", "\"")
    } else {
        value.to_string()
    }
}

/// Reduces a name to its last path component, or `None` if nothing usable
/// remains.
fn single_component(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = replace_unsafe_chars(last.trim());
    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

fn replace_unsafe_chars(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// A license file received from the service, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseFile {
    filename: String,
    bytes: Vec<u8>,
}

impl LicenseFile {
    /// Creates a license file with an explicit name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name reduces to nothing usable.
    pub fn new(filename: &str, bytes: Vec<u8>) -> LicenseResult<Self> {
        let filename = single_component(filename)
            .ok_or_else(|| LicenseError::InvalidFilename(filename.to_string()))?;
        Ok(Self { filename, bytes })
    }

    /// Builds the file for a download: the `Content-Disposition` name when
    /// usable, otherwise the fallback for `username`.
    #[must_use]
    pub fn from_download(username: &str, disposition: Option<&str>, bytes: Vec<u8>) -> Self {
        let filename = disposition
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| fallback_filename(username));
        Self { filename, bytes }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the file into `dir`, creating the directory if needed.
    ///
    /// An existing file is never overwritten: `name (1).ext`, `name (2).ext`
    /// and so on are tried instead. Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if the directory cannot be created,
    /// the write fails, or every candidate name is taken.
    pub fn save_in(&self, dir: &Path) -> LicenseResult<PathBuf> {
        fs::create_dir_all(dir)
            .map_err(|e| LicenseError::Storage(format!("create {}: {e}", dir.display())))?;

        for n in 0..=MAX_DUPLICATE_SUFFIX {
            let path = dir.join(self.candidate_name(n));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&self.bytes).map_err(|e| {
                        LicenseError::Storage(format!("write {}: {e}", path.display()))
                    })?;
                    debug!("Saved license file {} ({} bytes)", path.display(), self.len());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(LicenseError::Storage(format!(
                        "open {}: {e}",
                        path.display()
                    )));
                }
            }
        }

        Err(LicenseError::Storage(format!(
            "no free name for {} in {}",
            self.filename,
            dir.display()
        )))
    }

    fn candidate_name(&self, n: u32) -> String {
        if n == 0 {
            return self.filename.clone();
        }
        match self.filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
            _ => format!("{} ({n})", self.filename),
        }
    }
}
