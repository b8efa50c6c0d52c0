//! License artifacts handled by the licdesk console.
//!
//! The console never issues or verifies licenses itself; the license service
//! does. This crate covers what the client side does touch:
//! - Activation keys returned by `POST /licenses/generate`
//! - License records returned by generation and activation
//! - Downloaded license files: filename resolution and saving to disk
//!
//! # Filenames
//!
//! A download is saved under the name given by the response's
//! `Content-Disposition` header when one is present and usable, otherwise
//! under `license_<username>.lic`. Names are reduced to a single path
//! component before they touch the filesystem.

mod error;
mod file;
mod key;

pub use error::{LicenseError, LicenseResult};
pub use file::{fallback_filename, filename_from_disposition, LicenseFile, LICENSE_EXTENSION};
pub use key::{ActivationRequest, LicenseKey, LicenseRecord, LicenseStatus};
