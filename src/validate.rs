//! Validity and password queries

use std::fs;
use std::path::Path;

use lopdf::Document;

use crate::credential::Credential;
use crate::error::Result;
use crate::unlock;

/// Check whether bytes are a structurally acceptable PDF.
///
/// A document that reports itself encrypted counts as valid without
/// inspecting its page count, since pages cannot be enumerated before
/// decryption. Anything else is valid iff it has at least one page.
pub fn is_valid_pdf(data: &[u8]) -> bool {
    match Document::load_mem(data) {
        Ok(doc) => doc.is_encrypted() || !doc.get_pages().is_empty(),
        Err(_) => false,
    }
}

/// Check whether the PDF at `path` is structurally acceptable.
pub fn is_valid_pdf_file(path: &Path) -> Result<bool> {
    Ok(is_valid_pdf(&fs::read(path)?))
}

/// Check whether a PDF is password protected.
///
/// Returns true for any document that reports encryption, including files
/// the loader could open with a blank password. Bytes that are not a PDF
/// at all report false; use [`is_valid_pdf`] to tell those apart.
pub fn has_password(data: &[u8]) -> bool {
    match Document::load_mem(data) {
        // encryption_state is set when the loader had to decrypt the file,
        // so blank-password documents still report true here
        Ok(doc) => doc.is_encrypted() || doc.encryption_state.is_some(),
        Err(_) => false,
    }
}

/// Check whether the PDF at `path` is password protected.
pub fn has_password_file(path: &Path) -> Result<bool> {
    Ok(has_password(&fs::read(path)?))
}

/// Check whether a credential unlocks a document.
///
/// True iff [`unlock::resolve`] succeeds with the same inputs; this is
/// defined directly in terms of it so the two can never disagree.
pub fn can_unlock(data: &[u8], credential: &Credential) -> bool {
    unlock::resolve(data, Some(credential)).is_ok()
}

/// Check whether a credential unlocks the PDF at `path`.
pub fn can_unlock_file(path: &Path, credential: &Credential) -> Result<bool> {
    Ok(can_unlock(&fs::read(path)?, credential))
}
