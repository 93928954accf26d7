//! Password resolution for encrypted PDFs

use lopdf::Document;

use crate::credential::Credential;
use crate::error::{Error, Result};

/// Open a document, unlocking it with the supplied credential if necessary.
///
/// Attempts are made in a fixed order, stopping at the first success:
///
/// 1. Load the bytes as-is. The loader itself tries the blank user password,
///    which some encrypted files accept, so a document that arrives already
///    readable succeeds immediately.
/// 2. The credential's owner password, if one was supplied.
/// 3. The credential's user password, if one was supplied.
///
/// The owner password is always tried before the user password. No attempt
/// is retried, and the returned document is owned by the caller; nothing is
/// cached by the library.
///
/// # Errors
///
/// [`Error::Unreadable`] if the bytes are not a PDF, [`Error::Unauthorized`]
/// if the document stays locked after every attempt.
pub fn resolve(data: &[u8], credential: Option<&Credential>) -> Result<Document> {
    let doc = Document::load_mem(data).map_err(Error::Unreadable)?;

    if !doc.is_encrypted() {
        return Ok(doc);
    }

    let passwords = credential
        .into_iter()
        .flat_map(|c| [c.owner_password(), c.user_password()])
        .flatten();

    for password in passwords {
        match Document::load_mem_with_password(data, password) {
            Ok(unlocked) if !unlocked.is_encrypted() => return Ok(unlocked),
            Ok(_) => log::debug!("password accepted by loader but document stayed locked"),
            Err(err) => log::debug!("password attempt rejected: {err}"),
        }
    }

    Err(Error::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_unreadable() {
        let result = resolve(b"definitely not a pdf", None);
        assert!(matches!(result, Err(Error::Unreadable(_))));
    }

    #[test]
    fn empty_input_is_unreadable() {
        let result = resolve(&[], None);
        assert!(matches!(result, Err(Error::Unreadable(_))));
    }
}
