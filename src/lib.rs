//! PDF Utilities Library
//!
//! Convenience operations over PDF documents:
//! - Check whether a PDF is password protected or structurally valid
//! - Unlock encrypted PDFs with a user and/or owner password
//! - Add a password to or remove a password from a PDF
//! - Convert PDF pages to raster images and images to a PDF
//!
//! All operations are synchronous, stateless, and in-memory; inputs arrive
//! as byte buffers or file paths, outputs are owned buffers or images.
//!
//! # Example
//!
//! ```no_run
//! use pdf_utilities::{add_password, remove_password, Credential};
//!
//! let original = std::fs::read("report.pdf").unwrap();
//! let credential = Credential::from_password("s3cret");
//!
//! let locked = add_password(&original, &credential).unwrap();
//! let unlocked = remove_password(&locked, &credential).unwrap();
//!
//! assert!(pdf_utilities::has_password(&locked));
//! assert!(!pdf_utilities::has_password(&unlocked));
//! ```

pub mod compose;
pub mod credential;
pub mod error;
pub mod render;
pub mod unlock;
pub mod validate;

// Re-export commonly used items
pub use compose::{
    add_password, add_password_file, document_to_bytes, images_to_pdf, remove_password,
    remove_password_file,
};
pub use credential::Credential;
pub use error::{Error, Result};
pub use render::{page_to_image, pdf_to_images, pdf_to_images_file};
pub use unlock::resolve;
pub use validate::{
    can_unlock, can_unlock_file, has_password, has_password_file, is_valid_pdf, is_valid_pdf_file,
};
