//! PDF re-composition: rebuilding documents, image pages, and passwords

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{
    dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions,
    Stream, StringFormat,
};

use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::unlock;

/// Serialize a document into a fresh byte buffer, optionally encrypting it.
///
/// Every page of the source is carried over in page-number order (same media
/// box, content, and resources) under a newly built catalog and page tree.
/// The input is consumed; nothing is re-serialized in place. A credential
/// becomes RC4-128 encryption on the output, with a freshly generated file
/// identifier. A zero-page source produces a structurally valid zero-page
/// document.
pub fn document_to_bytes(source: Document, credential: Option<&Credential>) -> Result<Vec<u8>> {
    let mut source = source;
    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
    log::debug!("rebuilding document with {} page(s)", page_ids.len());

    // The old catalog and page-tree root must not survive into the output;
    // pages are re-parented under a fresh tree below.
    detach_document_skeleton(&mut source);

    let mut output = Document::with_version("1.5");
    output.objects.extend(std::mem::take(&mut source.objects));

    // max_id must reflect the carried-over objects before new_object_id()
    // hands out fresh IDs, or they would collide
    output.max_id = source.max_id;

    let pages_id = output.new_object_id();
    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => page_ids.len() as i64,
        "Kids" => kids,
    };

    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    output.objects.insert(pages_id, Object::Dictionary(pages));
    output.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(page)) = output.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    output.compress();

    if let Some(credential) = credential {
        encrypt_output(&mut output, credential)?;
    }

    let mut bytes = Vec::new();
    output.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Compose a sequence of images into a PDF, one page per image.
///
/// Each page's media box is the image size multiplied by `scale_factor`
/// (pixels to points), and the image is drawn to fill the page. A credential
/// encrypts the output.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for a non-positive scale factor or an empty
/// image list.
///
/// # Example
///
/// ```no_run
/// use pdf_utilities::images_to_pdf;
///
/// let page = image::RgbaImage::new(640, 480);
/// let pdf = images_to_pdf(&[page], 1.0, None).unwrap();
/// std::fs::write("pages.pdf", pdf).unwrap();
/// ```
pub fn images_to_pdf(
    images: &[RgbaImage],
    scale_factor: f32,
    credential: Option<&Credential>,
) -> Result<Vec<u8>> {
    if !(scale_factor > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "scale factor must be positive, got {scale_factor}"
        )));
    }
    if images.is_empty() {
        return Err(Error::InvalidArgument("image list is empty".to_string()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(images.len());
    for image in images {
        let page_id = add_image_page(&mut doc, pages_id, image, scale_factor)?;
        kids.push(Object::Reference(page_id));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => images.len() as i64,
        "Kids" => kids,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    if let Some(credential) = credential {
        encrypt_output(&mut doc, credential)?;
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Re-serialize a PDF with the credential as its new password.
///
/// The input must open without a password (blank-password files unlock
/// transparently); a locked input fails with [`Error::Unauthorized`].
pub fn add_password(data: &[u8], credential: &Credential) -> Result<Vec<u8>> {
    let doc = unlock::resolve(data, None)?;
    document_to_bytes(doc, Some(credential))
}

/// Re-serialize the PDF at `path` with the credential as its new password.
pub fn add_password_file(path: &Path, credential: &Credential) -> Result<Vec<u8>> {
    add_password(&fs::read(path)?, credential)
}

/// Unlock a PDF with the credential and re-serialize it without encryption.
pub fn remove_password(data: &[u8], credential: &Credential) -> Result<Vec<u8>> {
    let doc = unlock::resolve(data, Some(credential))?;
    document_to_bytes(doc, None)
}

/// Unlock the PDF at `path` and re-serialize it without encryption.
pub fn remove_password_file(path: &Path, credential: &Credential) -> Result<Vec<u8>> {
    remove_password(&fs::read(path)?, credential)
}

/// Remove the source catalog and page-tree root so only page content
/// survives into the rebuilt document.
fn detach_document_skeleton(doc: &mut Document) {
    let Some(catalog_id) = doc
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|object| object.as_reference().ok())
    else {
        return;
    };

    let pages_id = doc
        .get_dictionary(catalog_id)
        .ok()
        .and_then(|catalog| catalog.get(b"Pages").ok())
        .and_then(|object| object.as_reference().ok());

    doc.objects.remove(&catalog_id);
    if let Some(pages_id) = pages_id {
        doc.objects.remove(&pages_id);
    }
}

/// Append one page drawing `image` at `scale_factor` to the document.
fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    image: &RgbaImage,
    scale_factor: f32,
) -> Result<ObjectId> {
    let (width, height) = image.dimensions();
    let page_width = width as f32 * scale_factor;
    let page_height = height as f32 * scale_factor;

    // Raw 8-bit RGB rows, top row first; alpha is dropped since PDF image
    // XObjects carry no alpha channel in DeviceRGB
    let mut samples = Vec::with_capacity((width * height * 3) as usize);
    for pixel in image.pixels() {
        samples.extend_from_slice(&pixel.0[..3]);
    }

    let mut xobject = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        samples,
    );
    xobject.compress()?;
    let image_id = doc.add_object(xobject);

    // Scale the unit image square up to the page size, then draw
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_width.into(),
                    0.into(),
                    0.into(),
                    page_height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let resources = dictionary! {
        "XObject" => dictionary! { "Im0" => Object::Reference(image_id) },
    };
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
        "Resources" => resources,
        "Contents" => Object::Reference(content_id),
    });

    Ok(page_id)
}

/// Encrypt a finished document in place with RC4-128 and full permissions.
///
/// An absent owner password falls back to the user password, so a
/// single-password credential yields a document with one effective secret.
fn encrypt_output(doc: &mut Document, credential: &Credential) -> Result<()> {
    ensure_file_id(doc);

    let user_password = credential.user_password().unwrap_or("");
    let owner_password = credential
        .owner_password()
        .or_else(|| credential.user_password())
        .unwrap_or("");

    let version = EncryptionVersion::V2 {
        document: doc,
        owner_password,
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version)
        .map_err(|err| Error::Encryption(err.to_string()))?;
    doc.encrypt(&state)
        .map_err(|err| Error::Encryption(err.to_string()))?;

    Ok(())
}

/// Make sure the trailer carries the file identifier encryption requires.
fn ensure_file_id(doc: &mut Document) {
    if doc.trailer.get(b"ID").is_ok() {
        return;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let digest = md5::compute(format!("{}:{}:{}", nanos, doc.max_id, doc.objects.len()));

    let id = digest.0.to_vec();
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Literal),
            Object::String(id, StringFormat::Literal),
        ]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn zero_scale_factor_is_invalid() {
        let images = vec![checker_image(4, 4)];
        let result = images_to_pdf(&images, 0.0, None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn negative_scale_factor_is_invalid() {
        let images = vec![checker_image(4, 4)];
        let result = images_to_pdf(&images, -1.5, None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn empty_image_list_is_invalid() {
        let result = images_to_pdf(&[], 1.0, None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn images_become_one_page_each() {
        let images = vec![checker_image(8, 8), checker_image(16, 4)];
        let bytes = images_to_pdf(&images, 1.0, None).unwrap();

        assert_eq!(&bytes[..5], b"%PDF-");
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn scale_factor_sizes_the_media_box() {
        let images = vec![checker_image(10, 20)];
        let bytes = images_to_pdf(&images, 3.0, None).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|value| value.as_float().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(media_box, vec![0.0, 0.0, 30.0, 60.0]);
    }

    #[test]
    fn rebuilt_document_keeps_page_count() {
        let images = vec![checker_image(4, 4), checker_image(4, 4), checker_image(4, 4)];
        let bytes = images_to_pdf(&images, 1.0, None).unwrap();

        let source = Document::load_mem(&bytes).unwrap();
        let rebuilt = document_to_bytes(source, None).unwrap();

        let doc = Document::load_mem(&rebuilt).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert!(!doc.is_encrypted());
    }

    #[test]
    fn file_id_is_generated_once() {
        let mut doc = Document::with_version("1.5");
        ensure_file_id(&mut doc);
        let first = doc.trailer.get(b"ID").unwrap().clone();
        ensure_file_id(&mut doc);
        assert_eq!(doc.trailer.get(b"ID").unwrap(), &first);
    }
}
