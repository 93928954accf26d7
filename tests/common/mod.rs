//! Shared fixture builders for the integration tests
//!
//! Documents are constructed programmatically with lopdf so the suite needs
//! no binary fixtures on disk.

#![allow(dead_code)]

use lopdf::{
    dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream,
    StringFormat,
};

/// Build a simple document with one text page per entry in `page_texts`.
pub fn sample_pdf(page_texts: &[&str]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => Object::Reference(font_id) },
    });

    let mut kids = Vec::new();
    for text in page_texts {
        let content = format!("BT\n/F1 12 Tf\n100 700 Td\n({text}) Tj\nET\n");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => Object::Reference(resources_id),
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}

/// Serialize a document to an in-memory buffer.
pub fn pdf_bytes(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document should serialize");
    bytes
}

/// Serialized one-page document without encryption.
pub fn plain_pdf() -> Vec<u8> {
    pdf_bytes(&mut sample_pdf(&["Plain content"]))
}

/// Serialized one-page document encrypted with the given passwords.
///
/// Blank passwords produce a document that still reports encryption but
/// opens without a credential.
pub fn encrypted_pdf(user_password: &str, owner_password: &str) -> Vec<u8> {
    let mut doc = sample_pdf(&["Protected content"]);

    // encryption requires a file identifier in the trailer
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![7u8; 16], StringFormat::Literal),
            Object::String(vec![9u8; 16], StringFormat::Literal),
        ]),
    );

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password,
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    })
    .expect("encryption state should build");
    doc.encrypt(&state).expect("document should encrypt");

    pdf_bytes(&mut doc)
}
