//! PDF page rasterization
//!
//! Renders pages into owned RGBA buffers sized to the page media box at one
//! pixel per point. This is a raster-content renderer: image XObjects on the
//! page are decoded and composited to fill the canvas with high-quality
//! interpolation; vector and text operators are not interpreted, so pages
//! without raster content come back as white canvases of the correct size.

use std::fs;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId, Stream};

use crate::credential::Credential;
use crate::error::Result;
use crate::unlock;

/// US Letter, the fallback when a page carries no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Render a single page into an RGBA image.
///
/// The image is sized to the page's media box (one pixel per point, minimum
/// one pixel per side) over a white background. Succeeds for any page the
/// document can describe; undecodable embedded images are skipped rather
/// than failing the whole page.
pub fn page_to_image(doc: &Document, page_id: ObjectId) -> Result<RgbaImage> {
    let (width_pt, height_pt) = page_media_size(doc, page_id);
    let width = width_pt.round().max(1.0) as u32;
    let height = height_pt.round().max(1.0) as u32;

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    for xobject in page_image_xobjects(doc, page_id) {
        match decode_image_xobject(xobject) {
            Some(decoded) => {
                // Image rows run top-down in both the XObject and the raster
                // buffer, so filling the page needs no vertical flip here.
                let scaled = if decoded.dimensions() == (width, height) {
                    decoded
                } else {
                    imageops::resize(&decoded, width, height, FilterType::Lanczos3)
                };
                imageops::overlay(&mut canvas, &scaled, 0, 0);
            }
            None => log::warn!("skipping image XObject with unsupported encoding"),
        }
    }

    Ok(canvas)
}

/// Convert every page of a PDF into images, unlocking it first if needed.
///
/// Pages are rendered in page-number order. An encrypted document uses the
/// credential via the password resolver; see [`unlock::resolve`] for the
/// attempt order.
///
/// # Example
///
/// ```no_run
/// use pdf_utilities::pdf_to_images;
///
/// let data = std::fs::read("scan.pdf").unwrap();
/// let pages = pdf_to_images(&data, None).unwrap();
/// println!("rendered {} page(s)", pages.len());
/// ```
pub fn pdf_to_images(data: &[u8], credential: Option<&Credential>) -> Result<Vec<RgbaImage>> {
    let doc = unlock::resolve(data, credential)?;

    let pages = doc.get_pages();
    log::debug!("rendering {} page(s)", pages.len());

    let mut images = Vec::with_capacity(pages.len());
    for (_number, page_id) in pages {
        images.push(page_to_image(&doc, page_id)?);
    }

    Ok(images)
}

/// Convert every page of the PDF at `path` into images.
pub fn pdf_to_images_file(path: &Path, credential: Option<&Credential>) -> Result<Vec<RgbaImage>> {
    pdf_to_images(&fs::read(path)?, credential)
}

/// Follow a reference to its object, or return the object itself.
fn deref<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        _ => Some(object),
    }
}

/// Look up a page attribute, walking Parent links for inheritable values.
fn inherited_page_attr<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = page_id;
    // page trees are shallow; the cap guards against cyclic Parent links
    for _ in 0..32 {
        let dict = doc.get_dictionary(current).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        current = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
    None
}

/// Width and height of the page's media box in points.
fn page_media_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    inherited_page_attr(doc, page_id, b"MediaBox")
        .and_then(|object| deref(doc, object))
        .and_then(|object| object.as_array().ok())
        .and_then(|array| {
            if array.len() != 4 {
                return None;
            }
            let x0 = array[0].as_float().ok()?;
            let y0 = array[1].as_float().ok()?;
            let x1 = array[2].as_float().ok()?;
            let y1 = array[3].as_float().ok()?;
            Some(((x1 - x0).abs(), (y1 - y0).abs()))
        })
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Collect the image XObject streams reachable from a page's resources.
fn page_image_xobjects<'a>(doc: &'a Document, page_id: ObjectId) -> Vec<&'a Stream> {
    let mut found = Vec::new();

    let xobjects = inherited_page_attr(doc, page_id, b"Resources")
        .and_then(|object| deref(doc, object))
        .and_then(|object| object.as_dict().ok())
        .and_then(|resources| resources.get(b"XObject").ok())
        .and_then(|object| deref(doc, object))
        .and_then(|object| object.as_dict().ok());

    let Some(xobjects) = xobjects else {
        return found;
    };

    for (_name, entry) in xobjects.iter() {
        if let Some(Object::Stream(stream)) = deref(doc, entry) {
            let is_image = matches!(
                stream.dict.get(b"Subtype"),
                Ok(Object::Name(subtype)) if subtype == b"Image"
            );
            if is_image {
                found.push(stream);
            }
        }
    }

    found
}

/// Decode an image XObject into RGBA pixels.
///
/// Handles DCT-encoded (JPEG) streams and raw 8-bit DeviceRGB/DeviceGray
/// samples, optionally Flate-compressed. Anything else returns None.
fn decode_image_xobject(stream: &Stream) -> Option<RgbaImage> {
    let dict = &stream.dict;
    let width = dict.get(b"Width").ok()?.as_i64().ok()?;
    let height = dict.get(b"Height").ok()?.as_i64().ok()?;
    if width <= 0 || height <= 0 {
        return None;
    }
    let (width, height) = (width as u32, height as u32);

    if has_filter(stream, b"DCTDecode") {
        let decoded = image::load_from_memory(&stream.content).ok()?;
        return Some(decoded.to_rgba8());
    }

    let samples = if has_filter(stream, b"FlateDecode") {
        stream.decompressed_content().ok()?
    } else if dict.get(b"Filter").is_err() {
        stream.content.clone()
    } else {
        return None;
    };

    let eight_bit = matches!(dict.get(b"BitsPerComponent"), Ok(Object::Integer(8)));
    if !eight_bit {
        return None;
    }

    let components = match dict.get(b"ColorSpace") {
        Ok(Object::Name(name)) if name == b"DeviceRGB" => 3,
        Ok(Object::Name(name)) if name == b"DeviceGray" => 1,
        _ => return None,
    };

    if samples.len() < (width * height * components) as usize {
        return None;
    }

    let image = RgbaImage::from_fn(width, height, |x, y| {
        let offset = ((y * width + x) * components) as usize;
        match components {
            3 => Rgba([samples[offset], samples[offset + 1], samples[offset + 2], 255]),
            _ => Rgba([samples[offset], samples[offset], samples[offset], 255]),
        }
    });

    Some(image)
}

/// Whether the stream's Filter entry names `filter`, directly or in an array.
fn has_filter(stream: &Stream, filter: &[u8]) -> bool {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => name == filter,
        Ok(Object::Array(filters)) => filters
            .iter()
            .any(|entry| matches!(entry, Object::Name(name) if name == filter)),
        _ => false,
    }
}
