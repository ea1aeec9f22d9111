use std::io::Cursor;
use std::path::Path;

use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;
use crate::model::{EmbeddedImage, ImageFormat, InspectionReport, ReportImages};

/// Sniff format and pixel size without decoding the whole image.
pub fn load_image(data: Vec<u8>) -> Result<EmbeddedImage, Error> {
    let reader = image::ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .map_err(|e| Error::Image(e.to_string()))?;
    let format = match reader.format() {
        Some(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
        Some(image::ImageFormat::Png) => ImageFormat::Png,
        Some(_) => ImageFormat::Other,
        None => return Err(Error::Image("unrecognised image format".into())),
    };
    let (pixel_width, pixel_height) = reader
        .into_dimensions()
        .map_err(|e| Error::Image(e.to_string()))?;
    Ok(EmbeddedImage {
        data,
        format,
        pixel_width,
        pixel_height,
    })
}

pub fn load_image_file(path: &Path) -> Result<EmbeddedImage, Error> {
    let data = std::fs::read(path)
        .map_err(|e| Error::Image(format!("{}: {e}", path.display())))?;
    load_image(data)
}

/// Read every image a report references. Relative paths resolve against `base_dir`.
pub fn load_report_images(report: &InspectionReport, base_dir: &Path) -> Result<ReportImages, Error> {
    let load = |p: &Path| load_image_file(&base_dir.join(p));
    Ok(ReportImages {
        photo: report.photo.as_deref().map(load).transpose()?,
        corner: report.corner_image.as_deref().map(load).transpose()?,
        additional: report
            .additional_photos
            .iter()
            .map(|p| load(p))
            .collect::<Result<_, _>>()?,
    })
}

/// Number of colour components declared in a baseline/progressive JPEG frame header.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        if marker == 0xD9 {
            break;
        }
        let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if matches!(marker, 0xC0..=0xC2) && i + 9 < data.len() {
            return Some(data[i + 9]);
        }
        i += 2 + len;
    }
    None
}

/// Write `image` as an image XObject. Gray and RGB JPEGs pass through
/// untouched; everything else is decoded to RGB with an optional alpha SMask.
pub(crate) fn embed_image(
    pdf: &mut Pdf,
    image: &EmbeddedImage,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<Ref, Error> {
    let xobj_ref = alloc();
    let passthrough = match image.format {
        ImageFormat::Jpeg => jpeg_components(&image.data).filter(|c| *c == 1 || *c == 3),
        _ => None,
    };

    if let Some(components) = passthrough {
        let mut xobj = pdf.image_xobject(xobj_ref, &image.data);
        xobj.filter(Filter::DctDecode);
        xobj.width(image.pixel_width as i32);
        xobj.height(image.pixel_height as i32);
        if components == 1 {
            xobj.color_space().device_gray();
        } else {
            xobj.color_space().device_rgb();
        }
        xobj.bits_per_component(8);
        return Ok(xobj_ref);
    }

    let decoded = image::load_from_memory(&image.data).map_err(|e| Error::Image(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Ok(xobj_ref)
}
