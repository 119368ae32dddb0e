//! Decoding of skill images into something a PDF page can embed.

use image::codecs::jpeg::JpegEncoder;
use image::ImageError;

/// JPEG quality used when transcoding skill images for embedding.
const EMBED_JPEG_QUALITY: u8 = 90;

/// A skill image ready to be written as a `DCTDecode` image XObject.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    /// Natural pixel width of the source image.
    pub width: u32,
    /// Natural pixel height of the source image.
    pub height: u32,
    /// Baseline RGB JPEG stream.
    pub jpeg: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("unsupported or corrupt image data: {0}")]
    Decode(#[from] ImageError),

    #[error("image has zero width or height")]
    Empty,
}

/// Decodes `bytes` (JPEG or PNG) and re-encodes them as RGB JPEG.
///
/// Transcoding everything keeps the PDF side to a single image encoding:
/// alpha is dropped, grayscale and palette images become RGB.
pub fn prepare_image(bytes: &[u8]) -> Result<EmbeddedImage, RasterError> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(RasterError::Empty);
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, EMBED_JPEG_QUALITY).encode_image(&rgb)?;

    tracing::trace!(
        ?format,
        width,
        height,
        jpeg_len = jpeg.len(),
        "Prepared skill image"
    );

    Ok(EmbeddedImage {
        width,
        height,
        jpeg,
    })
}

#[cfg(test)]
pub(crate) mod test_images {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encode(width, height, ImageFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        encode(width, height, ImageFormat::Jpeg)
    }

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([30, 120, 200]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), format)
            .expect("encode test image");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::test_images;
    use super::*;

    #[test]
    fn test_prepare_png_keeps_dimensions() {
        let prepared = prepare_image(&test_images::png(40, 25)).unwrap();
        assert_eq!((prepared.width, prepared.height), (40, 25));
        // JPEG SOI marker
        assert_eq!(&prepared.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_prepare_jpeg_keeps_dimensions() {
        let prepared = prepare_image(&test_images::jpeg(17, 33)).unwrap();
        assert_eq!((prepared.width, prepared.height), (17, 33));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = prepare_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RasterError::Decode(_)));
    }

    #[test]
    fn test_truncated_png_is_rejected() {
        let mut bytes = test_images::png(50, 50);
        bytes.truncate(bytes.len() / 2);
        assert!(prepare_image(&bytes).is_err());
    }
}
