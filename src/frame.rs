//! Inbound frame decoding and resizing.

use crate::Result;
use image::{imageops::FilterType, RgbImage};

/// A decoded frame ready for landmark extraction. Dimensions reflect the
/// processed (possibly downscaled) image, and that is what the wire reply's
/// `frame_size` reports.
pub struct Frame {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Decode raw encoded-image bytes, downscaling to at most
    /// `detection_width` while preserving aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns a decode error for malformed or unsupported image bytes.
    pub fn decode(bytes: &[u8], detection_width: u32) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        let (width, height) = (decoded.width(), decoded.height());

        let image = if width > detection_width && width > 0 {
            let scale = f64::from(detection_width) / f64::from(width);
            let new_height = (f64::from(height) * scale).round().max(1.0) as u32;
            decoded
                .resize_exact(detection_width, new_height, FilterType::Triangle)
                .to_rgb8()
        } else {
            decoded.to_rgb8()
        };

        Ok(Self {
            width: image.width(),
            height: image.height(),
            image,
        })
    }

    /// A uniformly black frame of the given size, for tests and synthetic
    /// extraction.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            width,
            height,
        }
    }
}
