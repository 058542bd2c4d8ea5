//
// image.rs
// DocVerify-Tools-rs
//
// Decodes uploaded bytes into a normalized RGB buffer and provides the JPEG round trip and luminance plane the signals need.
//
// Thales Matheus Mendonça Santos - November 2025

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use ndarray::Array2;

use crate::error::{DocumentError, Result};

/// Quality used for the Error Level Analysis re-encode (0-100 scale).
pub const ELA_JPEG_QUALITY: u8 = 90;

/// A decoded document page: 8-bit RGB, dimensions exactly as decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentImage {
    pixels: RgbImage,
}

impl DocumentImage {
    /// Decode raw upload bytes. Format is sniffed from content, never from a file name.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(DocumentError::Decode("input buffer is empty".into()));
        }

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DocumentError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(DocumentError::Decode(
                "bytes do not match any supported raster format".into(),
            ));
        }

        let decoded = reader
            .decode()
            .map_err(|e| DocumentError::Decode(e.to_string()))?;
        Ok(Self::from_dynamic(decoded))
    }

    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Grayscale, alpha and 16-bit/float inputs all collapse to RGB8 here.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            pixels: image.to_rgb8(),
        }
    }

    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Re-encode as JPEG at `quality` and decode the result back to RGB8.
    pub fn jpeg_round_trip(&self, quality: u8) -> image::ImageResult<RgbImage> {
        let mut buffer = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
            encoder.encode_image(&self.pixels)?;
        }
        let decoded = image::load_from_memory_with_format(&buffer, ImageFormat::Jpeg)?;
        Ok(decoded.to_rgb8())
    }

    /// ITU-R BT.601 luma rounded to 8-bit, laid out as (rows, columns).
    pub fn luminance(&self) -> Array2<f64> {
        let (w, h) = (self.pixels.width() as usize, self.pixels.height() as usize);
        let mut plane = Array2::<f64>::zeros((h, w));
        for (x, y, p) in self.pixels.enumerate_pixels() {
            let luma = 0.299 * p.0[0] as f64 + 0.587 * p.0[1] as f64 + 0.114 * p.0[2] as f64;
            plane[[y as usize, x as usize]] = luma.round().clamp(0.0, 255.0);
        }
        plane
    }
}
