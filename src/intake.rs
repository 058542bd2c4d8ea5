//
// intake.rs
// DocVerify-Tools-rs
//
// Upload gate applied before decoding: size limit, allowed extensions, and a content sniff so a renamed file cannot pass as an image.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::Path;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};

pub const DEFAULT_MAX_BYTES: usize = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeLimits {
    pub max_bytes: usize,
    /// Lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_extensions: ["pdf", "jpg", "jpeg", "png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// What an accepted upload contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image(ImageFormat),
    /// Must be rasterized by the ingestion service before scoring.
    Pdf,
}

pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Extension check only; used to pick candidate files before reading them.
pub fn has_allowed_extension(file_name: &str, limits: &IntakeLimits) -> bool {
    extension_of(file_name)
        .map(|ext| limits.allowed_extensions.iter().any(|allowed| *allowed == ext))
        .unwrap_or(false)
}

pub fn check_upload(file_name: &str, bytes: &[u8], limits: &IntakeLimits) -> Result<UploadKind> {
    if bytes.is_empty() {
        return Err(DocumentError::Intake("Uploaded file is empty".into()));
    }
    if bytes.len() > limits.max_bytes {
        return Err(DocumentError::Intake(format!(
            "File size must not exceed {}MB",
            limits.max_bytes / (1024 * 1024)
        )));
    }
    if !has_allowed_extension(file_name, limits) {
        return Err(DocumentError::Intake(
            "Invalid file type. Only PDF and images are allowed.".into(),
        ));
    }

    let extension = extension_of(file_name).unwrap_or_default();
    if extension == "pdf" {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(DocumentError::Intake(
                "File content does not match its .pdf extension".into(),
            ));
        }
        return Ok(UploadKind::Pdf);
    }

    let claimed = ImageFormat::from_extension(&extension);
    let sniffed = image::guess_format(bytes).ok();
    match (claimed, sniffed) {
        (Some(claimed), Some(sniffed)) if claimed == sniffed => Ok(UploadKind::Image(sniffed)),
        (_, Some(sniffed)) => Err(DocumentError::Intake(format!(
            "File content ({:?}) does not match its .{} extension",
            sniffed, extension
        ))),
        (_, None) => Err(DocumentError::Intake(format!(
            "File content is not a recognizable .{} image",
            extension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([9, 9, 9])))
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .expect("encode png");
        buffer
    }

    #[test]
    fn accepts_matching_image_upload() {
        let kind = check_upload("Permit.PNG", &png(), &IntakeLimits::default()).expect("accept");
        assert_eq!(kind, UploadKind::Image(ImageFormat::Png));
    }

    #[test]
    fn pdf_is_accepted_but_flagged_for_rasterization() {
        let kind = check_upload("dti.pdf", b"%PDF-1.7\n...", &IntakeLimits::default())
            .expect("accept pdf");
        assert_eq!(kind, UploadKind::Pdf);
        assert!(check_upload("dti.pdf", b"GIF89a", &IntakeLimits::default()).is_err());
    }

    #[test]
    fn rejects_oversize_uploads() {
        let limits = IntakeLimits {
            max_bytes: 1024 * 1024,
            ..Default::default()
        };
        let big = vec![0u8; 1024 * 1024 + 1];
        let err = check_upload("scan.png", &big, &limits).unwrap_err();
        assert_eq!(err.user_message(), "File size must not exceed 1MB");
    }

    #[test]
    fn rejects_unlisted_extensions_and_mismatched_content() {
        let limits = IntakeLimits::default();
        let err = check_upload("notes.txt", b"hello", &limits).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Invalid file type. Only PDF and images are allowed."
        );
        assert!(check_upload("photo.jpg", &png(), &limits).is_err());
        assert!(check_upload("photo.jpg", b"plain text", &limits).is_err());
        assert!(check_upload("empty.png", &[], &limits).is_err());
        assert!(!has_allowed_extension("README", &limits));
    }
}
