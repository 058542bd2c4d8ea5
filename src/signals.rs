//
// signals.rs
// DocVerify-Tools-rs
//
// The four independent signal extractors (ELA, noise residual, text sharpness, resolution) and their parallel driver.
//
// Thales Matheus Mendonça Santos - November 2025

use ndarray::Array2;
use tracing::debug;

use crate::error::{DocumentError, Result};
use crate::evaluate::SignalKind;
use crate::filters;
use crate::image::{DocumentImage, ELA_JPEG_QUALITY};
use crate::models::SignalScores;

fn ensure_non_empty(image: &DocumentImage, signal: SignalKind) -> Result<()> {
    if image.is_empty() {
        return Err(DocumentError::extractor(
            signal,
            format!(
                "image has zero area ({}x{})",
                image.width(),
                image.height()
            ),
        ));
    }
    Ok(())
}

/// Error Level Analysis: mean absolute difference against a JPEG re-encode.
///
/// Regions edited after the last natural compression cycle re-compress
/// differently and leave a residual.
pub fn ela_score(image: &DocumentImage) -> Result<f64> {
    ensure_non_empty(image, SignalKind::Ela)?;
    let round_trip = image
        .jpeg_round_trip(ELA_JPEG_QUALITY)
        .map_err(|e| DocumentError::extractor(SignalKind::Ela, e.to_string()))?;

    let original = image.pixels();
    if round_trip.dimensions() != original.dimensions() {
        return Err(DocumentError::extractor(
            SignalKind::Ela,
            "JPEG round trip changed the image dimensions",
        ));
    }

    let total: u64 = original
        .as_raw()
        .iter()
        .zip(round_trip.as_raw())
        .map(|(a, b)| a.abs_diff(*b) as u64)
        .sum();
    let score = total as f64 / original.as_raw().len() as f64;
    debug!(signal = "ela_score", score, "signal computed");
    Ok(score)
}

/// Standard deviation of the luminance minus its 3×3 Gaussian blur.
pub fn noise_score(image: &DocumentImage) -> Result<f64> {
    ensure_non_empty(image, SignalKind::Noise)?;
    let score = noise_from_luma(&image.luminance());
    debug!(signal = "noise_score", score, "signal computed");
    Ok(score)
}

/// Variance of the Laplacian response; blur and heavy compression flatten it.
pub fn text_quality(image: &DocumentImage) -> Result<f64> {
    ensure_non_empty(image, SignalKind::TextQuality)?;
    let score = laplacian_variance(&image.luminance());
    debug!(signal = "text_quality", score, "signal computed");
    Ok(score)
}

/// Mean of the Laplacian variance and the mean Sobel gradient magnitude.
pub fn resolution_score(image: &DocumentImage) -> Result<f64> {
    ensure_non_empty(image, SignalKind::Resolution)?;
    let score = resolution_from_luma(&image.luminance());
    debug!(signal = "resolution_score", score, "signal computed");
    Ok(score)
}

fn noise_from_luma(luma: &Array2<f64>) -> f64 {
    let blurred = filters::gaussian_blur(luma);
    let residual = luma - &blurred;
    filters::std_dev(&residual)
}

fn laplacian_variance(luma: &Array2<f64>) -> f64 {
    filters::variance(&filters::laplacian(luma))
}

fn resolution_from_luma(luma: &Array2<f64>) -> f64 {
    let edge_intensity = filters::mean(&filters::sobel_magnitude(luma));
    combine_resolution(laplacian_variance(luma), edge_intensity)
}

fn combine_resolution(laplacian_variance: f64, edge_intensity: f64) -> f64 {
    (laplacian_variance + edge_intensity) / 2.0
}

pub fn extract(image: &DocumentImage, kind: SignalKind) -> Result<f64> {
    match kind {
        SignalKind::Ela => ela_score(image),
        SignalKind::Noise => noise_score(image),
        SignalKind::TextQuality => text_quality(image),
        SignalKind::Resolution => resolution_score(image),
    }
}

/// Compute all four scores, fanning the extractors out over the rayon pool.
///
/// The luminance plane and the Laplacian variance are computed once and shared
/// by the three luma-based signals. Any extractor failure fails the whole call;
/// no partial score set escapes.
pub fn extract_all(image: &DocumentImage) -> Result<SignalScores> {
    ensure_non_empty(image, SignalKind::Ela)?;
    let (ela, luma_scores) = rayon::join(
        || ela_score(image),
        || luma_signals(&image.luminance(), true),
    );
    let (noise_score, text_quality, resolution_score) = luma_scores;

    Ok(SignalScores {
        ela_score: ela?,
        noise_score,
        text_quality,
        resolution_score,
    })
}

/// Single-threaded equivalent of [`extract_all`].
pub fn extract_all_sequential(image: &DocumentImage) -> Result<SignalScores> {
    ensure_non_empty(image, SignalKind::Ela)?;
    let ela_score = ela_score(image)?;
    let (noise_score, text_quality, resolution_score) =
        luma_signals(&image.luminance(), false);

    Ok(SignalScores {
        ela_score,
        noise_score,
        text_quality,
        resolution_score,
    })
}

/// Noise, text quality and resolution from one luminance plane.
fn luma_signals(luma: &Array2<f64>, parallel: bool) -> (f64, f64, f64) {
    let edge_mean = || filters::mean(&filters::sobel_magnitude(luma));
    let (noise, (lap_var, edge_intensity)) = if parallel {
        rayon::join(
            || noise_from_luma(luma),
            || rayon::join(|| laplacian_variance(luma), edge_mean),
        )
    } else {
        (
            noise_from_luma(luma),
            (laplacian_variance(luma), edge_mean()),
        )
    };
    let resolution = combine_resolution(lap_var, edge_intensity);

    debug!(signal = "noise_score", score = noise, "signal computed");
    debug!(signal = "text_quality", score = lap_var, "signal computed");
    debug!(signal = "resolution_score", score = resolution, "signal computed");
    (noise, lap_var, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn stripes(width: u32, height: u32, period: u32) -> DocumentImage {
        let pixels = RgbImage::from_fn(width, height, |x, _| {
            if (x / period) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        DocumentImage::from_rgb(pixels)
    }

    #[test]
    fn flat_image_scores_zero_sharpness() {
        let flat = DocumentImage::from_rgb(RgbImage::from_pixel(32, 32, Rgb([255, 255, 255])));
        let scores = extract_all(&flat).expect("scores");
        assert_eq!(scores.noise_score, 0.0);
        assert_eq!(scores.text_quality, 0.0);
        assert_eq!(scores.resolution_score, 0.0);
        assert!(scores.ela_score < 1.0);
    }

    #[test]
    fn sharp_edges_raise_text_quality_and_resolution() {
        let sharp = stripes(64, 64, 8);
        let soft = DocumentImage::from_rgb(RgbImage::from_fn(64, 64, |x, _| {
            let v = (x * 4).min(255) as u8;
            Rgb([v, v, v])
        }));
        assert!(text_quality(&sharp).expect("sharp") > text_quality(&soft).expect("soft"));
        assert!(
            resolution_score(&sharp).expect("sharp") > resolution_score(&soft).expect("soft")
        );
    }

    #[test]
    fn parallel_and_sequential_extraction_agree() {
        let image = stripes(40, 24, 3);
        let parallel = extract_all(&image).expect("parallel");
        let sequential = extract_all_sequential(&image).expect("sequential");
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn combined_extraction_matches_individual_extractors() {
        let image = stripes(33, 17, 4);
        let scores = extract_all(&image).expect("scores");
        for kind in SignalKind::ALL {
            assert_eq!(scores.get(kind), extract(&image, kind).expect("single"), "{}", kind);
        }
    }

    #[test]
    fn zero_area_image_is_an_extractor_error() {
        let empty = DocumentImage::from_rgb(RgbImage::new(0, 0));
        let err = extract_all(&empty).unwrap_err();
        assert!(matches!(err, DocumentError::Extractor { .. }));
    }

    #[test]
    fn single_pixel_image_yields_finite_scores() {
        let dot = DocumentImage::from_rgb(RgbImage::from_pixel(1, 1, Rgb([90, 30, 200])));
        let scores = extract_all(&dot).expect("scores");
        assert!(scores.is_finite());
        assert_eq!(scores.text_quality, 0.0);
        assert_eq!(scores.resolution_score, 0.0);
    }
}
