use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::path::Path;

use crate::image::DocumentImage;
use crate::models::{ImageStatistics, LuminanceHistogram};

/// Calculate and print basic luminance statistics of a document image.
pub fn stats(input: &Path) -> Result<()> {
    let image = DocumentImage::open(input).context("Failed to open document image")?;
    let stats = image_statistics(&image);

    println!("Statistics for {:?}", input);
    println!("  Size:       {}x{}", stats.width, stats.height);
    println!("  Min:        {:.2}", stats.min);
    println!("  Max:        {:.2}", stats.max);
    println!("  Brightness: {:.2}", stats.brightness);
    println!("  Contrast:   {:.2}", stats.contrast);

    Ok(())
}

pub fn image_statistics(image: &DocumentImage) -> ImageStatistics {
    let luma = image.luminance();
    let (min, max, mean, std_dev) = compute_stats(&luma);
    ImageStatistics {
        width: image.width(),
        height: image.height(),
        total_pixels: luma.len(),
        min,
        max,
        brightness: mean,
        contrast: std_dev,
    }
}

pub fn histogram_for_file(input: &Path, bins: usize) -> Result<LuminanceHistogram> {
    let image = DocumentImage::open(input).context("Failed to open document image")?;
    histogram(&image, bins)
}

/// Equal-width luminance buckets spanning the observed range.
pub fn histogram(image: &DocumentImage, bins: usize) -> Result<LuminanceHistogram> {
    if bins == 0 {
        bail!("Number of bins must be greater than zero");
    }
    let luma = image.luminance();
    let (min, max, _, _) = compute_stats(&luma);
    let mut counts = vec![0u64; bins];
    if luma.is_empty() {
        return Ok(LuminanceHistogram {
            bins: counts,
            min: 0.0,
            max: 0.0,
        });
    }

    let range = max - min;
    for value in luma.iter() {
        let idx = if range > 0.0 {
            (((value - min) / range) * bins as f64) as usize
        } else {
            0
        };
        counts[idx.min(bins - 1)] += 1;
    }

    Ok(LuminanceHistogram {
        bins: counts,
        min,
        max,
    })
}

fn compute_stats(array: &Array2<f64>) -> (f64, f64, f64, f64) {
    if array.is_empty() {
        return (0.0, 0.0, 0.0, 0.0);
    }
    let min = array.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = array.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let count = array.len() as f64;
    let mean = array.sum() / count;

    let variance = array
        .iter()
        .map(|x| {
            let diff = mean - x;
            diff * diff
        })
        .sum::<f64>()
        / count;

    (min, max, mean, variance.sqrt())
}
