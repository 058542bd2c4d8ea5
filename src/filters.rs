//
// filters.rs
// DocVerify-Tools-rs
//
// 3×3 neighbourhood filters (Gaussian, Laplacian, Sobel) applied as correlations with reflect-101 borders, plus population moments.
//
// Thales Matheus Mendonça Santos - November 2025

use ndarray::Array2;

pub type Kernel3 = [[f64; 3]; 3];

/// Binomial approximation of a Gaussian with σ ≈ 0.8.
pub const GAUSSIAN_3X3: Kernel3 = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

pub const LAPLACIAN_3X3: Kernel3 = [[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]];

pub const SOBEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

pub const SOBEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mirrored = if index < 0 {
        -index
    } else if index > last {
        2 * last - index
    } else {
        index
    };
    mirrored as usize
}

pub fn correlate3x3(plane: &Array2<f64>, kernel: &Kernel3) -> Array2<f64> {
    let (rows, cols) = plane.dim();
    let mut out = Array2::<f64>::zeros((rows, cols));
    if rows == 0 || cols == 0 {
        return out;
    }

    for r in 0..rows {
        let neighbour_rows = [
            reflect_101(r as isize - 1, rows),
            r,
            reflect_101(r as isize + 1, rows),
        ];
        for c in 0..cols {
            let neighbour_cols = [
                reflect_101(c as isize - 1, cols),
                c,
                reflect_101(c as isize + 1, cols),
            ];
            let mut acc = 0.0;
            for (ky, &nr) in neighbour_rows.iter().enumerate() {
                for (kx, &nc) in neighbour_cols.iter().enumerate() {
                    acc += kernel[ky][kx] * plane[[nr, nc]];
                }
            }
            out[[r, c]] = acc;
        }
    }
    out
}

pub fn gaussian_blur(plane: &Array2<f64>) -> Array2<f64> {
    correlate3x3(plane, &GAUSSIAN_3X3)
}

pub fn laplacian(plane: &Array2<f64>) -> Array2<f64> {
    correlate3x3(plane, &LAPLACIAN_3X3)
}

/// Per-pixel gradient magnitude `sqrt(gx² + gy²)`.
pub fn sobel_magnitude(plane: &Array2<f64>) -> Array2<f64> {
    let gx = correlate3x3(plane, &SOBEL_X);
    let gy = correlate3x3(plane, &SOBEL_Y);
    let mut magnitude = gx;
    magnitude.zip_mut_with(&gy, |x, &y| *x = (*x * *x + y * y).sqrt());
    magnitude
}

/// Arithmetic mean; 0 for an empty plane.
pub fn mean(values: &Array2<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sum() / values.len() as f64
}

/// Population variance (divides by N); 0 for an empty plane.
pub fn variance(values: &Array2<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    sum_sq / values.len() as f64
}

pub fn std_dev(values: &Array2<f64>) -> f64 {
    variance(values).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn reflect_101_mirrors_without_repeating_the_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-1, 2), 1);
        assert_eq!(reflect_101(2, 2), 0);
        assert_eq!(reflect_101(-1, 1), 0);
        assert_eq!(reflect_101(1, 1), 0);
    }

    #[test]
    fn flat_plane_has_no_edges() {
        let plane = Array2::<f64>::from_elem((6, 9), 128.0);
        assert!(laplacian(&plane).iter().all(|v| *v == 0.0));
        assert!(sobel_magnitude(&plane).iter().all(|v| *v == 0.0));
        let blurred = gaussian_blur(&plane);
        assert!(blurred.iter().all(|v| (*v - 128.0).abs() < 1e-9));
    }

    #[test]
    fn laplacian_responds_to_an_isolated_spike() {
        let mut plane = Array2::<f64>::zeros((5, 5));
        plane[[2, 2]] = 10.0;
        let response = laplacian(&plane);
        assert_eq!(response[[2, 2]], -40.0);
        assert_eq!(response[[1, 2]], 10.0);
        assert_eq!(response[[2, 3]], 10.0);
        assert_eq!(response[[1, 1]], 0.0);
    }

    #[test]
    fn sobel_detects_a_vertical_step() {
        let plane = array![
            [0.0, 0.0, 255.0, 255.0],
            [0.0, 0.0, 255.0, 255.0],
            [0.0, 0.0, 255.0, 255.0]
        ];
        let magnitude = sobel_magnitude(&plane);
        // Columns 1 and 2 straddle the step: |gx| = (1 + 2 + 1) * 255.
        assert_eq!(magnitude[[1, 1]], 1020.0);
        assert_eq!(magnitude[[1, 2]], 1020.0);
        assert_eq!(magnitude[[1, 0]], 0.0);
    }

    #[test]
    fn single_pixel_plane_is_handled() {
        let plane = array![[42.0]];
        assert_eq!(laplacian(&plane)[[0, 0]], 0.0);
        assert_eq!(sobel_magnitude(&plane)[[0, 0]], 0.0);
        assert!((gaussian_blur(&plane)[[0, 0]] - 42.0).abs() < 1e-9);
    }

    #[test]
    fn statistics_are_population_based() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(mean(&values), 2.5);
        assert_eq!(variance(&values), 1.25);
        assert_eq!(variance(&Array2::<f64>::zeros((0, 0))), 0.0);
    }
}
