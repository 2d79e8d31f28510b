use crate::errors::Error;
use ndarray::{Array1, Array2};
use ndarray_stats::QuantileExt;

// Global constants
const PI: f64 = std::f64::consts::PI;

/// Discrete frequencies for a transform of length `n` with sample spacing `d`,
/// in the standard DFT ordering: zero first, then positive, then negative
fn fft_frequencies(n: usize, d: f64) -> Array1<f64> {
    let mut frequencies: Array1<f64> = Array1::zeros(n);

    let n_positive: usize = (n - 1) / 2 + 1;
    for i in 0..n_positive {
        frequencies[i] = i as f64 / (n as f64 * d);
    }
    for i in n_positive..n {
        frequencies[i] = (i as f64 - n as f64) / (n as f64 * d);
    }

    return frequencies;
}

/// Angular wavenumber meshes for a (possibly padded) grid
///
/// The sample spacings come from the coordinate extents of the unpadded
/// grid, `d_x = (max(x) - min(x)) / (n_x - 1)`, so the padded spectrum keeps
/// the physical spacing of the survey.
///
/// # Arguments
///
/// * `x`, `y` - coordinates of the grid points in the x- and y-directions
/// * `shape` - unpadded grid dimensions `(n_x, n_y)`
/// * `padded_shape` - dimensions of the grid that will be transformed
///
/// # Returns
///
/// * `(k_x, k_y)` - angular wavenumbers at each spectral bin; `k_x` varies
///   along rows and `k_y` along columns
///
pub fn wavenumbers(
    x: &Array1<f64>,
    y: &Array1<f64>,
    shape: (usize, usize),
    padded_shape: (usize, usize),
) -> Result<(Array2<f64>, Array2<f64>), Error> {
    let (n_x, n_y): (usize, usize) = shape;
    if n_x < 2 || n_y < 2 {
        return Err(Error::GridTooSmall { n_x, n_y });
    }

    let x_min: f64 = *x.min().map_err(|_| Error::ZeroSize { name: "x" })?;
    let x_max: f64 = *x.max().map_err(|_| Error::ZeroSize { name: "x" })?;
    let y_min: f64 = *y.min().map_err(|_| Error::ZeroSize { name: "y" })?;
    let y_max: f64 = *y.max().map_err(|_| Error::ZeroSize { name: "y" })?;
    if x_max <= x_min {
        return Err(Error::DegenerateSpacing { axis: 'x' });
    }
    if y_max <= y_min {
        return Err(Error::DegenerateSpacing { axis: 'y' });
    }

    // Sample spacing of the unpadded grid
    let d_x: f64 = (x_max - x_min) / ((n_x - 1) as f64);
    let d_y: f64 = (y_max - y_min) / ((n_y - 1) as f64);

    // Angular frequency vectors for the transformed grid
    let f_x: Array1<f64> = fft_frequencies(padded_shape.0, d_x).mapv(|frequency: f64| 2.0 * PI * frequency);
    let f_y: Array1<f64> = fft_frequencies(padded_shape.1, d_y).mapv(|frequency: f64| 2.0 * PI * frequency);

    let mut k_x: Array2<f64> = Array2::zeros(padded_shape);
    let mut k_y: Array2<f64> = Array2::zeros(padded_shape);
    for i in 0..padded_shape.0 {
        for j in 0..padded_shape.1 {
            k_x[(i, j)] = f_x[i];
            k_y[(i, j)] = f_y[j];
        }
    }

    return Ok((k_x, k_y));
}

#[test]
fn test_fft_frequencies_ordering() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    // Even length: zero, positive, then the most negative first
    let frequencies_even: Array1<f64> = fft_frequencies(4, 1.0);
    let expected_even: Array1<f64> = Array1::from_vec(vec![0.0, 0.25, -0.5, -0.25]);
    assert_abs_diff_eq!(frequencies_even, expected_even, epsilon = 1e-15);

    // Odd length
    let frequencies_odd: Array1<f64> = fft_frequencies(5, 1.0);
    let expected_odd: Array1<f64> = Array1::from_vec(vec![0.0, 0.2, 0.4, -0.4, -0.2]);
    assert_abs_diff_eq!(frequencies_odd, expected_odd, epsilon = 1e-15);
}

#[test]
fn test_wavenumbers_mesh_orientation() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    let n_x: usize = 4;
    let n_y: usize = 4;
    let x: Array1<f64> = Array1::from_iter((0..n_x * n_y).map(|i: usize| (i / n_y) as f64));
    let y: Array1<f64> = Array1::from_iter((0..n_x * n_y).map(|i: usize| (i % n_y) as f64));

    let (k_x, k_y): (Array2<f64>, Array2<f64>) = wavenumbers(&x, &y, (n_x, n_y), (n_x, n_y)).unwrap();

    // Unit spacing: the second bin carries 2 * pi / 4
    assert_abs_diff_eq!(k_x[(1, 0)], PI / 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(k_y[(0, 1)], PI / 2.0, epsilon = 1e-12);

    // k_x is constant along columns, k_y along rows
    for j in 0..n_y {
        assert_eq!(k_x[(2, j)], k_x[(2, 0)]);
    }
    for i in 0..n_x {
        assert_eq!(k_y[(i, 3)], k_y[(0, 3)]);
    }
}

#[test]
fn test_wavenumbers_rejects_degenerate_grids() {
    let x: Array1<f64> = Array1::from_vec(vec![0.0, 1.0]);
    let y: Array1<f64> = Array1::from_vec(vec![0.0, 1.0]);
    assert_eq!(
        wavenumbers(&x, &y, (1, 2), (2, 2)).unwrap_err(),
        Error::GridTooSmall { n_x: 1, n_y: 2 }
    );

    let y_flat: Array1<f64> = Array1::from_vec(vec![3.0, 3.0]);
    assert_eq!(
        wavenumbers(&x, &y_flat, (2, 2), (2, 2)).unwrap_err(),
        Error::DegenerateSpacing { axis: 'y' }
    );
}
