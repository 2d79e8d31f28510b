use crate::errors::Error;
use crate::spectral::{fft2, ifft2, pad_data, wavenumbers};
use ndarray::{Array1, Array2, s};
use num::complex::Complex64;

/// Non-regularized derivatives of a potential field in the Fourier domain
/// in the x, y and z directions
///
/// The grid is padded to a power-of-two square by edge replication before
/// the transform and cropped back afterwards. The vertical derivative uses
/// the wavenumber magnitude, which is the upward-continuation relation for
/// a potential field; no z coordinate is needed.
///
/// # Arguments
///
/// * `x`, `y` - coordinates of the grid points in the x- and y-directions
/// * `data` - flat row-major grid of field values
/// * `shape` - grid dimensions `(n_x, n_y)`
/// * `order` - derivative order
///
/// # Returns
///
/// * `(dx, dy, dz)` - flat derivatives in the x-, y- and z-directions,
///   co-registered with `data`
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use sfunc_rs::nonregularized_derivative;
///
/// let n: usize = 4;
/// let x: Array1<f64> = Array1::from_iter((0..n * n).map(|i| (i / n) as f64));
/// let y: Array1<f64> = Array1::from_iter((0..n * n).map(|i| (i % n) as f64));
/// let data: Array1<f64> = &x * &x;
///
/// let (dx, dy, dz) = nonregularized_derivative(&x, &y, &data, (n, n), 1).unwrap();
/// assert_eq!(dx.len(), n * n);
/// assert_eq!(dz.len(), n * n);
/// ```
///
pub fn nonregularized_derivative(
    x: &Array1<f64>,
    y: &Array1<f64>,
    data: &Array1<f64>,
    shape: (usize, usize),
    order: u32,
) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>), Error> {
    let (n_x, n_y): (usize, usize) = shape;

    let (padded, pad_x, pad_y): (Array2<f64>, usize, usize) = pad_data(data, shape)?;
    let (k_x, k_y): (Array2<f64>, Array2<f64>) = wavenumbers(x, y, shape, padded.dim())?;

    // Two-dimensional discrete Fourier transform of the padded field
    let spectrum: Array2<Complex64> = fft2(&padded.mapv(|value: f64| Complex64::new(value, 0.0)));

    // Spectral derivative factors; the vertical factor is the real-valued
    // wavenumber magnitude
    let factor_x: Array2<Complex64> = k_x.mapv(|k: f64| Complex64::new(0.0, k).powu(order));
    let factor_y: Array2<Complex64> = k_y.mapv(|k: f64| Complex64::new(0.0, k).powu(order));
    let modulus: Array2<f64> = (&k_x * &k_x + &k_y * &k_y).mapv(|k_sq: f64| k_sq.sqrt());
    let factor_z: Array2<Complex64> = modulus.mapv(|k: f64| Complex64::new(k.powi(order as i32), 0.0));

    // Back to the spatial domain; the imaginary residual is transform
    // round-off and is discarded
    let derivative_x_padded: Array2<f64> = ifft2(&(&spectrum * &factor_x)).mapv(|value: Complex64| value.re);
    let derivative_y_padded: Array2<f64> = ifft2(&(&spectrum * &factor_y)).mapv(|value: Complex64| value.re);
    let derivative_z_padded: Array2<f64> = ifft2(&(&spectrum * &factor_z)).mapv(|value: Complex64| value.re);

    // Remove the padding and flatten back to the original row-major order
    let dx: Array1<f64> = Array1::from_iter(derivative_x_padded.slice(s![pad_x..pad_x + n_x, pad_y..pad_y + n_y]).iter().cloned());
    let dy: Array1<f64> = Array1::from_iter(derivative_y_padded.slice(s![pad_x..pad_x + n_x, pad_y..pad_y + n_y]).iter().cloned());
    let dz: Array1<f64> = Array1::from_iter(derivative_z_padded.slice(s![pad_x..pad_x + n_x, pad_y..pad_y + n_y]).iter().cloned());

    return Ok((dx, dy, dz));
}

#[test]
fn test_order_zero_reproduces_input() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    // Non-power-of-two shape so the pad and crop paths are exercised
    let n_x: usize = 3;
    let n_y: usize = 5;
    let x: Array1<f64> = Array1::from_iter((0..n_x * n_y).map(|i: usize| (i / n_y) as f64));
    let y: Array1<f64> = Array1::from_iter((0..n_x * n_y).map(|i: usize| (i % n_y) as f64));
    let data: Array1<f64> = Array1::from_iter((0..n_x * n_y).map(|i: usize| (i as f64).sin() + 2.0));

    let (dx, dy, dz): (Array1<f64>, Array1<f64>, Array1<f64>) =
        nonregularized_derivative(&x, &y, &data, (n_x, n_y), 0).unwrap();

    // A unit spectral multiplier makes the pad, transform and crop lossless
    assert_abs_diff_eq!(dx, data, epsilon = 1e-10);
    assert_abs_diff_eq!(dy, data, epsilon = 1e-10);
    assert_abs_diff_eq!(dz, data, epsilon = 1e-10);
}

#[test]
fn test_sinusoid_matches_analytic_derivative() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    // Power-of-two shape: the pad is an identity, and a sinusoid with a
    // whole number of periods sits exactly on a spectral bin
    let n: usize = 16;
    let k_0: f64 = 2.0 * std::f64::consts::PI * 2.0 / (n as f64);

    let x: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i / n) as f64));
    let y: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i % n) as f64));
    let data: Array1<f64> = x.mapv(|value: f64| (k_0 * value).sin());

    let (dx, dy, dz): (Array1<f64>, Array1<f64>, Array1<f64>) =
        nonregularized_derivative(&x, &y, &data, (n, n), 1).unwrap();

    let dx_analytic: Array1<f64> = x.mapv(|value: f64| k_0 * (k_0 * value).cos());
    let dz_analytic: Array1<f64> = x.mapv(|value: f64| k_0 * (k_0 * value).sin());

    assert_abs_diff_eq!(dx, dx_analytic, epsilon = 1e-9);
    assert_abs_diff_eq!(dy, Array1::zeros(n * n), epsilon = 1e-9);
    assert_abs_diff_eq!(dz, dz_analytic, epsilon = 1e-9);
}

#[test]
fn test_flat_grid_has_zero_derivatives() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    let n: usize = 4;
    let x: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i / n) as f64));
    let y: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i % n) as f64));
    let data: Array1<f64> = Array1::from_elem(n * n, 7.5);

    let (dx, dy, dz): (Array1<f64>, Array1<f64>, Array1<f64>) =
        nonregularized_derivative(&x, &y, &data, (n, n), 1).unwrap();

    assert_abs_diff_eq!(dx, Array1::zeros(n * n), epsilon = 1e-10);
    assert_abs_diff_eq!(dy, Array1::zeros(n * n), epsilon = 1e-10);
    assert_abs_diff_eq!(dz, Array1::zeros(n * n), epsilon = 1e-10);
}
