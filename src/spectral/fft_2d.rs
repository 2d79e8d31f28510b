use ndarray::{Array2, Axis};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};
use std::sync::Arc;

/// Two-dimensional discrete Fourier transform
pub fn fft2(data: &Array2<Complex64>) -> Array2<Complex64> {
    return transform_2d(data, FftDirection::Forward);
}

/// Two-dimensional inverse discrete Fourier transform
///
/// rustfft leaves transforms unnormalized; the inverse carries the `1 / N`
/// factor so that `ifft2(fft2(data)) == data`.
pub fn ifft2(data: &Array2<Complex64>) -> Array2<Complex64> {
    let (n_rows, n_cols): (usize, usize) = data.dim();

    let mut result: Array2<Complex64> = transform_2d(data, FftDirection::Inverse);

    let scale: f64 = 1.0 / ((n_rows * n_cols) as f64);
    result.mapv_inplace(|value: Complex64| value * scale);

    return result;
}

/// The 2-D transform is separable: a 1-D pass over every row followed by a
/// 1-D pass over every column
fn transform_2d(data: &Array2<Complex64>, direction: FftDirection) -> Array2<Complex64> {
    let (n_rows, n_cols): (usize, usize) = data.dim();

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft_along_rows: Arc<dyn Fft<f64>> = planner.plan_fft(n_cols, direction);
    let fft_along_cols: Arc<dyn Fft<f64>> = planner.plan_fft(n_rows, direction);

    let mut result: Array2<Complex64> = data.to_owned();

    for mut row in result.axis_iter_mut(Axis(0)) {
        let mut buffer: Vec<Complex64> = row.to_vec();
        fft_along_rows.process(&mut buffer);
        for (element, value) in row.iter_mut().zip(buffer.iter()) {
            *element = *value;
        }
    }

    for mut column in result.axis_iter_mut(Axis(1)) {
        let mut buffer: Vec<Complex64> = column.to_vec();
        fft_along_cols.process(&mut buffer);
        for (element, value) in column.iter_mut().zip(buffer.iter()) {
            *element = *value;
        }
    }

    return result;
}

#[test]
fn test_fft2_of_impulse_is_flat() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    let mut data: Array2<Complex64> = Array2::from_elem((4, 4), Complex64::new(0.0, 0.0));
    data[(0, 0)] = Complex64::new(1.0, 0.0);

    let spectrum: Array2<Complex64> = fft2(&data);

    // An impulse at the origin transforms to a constant spectrum
    for value in spectrum.iter() {
        assert_abs_diff_eq!(value.re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(value.im, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_ifft2_round_trip() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    // Non-square, non-power-of-two shape
    let n_rows: usize = 3;
    let n_cols: usize = 7;
    let data: Array2<Complex64> = Array2::from_shape_fn((n_rows, n_cols), |(i, j): (usize, usize)| {
        Complex64::new((i * n_cols + j) as f64, (i as f64) - (j as f64))
    });

    let recovered: Array2<Complex64> = ifft2(&fft2(&data));

    for (original, value) in data.iter().zip(recovered.iter()) {
        assert_abs_diff_eq!(original.re, value.re, epsilon = 1e-10);
        assert_abs_diff_eq!(original.im, value.im, epsilon = 1e-10);
    }
}
