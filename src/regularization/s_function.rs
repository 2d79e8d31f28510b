use crate::derivatives::regularized_derivative;
use crate::errors::Error;
use log::{debug, info};
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// S-function: normalized Euclidean norms of the regularized derivatives
/// over a sweep of trial regularization strengths
///
/// Each trial strength produces one norm per direction; after the sweep,
/// every direction is divided by its own maximum, so each output sequence
/// lies in `[0, 1]` and reaches 1 at its largest (least-damped) trial. The
/// trials are independent and are swept in parallel; output order follows
/// the input order.
///
/// # Arguments
///
/// * `x`, `y` - coordinates of the grid points in the x- and y-directions
/// * `data` - flat row-major grid of field values
/// * `shape` - grid dimensions `(n_x, n_y)`
/// * `trial_strengths` - trial regularization strengths, all positive
/// * `order` - derivative order
///
/// # Returns
///
/// * `(norm_dx, norm_dy, norm_dz)` - one normalized norm per trial strength
///   for each direction
///
pub fn s_function(
    x: &Array1<f64>,
    y: &Array1<f64>,
    data: &Array1<f64>,
    shape: (usize, usize),
    trial_strengths: &Array1<f64>,
    order: u32,
) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>), Error> {
    let n_trials: usize = trial_strengths.len();
    if n_trials == 0 {
        return Err(Error::EmptyAlphaSequence);
    }

    // Each trial is independent; sweep in parallel, keeping trial order
    let timing_start: Instant = Instant::now();
    let norms_or_error: Result<Vec<(f64, f64, f64)>, Error> = (0..n_trials)
        .into_par_iter() // Use Rayon to create a parallel iterator
        .map(|i_trial: usize| {
            let alpha: f64 = trial_strengths[i_trial];
            let (dx, dy, dz): (Array1<f64>, Array1<f64>, Array1<f64>) =
                regularized_derivative(x, y, data, shape, order, alpha)?;

            let norm_x: f64 = dx.mapv(|value: f64| value.powi(2)).sum().sqrt();
            let norm_y: f64 = dy.mapv(|value: f64| value.powi(2)).sum().sqrt();
            let norm_z: f64 = dz.mapv(|value: f64| value.powi(2)).sum().sqrt();
            debug!("alpha={:.3e};  norm_dx={:.6e};  norm_dy={:.6e};  norm_dz={:.6e}", alpha, norm_x, norm_y, norm_z);

            return Ok((norm_x, norm_y, norm_z));
        })
        .collect();
    let norms: Vec<(f64, f64, f64)> = norms_or_error?;
    let duration: Duration = timing_start.elapsed();
    info!("s_function sweep over {} trial strengths elapsed: {:?}", n_trials, duration);

    let mut norm_dx: Array1<f64> = Array1::zeros(n_trials);
    let mut norm_dy: Array1<f64> = Array1::zeros(n_trials);
    let mut norm_dz: Array1<f64> = Array1::zeros(n_trials);
    for i_trial in 0..n_trials {
        norm_dx[i_trial] = norms[i_trial].0;
        norm_dy[i_trial] = norms[i_trial].1;
        norm_dz[i_trial] = norms[i_trial].2;
    }

    // Normalize each direction by its own maximum across the sweep
    let max_dx: f64 = *norm_dx.max().map_err(|_| Error::NonFiniteNorm { direction: 'x' })?;
    let max_dy: f64 = *norm_dy.max().map_err(|_| Error::NonFiniteNorm { direction: 'y' })?;
    let max_dz: f64 = *norm_dz.max().map_err(|_| Error::NonFiniteNorm { direction: 'z' })?;
    if max_dx == 0.0 {
        return Err(Error::ZeroNorm { direction: 'x' });
    }
    if max_dy == 0.0 {
        return Err(Error::ZeroNorm { direction: 'y' });
    }
    if max_dz == 0.0 {
        return Err(Error::ZeroNorm { direction: 'z' });
    }

    return Ok((norm_dx / max_dx, norm_dy / max_dy, norm_dz / max_dz));
}

#[cfg(test)]
fn gaussian_anomaly_grid(n: usize) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
    let x: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i / n) as f64));
    let y: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i % n) as f64));
    let center: f64 = (n as f64 - 1.0) / 2.0;
    let data: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| {
        let row: f64 = (i / n) as f64 - center;
        let col: f64 = (i % n) as f64 - center;
        100.0 * (-(row * row + col * col) / 18.0).exp()
    }));
    return (x, y, data);
}

#[test]
fn test_s_function_is_normalized() {
    // Lazy loading for crates which are only used within the tests
    use crate::regularization::alpha_trials;
    let _ = env_logger::builder().is_test(true).try_init();

    let n: usize = 16;
    let (x, y, data): (Array1<f64>, Array1<f64>, Array1<f64>) = gaussian_anomaly_grid(n);
    let trials: Array1<f64> = alpha_trials(-4.0, 8.0, 0.5).unwrap();

    let (norm_dx, norm_dy, norm_dz): (Array1<f64>, Array1<f64>, Array1<f64>) =
        s_function(&x, &y, &data, (n, n), &trials, 1).unwrap();

    for curve in [&norm_dx, &norm_dy, &norm_dz] {
        assert_eq!(curve.len(), trials.len());

        // All values in [0, 1], maximum exactly 1
        let mut maximum: f64 = 0.0;
        for &value in curve.iter() {
            assert!(value >= 0.0 && value <= 1.0);
            maximum = maximum.max(value);
        }
        assert_eq!(maximum, 1.0);
    }

    // The spectral gains shrink with alpha, so the curves never increase
    for i in 1..trials.len() {
        assert!(norm_dz[i] <= norm_dz[i - 1]);
    }
}

#[test]
fn test_s_function_rejects_empty_sweep() {
    let n: usize = 8;
    let (x, y, data): (Array1<f64>, Array1<f64>, Array1<f64>) = gaussian_anomaly_grid(n);
    let trials: Array1<f64> = Array1::zeros(0);

    let result: Result<(Array1<f64>, Array1<f64>, Array1<f64>), Error> = s_function(&x, &y, &data, (n, n), &trials, 1);
    assert_eq!(result.unwrap_err(), Error::EmptyAlphaSequence);
}

#[test]
fn test_s_function_rejects_zero_field() {
    let n: usize = 4;
    let x: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i / n) as f64));
    let y: Array1<f64> = Array1::from_iter((0..n * n).map(|i: usize| (i % n) as f64));
    let data: Array1<f64> = Array1::zeros(n * n);
    let trials: Array1<f64> = Array1::from_vec(vec![1e-2, 1.0, 1e2]);

    // An identically zero field has zero derivative norms in every direction
    let result: Result<(Array1<f64>, Array1<f64>, Array1<f64>), Error> = s_function(&x, &y, &data, (n, n), &trials, 1);
    assert!(matches!(result.unwrap_err(), Error::ZeroNorm { .. }));
}
