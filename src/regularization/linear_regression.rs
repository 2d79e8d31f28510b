use crate::errors::Error;
use ndarray::Array1;

/// Regularization exponent from the 0.5 crossing of an S-curve
///
/// Fits an ordinary least-squares line to the `(trial strength, norm)`
/// pairs whose norm falls inside the caller's window, then solves the
/// fitted line for a norm of 0.5. The norm is compared against the window
/// after rounding to one decimal, which widens the window to tolerate the
/// sampling granularity of the sweep.
///
/// The fit runs against the trial strength itself, not its logarithm, even
/// though sweeps are log-spaced; this matches the published method.
///
/// # Arguments
///
/// * `norm_curve` - normalized norms, one per trial strength
/// * `trial_strengths` - trial regularization strengths
/// * `upper_limit`, `lower_limit` - norm window for the fit
///
/// # Returns
///
/// * base-10 logarithm of the strength where the fitted line crosses 0.5
///
pub fn linear_regression(
    norm_curve: &Array1<f64>,
    trial_strengths: &Array1<f64>,
    upper_limit: f64,
    lower_limit: f64,
) -> Result<f64, Error> {
    if norm_curve.len() != trial_strengths.len() {
        return Err(Error::LengthMismatch {
            expected: trial_strengths.len(),
            actual: norm_curve.len(),
        });
    }

    // Keep the points whose rounded norm falls inside the window
    let mut norm_selected: Vec<f64> = Vec::new();
    let mut alpha_selected: Vec<f64> = Vec::new();
    for i in 0..norm_curve.len() {
        let rounded: f64 = (norm_curve[i] * 10.0).round() / 10.0;
        if rounded >= lower_limit && rounded <= upper_limit {
            norm_selected.push(norm_curve[i]);
            alpha_selected.push(trial_strengths[i]);
        }
    }

    let n_selected: usize = norm_selected.len();
    if n_selected < 2 {
        return Err(Error::InsufficientData { n_selected });
    }

    // Ordinary least squares: norm = slope * strength + intercept
    let alpha_mean: f64 = alpha_selected.iter().sum::<f64>() / (n_selected as f64);
    let norm_mean: f64 = norm_selected.iter().sum::<f64>() / (n_selected as f64);
    let mut covariance: f64 = 0.0;
    let mut variance: f64 = 0.0;
    for i in 0..n_selected {
        covariance += (alpha_selected[i] - alpha_mean) * (norm_selected[i] - norm_mean);
        variance += (alpha_selected[i] - alpha_mean).powi(2);
    }
    if variance == 0.0 {
        return Err(Error::DegenerateRegression);
    }
    let slope: f64 = covariance / variance;
    let intercept: f64 = norm_mean - slope * alpha_mean;

    if slope == 0.0 {
        return Err(Error::HorizontalFit);
    }

    // Strength at which the fitted line crosses a norm of 0.5
    let crossing: f64 = (0.5 - intercept) / slope;
    if !crossing.is_finite() || crossing <= 0.0 {
        return Err(Error::NonPositiveCrossing { crossing });
    }

    return Ok(crossing.log10());
}

#[test]
fn test_exact_crossing_on_a_linear_curve() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    // norm = -0.1 * strength + 0.8 crosses 0.5 at strength 3
    let trial_strengths: Array1<f64> = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
    let norm_curve: Array1<f64> = trial_strengths.mapv(|alpha: f64| -0.1 * alpha + 0.8);

    let exponent: f64 = linear_regression(&norm_curve, &trial_strengths, 0.7, 0.4).unwrap();

    assert_abs_diff_eq!(exponent, 3.0_f64.log10(), epsilon = 1e-12);
}

#[test]
fn test_window_rounding_widens_selection() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    // 0.64 rounds to 0.6 and 0.36 rounds to 0.4, so all four points pass a
    // [0.4, 0.6] window even though two raw values sit outside it
    let trial_strengths: Array1<f64> = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
    let norm_curve: Array1<f64> = Array1::from_vec(vec![0.64, 0.55, 0.45, 0.36]);

    let exponent: f64 = linear_regression(&norm_curve, &trial_strengths, 0.6, 0.4).unwrap();

    // The raw values are collinear with slope -0.094 about their center
    let crossing: f64 = 10.0_f64.powf(exponent);
    assert_abs_diff_eq!(crossing, 2.5, epsilon = 1e-9);
}

#[test]
fn test_insufficient_points_in_window() {
    let trial_strengths: Array1<f64> = Array1::from_vec(vec![1.0, 10.0, 100.0]);
    let norm_curve: Array1<f64> = Array1::from_vec(vec![0.1, 0.9, 0.99]);

    let result: Result<f64, Error> = linear_regression(&norm_curve, &trial_strengths, 0.55, 0.45);

    assert_eq!(result.unwrap_err(), Error::InsufficientData { n_selected: 0 });
}

#[test]
fn test_degenerate_fits_are_rejected() {
    // Horizontal curve: no crossing with 0.5
    let trial_strengths: Array1<f64> = Array1::from_vec(vec![1.0, 2.0, 3.0]);
    let norm_flat: Array1<f64> = Array1::from_vec(vec![0.6, 0.6, 0.6]);
    assert_eq!(
        linear_regression(&norm_flat, &trial_strengths, 0.7, 0.4).unwrap_err(),
        Error::HorizontalFit
    );

    // Rising curve whose 0.5 crossing sits at a negative strength
    let norm_rising: Array1<f64> = Array1::from_vec(vec![0.7, 0.8, 0.9]);
    assert!(matches!(
        linear_regression(&norm_rising, &trial_strengths, 0.9, 0.7).unwrap_err(),
        Error::NonPositiveCrossing { .. }
    ));
}
