use crate::errors::Error;
use ndarray::Array1;

/// Log-spaced sequence of trial regularization strengths
///
/// Builds `10^l` for `l = exp_min, exp_min + exp_step, ...` up to and
/// including `exp_max`. A typical survey sweep runs the exponents from -6
/// to 14 in steps of 0.5.
///
/// # Arguments
///
/// * `exp_min`, `exp_max` - first and last base-10 exponents
/// * `exp_step` - exponent increment, strictly positive
///
/// # Returns
///
/// * trial strengths in increasing order
///
pub fn alpha_trials(exp_min: f64, exp_max: f64, exp_step: f64) -> Result<Array1<f64>, Error> {
    if !exp_min.is_finite() || !exp_max.is_finite() || !exp_step.is_finite() || exp_step <= 0.0 || exp_max < exp_min {
        return Err(Error::InvalidStep { exp_min, exp_max, exp_step });
    }

    // The small slack keeps `exp_max` inside the sequence when the division
    // is not exactly representable
    let n_trials: usize = ((exp_max - exp_min) / exp_step + 1e-9).floor() as usize + 1;

    let mut trials: Array1<f64> = Array1::zeros(n_trials);
    for i in 0..n_trials {
        let exponent: f64 = exp_min + (i as f64) * exp_step;
        trials[i] = 10.0_f64.powf(exponent);
    }

    return Ok(trials);
}

#[test]
fn test_alpha_trials_survey_sweep() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_relative_eq;

    let trials: Array1<f64> = alpha_trials(-6.0, 14.0, 0.5).unwrap();

    assert_eq!(trials.len(), 41);
    assert_relative_eq!(trials[0], 1e-6, max_relative = 1e-12);
    assert_relative_eq!(trials[40], 1e14, max_relative = 1e-12);

    // Strictly increasing
    for i in 1..trials.len() {
        assert!(trials[i] > trials[i - 1]);
    }
}

#[test]
fn test_alpha_trials_rejects_bad_ranges() {
    assert!(alpha_trials(0.0, 1.0, 0.0).is_err());
    assert!(alpha_trials(0.0, 1.0, -0.5).is_err());
    assert!(alpha_trials(2.0, 1.0, 0.5).is_err());
    assert!(alpha_trials(f64::NAN, 1.0, 0.5).is_err());
}
