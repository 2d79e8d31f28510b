use crate::errors::Error;
use ndarray::Array1;

/// Analytic signal amplitude and tilt derivative from a derivative triple
///
/// # Arguments
///
/// * `dx`, `dy`, `dz` - flat derivatives in the x-, y- and z-directions,
///   equal lengths
///
/// # Returns
///
/// * `(asa, tilt)` - `asa = sqrt(dx^2 + dy^2 + dz^2)` and
///   `tilt = atan2(dz, sqrt(dx^2 + dy^2))`, with `atan2(0, 0) = 0`
///
pub fn asa_tdr(dx: &Array1<f64>, dy: &Array1<f64>, dz: &Array1<f64>) -> Result<(Array1<f64>, Array1<f64>), Error> {
    if dy.len() != dx.len() {
        return Err(Error::LengthMismatch {
            expected: dx.len(),
            actual: dy.len(),
        });
    }
    if dz.len() != dx.len() {
        return Err(Error::LengthMismatch {
            expected: dx.len(),
            actual: dz.len(),
        });
    }

    let n: usize = dx.len();
    let mut asa: Array1<f64> = Array1::zeros(n);
    let mut tilt: Array1<f64> = Array1::zeros(n);
    for i in 0..n {
        let horizontal: f64 = (dx[i].powi(2) + dy[i].powi(2)).sqrt();
        asa[i] = (dx[i].powi(2) + dy[i].powi(2) + dz[i].powi(2)).sqrt();
        tilt[i] = dz[i].atan2(horizontal);
    }

    return Ok((asa, tilt));
}

#[test]
fn test_asa_tdr_known_values() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    let dx: Array1<f64> = Array1::from_vec(vec![3.0, 0.0, 1.0]);
    let dy: Array1<f64> = Array1::from_vec(vec![4.0, 0.0, 0.0]);
    let dz: Array1<f64> = Array1::from_vec(vec![0.0, 2.0, 1.0]);

    let (asa, tilt): (Array1<f64>, Array1<f64>) = asa_tdr(&dx, &dy, &dz).unwrap();

    // Purely horizontal gradient: tilt is zero
    assert_abs_diff_eq!(asa[0], 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(tilt[0], 0.0, epsilon = 1e-12);

    // Purely vertical gradient: tilt is pi/2 and the amplitude is dz
    assert_abs_diff_eq!(asa[1], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(tilt[1], std::f64::consts::FRAC_PI_2, epsilon = 1e-12);

    // Equal parts: tilt is pi/4
    assert_abs_diff_eq!(asa[2], 2.0_f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(tilt[2], std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
}

#[test]
fn test_asa_tdr_zero_field_convention() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    let zeros: Array1<f64> = Array1::zeros(16);

    let (asa, tilt): (Array1<f64>, Array1<f64>) = asa_tdr(&zeros, &zeros, &zeros).unwrap();

    // atan2(0, 0) is zero by convention, not an error
    assert_abs_diff_eq!(asa, Array1::zeros(16), epsilon = 0.0);
    assert_abs_diff_eq!(tilt, Array1::zeros(16), epsilon = 0.0);
}

#[test]
fn test_asa_tdr_length_mismatch() {
    let dx: Array1<f64> = Array1::zeros(4);
    let dy: Array1<f64> = Array1::zeros(4);
    let dz: Array1<f64> = Array1::zeros(5);

    let result: Result<(Array1<f64>, Array1<f64>), Error> = asa_tdr(&dx, &dy, &dz);
    assert_eq!(result.unwrap_err(), Error::LengthMismatch { expected: 4, actual: 5 });
}
