use crate::errors::Error;
use core::f64;
use ndarray::{Array1, Array2};

/// Smallest power of two greater than or equal to `n`
pub fn next_power_of_two(n: usize) -> Result<usize, Error> {
    if n == 0 {
        return Err(Error::ZeroSize { name: "n" });
    }

    return Ok(n.next_power_of_two());
}

/// Pad a flat grid to a power-of-two square by edge replication
///
/// The target side is the smallest power of two which holds the larger grid
/// dimension. The half-pads are `(side - n_x) / 2` and `(side - n_y) / 2`
/// with integer division, so an odd difference leaves the padded dimension
/// one short of the target side.
///
/// # Arguments
///
/// * `data` - flat row-major grid values, length `n_x * n_y`
/// * `shape` - grid dimensions `(n_x, n_y)`
///
/// # Returns
///
/// * `(padded, pad_x, pad_y)` - the padded grid and the half-pad offsets
///   needed to crop back to the original shape
///
pub fn pad_data(data: &Array1<f64>, shape: (usize, usize)) -> Result<(Array2<f64>, usize, usize), Error> {
    let (n_x, n_y): (usize, usize) = shape;
    if n_x == 0 || n_y == 0 {
        return Err(Error::ZeroSize { name: "shape" });
    }
    if data.len() != n_x * n_y {
        return Err(Error::ShapeMismatch {
            expected: n_x * n_y,
            actual: data.len(),
        });
    }

    let side: usize = next_power_of_two(n_x.max(n_y))?;
    let pad_x: usize = (side - n_x) / 2;
    let pad_y: usize = (side - n_y) / 2;

    let n_x_padded: usize = n_x + 2 * pad_x;
    let n_y_padded: usize = n_y + 2 * pad_y;

    // Fill the padded grid, clamping the source index into the interior so
    // that the border rows and columns are replicated outwards
    let mut padded: Array2<f64> = Array2::from_elem((n_x_padded, n_y_padded), f64::NAN);
    for i in 0..n_x_padded {
        let i_source: usize = i.saturating_sub(pad_x).min(n_x - 1);
        for j in 0..n_y_padded {
            let j_source: usize = j.saturating_sub(pad_y).min(n_y - 1);
            padded[(i, j)] = data[i_source * n_y + j_source];
        }
    }

    return Ok((padded, pad_x, pad_y));
}

#[test]
fn test_next_power_of_two() {
    for n in 1..200usize {
        let power: usize = next_power_of_two(n).unwrap();

        // `power` is a power of two, at least `n`, and less than `2 * n`
        assert_eq!(power.count_ones(), 1);
        assert!(power >= n);
        assert!(power < 2 * n);
    }

    assert_eq!(next_power_of_two(1).unwrap(), 1);
    assert_eq!(next_power_of_two(100).unwrap(), 128);
    assert!(next_power_of_two(0).is_err());
}

#[test]
fn test_pad_crop_round_trip() {
    let n_x: usize = 3;
    let n_y: usize = 5;
    let data: Array1<f64> = Array1::from_iter((0..n_x * n_y).map(|i: usize| i as f64));

    let (padded, pad_x, pad_y): (Array2<f64>, usize, usize) = pad_data(&data, (n_x, n_y)).unwrap();

    // max(3, 5) pads towards 8; the odd differences leave a 7x7 grid
    assert_eq!(padded.dim(), (n_x + 2 * pad_x, n_y + 2 * pad_y));
    assert_eq!(pad_x, 2);
    assert_eq!(pad_y, 1);

    // Cropping with the returned offsets reproduces the original grid exactly
    for i in 0..n_x {
        for j in 0..n_y {
            assert_eq!(padded[(i + pad_x, j + pad_y)], data[i * n_y + j]);
        }
    }

    // Corners hold the replicated corner values
    assert_eq!(padded[(0, 0)], data[0]);
    let (n_x_padded, n_y_padded): (usize, usize) = padded.dim();
    assert_eq!(padded[(n_x_padded - 1, n_y_padded - 1)], data[n_x * n_y - 1]);
}

#[test]
fn test_pad_data_shape_mismatch() {
    let data: Array1<f64> = Array1::zeros(7);
    let result: Result<(Array2<f64>, usize, usize), Error> = pad_data(&data, (2, 4));
    assert_eq!(result.unwrap_err(), Error::ShapeMismatch { expected: 8, actual: 7 });
}
