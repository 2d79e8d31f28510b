use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    ZeroSize { name: &'static str },
    ShapeMismatch { expected: usize, actual: usize },
    GridTooSmall { n_x: usize, n_y: usize },
    DegenerateSpacing { axis: char },
    NonPositiveAlpha { alpha: f64 },
    EmptyAlphaSequence,
    InvalidStep { exp_min: f64, exp_max: f64, exp_step: f64 },
    LengthMismatch { expected: usize, actual: usize },
    InsufficientData { n_selected: usize },
    ZeroNorm { direction: char },
    NonFiniteNorm { direction: char },
    DegenerateRegression,
    HorizontalFit,
    NonPositiveCrossing { crossing: f64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroSize { name } => {
                write!(f, "`{}` must be non-zero", name)
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "data length {} does not match shape product {}", actual, expected)
            }
            Error::GridTooSmall { n_x, n_y } => {
                write!(f, "grid {}x{} is too small; sample spacing needs at least 2 points per axis", n_x, n_y)
            }
            Error::DegenerateSpacing { axis } => {
                write!(f, "coordinate extent along `{}` is zero; sample spacing undefined", axis)
            }
            Error::NonPositiveAlpha { alpha } => {
                write!(f, "regularization strength must be positive, got {}", alpha)
            }
            Error::EmptyAlphaSequence => {
                write!(f, "sequence of trial regularization strengths is empty")
            }
            Error::InvalidStep { exp_min, exp_max, exp_step } => {
                write!(f, "invalid exponent range [{}, {}] with step {}", exp_min, exp_max, exp_step)
            }
            Error::LengthMismatch { expected, actual } => {
                write!(f, "sequence length {} != expected length {}", actual, expected)
            }
            Error::InsufficientData { n_selected } => {
                write!(f, "{} points inside the norm window; at least 2 needed for the fit", n_selected)
            }
            Error::ZeroNorm { direction } => {
                write!(f, "derivative norm in `{}` is identically zero across the sweep", direction)
            }
            Error::NonFiniteNorm { direction } => {
                write!(f, "derivative norm in `{}` is not finite", direction)
            }
            Error::DegenerateRegression => {
                write!(f, "selected trial strengths have zero variance; fit undefined")
            }
            Error::HorizontalFit => {
                write!(f, "fitted line is horizontal; no crossing with norm = 0.5")
            }
            Error::NonPositiveCrossing { crossing } => {
                write!(f, "fitted crossing strength {} is not positive; log10 undefined", crossing)
            }
        }
    }
}

impl std::error::Error for Error {}
