// Load modules
mod nonregularized_derivative;
mod regularized_derivative;

// Expose functions to public
pub use nonregularized_derivative::nonregularized_derivative;
pub use regularized_derivative::regularized_derivative;
