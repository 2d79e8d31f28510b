// Load modules
mod alpha_trials;
mod linear_regression;
mod s_function;

// Expose functions to public
pub use alpha_trials::alpha_trials;
pub use linear_regression::linear_regression;
pub use s_function::s_function;
