// Load modules
mod fft_2d;
mod pad_data;
mod wavenumbers;

// Expose functions to public
pub use fft_2d::{fft2, ifft2};
pub use pad_data::{next_power_of_two, pad_data};
pub use wavenumbers::wavenumbers;
