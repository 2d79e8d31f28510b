// Load modules
mod asa_tdr;

// Expose functions to public
pub use asa_tdr::asa_tdr;
