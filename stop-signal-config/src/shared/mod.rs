mod base;
mod signal;

pub use base::*;
pub use signal::*;
