//! Schema module - Configuration and catalog types for evolutionary runs.

mod catalog;
mod evolution;
mod oracle;

pub use catalog::*;
pub use evolution::*;
pub use oracle::*;
