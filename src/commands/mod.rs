pub mod import;
pub mod insights;

pub use import::*;
pub use insights::*;
