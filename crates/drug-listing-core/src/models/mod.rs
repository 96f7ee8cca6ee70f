//! Domain models for the drug listing editor.

mod drug;
mod field;

pub use drug::*;
pub use field::*;
