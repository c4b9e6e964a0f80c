//! Mathematical utilities: least squares and distribution tails.

pub mod ols;
pub mod special;

pub use ols::*;
pub use special::*;
