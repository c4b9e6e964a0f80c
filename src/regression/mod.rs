//! Regression engine: listwise deletion + OLS with an intercept.

pub mod diagnostics;
pub mod fit;

pub use diagnostics::*;
pub use fit::*;
