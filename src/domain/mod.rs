//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the series catalog and run configuration (`SeriesCatalog`, `AnalysisConfig`)
//! - supported regions (`Region`)
//! - the date-indexed table (`TimeTable`)
//! - regression outputs (`RegressionResult`, `Coefficient`, ...)

pub mod region;
pub mod table;
pub mod types;

pub use region::*;
pub use table::*;
pub use types::*;
