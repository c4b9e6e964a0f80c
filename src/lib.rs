//! `state-indicators` library crate.
//!
//! The binary (`indicators`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or touching the network
//! - the fetch, regression, report, and plot stages can be reused on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod plot;
pub mod regression;
pub mod report;
