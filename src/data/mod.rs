//! Series retrieval: the FRED client and table assembly.

pub mod download;
pub mod fred;

pub use download::*;
pub use fred::{FredClient, API_KEY_VAR};
