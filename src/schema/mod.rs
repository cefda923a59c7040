//! Schema module - Configuration and result types for convex search runs.

mod config;
mod results;

pub use config::*;
pub use results::*;
