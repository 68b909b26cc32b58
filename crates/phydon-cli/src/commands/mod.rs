//! CLI command implementations
//!
//! Each mode has its own module with a `run` function.

pub mod lookup;
pub mod output;
pub mod serve;
